use clap::Parser;

use mindlink_cli::{commands, EXIT_FAILURE};

/// Send a message from the mind to its Telegram chat.
#[derive(Parser, Debug)]
#[command(name = "mindlink-send", version, about)]
struct Cli {
    /// Message words, joined with spaces. Read from stdin when omitted.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    words: Vec<String>,
}

fn main() {
    mindlink_cli::init_tracing("warn");
    let cli: Cli = mindlink_cli::parse_or_exit();

    let code = match commands::send::run_main(&cli.words) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            EXIT_FAILURE
        }
    };
    std::process::exit(code);
}
