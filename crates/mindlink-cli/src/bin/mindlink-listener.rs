use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use mindlink_cli::commands;

/// Poll Telegram and write authorized messages to the mind's mailbox.
#[derive(Parser, Debug)]
#[command(name = "mindlink-listener", version, about)]
struct Cli {}

fn main() -> ExitCode {
    mindlink_cli::init_tracing("info");
    let _cli: Cli = mindlink_cli::parse_or_exit();

    match commands::listen::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
