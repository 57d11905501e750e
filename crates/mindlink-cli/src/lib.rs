//! Shared plumbing for the `mindlink-listener` and `mindlink-send` binaries.

pub mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Process exit code for success.
pub const EXIT_OK: i32 = 0;
/// Process exit code for every failure. No other codes are used.
pub const EXIT_FAILURE: i32 = 1;

/// Install the stderr tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_level` applies.
pub fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse arguments, mapping clap's usage errors to [`EXIT_FAILURE`].
///
/// clap exits with 2 on bad arguments; both binaries only ever exit 0 or 1.
/// `--help` and `--version` still exit 0.
pub fn parse_or_exit<P: Parser>() -> P {
    match P::try_parse() {
        Ok(parsed) => parsed,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() { EXIT_FAILURE } else { EXIT_OK });
        }
    }
}
