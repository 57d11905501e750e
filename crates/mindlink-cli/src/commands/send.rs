//! `mindlink-send`: deliver one message to the configured chat.

use std::io::{IsTerminal, Read, Write};

use anyhow::Context;

use mindlink_channel::{resolve_input, InputError, Sender};
use mindlink_types::{BridgeConfig, MindlinkError};

use crate::{EXIT_FAILURE, EXIT_OK};

/// Printed to stderr when there is nothing to send.
pub const USAGE: &str = "Usage: mindlink-send \"message\"\n   or: echo \"message\" | mindlink-send";

/// Entry point for the binary: wires up the real stdin, stderr and environment.
pub fn run_main(words: &[String]) -> anyhow::Result<i32> {
    let stdin = std::io::stdin();
    let piped = (!stdin.is_terminal()).then(|| stdin.lock());

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    Ok(rt.block_on(run(
        words,
        piped,
        BridgeConfig::from_env,
        &mut std::io::stderr(),
    )))
}

/// Resolve the message, send it and report the outcome.
///
/// Input is resolved before configuration is loaded, so a usage error
/// never depends on the environment. Diagnostics go to `stderr`; the
/// return value is the process exit code.
pub async fn run<R, W, F>(words: &[String], stdin: Option<R>, load_config: F, stderr: &mut W) -> i32
where
    R: Read,
    W: Write,
    F: FnOnce() -> Result<BridgeConfig, MindlinkError>,
{
    let message = match resolve_input(words, stdin) {
        Ok(message) => message,
        Err(InputError::NoInput) => {
            let _ = writeln!(stderr, "{USAGE}");
            return EXIT_FAILURE;
        }
        Err(e) => {
            let _ = writeln!(stderr, "Error: {e}");
            return EXIT_FAILURE;
        }
    };

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            let _ = writeln!(stderr, "Error: {e}");
            return EXIT_FAILURE;
        }
    };

    match Sender::new(config).send(&message).await {
        Ok(()) => EXIT_OK,
        Err(e) => {
            let _ = writeln!(stderr, "Error: {e}");
            EXIT_FAILURE
        }
    }
}
