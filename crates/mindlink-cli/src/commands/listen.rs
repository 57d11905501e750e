//! `mindlink-listener`: poll the chat and feed the mailbox.

use anyhow::{bail, Context};
use tokio::sync::watch;
use tracing::info;

use mindlink_channel::telegram;
use mindlink_types::BridgeConfig;

/// Entry point: resolve config, create a tokio runtime and poll until Ctrl-C.
pub fn run() -> anyhow::Result<()> {
    run_with(BridgeConfig::from_env()?)
}

/// Run the listener with an already resolved config.
///
/// A missing token is returned as an error without logging; the caller
/// reports it.
pub fn run_with(config: BridgeConfig) -> anyhow::Result<()> {
    if config.bot_token.is_none() {
        bail!("BOT_ACCESS_TOKEN not set");
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;
    rt.block_on(listen(config))
}

async fn listen(config: BridgeConfig) -> anyhow::Result<()> {
    let (cancel_tx, cancel_rx) = watch::channel(false);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received");
            let _ = cancel_tx.send(true);
        }
    });

    telegram::run_listener(&config, cancel_rx).await
}
