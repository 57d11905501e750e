//! Telegram Bot API transport.
//!
//! Long-polls `getUpdates` for inbound messages and calls `sendMessage`
//! directly for replies and outbound messages.

pub mod api;
pub mod poller;
pub mod types;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use mindlink_types::BridgeConfig;

use crate::listener::Listener;

use self::api::TelegramApi;

/// Run the listener until `cancel` fires.
///
/// Fails before touching the network when the bot token is missing or the
/// mailbox directories cannot be created. Updates that were pending at
/// start-up are dropped; if that fails the loop starts without an offset.
pub async fn run_listener(
    config: &BridgeConfig,
    cancel: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let token = config.require_token()?;

    let listener = Arc::new(Listener::new(config));
    listener.start()?;

    info!("Starting Telegram bot...");
    let api = Arc::new(TelegramApi::with_base_url(token, &config.api_base_url));

    let offset = match poller::drain_pending(&api).await {
        Ok(offset) => offset,
        Err(e) => {
            warn!(error = %e, "failed to drop pending updates, polling from the start");
            None
        }
    };

    poller::poll_loop(api, listener, config.poll_timeout_secs, offset, cancel).await;
    Ok(())
}
