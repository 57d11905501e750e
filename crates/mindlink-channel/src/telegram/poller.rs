//! Long-polling loop for Telegram Bot API `getUpdates`.
//!
//! Normalizes text messages into [`InboundEvent`]s, passes them to the
//! [`Listener`] one at a time and sends back whatever reply it produces.
//! Updates are handled strictly in arrival order; the next `getUpdates`
//! call is made only after every update of the previous batch is done.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::channel::ChannelError;
use crate::listener::{InboundEvent, Listener};

use super::api::TelegramApi;
use super::types::Message;

const MAX_BACKOFF_SECS: u64 = 60;

/// Convert a Telegram message into an [`InboundEvent`].
///
/// Returns `None` for messages without text (photos, stickers, joins).
pub fn inbound_event(msg: &Message) -> Option<InboundEvent> {
    let text = msg.text.as_deref()?;
    let sender_label = InboundEvent::sender_label_from(
        msg.from.as_ref().and_then(|u| u.username.as_deref()),
        msg.from.as_ref().map(|u| u.first_name.as_str()),
    );
    Some(InboundEvent::new(msg.chat.id, sender_label, text))
}

/// Acknowledge and discard every update queued before start-up.
///
/// Returns the offset to resume polling from.
pub async fn drain_pending(api: &TelegramApi) -> Result<Option<i64>, ChannelError> {
    let mut offset: Option<i64> = None;
    let mut dropped = 0usize;

    loop {
        let updates = api.get_updates(offset, 0).await?;
        match updates.last() {
            Some(last) => {
                offset = Some(last.update_id + 1);
                dropped += updates.len();
            }
            None => break,
        }
    }

    if dropped > 0 {
        info!(dropped, "dropped pending updates");
    }
    Ok(offset)
}

/// Run the long-polling loop until `cancel` flips to `true`.
///
/// Failed `getUpdates` calls back off exponentially from 1 s up to
/// 60 s. Failed replies are logged and not retried.
pub async fn poll_loop(
    api: Arc<TelegramApi>,
    listener: Arc<Listener>,
    poll_timeout: u64,
    mut offset: Option<i64>,
    mut cancel: watch::Receiver<bool>,
) {
    let mut backoff_secs = 1u64;

    info!("Bot started, polling for messages...");

    loop {
        if *cancel.borrow() {
            info!("Telegram poller shutting down");
            return;
        }

        let updates = tokio::select! {
            result = api.get_updates(offset, poll_timeout) => result,
            _ = cancel.changed() => {
                info!("Telegram poller cancelled");
                return;
            }
        };

        match updates {
            Ok(updates) => {
                backoff_secs = 1;

                for update in updates {
                    offset = Some(update.update_id + 1);

                    let Some(msg) = update.message else {
                        continue;
                    };
                    let Some(event) = inbound_event(&msg) else {
                        debug!(chat_id = msg.chat.id, "skipping non-text message");
                        continue;
                    };

                    if let Some(reply) = listener.handle(&event) {
                        let chat_id = event.chat_id.to_string();
                        if let Err(e) = api.send_message(&chat_id, &reply).await {
                            warn!(chat_id = event.chat_id, error = %e, "failed to send reply");
                        }
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, backoff_secs, "getUpdates failed, backing off");
                tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                backoff_secs = (backoff_secs * 2).min(MAX_BACKOFF_SECS);
            }
        }
    }
}
