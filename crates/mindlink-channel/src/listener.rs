//! Inbound side of the bridge.
//!
//! Each chat update is normalized into an [`InboundEvent`] by the poller.
//! [`dispatch`] decides what to do with it without touching the filesystem,
//! and [`Listener`] carries out the decision against the mailbox and hands
//! back the reply text, if any.

use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use tracing::{debug, error, info, warn};

use mindlink_types::BridgeConfig;

use crate::format::{self, Inbound};
use crate::mailbox::{Mailbox, TranscriptEntry};

/// Label used when a sender has neither a username nor a first name.
pub const UNKNOWN_SENDER: &str = "unknown";

/// A text message from the chat, stripped down to what the bridge uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub chat_id: i64,
    pub sender_label: String,
    pub text: String,
}

impl InboundEvent {
    pub fn new(chat_id: i64, sender_label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            sender_label: sender_label.into(),
            text: text.into(),
        }
    }

    /// Pick the display name: handle, then given name, then [`UNKNOWN_SENDER`].
    pub fn sender_label_from(username: Option<&str>, first_name: Option<&str>) -> String {
        [username, first_name]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_SENDER)
            .to_string()
    }
}

/// Outcome of [`dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Send this text back to the chat and do nothing else.
    Reply(String),
    /// Queue the body and record it in the transcript. No reply.
    Enqueue { sender_label: String, body: String },
    /// Reply with the current mailbox status.
    ReportStatus,
    /// Drop the event silently.
    Ignore,
}

/// Whether `chat_id` may use the bot.
///
/// With no authorized id configured every chat is accepted. Otherwise the
/// decimal form of `chat_id` must equal the configured string.
pub fn is_authorized(authorized_chat_id: Option<&str>, chat_id: i64) -> bool {
    match authorized_chat_id {
        None => true,
        Some(allowed) => chat_id.to_string() == allowed,
    }
}

/// Decide how to handle one inbound event.
pub fn dispatch(
    event: &InboundEvent,
    authorized_chat_id: Option<&str>,
    assistant_label: &str,
) -> Action {
    let kind = format::parse_inbound(&event.text);

    if let Inbound::UnknownCommand(name) = &kind {
        debug!(chat_id = event.chat_id, command = %name, "ignoring unknown command");
        return Action::Ignore;
    }

    if authorized_chat_id.is_none() {
        warn!("no authorized chat id configured, accepting chat_id={}", event.chat_id);
    }
    let authorized = is_authorized(authorized_chat_id, event.chat_id);

    match kind {
        Inbound::Start if authorized => {
            Action::Reply(format::welcome_text(assistant_label, event.chat_id))
        }
        Inbound::Start => Action::Reply(format::REJECT_PRIVATE.to_string()),
        Inbound::Status if authorized => Action::ReportStatus,
        Inbound::Status => Action::Reply(format::REJECT_SHORT.to_string()),
        Inbound::Message if authorized => Action::Enqueue {
            sender_label: event.sender_label.clone(),
            body: event.text.clone(),
        },
        Inbound::Message => {
            warn!(
                chat_id = event.chat_id,
                sender = %event.sender_label,
                "unauthorized message"
            );
            Action::Reply(format::REJECT_PRIVATE.to_string())
        }
        Inbound::UnknownCommand(_) => Action::Ignore,
    }
}

/// Applies dispatch decisions to the mailbox.
pub struct Listener {
    mailbox: Mailbox,
    authorized_chat_id: Option<String>,
    assistant_label: String,
}

impl Listener {
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            mailbox: Mailbox::new(config.mailbox.clone()),
            authorized_chat_id: config.authorized_chat_id.clone(),
            assistant_label: config.assistant_label.clone(),
        }
    }

    /// Prepare the mailbox directories and announce the authorization mode.
    pub fn start(&self) -> Result<()> {
        self.mailbox.ensure_directories()?;

        match &self.authorized_chat_id {
            Some(id) => info!("Authorized chat ID: {id}"),
            None => warn!("no authorized chat id set, the bot will accept messages from anyone"),
        }
        Ok(())
    }

    /// Handle one event at the current local time.
    pub fn handle(&self, event: &InboundEvent) -> Option<String> {
        self.handle_at(event, Local::now().naive_local())
    }

    /// Handle one event as if it arrived at `now`.
    ///
    /// Returns the text to reply with. Filesystem failures are logged and
    /// produce no reply.
    pub fn handle_at(&self, event: &InboundEvent, now: NaiveDateTime) -> Option<String> {
        let action = dispatch(
            event,
            self.authorized_chat_id.as_deref(),
            &self.assistant_label,
        );

        match action {
            Action::Reply(text) => Some(text),
            Action::Ignore => None,
            Action::ReportStatus => match self.mailbox.status_at(now) {
                Ok(status) => Some(format::status_text(&status)),
                Err(e) => {
                    error!("failed to read mailbox status: {e:#}");
                    None
                }
            },
            Action::Enqueue { sender_label, body } => {
                if let Err(e) = self.enqueue(&sender_label, &body, now) {
                    error!(sender = %sender_label, "failed to record message: {e:#}");
                }
                None
            }
        }
    }

    fn enqueue(&self, sender_label: &str, body: &str, now: NaiveDateTime) -> Result<()> {
        info!(
            "Received message from {sender_label}: {}",
            format::preview(body)
        );

        let file_name = self.mailbox.queue_message_at(body, sender_label, now)?;
        info!("Queued message: {file_name}");

        self.mailbox
            .append_transcript_at(&TranscriptEntry::incoming(sender_label, body), now)
    }

    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }
}
