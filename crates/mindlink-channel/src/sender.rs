//! Outbound side of the bridge.
//!
//! One invocation delivers one message to the configured chat. The
//! transcript entry is written only after the Bot API confirms the send,
//! so a failed send never shows up in the transcript.

use std::io::Read;

use chrono::{Local, NaiveDateTime};
use thiserror::Error;
use tracing::info;

use mindlink_types::{BridgeConfig, MindlinkError};

use crate::channel::ChannelError;
use crate::mailbox::{Mailbox, TranscriptEntry};
use crate::telegram::api::TelegramApi;

/// Failures while working out what to send.
#[derive(Debug, Error)]
pub enum InputError {
    /// No words were given and stdin is an interactive terminal.
    #[error("no message given")]
    NoInput,

    #[error("Empty message")]
    Empty,

    #[error("failed to read stdin: {0}")]
    Read(#[from] std::io::Error),
}

/// Failures of [`Sender::send`].
#[derive(Debug, Error)]
pub enum SendError {
    #[error(transparent)]
    Config(#[from] MindlinkError),

    #[error("failed to send message: {0}")]
    Transmit(#[from] ChannelError),

    /// The message was delivered but the transcript could not be updated.
    #[error("message sent but not logged: {0:#}")]
    Transcript(anyhow::Error),
}

/// Work out the message body.
///
/// Words win: joined with single spaces, untouched otherwise. Without
/// words, `stdin` is read to the end and trimmed; pass `None` when stdin
/// is an interactive terminal. An empty result is [`InputError::Empty`].
pub fn resolve_input<R: Read>(words: &[String], stdin: Option<R>) -> Result<String, InputError> {
    let message = if !words.is_empty() {
        words.join(" ")
    } else if let Some(mut reader) = stdin {
        let mut buf = String::new();
        reader.read_to_string(&mut buf)?;
        buf.trim().to_string()
    } else {
        return Err(InputError::NoInput);
    };

    if message.is_empty() {
        return Err(InputError::Empty);
    }
    Ok(message)
}

/// Delivers outbound messages and records them.
pub struct Sender {
    config: BridgeConfig,
    mailbox: Mailbox,
}

impl Sender {
    pub fn new(config: BridgeConfig) -> Self {
        let mailbox = Mailbox::new(config.mailbox.clone());
        Self { config, mailbox }
    }

    /// Send `text` to the configured chat and log it at the current time.
    pub async fn send(&self, text: &str) -> Result<(), SendError> {
        self.send_at(text, Local::now().naive_local()).await
    }

    /// Send `text`, stamping the transcript entry with `now`.
    ///
    /// Token and chat id are checked before any network traffic. Exactly
    /// one `sendMessage` call is made; it is not retried.
    pub async fn send_at(&self, text: &str, now: NaiveDateTime) -> Result<(), SendError> {
        let token = self.config.require_token()?;
        let chat_id = self.config.require_chat_id()?;

        let api = TelegramApi::with_base_url(token, &self.config.api_base_url);
        let message_id = api.send_message(chat_id, text).await?;
        info!(chat_id, message_id, "message sent");

        self.mailbox
            .append_transcript_at(
                &TranscriptEntry::outgoing(self.config.assistant_label.as_str(), text),
                now,
            )
            .map_err(SendError::Transcript)
    }

    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }
}
