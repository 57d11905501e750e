//! Bridge between a Telegram chat and a file-based mailbox.
//!
//! Inbound chat messages are authorized, written to a queue directory as
//! one file each, and appended to a daily transcript. Outbound replies go
//! back through the Bot API and land in the same transcript.
//!
//! # Architecture
//!
//! - [`channel`]: transport error type
//! - [`format`]: file naming, transcript blocks, reply texts, command parsing
//! - [`mailbox`]: queue and transcript persistence
//! - [`listener`]: authorization and per-event dispatch
//! - [`sender`]: one-shot outbound delivery
//! - [`telegram`]: Bot API client and long-poll loop

pub mod channel;
pub mod format;
pub mod listener;
pub mod mailbox;
pub mod sender;
pub mod telegram;

pub use channel::ChannelError;
pub use listener::{Action, InboundEvent, Listener};
pub use mailbox::{Direction, Mailbox, MailboxStatus, TranscriptEntry};
pub use sender::{resolve_input, InputError, SendError, Sender};
