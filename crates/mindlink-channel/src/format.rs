//! Text formatting shared by the listener and the sender.
//!
//! Covers the on-disk formats (queue file names and contents, transcript
//! blocks), the fixed reply texts sent back to the chat, and parsing of
//! inbound text into commands.

use chrono::{NaiveDate, NaiveDateTime};

use crate::mailbox::{MailboxStatus, TranscriptEntry};

/// Extension of queue files, without the dot.
pub const QUEUE_EXTENSION: &str = "msg";

/// Extension of transcript files, without the dot.
pub const TRANSCRIPT_EXTENSION: &str = "md";

/// Rejection sent for ordinary messages and `/start`.
pub const REJECT_PRIVATE: &str = "Unauthorized. This bot is private.";

/// Rejection sent for `/status`.
///
/// Shorter than [`REJECT_PRIVATE`]; the two wordings are kept distinct.
pub const REJECT_SHORT: &str = "Unauthorized.";

const PREVIEW_CHARS: usize = 50;

/// Classification of an inbound text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// `/start`: greeting with the caller's chat id.
    Start,
    /// `/status`: queue depth and transcript size.
    Status,
    /// Any other `/command`. Not queued and not answered.
    UnknownCommand(String),
    /// Plain text destined for the queue.
    Message,
}

/// Classify inbound text.
///
/// A command is a leading `/` followed directly by an ASCII letter, digit
/// or `_`; a bare `/` or `/ text` is an ordinary message. The command name
/// is matched case-insensitively with any `@botname` suffix removed, so
/// `/Status@my_bot extra` is [`Inbound::Status`].
pub fn parse_inbound(text: &str) -> Inbound {
    let Some(rest) = text.strip_prefix('/') else {
        return Inbound::Message;
    };
    if !rest.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_') {
        return Inbound::Message;
    }

    let word = rest.split_whitespace().next().unwrap_or("");
    let name = word.split('@').next().unwrap_or(word).to_lowercase();

    match name.as_str() {
        "start" => Inbound::Start,
        "status" => Inbound::Status,
        _ => Inbound::UnknownCommand(name),
    }
}

/// Queue file name for a message received at `now`: `YYYYMMDD-HHMMSS.msg`.
pub fn queue_file_name(now: NaiveDateTime) -> String {
    format!("{}.{QUEUE_EXTENSION}", now.format("%Y%m%d-%H%M%S"))
}

/// Queue file body: a two-line header, a blank line, then the raw text.
pub fn queue_file_contents(sender_label: &str, now: NaiveDateTime, body: &str) -> String {
    format!(
        "From: {sender_label}\nTime: {}\n\n{body}",
        now.format("%Y-%m-%dT%H:%M:%S%.6f")
    )
}

/// Transcript file name for a calendar day: `YYYY-MM-DD.md`.
pub fn transcript_file_name(date: NaiveDate) -> String {
    format!("{}.{TRANSCRIPT_EXTENSION}", date.format("%Y-%m-%d"))
}

/// One transcript block, including its leading blank line.
///
/// ```text
///
/// ## 12:30:45 - alice (incoming)
///
/// Hello
/// ```
pub fn transcript_block(entry: &TranscriptEntry, now: NaiveDateTime) -> String {
    format!(
        "\n## {} - {} ({})\n\n{}\n",
        now.format("%H:%M:%S"),
        entry.speaker,
        entry.direction,
        entry.body
    )
}

/// Reply to an authorized `/start`.
pub fn welcome_text(assistant_label: &str, chat_id: i64) -> String {
    format!(
        "Connected to {assistant_label}'s persistent mind.\n\n\
         Send any message and {assistant_label} will respond when ready.\n\n\
         Your chat ID: {chat_id}"
    )
}

/// Reply to an authorized `/status`.
pub fn status_text(status: &MailboxStatus) -> String {
    format!(
        "Status:\n\
         - Messages in queue: {}\n\
         - Today's conversation log: {} bytes",
        status.queue_depth, status.transcript_bytes
    )
}

/// Shorten a message body for log lines.
pub fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
