//! Queue and transcript files under the mailbox root.
//!
//! ## Layout
//!
//! ```text
//! <root>/message_queue/20250115-123045.msg
//! <root>/conversations/2025-01-15.md
//! ```
//!
//! Queue files are written whole and never touched again; an external
//! consumer drains them. A message arriving in the same second as the
//! previous one replaces its file.
//!
//! Transcript files are append-only. Each entry is written with a single
//! `write` call on a file opened in append mode, which is what keeps
//! entries from the listener and sender processes from interleaving.

use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use tracing::debug;

use mindlink_types::MailboxConfig;

use crate::format;

/// Which way a transcript entry travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Incoming,
    Outgoing,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Incoming => f.write_str("incoming"),
            Direction::Outgoing => f.write_str("outgoing"),
        }
    }
}

/// A single exchange recorded in the daily transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub direction: Direction,
    /// Sender display name for incoming entries, assistant label for outgoing.
    pub speaker: String,
    pub body: String,
}

impl TranscriptEntry {
    pub fn incoming(sender_label: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            direction: Direction::Incoming,
            speaker: sender_label.into(),
            body: body.into(),
        }
    }

    pub fn outgoing(assistant_label: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            direction: Direction::Outgoing,
            speaker: assistant_label.into(),
            body: body.into(),
        }
    }
}

/// Snapshot reported by the `/status` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MailboxStatus {
    /// Number of `*.msg` files currently in the queue.
    pub queue_depth: usize,
    /// Byte length of today's transcript, 0 when it does not exist yet.
    pub transcript_bytes: u64,
}

/// Handle on the queue and transcript directories.
#[derive(Debug, Clone)]
pub struct Mailbox {
    config: MailboxConfig,
}

impl Mailbox {
    pub fn new(config: MailboxConfig) -> Self {
        Self { config }
    }

    /// Create the queue and transcript directories. Safe to call repeatedly.
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [&self.config.queue_dir, &self.config.transcript_dir] {
            fs::create_dir_all(dir)
                .with_context(|| format!("create mailbox directory: {}", dir.display()))?;
        }
        Ok(())
    }

    /// Path of a queue file with the given name.
    pub fn queue_path_for(&self, file_name: &str) -> PathBuf {
        self.config.queue_dir.join(file_name)
    }

    /// Path of the transcript for a calendar day.
    pub fn transcript_path_for_date(&self, date: NaiveDate) -> PathBuf {
        self.config
            .transcript_dir
            .join(format::transcript_file_name(date))
    }

    /// Write a message to the queue, stamped with the current local time.
    ///
    /// Returns the queue file name.
    pub fn queue_message(&self, body: &str, sender_label: &str) -> Result<String> {
        self.queue_message_at(body, sender_label, Local::now().naive_local())
    }

    /// Write a message to the queue as if received at `now`.
    pub fn queue_message_at(
        &self,
        body: &str,
        sender_label: &str,
        now: NaiveDateTime,
    ) -> Result<String> {
        fs::create_dir_all(&self.config.queue_dir).with_context(|| {
            format!("create queue directory: {}", self.config.queue_dir.display())
        })?;

        let file_name = format::queue_file_name(now);
        let path = self.queue_path_for(&file_name);
        fs::write(&path, format::queue_file_contents(sender_label, now, body))
            .with_context(|| format!("write queue file: {}", path.display()))?;

        Ok(file_name)
    }

    /// Append an entry to today's transcript.
    pub fn append_transcript(&self, entry: &TranscriptEntry) -> Result<()> {
        self.append_transcript_at(entry, Local::now().naive_local())
    }

    /// Append an entry to the transcript of `now`'s date.
    ///
    /// Creates the transcript directory and file when absent.
    pub fn append_transcript_at(&self, entry: &TranscriptEntry, now: NaiveDateTime) -> Result<()> {
        fs::create_dir_all(&self.config.transcript_dir).with_context(|| {
            format!(
                "create transcript directory: {}",
                self.config.transcript_dir.display()
            )
        })?;

        let path = self.transcript_path_for_date(now.date());
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("open transcript: {}", path.display()))?;

        file.write_all(format::transcript_block(entry, now).as_bytes())
            .with_context(|| format!("append transcript: {}", path.display()))?;

        debug!(file = %path.display(), direction = %entry.direction, "transcript entry appended");
        Ok(())
    }

    /// Count queue files with the queue extension. A missing directory counts as empty.
    pub fn queue_depth(&self) -> Result<usize> {
        let entries = match fs::read_dir(&self.config.queue_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("read queue directory: {}", self.config.queue_dir.display())
                })
            }
        };

        let mut count = 0;
        for dir_entry in entries {
            let path = dir_entry?.path();
            if path.is_file() && is_queue_file(&path) {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Byte length of a day's transcript, 0 when the file does not exist.
    pub fn transcript_size(&self, date: NaiveDate) -> Result<u64> {
        let path = self.transcript_path_for_date(date);
        match fs::metadata(&path) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e).with_context(|| format!("stat transcript: {}", path.display())),
        }
    }

    /// Queue depth and the size of `now`'s transcript.
    pub fn status_at(&self, now: NaiveDateTime) -> Result<MailboxStatus> {
        Ok(MailboxStatus {
            queue_depth: self.queue_depth()?,
            transcript_bytes: self.transcript_size(now.date())?,
        })
    }

    pub fn config(&self) -> &MailboxConfig {
        &self.config
    }
}

fn is_queue_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext == format::QUEUE_EXTENSION)
        .unwrap_or(false)
}
