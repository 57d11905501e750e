//! Configuration for the listener and sender processes.
//!
//! [`BridgeConfig`] is resolved once at process start from environment
//! variables and handed to every component by reference. Directory paths
//! live in [`MailboxConfig`] rather than constants so tests can point a
//! component at a temporary root.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::MindlinkError;

/// Environment variable holding the Telegram bot token.
pub const ENV_BOT_TOKEN: &str = "BOT_ACCESS_TOKEN";
/// Environment variable holding the single authorized chat id.
pub const ENV_CHAT_ID: &str = "AUTHORIZED_CHAT_ID";
/// Overrides the mailbox root (default `$HOME/workspace/mind`).
pub const ENV_ROOT: &str = "MINDLINK_ROOT";
/// Overrides the Bot API base URL.
pub const ENV_API_BASE_URL: &str = "MINDLINK_API_BASE_URL";
/// Long-poll timeout in seconds for `getUpdates`.
pub const ENV_POLL_TIMEOUT: &str = "MINDLINK_POLL_TIMEOUT_SECS";
/// Speaker label used for outbound transcript entries.
pub const ENV_ASSISTANT_LABEL: &str = "MINDLINK_ASSISTANT_LABEL";

pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_ASSISTANT_LABEL: &str = "Claude";

/// Directory layout of the shared mailbox.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MailboxConfig {
    /// Mailbox root; the two directories below live under it.
    pub root: PathBuf,
    /// One `<YYYYMMDD-HHMMSS>.msg` file per queued inbound message.
    pub queue_dir: PathBuf,
    /// One `<YYYY-MM-DD>.md` transcript per calendar day.
    pub transcript_dir: PathBuf,
}

impl MailboxConfig {
    /// Derive the standard `message_queue/` and `conversations/` layout under `root`.
    pub fn at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            queue_dir: root.join("message_queue"),
            transcript_dir: root.join("conversations"),
            root,
        }
    }
}

/// Top-level configuration shared by both binaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Bot API credential. Required by both components, checked at use.
    pub bot_token: Option<String>,
    /// Authorized chat id. `None` puts the listener in open mode and
    /// leaves the sender without a destination.
    pub authorized_chat_id: Option<String>,
    /// Base URL of the Bot API, without the `/bot<token>` suffix.
    pub api_base_url: String,
    /// Long-poll timeout passed to `getUpdates`.
    pub poll_timeout_secs: u64,
    /// Speaker label for outbound transcript entries.
    pub assistant_label: String,
    pub mailbox: MailboxConfig,
}

impl BridgeConfig {
    /// Resolve configuration from the process environment.
    pub fn from_env() -> Result<Self, MindlinkError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary key lookup.
    ///
    /// Empty or whitespace-only values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MindlinkError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let root = match get(ENV_ROOT) {
            Some(root) => PathBuf::from(root),
            None => {
                let home = get("HOME").ok_or_else(|| {
                    MindlinkError::ConfigError(format!("neither {ENV_ROOT} nor HOME is set"))
                })?;
                PathBuf::from(home).join("workspace").join("mind")
            }
        };

        let poll_timeout_secs = match get(ENV_POLL_TIMEOUT) {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                MindlinkError::ConfigError(format!("{ENV_POLL_TIMEOUT} is not a number: {raw}"))
            })?,
            None => DEFAULT_POLL_TIMEOUT_SECS,
        };

        Ok(Self {
            bot_token: get(ENV_BOT_TOKEN),
            authorized_chat_id: get(ENV_CHAT_ID),
            api_base_url: get(ENV_API_BASE_URL)
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            poll_timeout_secs,
            assistant_label: get(ENV_ASSISTANT_LABEL)
                .unwrap_or_else(|| DEFAULT_ASSISTANT_LABEL.to_string()),
            mailbox: MailboxConfig::at(root),
        })
    }

    /// Build a config rooted at `root` with defaults for everything else.
    pub fn for_root(root: impl AsRef<Path>) -> Self {
        Self {
            bot_token: None,
            authorized_chat_id: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
            assistant_label: DEFAULT_ASSISTANT_LABEL.to_string(),
            mailbox: MailboxConfig::at(root),
        }
    }

    pub fn require_token(&self) -> Result<&str, MindlinkError> {
        self.bot_token
            .as_deref()
            .ok_or(MindlinkError::MissingVar(ENV_BOT_TOKEN))
    }

    pub fn require_chat_id(&self) -> Result<&str, MindlinkError> {
        self.authorized_chat_id
            .as_deref()
            .ok_or(MindlinkError::MissingVar(ENV_CHAT_ID))
    }
}
