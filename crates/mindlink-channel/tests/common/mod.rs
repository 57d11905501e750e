//! Shared helpers for integration tests.
//!
//! Each integration test file compiles common/ as its own module, so not
//! every helper is used in every file.
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::json;
use tempfile::TempDir;
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

use mindlink_types::BridgeConfig;

pub const AUTHORIZED_ID: &str = "12345";

/// Config rooted in a fresh temp dir, optionally restricted to one chat.
pub fn temp_config(authorized_chat_id: Option<&str>) -> (BridgeConfig, TempDir) {
    let dir = TempDir::new().expect("should create temp mailbox root");
    let mut config = BridgeConfig::for_root(dir.path().join("mind"));
    config.authorized_chat_id = authorized_chat_id.map(str::to_string);
    (config, dir)
}

/// Config wired to a mock Bot API with both token and chat id set.
pub fn sender_config(server: &MockServer) -> (BridgeConfig, TempDir) {
    let (mut config, dir) = temp_config(Some(AUTHORIZED_ID));
    config.bot_token = Some("test-token".into());
    config.api_base_url = server.uri();
    (config, dir)
}

/// 2025-01-15T12:30:45.
pub fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 15)
        .unwrap()
        .and_hms_opt(12, 30, 45)
        .unwrap()
}

/// Every file in the queue directory, sorted by name.
pub fn queue_files(config: &BridgeConfig) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(&config.mailbox.queue_dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries.map(|e| e.unwrap().path()).collect();
    files.sort();
    files
}

/// Contents of the transcript for `now`'s date, if it exists.
pub fn transcript_for(config: &BridgeConfig, now: NaiveDateTime) -> Option<String> {
    let path = config
        .mailbox
        .transcript_dir
        .join(format!("{}.md", now.format("%Y-%m-%d")));
    fs::read_to_string(path).ok()
}

/// Mount a successful `sendMessage` handler.
pub async fn mount_send_ok(server: &MockServer) {
    Mock::given(matchers::method("POST"))
        .and(matchers::path_regex(r"/bot.*/sendMessage"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ok": true, "result": {"message_id": 42}})),
        )
        .mount(server)
        .await;
}

/// A `getUpdates` payload carrying one private text message.
pub fn text_update(update_id: i64, chat_id: i64, username: &str, text: &str) -> serde_json::Value {
    json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id * 10,
            "from": {"id": chat_id, "is_bot": false, "first_name": "Test", "username": username},
            "chat": {"id": chat_id, "type": "private"},
            "date": 1736944245,
            "text": text
        }
    })
}
