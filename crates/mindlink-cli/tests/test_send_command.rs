//! Exit codes and diagnostics of `mindlink-send`.

use std::io::Cursor;

use serde_json::json;
use tempfile::TempDir;
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

use mindlink_cli::commands::send::{run, USAGE};
use mindlink_types::{BridgeConfig, MindlinkError};

fn words(ws: &[&str]) -> Vec<String> {
    ws.iter().map(|w| w.to_string()).collect()
}

fn config_for(server: &MockServer, dir: &TempDir) -> BridgeConfig {
    let mut config = BridgeConfig::for_root(dir.path());
    config.bot_token = Some("test-token".into());
    config.authorized_chat_id = Some("12345".into());
    config.api_base_url = server.uri();
    config
}

fn no_stdin() -> Option<Cursor<&'static [u8]>> {
    None
}

fn stderr_text(buf: Vec<u8>) -> String {
    String::from_utf8(buf).unwrap()
}

async fn mount_send(server: &MockServer, status: u16, body: serde_json::Value, times: u64) {
    Mock::given(matchers::method("POST"))
        .and(matchers::path_regex(r"/bot.*/sendMessage"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn words_are_sent_and_exit_zero() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path_regex(r"/bot.*/sendMessage"))
        .and(matchers::body_partial_json(
            json!({"chat_id": "12345", "text": "hello from the mind"}),
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ok": true, "result": {"message_id": 1}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = config_for(&server, &dir);
    let mut stderr = Vec::new();

    let code = run(
        &words(&["hello", "from", "the", "mind"]),
        Some(Cursor::new("ignored stdin".as_bytes())),
        || Ok(config.clone()),
        &mut stderr,
    )
    .await;

    assert_eq!(code, 0);
    assert!(stderr.is_empty());
    let transcripts: Vec<_> = std::fs::read_dir(&config.mailbox.transcript_dir)
        .unwrap()
        .collect();
    assert_eq!(transcripts.len(), 1);
}

#[tokio::test]
async fn piped_stdin_is_sent_trimmed() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path_regex(r"/bot.*/sendMessage"))
        .and(matchers::body_partial_json(json!({"text": "piped text"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ok": true, "result": {"message_id": 2}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = config_for(&server, &dir);
    let mut stderr = Vec::new();

    let code = run(
        &[],
        Some(Cursor::new("\n piped text \n".as_bytes())),
        || Ok(config.clone()),
        &mut stderr,
    )
    .await;

    assert_eq!(code, 0);
}

#[tokio::test]
async fn terminal_without_words_prints_usage() {
    let server = MockServer::start().await;
    mount_send(&server, 200, json!({"ok": true}), 0).await;

    let mut stderr = Vec::new();
    let code = run(
        &[],
        no_stdin(),
        || -> Result<BridgeConfig, MindlinkError> { panic!("config must not be loaded") },
        &mut stderr,
    )
    .await;

    assert_eq!(code, 1);
    assert_eq!(stderr_text(stderr), format!("{USAGE}\n"));
}

#[tokio::test]
async fn empty_message_has_its_own_diagnostic() {
    let server = MockServer::start().await;
    mount_send(&server, 200, json!({"ok": true}), 0).await;

    let mut stderr = Vec::new();
    let code = run(
        &[],
        Some(Cursor::new("   \n".as_bytes())),
        || -> Result<BridgeConfig, MindlinkError> { panic!("config must not be loaded") },
        &mut stderr,
    )
    .await;

    assert_eq!(code, 1);
    assert_eq!(stderr_text(stderr), "Error: Empty message\n");
}

#[tokio::test]
async fn missing_token_exits_one() {
    let server = MockServer::start().await;
    mount_send(&server, 200, json!({"ok": true}), 0).await;

    let dir = TempDir::new().unwrap();
    let mut config = config_for(&server, &dir);
    config.bot_token = None;
    let mut stderr = Vec::new();

    let code = run(&words(&["hi"]), no_stdin(), || Ok(config), &mut stderr).await;

    assert_eq!(code, 1);
    assert_eq!(stderr_text(stderr), "Error: BOT_ACCESS_TOKEN not set\n");
}

#[tokio::test]
async fn config_error_exits_one() {
    let mut stderr = Vec::new();
    let code = run(
        &words(&["hi"]),
        no_stdin(),
        || Err(MindlinkError::ConfigError("neither MINDLINK_ROOT nor HOME is set".into())),
        &mut stderr,
    )
    .await;

    assert_eq!(code, 1);
    assert!(stderr_text(stderr).starts_with("Error: configuration error"));
}

#[tokio::test]
async fn api_failure_exits_one_without_transcript() {
    let server = MockServer::start().await;
    mount_send(
        &server,
        400,
        json!({"ok": false, "description": "Bad Request: chat not found"}),
        1,
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = config_for(&server, &dir);
    let mut stderr = Vec::new();

    let code = run(&words(&["hi"]), no_stdin(), || Ok(config.clone()), &mut stderr).await;

    assert_eq!(code, 1);
    let err = stderr_text(stderr);
    assert!(err.starts_with("Error: failed to send message"));
    assert!(err.contains("chat not found"));
    assert!(!config.mailbox.transcript_dir.exists());
}
