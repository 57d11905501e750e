//! Raw HTTP calls to the Telegram Bot API.
//!
//! Wraps reqwest for `sendMessage` and `getUpdates`. Both return typed
//! responses and map `ok: false` to [`ChannelError::Api`].

use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

use crate::channel::ChannelError;

use super::types::{ApiResponse, SentMessage, Update};

/// Low-level Telegram Bot API client.
pub struct TelegramApi {
    client: Client,
    base_url: String,
}

impl TelegramApi {
    /// Create an API client for `bot_token` against `base_url`.
    pub fn with_base_url(bot_token: &str, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: format!("{}/bot{}", base_url.trim_end_matches('/'), bot_token),
        }
    }

    /// Send a plain text message to a chat.
    ///
    /// `chat_id` is passed through as a string; the Bot API accepts numeric
    /// ids in string form. Returns the sent message's ID on success.
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<i64, ChannelError> {
        let body = json!({
            "chat_id": chat_id,
            "text": text,
        });

        debug!("sendMessage to chat_id={chat_id}");

        let resp = self
            .client
            .post(format!("{}/sendMessage", self.base_url))
            .json(&body)
            .send()
            .await?;

        let api_resp: ApiResponse<SentMessage> = resp.json().await?;
        if !api_resp.ok {
            let desc = api_resp.description.unwrap_or_default();
            warn!("sendMessage failed: {desc}");
            return Err(ChannelError::Api(desc));
        }

        Ok(api_resp.result.map(|m| m.message_id).unwrap_or(0))
    }

    /// Long-poll for new updates.
    ///
    /// `offset` should be set to `last_update_id + 1` to acknowledge
    /// previously received updates.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: u64,
    ) -> Result<Vec<Update>, ChannelError> {
        let mut body = json!({
            "timeout": timeout,
            "allowed_updates": ["message"],
        });

        if let Some(off) = offset {
            body["offset"] = json!(off);
        }

        let resp = self
            .client
            .post(format!("{}/getUpdates", self.base_url))
            .json(&body)
            .send()
            .await?;

        let api_resp: ApiResponse<Vec<Update>> = resp.json().await?;
        if !api_resp.ok {
            let desc = api_resp.description.unwrap_or_default();
            warn!("getUpdates failed: {desc}");
            return Err(ChannelError::Api(desc));
        }

        Ok(api_resp.result.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn send_message_posts_chat_id_and_text() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .and(matchers::path("/bottest-token/sendMessage"))
            .and(matchers::body_partial_json(
                json!({"chat_id": "12345", "text": "Hello"}),
            ))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"ok": true, "result": {"message_id": 42}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let api = TelegramApi::with_base_url("test-token", &server.uri());
        let id = api.send_message("12345", "Hello").await.unwrap();
        assert_eq!(id, 42);
    }

    #[tokio::test]
    async fn send_message_api_error_is_reported() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .and(matchers::path_regex(r"/bot.*/sendMessage"))
            .respond_with(ResponseTemplate::new(400).set_body_json(
                json!({"ok": false, "description": "Bad Request: chat not found"}),
            ))
            .mount(&server)
            .await;

        let api = TelegramApi::with_base_url("test-token", &server.uri());
        let err = api.send_message("1", "hi").await.unwrap_err();
        match err {
            ChannelError::Api(desc) => assert!(desc.contains("chat not found")),
            other => panic!("expected Api error, got {other}"),
        }
    }

    #[tokio::test]
    async fn get_updates_sends_offset() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .and(matchers::path_regex(r"/bot.*/getUpdates"))
            .and(matchers::body_partial_json(json!({"offset": 11, "timeout": 0})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": [{"update_id": 11}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = TelegramApi::with_base_url("test-token", &server.uri());
        let updates = api.get_updates(Some(11), 0).await.unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].update_id, 11);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = TelegramApi::with_base_url("tok", "http://localhost:1/");
        assert_eq!(api.base_url, "http://localhost:1/bottok");
    }
}
