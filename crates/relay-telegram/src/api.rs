//! Telegram Bot API types and client.
//!
//! Only `getUpdates` and `sendMessage` are used. Responses are decoded from
//! the body whatever the HTTP status, since a rate-limited poll is reported
//! as `{"ok": false, "error_code": 429, ...}`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::BridgeConfig;
use crate::error::{Result, TelegramError};

/// Telegram's error code for flood control.
pub const RATE_LIMIT_CODE: i64 = 429;

/// Envelope around every Bot API response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub ok: bool,
    pub result: Option<T>,
    pub error_code: Option<i64>,
    pub description: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(result: T) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error_code: None,
            description: None,
        }
    }

    pub fn failure(code: i64, description: impl Into<String>) -> Self {
        Self {
            ok: false,
            result: None,
            error_code: Some(code),
            description: Some(description.into()),
        }
    }

    /// True only for a rate-limit signal. Any other failure is not worth a
    /// token rotation.
    pub fn is_rate_limited(&self) -> bool {
        !self.ok && self.error_code == Some(RATE_LIMIT_CODE)
    }

    /// Convert into the result payload or an [`TelegramError::ApiError`].
    pub fn into_result(self) -> Result<Option<T>> {
        if self.ok {
            Ok(self.result)
        } else {
            Err(TelegramError::ApiError {
                code: self.error_code.unwrap_or_default(),
                description: self.description.unwrap_or_default(),
            })
        }
    }
}

/// An incoming update. Only message updates are acted on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Chat {
    pub id: i64,
}

impl Update {
    /// Build a text message update.
    pub fn text(update_id: i64, chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            update_id,
            message: Some(Message {
                chat: Chat { id: chat_id },
                text: Some(text.into()),
            }),
        }
    }
}

/// The two Bot API calls the bridge makes.
///
/// The token is passed per call because the bridge rotates it.
#[async_trait]
pub trait TelegramApi: Send + Sync {
    /// Long-poll for updates starting at `offset`.
    async fn get_updates(&self, token: &str, offset: i64) -> Result<ApiResponse<Vec<Update>>>;

    /// Send a text message to a chat.
    async fn send_message(&self, token: &str, chat_id: i64, text: &str) -> Result<()>;
}

#[async_trait]
impl<T: TelegramApi + ?Sized> TelegramApi for Arc<T> {
    async fn get_updates(&self, token: &str, offset: i64) -> Result<ApiResponse<Vec<Update>>> {
        (**self).get_updates(token, offset).await
    }

    async fn send_message(&self, token: &str, chat_id: i64, text: &str) -> Result<()> {
        (**self).send_message(token, chat_id, text).await
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'a str>,
}

/// Bot API client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTelegramApi {
    client: reqwest::Client,
    base_url: String,
    poll_timeout_secs: u32,
    request_timeout: Duration,
    parse_mode: Option<String>,
}

impl HttpTelegramApi {
    pub fn new(config: &BridgeConfig) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            poll_timeout_secs: config.poll_timeout_secs,
            request_timeout: config.request_timeout,
            parse_mode: config.parse_mode.clone(),
        })
    }

    fn method_url(&self, token: &str, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, token, method)
    }
}

#[async_trait]
impl TelegramApi for HttpTelegramApi {
    async fn get_updates(&self, token: &str, offset: i64) -> Result<ApiResponse<Vec<Update>>> {
        trace!(offset, "Polling getUpdates");

        let response = self
            .client
            .get(self.method_url(token, "getUpdates"))
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", self.poll_timeout_secs.to_string()),
            ])
            .timeout(self.request_timeout)
            .send()
            .await?;

        let status = response.status();
        let body: ApiResponse<Vec<Update>> = response.json().await?;
        debug!(
            status = %status,
            ok = body.ok,
            updates = body.result.as_ref().map_or(0, Vec::len),
            "getUpdates response"
        );
        Ok(body)
    }

    async fn send_message(&self, token: &str, chat_id: i64, text: &str) -> Result<()> {
        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode: self.parse_mode.as_deref(),
        };

        let response = self
            .client
            .post(self.method_url(token, "sendMessage"))
            .json(&request)
            .timeout(self.request_timeout)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        let description = serde_json::from_str::<ApiResponse<serde_json::Value>>(&text)
            .ok()
            .and_then(|r| r.description)
            .unwrap_or(text);
        Err(TelegramError::ApiError {
            code: i64::from(status.as_u16()),
            description,
        })
    }
}
