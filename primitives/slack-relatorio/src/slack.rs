//! Outbound Slack calls: `views.open` and the incoming webhook.

use reqwest::{StatusCode, header::CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::form::View;

/// Production Slack Web API host.
pub const DEFAULT_API_BASE: &str = "https://slack.com";

const VIEWS_OPEN_ENDPOINT: &str = "/api/views.open";
const JSON_UTF8: &str = "application/json; charset=utf-8";

#[derive(Debug, Error)]
pub enum SlackError {
    #[error("failed to create HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to execute HTTP request: {0}")]
    Request(#[source] reqwest::Error),
    #[error("Slack responded with HTTP {0}: {1}")]
    Http(StatusCode, String),
    #[error("failed to parse Slack API response: {0}")]
    ResponseParse(#[source] serde_json::Error),
    #[error("Slack API returned error `{0}`")]
    Api(String),
}

#[derive(Debug, Serialize)]
struct OpenViewRequest<'a> {
    trigger_id: &'a str,
    view: &'a View,
}

/// Envelope shared by every Web API response.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct WebhookMessage<'a> {
    text: &'a str,
}

/// Client for the two Slack endpoints the relay talks to.
#[derive(Clone)]
pub struct SlackClient {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
    webhook_url: String,
}

impl SlackClient {
    pub fn new(
        api_base: &str,
        bot_token: impl Into<String>,
        webhook_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SlackError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SlackError::ClientBuild)?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
            webhook_url: webhook_url.into(),
        })
    }

    /// Opens `view` in response to the interaction identified by `trigger_id`.
    ///
    /// A well-formed reply with `ok: false` is returned as [`SlackError::Api`].
    pub async fn open_view(&self, trigger_id: &str, view: &View) -> Result<(), SlackError> {
        let body = serde_json::to_vec(&OpenViewRequest { trigger_id, view })
            .map_err(SlackError::Encode)?;

        let resp = self
            .client
            .post(format!("{}{VIEWS_OPEN_ENDPOINT}", self.api_base))
            .bearer_auth(&self.bot_token)
            .header(CONTENT_TYPE, JSON_UTF8)
            .body(body)
            .send()
            .await
            .map_err(SlackError::Request)?;

        let status = resp.status();
        let bytes = resp.bytes().await.map_err(SlackError::Request)?;

        if !status.is_success() {
            return Err(SlackError::Http(
                status,
                String::from_utf8_lossy(&bytes).to_string(),
            ));
        }

        let api_response: ApiResponse =
            serde_json::from_slice(&bytes).map_err(SlackError::ResponseParse)?;

        tracing::debug!(ok = api_response.ok, "views.open responded");

        if api_response.ok {
            Ok(())
        } else {
            Err(SlackError::Api(
                api_response.error.unwrap_or_else(|| "unknown_error".to_string()),
            ))
        }
    }

    /// Posts a plain message to the incoming webhook.
    pub async fn post_webhook(&self, text: &str) -> Result<(), SlackError> {
        let resp = self
            .client
            .post(&self.webhook_url)
            .json(&WebhookMessage { text })
            .send()
            .await
            .map_err(SlackError::Request)?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        Err(SlackError::Http(status, body))
    }

    /// Webhook URL with its secret path replaced, safe to log.
    pub fn webhook_display(&self) -> String {
        mask_url(&self.webhook_url)
    }
}

fn mask_url(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => format!("{}://{host}/***", parsed.scheme()),
            None => "***".to_string(),
        },
        Err(_) => "***".to_string(),
    }
}
