//! OpenAI-compatible chat completions client with `json_schema` output.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Deserialize;

use super::{ModelClient, ModelOutput, StructuredRequest};
use crate::error::ModelError;

/// Client for `POST {base_url}/chat/completions`.
///
/// Holds no credential; the API key is passed to each
/// [`generate`](ModelClient::generate) call.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http_client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponseRaw {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl OpenAiClient {
    /// Creates a client for `base_url` (e.g. `https://api.openai.com/v1`).
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Client`] if the `reqwest::Client` cannot be built.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ModelError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(ModelError::Client)?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    async fn generate(
        &self,
        credential: &str,
        request: &StructuredRequest,
    ) -> Result<ModelOutput, ModelError> {
        let start = Instant::now();

        let response = self
            .http_client
            .post(self.completions_url())
            .bearer_auth(credential)
            .header(header::CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "model service request failed");
                ModelError::Network(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(ModelError::Network)?;

        if !status.is_success() {
            let message = api_error_message(&body);
            tracing::warn!(status = status.as_u16(), error = %message, "model service error");
            return Err(ModelError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let raw: ChatResponseRaw =
            serde_json::from_str(&body).map_err(|e| ModelError::Decode(e.to_string()))?;

        tracing::debug!(
            model = %request.model,
            choices = raw.choices.len(),
            duration_ms = start.elapsed().as_millis(),
            "model completion"
        );

        Ok(raw
            .choices
            .into_iter()
            .next()
            .map(|c| ModelOutput {
                content: c.message.content,
                refusal: c.message.refusal,
            })
            .unwrap_or_default())
    }
}

/// Pulls `error.message` out of an error body, falling back to the raw text.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(body).map_or_else(
        |_| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "empty error body".to_string()
            } else {
                trimmed.to_string()
            }
        },
        |env| env.error.message,
    )
}
