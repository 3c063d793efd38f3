//! Schema-constrained generation: the request shape and the client seam.

pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A generation request: one user message plus a strict output schema.
#[derive(Debug, Clone, Serialize)]
pub struct StructuredRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub response_format: ResponseFormat,
}

impl StructuredRequest {
    /// Creates a request carrying `prompt` as the only (user-role) message.
    #[must_use]
    pub fn new(
        model: impl Into<String>,
        prompt: impl Into<String>,
        schema_name: impl Into<String>,
        schema: serde_json::Value,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![Message::user(prompt)],
            response_format: ResponseFormat {
                format_type: "json_schema".to_string(),
                json_schema: JsonSchemaFormat {
                    name: schema_name.into(),
                    strict: true,
                    schema,
                },
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
    pub json_schema: JsonSchemaFormat,
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonSchemaFormat {
    pub name: String,
    pub strict: bool,
    pub schema: serde_json::Value,
}

/// The first completion choice, as returned by the service.
///
/// Both fields may be absent: no choices at all yields the default value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelOutput {
    /// Structured payload (a JSON document as text).
    pub content: Option<String>,
    /// Set when the model declined to answer.
    pub refusal: Option<String>,
}

/// A generation service that honours a strict output schema.
///
/// The credential is supplied per call; implementations must not store or
/// log it.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Runs one generation.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] when the service cannot be reached or rejects
    /// the request. An answer without content is *not* an error here.
    async fn generate(
        &self,
        credential: &str,
        request: &StructuredRequest,
    ) -> Result<ModelOutput, ModelError>;
}
