//! `POST /parse-product`: validate the body, run one extraction, map the outcome.

use axum::{body::Bytes, extract::State, Extension, Json};
use pdx_core::ProductRecord;
use pdx_extractor::ExtractError;
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;

use crate::middleware::RequestId;

use super::{ApiError, AppState, FieldErrors, ResponseMeta};

const INVALID_BODY: &str = "Invalid request body";

/// A request body that passed validation.
#[derive(PartialEq, Eq)]
struct ParseProductRequest {
    url: String,
    openai_api_key: String,
}

impl std::fmt::Debug for ParseProductRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseProductRequest")
            .field("url", &self.url)
            .field("openai_api_key", &"[redacted]")
            .finish()
    }
}

#[derive(Debug, Serialize)]
pub(super) struct ParseProductResponse {
    product: ProductRecord,
    meta: ResponseMeta,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn required_string<'a>(
    body: &'a serde_json::Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<&'a str> {
    match body.get(field) {
        None => {
            errors.entry(field.to_owned()).or_default().push("Required".to_string());
            None
        }
        Some(Value::String(s)) => Some(s.as_str()),
        Some(other) => {
            errors.entry(field.to_owned()).or_default().push(format!(
                "Expected string, received {}",
                type_name(other)
            ));
            None
        }
    }
}

fn is_page_url(value: &str) -> bool {
    Url::parse(value).is_ok_and(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
}

/// Checks the body field by field, collecting every problem.
///
/// Values are trimmed for checking only; the accepted request carries them
/// exactly as sent.
fn validate(body: &Value) -> Result<ParseProductRequest, FieldErrors> {
    let mut errors = FieldErrors::new();

    let Value::Object(fields) = body else {
        errors.insert(
            "body".to_string(),
            vec![format!("Expected object, received {}", type_name(body))],
        );
        return Err(errors);
    };

    let url = required_string(fields, "url", &mut errors);
    if let Some(u) = url {
        if !is_page_url(u.trim()) {
            errors
                .entry("url".to_string())
                .or_default()
                .push("Invalid url".to_string());
        }
    }

    let key = required_string(fields, "openaiApiKey", &mut errors);
    if key.is_some_and(|k| k.trim().is_empty()) {
        errors
            .entry("openaiApiKey".to_string())
            .or_default()
            .push("Must not be empty".to_string());
    }

    match (url, key) {
        (Some(url), Some(key)) if errors.is_empty() => Ok(ParseProductRequest {
            url: url.to_owned(),
            openai_api_key: key.to_owned(),
        }),
        _ => Err(errors),
    }
}

fn map_extract_error(request_id: &str, url: &str, error: &ExtractError) -> ApiError {
    match error {
        ExtractError::Extraction { detail } => {
            tracing::warn!(url, detail = %detail, "product extraction failed");
        }
        other => {
            tracing::warn!(url, code = other.code(), error = %other, "product extraction failed");
        }
    }
    ApiError::new(request_id, error.code(), error.to_string())
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

pub(super) async fn parse_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Bytes,
) -> Result<Json<ParseProductResponse>, ApiError> {
    let rid = &req_id.0;

    // Parsed regardless of Content-Type.
    let body: Value = serde_json::from_slice(&body).map_err(|e| {
        let details = FieldErrors::from([("body".to_string(), vec![format!("Invalid JSON: {e}")])]);
        tracing::warn!(details = ?details, "{INVALID_BODY}");
        ApiError::new(rid, "validation_error", INVALID_BODY).with_details(details)
    })?;

    let request = validate(&body).map_err(|details| {
        tracing::warn!(details = ?details, "{INVALID_BODY}");
        ApiError::new(rid, "validation_error", INVALID_BODY).with_details(details)
    })?;

    tracing::info!(url = %request.url, "processing product extraction");

    let product = state
        .extractor
        .extract_product(&request.url, &request.openai_api_key)
        .await
        .map_err(|e| map_extract_error(rid, &request.url, &e))?;

    tracing::info!(url = %request.url, title = %product.title, "successfully extracted product");

    Ok(Json(ParseProductResponse {
        product,
        meta: ResponseMeta::new(rid.clone()),
    }))
}

#[cfg(test)]
#[path = "parse_product_test.rs"]
mod tests;
