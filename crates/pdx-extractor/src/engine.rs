use std::fmt;
use std::sync::Arc;

use pdx_core::{
    normalize_record, product_schema, AppConfig, ProductRecord, PRODUCT_SCHEMA_NAME,
};
use pdx_fetcher::PageFetcher;

use crate::error::ExtractError;
use crate::model::{openai::OpenAiClient, ModelClient, ModelOutput, StructuredRequest};
use crate::prompt::build_prompt;

/// Pipeline stages of a single extraction call, logged on entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Fetching,
    Prompting,
    InvokingModel,
    Parsing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Fetching => "fetching",
            Stage::Prompting => "prompting",
            Stage::InvokingModel => "invoking_model",
            Stage::Parsing => "parsing",
        })
    }
}

/// Extracts [`ProductRecord`]s from product page URLs.
///
/// Stateless across calls: it holds only the fetcher, the model client, the
/// model identifier, and the precomputed schema, so one instance can serve
/// any number of concurrent requests behind an `Arc`.
pub struct ProductExtractor {
    fetcher: PageFetcher,
    model_client: Arc<dyn ModelClient>,
    model: String,
    schema: serde_json::Value,
}

impl fmt::Debug for ProductExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProductExtractor")
            .field("fetcher", &self.fetcher)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl ProductExtractor {
    pub fn new(
        fetcher: PageFetcher,
        model_client: Arc<dyn ModelClient>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            model_client,
            model: model.into(),
            schema: product_schema(),
        }
    }

    /// Builds the production pipeline: a [`PageFetcher`] and an
    /// [`OpenAiClient`] configured from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] if either HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, ExtractError> {
        let fetcher = PageFetcher::new(config.fetch_timeout_secs, &config.fetch_user_agent)?;
        let model_client = OpenAiClient::new(&config.model_base_url, config.model_timeout_secs)?;
        Ok(Self::new(fetcher, Arc::new(model_client), &config.model))
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Fetches `url`, asks the model for a record matching the product
    /// schema, and returns the validated, normalized record.
    ///
    /// Exactly one fetch and at most one model call are made. The returned
    /// record's `url` always equals `url`.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::Fetch`]: the page could not be fetched; the model is
    ///   not called.
    /// - [`ExtractError::Model`]: the generation service failed or rejected
    ///   the credential.
    /// - [`ExtractError::Extraction`]: the model returned nothing usable.
    pub async fn extract_product(
        &self,
        url: &str,
        credential: &str,
    ) -> Result<ProductRecord, ExtractError> {
        enter(url, Stage::Fetching);
        let page = self.fetcher.fetch_html(url).await?;

        enter(url, Stage::Prompting);
        let prompt = build_prompt(&page.html, url);
        let request =
            StructuredRequest::new(&self.model, prompt, PRODUCT_SCHEMA_NAME, self.schema.clone());

        enter(url, Stage::InvokingModel);
        let output = self.model_client.generate(credential, &request).await?;

        enter(url, Stage::Parsing);
        let record = parse_record(output).inspect_err(|e| {
            if let ExtractError::Extraction { detail } = e {
                tracing::warn!(url, detail = %detail, "model output rejected");
            }
        })?;

        let (record, report) = normalize_record(record, url);
        if let Some(returned) = &report.replaced_url {
            tracing::warn!(url, returned_url = %returned, "model returned a different URL; replaced with input");
        }
        if !report.duplicate_attributes.is_empty() {
            tracing::warn!(
                url,
                duplicates = ?report.duplicate_attributes,
                "dropped duplicate attribute names"
            );
        }

        tracing::info!(url, title = %record.title, "extracted product");
        Ok(record)
    }
}

fn enter(url: &str, stage: Stage) {
    tracing::debug!(url, stage = %stage, "extraction stage");
}

/// Parses the model's structured payload against the product schema.
fn parse_record(output: ModelOutput) -> Result<ProductRecord, ExtractError> {
    if let Some(refusal) = output.refusal.filter(|r| !r.trim().is_empty()) {
        return Err(ExtractError::extraction(format!("model refused: {refusal}")));
    }

    let content = output
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ExtractError::extraction("model returned no structured content"))?;

    serde_json::from_str::<ProductRecord>(&content).map_err(|e| {
        ExtractError::extraction(format!("response does not match the product schema: {e}"))
    })
}
