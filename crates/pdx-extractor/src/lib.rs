//! Extraction Engine: turns a product page URL into a validated
//! [`ProductRecord`](pdx_core::ProductRecord).
//!
//! The pipeline per call is fetch, prompt, one schema-constrained model
//! invocation, parse, normalize. Any failure aborts the call; nothing is
//! retried and no partial record is returned.

pub mod engine;
pub mod error;
pub mod model;
pub mod prompt;

pub use engine::ProductExtractor;
pub use error::{ExtractError, ModelError};
pub use model::{openai::OpenAiClient, ModelClient, ModelOutput, StructuredRequest};
pub use prompt::build_prompt;
