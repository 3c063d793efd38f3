pub mod app_config;
pub mod config;
pub mod error;
pub mod normalize;
pub mod product;
pub mod schema;

pub use app_config::{AppConfig, Environment, DEFAULT_FETCH_USER_AGENT};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use normalize::{normalize_record, NormalizationReport};
pub use product::{Attribute, AttributeValues, Price, ProductRecord};
pub use schema::{product_schema, strict_schema, PRODUCT_SCHEMA_NAME};
