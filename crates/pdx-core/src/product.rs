//! The product record extracted from a single product page.
//!
//! These types derive [`schemars::JsonSchema`] to produce the schema sent to
//! the model (see [`crate::schema`]) and [`serde::Deserialize`] to validate
//! what comes back. The `description` strings are sent to the model verbatim
//! as extraction hints.

use std::collections::HashSet;

use schemars::gen::SchemaGenerator;
use schemars::schema::{ArrayValidation, InstanceType, Metadata, Schema, SchemaObject, SingleOrVec};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Structured product data extracted from a product page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProductRecord {
    #[schemars(description = "The original URL of the product page. Must be a valid URL.")]
    pub url: String,

    #[schemars(
        description = "The name of the product, without extra branding or marketing language."
    )]
    pub title: String,

    #[schemars(
        description = "A short description of the product, if available. Keep it factual and concise."
    )]
    pub description: Option<String>,

    #[schemars(description = "The product category, like T-Shirt, Electronics, Book, etc.")]
    pub category: String,

    #[schemars(
        description = "An array of product image URLs, if available.",
        schema_with = "image_urls_schema"
    )]
    pub images: Option<Vec<String>>,

    #[schemars(description = "The price information for the product.")]
    pub price: Price,

    #[schemars(
        description = "The availability status of the product, e.g., 'In Stock', 'Out of Stock'."
    )]
    pub availability: Option<String>,

    #[schemars(description = "The brand or manufacturer name, if available.")]
    pub brand: Option<String>,

    #[schemars(
        description = "A list of attributes where each attribute has a name and corresponding value(s)."
    )]
    pub attributes: Option<Vec<Attribute>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Price {
    #[schemars(description = "The numeric price value of the product, without currency symbols.")]
    pub value: f64,

    #[schemars(description = "The currency of the price, like USD, EUR, etc.")]
    pub currency: Option<String>,
}

/// A named product attribute such as `colorOptions` or `material`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Attribute {
    #[schemars(
        description = "The attribute name in camelCase format, e.g., colorOptions, sizeOptions, material, engineSize, etc."
    )]
    pub name: String,

    #[schemars(description = "The value(s) of the attribute.")]
    pub values: AttributeValues,
}

/// Attribute payload: a scalar or a homogeneous list.
///
/// Variant order matters for untagged deserialization: a JSON string only
/// matches `Text`, a number only `Number`, and an array is tried as strings
/// before numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AttributeValues {
    #[schemars(description = "A single string value.")]
    Text(String),
    #[schemars(description = "A single numeric value.")]
    Number(f64),
    #[schemars(description = "An array of string values.")]
    TextList(Vec<String>),
    #[schemars(description = "An array of numeric values.")]
    NumberList(Vec<f64>),
}

/// Nullable array of strings whose items carry their own description.
fn image_urls_schema(_gen: &mut SchemaGenerator) -> Schema {
    let item = SchemaObject {
        instance_type: Some(InstanceType::String.into()),
        metadata: Some(Box::new(Metadata {
            description: Some("A direct link to a product image URL.".to_owned()),
            ..Metadata::default()
        })),
        ..SchemaObject::default()
    };
    SchemaObject {
        instance_type: Some(SingleOrVec::Vec(vec![InstanceType::Array, InstanceType::Null])),
        array: Some(Box::new(ArrayValidation {
            items: Some(Schema::Object(item).into()),
            ..ArrayValidation::default()
        })),
        ..SchemaObject::default()
    }
    .into()
}

impl ProductRecord {
    /// Returns `true` when no two attributes share a name.
    ///
    /// Not expressible in the generation schema; checked after parsing.
    #[must_use]
    pub fn has_unique_attribute_names(&self) -> bool {
        let Some(attributes) = &self.attributes else {
            return true;
        };
        let mut seen = HashSet::with_capacity(attributes.len());
        attributes.iter().all(|a| seen.insert(a.name.as_str()))
    }

    /// Looks up an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeValues> {
        self.attributes
            .as_deref()
            .and_then(|attrs| attrs.iter().find(|a| a.name == name))
            .map(|a| &a.values)
    }
}

#[cfg(test)]
#[path = "product_test.rs"]
mod tests;
