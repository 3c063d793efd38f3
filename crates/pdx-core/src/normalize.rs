//! Post-parse cleanup of a model-produced [`ProductRecord`].
//!
//! Normalization only removes or tidies; it never fills a field the model
//! left empty.

use std::collections::HashSet;

use crate::product::{Attribute, AttributeValues, ProductRecord};

/// What [`normalize_record`] changed, for the caller to log.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NormalizationReport {
    /// The URL the model returned, when it differed from the input URL.
    pub replaced_url: Option<String>,
    /// Names of attributes dropped because an earlier attribute had the same name.
    pub duplicate_attributes: Vec<String>,
}

impl NormalizationReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.replaced_url.is_none() && self.duplicate_attributes.is_empty()
    }
}

/// Normalizes a parsed record against the URL it was extracted from.
///
/// - `url` is forced to `input_url`
/// - optional strings are trimmed; blank ones become `None`
/// - blank image URLs are dropped; an empty image list becomes `None`
/// - attribute names are trimmed and deduplicated (first occurrence wins);
///   attributes with blank names or empty value lists are dropped
/// - an empty attribute list becomes `None`
#[must_use]
pub fn normalize_record(
    mut record: ProductRecord,
    input_url: &str,
) -> (ProductRecord, NormalizationReport) {
    let mut report = NormalizationReport::default();

    if record.url.trim() != input_url {
        report.replaced_url = Some(std::mem::replace(&mut record.url, input_url.to_owned()));
    } else if record.url != input_url {
        // Whitespace only.
        input_url.clone_into(&mut record.url);
    }

    record.title = record.title.trim().to_owned();
    record.category = record.category.trim().to_owned();
    record.description = clean_optional(record.description);
    record.availability = clean_optional(record.availability);
    record.brand = clean_optional(record.brand);
    record.price.currency = clean_optional(record.price.currency);

    record.images = record
        .images
        .map(|images| {
            images
                .into_iter()
                .map(|u| u.trim().to_owned())
                .filter(|u| !u.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|images| !images.is_empty());

    record.attributes = record
        .attributes
        .map(|attrs| dedupe_attributes(attrs, &mut report.duplicate_attributes))
        .filter(|attrs| !attrs.is_empty());

    (record, report)
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

fn dedupe_attributes(attrs: Vec<Attribute>, duplicates: &mut Vec<String>) -> Vec<Attribute> {
    let mut seen: HashSet<String> = HashSet::with_capacity(attrs.len());
    let mut kept = Vec::with_capacity(attrs.len());

    for mut attr in attrs {
        attr.name = attr.name.trim().to_owned();
        if attr.name.is_empty() || is_empty_values(&attr.values) {
            continue;
        }
        if seen.insert(attr.name.clone()) {
            kept.push(attr);
        } else {
            duplicates.push(attr.name);
        }
    }

    kept
}

fn is_empty_values(values: &AttributeValues) -> bool {
    match values {
        AttributeValues::Text(s) => s.trim().is_empty(),
        AttributeValues::Number(_) => false,
        AttributeValues::TextList(items) => items.is_empty(),
        AttributeValues::NumberList(items) => items.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Price;

    const URL: &str = "https://shop.example.com/products/classic-tee";

    fn record() -> ProductRecord {
        ProductRecord {
            url: URL.to_string(),
            title: "Classic Tee".to_string(),
            description: Some("Soft cotton tee.".to_string()),
            category: "T-Shirt".to_string(),
            images: Some(vec!["https://cdn.example.com/tee.jpg".to_string()]),
            price: Price {
                value: 19.99,
                currency: Some("USD".to_string()),
            },
            availability: Some("In Stock".to_string()),
            brand: None,
            attributes: Some(vec![Attribute {
                name: "colorOptions".to_string(),
                values: AttributeValues::TextList(vec!["Red".into(), "Blue".into()]),
            }]),
        }
    }

    #[test]
    fn clean_record_passes_through_unchanged() {
        let input = record();
        let (out, report) = normalize_record(input.clone(), URL);
        assert_eq!(out, input);
        assert!(report.is_clean());
    }

    #[test]
    fn mismatched_url_is_replaced_with_input() {
        let mut input = record();
        input.url = "https://shop.example.com/products/other".to_string();
        let (out, report) = normalize_record(input, URL);
        assert_eq!(out.url, URL);
        assert_eq!(
            report.replaced_url.as_deref(),
            Some("https://shop.example.com/products/other")
        );
    }

    #[test]
    fn whitespace_padded_url_is_not_reported() {
        let mut input = record();
        input.url = format!("  {URL} ");
        let (out, report) = normalize_record(input, URL);
        assert_eq!(out.url, URL);
        assert!(report.replaced_url.is_none());
    }

    #[test]
    fn blank_optionals_become_none() {
        let mut input = record();
        input.brand = Some("   ".to_string());
        input.description = Some(String::new());
        input.price.currency = Some(" usd ".to_string());
        let (out, _) = normalize_record(input, URL);
        assert!(out.brand.is_none());
        assert!(out.description.is_none());
        assert_eq!(out.price.currency.as_deref(), Some("usd"));
    }

    #[test]
    fn empty_image_list_becomes_none() {
        let mut input = record();
        input.images = Some(vec![String::new(), "  ".to_string()]);
        let (out, _) = normalize_record(input, URL);
        assert!(out.images.is_none());
    }

    #[test]
    fn duplicate_attributes_keep_first_occurrence() {
        let mut input = record();
        input.attributes.as_mut().unwrap().extend([
            Attribute {
                name: "colorOptions".to_string(),
                values: AttributeValues::Text("Green".into()),
            },
            Attribute {
                name: "material".to_string(),
                values: AttributeValues::Text("Cotton".into()),
            },
        ]);
        let (out, report) = normalize_record(input, URL);

        assert!(out.has_unique_attribute_names());
        assert_eq!(out.attributes.as_ref().map(Vec::len), Some(2));
        assert_eq!(
            out.attribute("colorOptions"),
            Some(&AttributeValues::TextList(vec!["Red".into(), "Blue".into()]))
        );
        assert_eq!(report.duplicate_attributes, vec!["colorOptions".to_string()]);
    }

    #[test]
    fn empty_attributes_are_dropped() {
        let mut input = record();
        input.attributes = Some(vec![
            Attribute {
                name: "  ".to_string(),
                values: AttributeValues::Text("x".into()),
            },
            Attribute {
                name: "sizeOptions".to_string(),
                values: AttributeValues::TextList(vec![]),
            },
        ]);
        let (out, report) = normalize_record(input, URL);
        assert!(out.attributes.is_none());
        assert!(report.duplicate_attributes.is_empty());
    }
}
