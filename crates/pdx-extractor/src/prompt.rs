//! Prompt composition for product extraction.

const INSTRUCTIONS: &str = "\
You are an expert product data extractor. Your role is to accurately extract structured product information from a raw HTML page.
Your output will help users view product details without reading the entire webpage.
Prioritize accuracy, structure, and clarity.";

const REQUIREMENTS: &[&str] = &[
    "The output must be in pure JSON format.",
    "The extracted product data must strictly match the schema provided below.",
    "All attribute keys must use camelCase formatting (e.g., \"colorOptions\").",
    "If a field is missing or not found, omit it entirely. Do not invent data.",
    "Price must be extracted as a numeric value (without currency symbols).",
    "The product URL must match the provided URL.",
];

/// Builds the single user message sent to the model.
///
/// Sections appear in a fixed order, each wrapped in its own tag so page
/// content cannot be read as instructions: `<instructions>`, `<requirements>`,
/// then `<input>` holding the raw HTML followed by the original URL.
#[must_use]
pub fn build_prompt(html: &str, url: &str) -> String {
    let mut prompt = String::with_capacity(html.len() + 1024);

    prompt.push_str("<instructions>\n");
    prompt.push_str(INSTRUCTIONS);
    prompt.push_str("\n</instructions>\n\n");

    prompt.push_str("<requirements>\n");
    for requirement in REQUIREMENTS {
        prompt.push_str("  <requirement>");
        prompt.push_str(requirement);
        prompt.push_str("</requirement>\n");
    }
    prompt.push_str("</requirements>\n\n");

    prompt.push_str("<input>\nHTML Content:\n");
    prompt.push_str(html);
    prompt.push_str("\n\nOriginal URL:\n");
    prompt.push_str(url);
    prompt.push_str("\n</input>\n");

    prompt
}
