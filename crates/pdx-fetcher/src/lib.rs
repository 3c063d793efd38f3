//! Page Fetcher: resolves a product page URL to its raw HTML.
//!
//! One GET per call, redirects followed, no retries. Non-2xx responses and
//! non-HTML content types are hard failures.

pub mod client;
pub mod error;

pub use client::{is_html_content_type, FetchedPage, PageFetcher};
pub use error::FetchError;
