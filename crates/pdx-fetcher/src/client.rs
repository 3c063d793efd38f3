//! HTTP client that retrieves product pages as HTML text.

use std::time::{Duration, Instant};

use reqwest::{header, redirect, Client, Url};

use crate::error::FetchError;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
const MAX_REDIRECTS: usize = 10;

/// A fetched product page. Lives only for the extraction call that produced it.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The URL that was requested. After redirects this is still the
    /// requested URL, not the final one.
    pub url: String,
    pub html: String,
    /// The `Content-Type` header that admitted the page.
    pub content_type: String,
}

/// Fetches product pages with browser-like request headers.
///
/// Construct once and share; the inner `reqwest::Client` pools connections
/// and is cheap to clone.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Creates a `PageFetcher` with the given request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    /// Fetches `url` and returns its body as HTML text.
    ///
    /// Issues exactly one GET (plus any redirects the server asks for).
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidUrl`]: `url` is not an absolute http(s) URL.
    /// - [`FetchError::Network`]: connect, TLS, timeout, or body read failure.
    /// - [`FetchError::Status`]: any non-2xx final status.
    /// - [`FetchError::NotHtml`]: `Content-Type` missing or not an HTML type.
    pub async fn fetch_html(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let parsed = parse_page_url(url)?;
        let started = Instant::now();
        tracing::debug!(url, "fetching product page");

        let response = self
            .client
            .get(parsed)
            .header(header::ACCEPT, ACCEPT_HTML)
            .header(header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_owned(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "product page returned non-success status");
            return Err(FetchError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_owned(),
            });
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

        let content_type = match content_type {
            Some(ct) if is_html_content_type(&ct) => ct,
            other => {
                tracing::warn!(url, content_type = ?other, "product page is not HTML");
                return Err(FetchError::NotHtml {
                    url: url.to_owned(),
                    content_type: other,
                });
            }
        };

        let html = response.text().await.map_err(|source| FetchError::Network {
            url: url.to_owned(),
            source,
        })?;

        tracing::debug!(
            url,
            bytes = html.len(),
            duration_ms = started.elapsed().as_millis(),
            "fetched product page"
        );

        Ok(FetchedPage {
            url: url.to_owned(),
            html,
            content_type,
        })
    }
}

/// Returns `true` for `text/html` and `application/xhtml+xml`, ignoring
/// parameters such as `charset` and letter case.
#[must_use]
pub fn is_html_content_type(value: &str) -> bool {
    let mime = value.split(';').next().unwrap_or_default().trim();
    mime.eq_ignore_ascii_case("text/html") || mime.eq_ignore_ascii_case("application/xhtml+xml")
}

fn parse_page_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_owned(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(FetchError::InvalidUrl {
            url: url.to_owned(),
            reason: format!("unsupported scheme \"{scheme}\""),
        }),
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
