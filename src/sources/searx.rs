//! Searx/SearXNG instance adapter (JSON API)
//!
//! Talks to a public searx instance's `format=json` endpoint. The base
//! URL is configurable, which also makes this the adapter integration
//! tests point at a mock server.

use super::traits::*;
use crate::results::{SearchData, SearchKind, WebResult};
use anyhow::Result;

/// Searx JSON API. Pages are 1-indexed: logical offset N maps to
/// `pageno = N + 1`.
pub struct Searx {
    base_url: String,
}

impl Searx {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for Searx {
    fn default() -> Self {
        Self::new("https://searx.be")
    }
}

impl Source for Searx {
    fn name(&self) -> &str {
        "searx"
    }

    fn kind(&self) -> SearchKind {
        SearchKind::Web
    }

    fn priority(&self) -> u32 {
        60
    }

    // Searx instances aggregate many upstreams per call
    fn timeout(&self) -> u64 {
        15
    }

    fn request(&self, params: &FetchParams) -> Result<SourceRequest> {
        let mut request = SourceRequest::get(format!("{}/search", self.base_url))
            .param("q", &params.query)
            .param("format", "json")
            .param("language", &params.locale.lang);

        if params.offset > 0 {
            request = request.param("pageno", (params.offset + 1).to_string());
        }

        Ok(request)
    }

    fn parse(&self, response: SourceResponse) -> Result<SearchData> {
        if !response.is_success() {
            anyhow::bail!("HTTP error: {}", response.status);
        }

        let json: serde_json::Value = response.json()?;
        let mut results = Vec::new();

        if let Some(items) = json.get("results").and_then(|r| r.as_array()) {
            for item in items {
                let title = item.get("title").and_then(|v| v.as_str()).unwrap_or_default();
                let url = item.get("url").and_then(|v| v.as_str()).unwrap_or_default();
                let content = item
                    .get("content")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default();

                if let Some(result) = WebResult::new(title, url, self.name()) {
                    results.push(result.with_snippet(content));
                }
            }
        }

        Ok(SearchData::Web(results))
    }
}
