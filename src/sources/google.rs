//! Google web search adapter (HTML scrape)

use super::redirect::unwrap_redirect;
use super::traits::*;
use crate::results::{SearchData, SearchKind, WebResult};
use anyhow::Result;
use scraper::{Html, Selector};

/// Google web search. Pages by units of 10: logical offset N maps to
/// `start = N * 10`.
pub struct Google {
    base_url: String,
}

impl Google {
    pub fn new() -> Self {
        Self {
            base_url: "https://www.google.com/search".to_string(),
        }
    }

    fn parse_results(&self, html: &str) -> Vec<WebResult> {
        let document = Html::parse_document(html);
        let mut results = Vec::new();

        let result_selector = Selector::parse("div.g").unwrap();
        let title_selector = Selector::parse("h3").unwrap();
        let link_selector = Selector::parse("a").unwrap();
        let snippet_selector = Selector::parse("div.VwiC3b, span.aCOpRe").unwrap();

        for element in document.select(&result_selector) {
            let title = element
                .select(&title_selector)
                .next()
                .map(|t| t.text().collect::<String>())
                .unwrap_or_default();

            if title.is_empty() {
                continue;
            }

            let href = element
                .select(&link_selector)
                .next()
                .and_then(|a| a.value().attr("href"))
                .unwrap_or_default();

            // Unwrap /url?q= tracking wrappers; drop what can't resolve
            let link = match unwrap_redirect(href) {
                Some(l) => l,
                None => continue,
            };

            let snippet = element
                .select(&snippet_selector)
                .next()
                .map(|s| s.text().collect::<String>())
                .unwrap_or_default();

            if let Some(result) = WebResult::new(title.trim(), link, self.name()) {
                results.push(result.with_snippet(snippet.trim()));
            }
        }

        results
    }
}

impl Default for Google {
    fn default() -> Self {
        Self::new()
    }
}

impl Source for Google {
    fn name(&self) -> &str {
        "google"
    }

    fn kind(&self) -> SearchKind {
        SearchKind::Web
    }

    fn priority(&self) -> u32 {
        10
    }

    fn request(&self, params: &FetchParams) -> Result<SourceRequest> {
        let mut request = SourceRequest::get(&self.base_url)
            .param("q", &params.query)
            .param("hl", &params.locale.lang)
            .param("num", "10");

        if params.offset > 0 {
            request = request.param("start", (params.offset * 10).to_string());
        }
        if let Some(tld) = params.locale.country_tld() {
            request = request.param("gl", tld);
        }

        Ok(request)
    }

    fn parse(&self, response: SourceResponse) -> Result<SearchData> {
        if !response.is_success() {
            anyhow::bail!("HTTP error: {}", response.status);
        }

        Ok(SearchData::Web(self.parse_results(&response.text)))
    }
}
