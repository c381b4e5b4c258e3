//! Ecosia web search adapter (HTML scrape)
//!
//! Ecosia throttles aggressively and returns transient 429s, so this is
//! the one adapter that opts into the shared retry policy.

use super::redirect::ensure_absolute;
use super::traits::*;
use crate::network::RetryPolicy;
use crate::results::{SearchData, SearchKind, WebResult};
use anyhow::Result;
use scraper::{Html, Selector};

/// Ecosia web search. Pages by units of 1: logical offset N maps to
/// `p = N`.
pub struct Ecosia {
    base_url: String,
}

impl Ecosia {
    pub fn new() -> Self {
        Self {
            base_url: "https://www.ecosia.org/search".to_string(),
        }
    }

    fn parse_results(&self, html: &str) -> Vec<WebResult> {
        let document = Html::parse_document(html);
        let mut results = Vec::new();

        let result_selector = Selector::parse("div.result, article.result").unwrap();
        let title_selector = Selector::parse("a.result__link, a.result-title").unwrap();
        let snippet_selector =
            Selector::parse("p.result__description, div.result-snippet").unwrap();

        for element in document.select(&result_selector) {
            let title_elem = match element.select(&title_selector).next() {
                Some(t) => t,
                None => continue,
            };

            let title = title_elem.text().collect::<String>().trim().to_string();
            if title.is_empty() {
                continue;
            }

            let href = title_elem.value().attr("href").unwrap_or_default();
            let link = match ensure_absolute(&self.base_url, href) {
                Some(l) => l,
                None => continue,
            };

            let snippet = element
                .select(&snippet_selector)
                .next()
                .map(|s| s.text().collect::<String>().trim().to_string())
                .unwrap_or_default();

            if let Some(result) = WebResult::new(title, link, self.name()) {
                results.push(result.with_snippet(snippet));
            }
        }

        results
    }
}

impl Default for Ecosia {
    fn default() -> Self {
        Self::new()
    }
}

impl Source for Ecosia {
    fn name(&self) -> &str {
        "ecosia"
    }

    fn kind(&self) -> SearchKind {
        SearchKind::Web
    }

    fn priority(&self) -> u32 {
        50
    }

    fn retry(&self) -> Option<RetryPolicy> {
        Some(RetryPolicy::new(3, 500))
    }

    fn request(&self, params: &FetchParams) -> Result<SourceRequest> {
        let mut request = SourceRequest::get(&self.base_url).param("q", &params.query);

        if params.offset > 0 {
            request = request.param("p", params.offset.to_string());
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
