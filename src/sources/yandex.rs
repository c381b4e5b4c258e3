//! Yandex web search adapter (HTML scrape)

use super::redirect::ensure_absolute;
use super::traits::*;
use crate::results::{SearchData, SearchKind, WebResult};
use anyhow::Result;
use scraper::{Html, Selector};

/// Yandex web search. Pages by units of 1: logical offset N maps
/// straight to `p = N`.
pub struct Yandex {
    base_url: String,
}

impl Yandex {
    pub fn new() -> Self {
        Self {
            base_url: "https://yandex.com/search/".to_string(),
        }
    }

    fn parse_results(&self, html: &str) -> Vec<WebResult> {
        let document = Html::parse_document(html);
        let mut results = Vec::new();

        let result_selector = Selector::parse("li.serp-item").unwrap();
        let title_selector = Selector::parse("a.organic__url, h2 a").unwrap();
        let snippet_selector =
            Selector::parse("div.organic__content-text, div.text-container").unwrap();

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

            // Skip internal verification/redirect pages
            if link.contains("yandex.com") || link.contains("yandex.ru") {
                continue;
            }

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

impl Default for Yandex {
    fn default() -> Self {
        Self::new()
    }
}

impl Source for Yandex {
    fn name(&self) -> &str {
        "yandex"
    }

    fn kind(&self) -> SearchKind {
        SearchKind::Web
    }

    fn priority(&self) -> u32 {
        40
    }

    // Yandex is consistently the slowest upstream
    fn timeout(&self) -> u64 {
        10
    }

    fn request(&self, params: &FetchParams) -> Result<SourceRequest> {
        let mut request = SourceRequest::get(&self.base_url)
            .param("text", &params.query)
            .param("lang", &params.locale.lang);

        if params.offset > 0 {
            request = request.param("p", params.offset.to_string());
        }

        Ok(request)
    }

    fn parse(&self, response: SourceResponse) -> Result<SearchData> {
        if !response.is_success() {
            anyhow::bail!("HTTP error: {}", response.status);
        }
        // Yandex serves a captcha interstitial under automated traffic
        if response.text.contains("showcaptcha") {
            anyhow::bail!("captcha interstitial");
        }

        Ok(SearchData::Web(self.parse_results(&response.text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yandex_pagination_by_one() {
        let yandex = Yandex::new();
        let request = yandex
            .request(&FetchParams::new("rust").with_offset(3))
            .unwrap();
        assert_eq!(request.params.get("p").map(String::as_str), Some("3"));
    }

    #[test]
    fn test_yandex_captcha_degrades() {
        let yandex = Yandex::new();
        let response = SourceResponse {
            status: 200,
            text: "<html>showcaptcha</html>".to_string(),
            url: String::new(),
        };
        assert!(yandex.parse(response).is_err());
    }
}
