//! DuckDuckGo web search adapter (html.duckduckgo.com)

use super::redirect::unwrap_redirect;
use super::traits::*;
use crate::results::{SearchData, SearchKind, WebResult};
use anyhow::Result;
use scraper::{Html, Selector};
use std::collections::HashMap;

/// DuckDuckGo HTML endpoint. Pages by units of 20: logical offset N
/// maps to `s = N * 20` (the upstream rewrites disagreed between 10
/// and 20; 20 is the canonical mapping here).
pub struct DuckDuckGo {
    html_url: String,
}

impl DuckDuckGo {
    pub fn new() -> Self {
        Self {
            html_url: "https://html.duckduckgo.com/html/".to_string(),
        }
    }

    fn parse_results(&self, html: &str) -> Vec<WebResult> {
        let document = Html::parse_document(html);
        let mut results = Vec::new();

        let result_selector = Selector::parse("div.result").unwrap();
        let title_selector = Selector::parse("a.result__a").unwrap();
        let snippet_selector = Selector::parse("a.result__snippet").unwrap();

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

            // DDG wraps targets in //duckduckgo.com/l/?uddg= redirects
            let link = match unwrap_redirect(href) {
                Some(l) => l,
                None => continue,
            };

            // Internal links that survive unwrapping are still noise
            if link.contains("duckduckgo.com") {
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

impl Default for DuckDuckGo {
    fn default() -> Self {
        Self::new()
    }
}

impl Source for DuckDuckGo {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    fn kind(&self) -> SearchKind {
        SearchKind::Web
    }

    fn priority(&self) -> u32 {
        30
    }

    fn request(&self, params: &FetchParams) -> Result<SourceRequest> {
        let mut form = HashMap::new();
        form.insert("q".to_string(), params.query.clone());
        // kl is country-language; wt-wt means "no region"
        let kl = match params.locale.country_tld() {
            Some(country) => format!("{}-{}", country, params.locale.lang),
            None => "wt-wt".to_string(),
        };
        form.insert("kl".to_string(), kl);
        if params.offset > 0 {
            form.insert("s".to_string(), (params.offset * 20).to_string());
        }

        Ok(SourceRequest::post(&self.html_url).form(form))
    }

    fn parse(&self, response: SourceResponse) -> Result<SearchData> {
        if !response.is_success() {
            anyhow::bail!("HTTP error: {}", response.status);
        }

        Ok(SearchData::Web(self.parse_results(&response.text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duckduckgo_request() {
        let ddg = DuckDuckGo::new();
        let params = FetchParams::new("rust").with_offset(2);
        let request = ddg.request(&params).unwrap();

        assert!(request.url.contains("duckduckgo.com"));
        let form = request.form.unwrap();
        assert_eq!(form.get("s").map(String::as_str), Some("40"));
    }

    #[test]
    fn test_duckduckgo_parse_unwraps_uddg() {
        let html = r#"
            <div class="result">
              <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fdocs.rs%2Ftokio&rut=x">Tokio docs</a>
              <a class="result__snippet">An asynchronous runtime.</a>
            </div>
        "#;
        let ddg = DuckDuckGo::new();
        let results = ddg.parse_results(html);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].link, "https://docs.rs/tokio");
    }
}
