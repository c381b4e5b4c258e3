//! Wikipedia summary adapter (REST API, singleton result)

use super::traits::*;
use crate::results::{SearchData, SearchKind, WikiSummary};
use anyhow::Result;

/// Wikipedia page summary. One record per query, no pagination. A 404
/// is a confirmed not-found and parses to `Wiki(None)` so it can be
/// cached; every other failure degrades like any other source.
pub struct Wikipedia {
    api_url: String,
    default_lang: String,
}

impl Wikipedia {
    pub fn new() -> Self {
        Self {
            api_url: "https://{lang}.wikipedia.org/api/rest_v1/page/summary".to_string(),
            default_lang: "en".to_string(),
        }
    }

    fn api_url_for(&self, lang: &str) -> String {
        let lang = if lang.is_empty() {
            self.default_lang.as_str()
        } else {
            lang
        };
        self.api_url.replace("{lang}", lang)
    }
}

impl Default for Wikipedia {
    fn default() -> Self {
        Self::new()
    }
}

impl Source for Wikipedia {
    fn name(&self) -> &str {
        "wikipedia"
    }

    fn kind(&self) -> SearchKind {
        SearchKind::Wiki
    }

    fn priority(&self) -> u32 {
        10
    }

    fn request(&self, params: &FetchParams) -> Result<SourceRequest> {
        // Title segment follows Wikipedia convention: spaces to underscores
        let title = params.query.trim().replace(' ', "_");
        if title.is_empty() {
            anyhow::bail!("empty query");
        }

        let url = format!(
            "{}/{}",
            self.api_url_for(&params.locale.lang),
            urlencoding::encode(&title)
        );

        Ok(SourceRequest::get(url).header("Accept", "application/json"))
    }

    fn parse(&self, response: SourceResponse) -> Result<SearchData> {
        if response.is_not_found() {
            return Ok(SearchData::Wiki(None));
        }
        if !response.is_success() {
            anyhow::bail!("HTTP error: {}", response.status);
        }

        let json: serde_json::Value = response.json()?;

        let title = json
            .get("title")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("summary missing title"))?;
        let summary = json
            .get("extract")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let url = json
            .get("content_urls")
            .and_then(|c| c.get("desktop"))
            .and_then(|d| d.get("page"))
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let image = json
            .get("thumbnail")
            .and_then(|t| t.get("source"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        Ok(SearchData::Wiki(Some(WikiSummary {
            title: title.to_string(),
            summary: summary.to_string(),
            image,
            url: url.to_string(),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locales::Locale;

    #[test]
    fn test_wikipedia_request_url() {
        let wiki = Wikipedia::new();
        let params = FetchParams::new("Rust language").with_locale(Locale::parse("tr"));
        let request = wiki.request(&params).unwrap();
        assert!(request.url.starts_with("https://tr.wikipedia.org/"));
        assert!(request.url.ends_with("Rust_language"));
    }

    #[test]
    fn test_wikipedia_404_is_confirmed_not_found() {
        let wiki = Wikipedia::new();
        let response = SourceResponse {
            status: 404,
            text: String::new(),
            url: String::new(),
        };
        assert_eq!(wiki.parse(response).unwrap(), SearchData::Wiki(None));
    }

    #[test]
    fn test_wikipedia_parse_summary() {
        let wiki = Wikipedia::new();
        let response = SourceResponse {
            status: 200,
            text: r#"{
                "title":"Istanbul",
                "extract":"Istanbul is the largest city in Turkey.",
                "thumbnail":{"source":"https://upload.wikimedia.org/istanbul.jpg"},
                "content_urls":{"desktop":{"page":"https://en.wikipedia.org/wiki/Istanbul"}}
            }"#
            .to_string(),
            url: String::new(),
        };
        match wiki.parse(response).unwrap() {
            SearchData::Wiki(Some(summary)) => {
                assert_eq!(summary.title, "Istanbul");
                assert!(summary.image.is_some());
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }
}
