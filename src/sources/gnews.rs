//! GNews adapter (keyed JSON news API)

use super::traits::*;
use crate::results::{SearchData, SearchKind, WebResult};
use anyhow::Result;
use chrono::DateTime;

/// GNews article search. Pages are 1-indexed: logical offset N maps to
/// `page = N + 1`. Requires an API key from configuration; the registry
/// skips the source entirely when no key is configured.
pub struct GNews {
    base_url: String,
}

impl GNews {
    pub fn new() -> Self {
        Self {
            base_url: "https://gnews.io/api/v4/search".to_string(),
        }
    }
}

impl Default for GNews {
    fn default() -> Self {
        Self::new()
    }
}

impl Source for GNews {
    fn name(&self) -> &str {
        "gnews"
    }

    fn kind(&self) -> SearchKind {
        SearchKind::News
    }

    fn priority(&self) -> u32 {
        10
    }

    fn request(&self, params: &FetchParams) -> Result<SourceRequest> {
        let api_key = params
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("gnews requires an API key"))?;

        let mut request = SourceRequest::get(&self.base_url)
            .param("q", &params.query)
            .param("lang", &params.locale.lang)
            .param("max", "10")
            .param("token", api_key);

        if let Some(country) = params.locale.country_tld() {
            request = request.param("country", country);
        }
        if params.offset > 0 {
            request = request.param("page", (params.offset + 1).to_string());
        }

        Ok(request)
    }

    fn parse(&self, response: SourceResponse) -> Result<SearchData> {
        if !response.is_success() {
            anyhow::bail!("HTTP error: {}", response.status);
        }

        let json: serde_json::Value = response.json()?;
        let mut results = Vec::new();

        if let Some(articles) = json.get("articles").and_then(|a| a.as_array()) {
            for article in articles {
                let title = article
                    .get("title")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default();
                let url = article.get("url").and_then(|v| v.as_str()).unwrap_or_default();
                let description = article
                    .get("description")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default();

                let mut result = match WebResult::new(title, url, self.name()) {
                    Some(r) => r.with_snippet(description),
                    None => continue,
                };

                if let Some(published) = article
                    .get("publishedAt")
                    .and_then(|v| v.as_str())
                    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                {
                    result = result.with_published(published.to_utc());
                }

                results.push(result);
            }
        }

        Ok(SearchData::News(results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gnews_requires_api_key() {
        let gnews = GNews::new();
        assert!(gnews.request(&FetchParams::new("earthquake")).is_err());

        let mut params = FetchParams::new("earthquake");
        params.api_key = Some("secret".to_string());
        let request = gnews.request(&params).unwrap();
        assert_eq!(request.params.get("token").map(String::as_str), Some("secret"));
    }

    #[test]
    fn test_gnews_parse() {
        let gnews = GNews::new();
        let response = SourceResponse {
            status: 200,
            text: r#"{"articles":[{
                "title":"Quake update",
                "url":"https://news.example.com/quake",
                "description":"Latest developments",
                "publishedAt":"2024-05-01T10:30:00Z"
            }]}"#
            .to_string(),
            url: String::new(),
        };
        match gnews.parse(response).unwrap() {
            SearchData::News(results) => {
                assert_eq!(results.len(), 1);
                assert!(results[0].published.is_some());
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }
}
