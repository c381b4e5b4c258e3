//! Bing adapters: web search and image search

use super::redirect::unwrap_redirect;
use super::traits::*;
use crate::results::{ImageResult, SearchData, SearchKind, WebResult};
use anyhow::Result;
use scraper::{Html, Selector};

/// Bing web search. Pages by units of 10, 1-indexed: logical offset N
/// maps to `first = N * 10 + 1`.
pub struct Bing {
    base_url: String,
}

impl Bing {
    pub fn new() -> Self {
        Self {
            base_url: "https://www.bing.com/search".to_string(),
        }
    }

    fn parse_results(&self, html: &str) -> Vec<WebResult> {
        let document = Html::parse_document(html);
        let mut results = Vec::new();

        let result_selector = Selector::parse("li.b_algo").unwrap();
        let title_selector = Selector::parse("h2 a").unwrap();
        let snippet_selector = Selector::parse("p").unwrap();

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

            // Bing wraps most hits in base64 /ck/a click trackers
            let link = match unwrap_redirect(href) {
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

impl Default for Bing {
    fn default() -> Self {
        Self::new()
    }
}

impl Source for Bing {
    fn name(&self) -> &str {
        "bing"
    }

    fn kind(&self) -> SearchKind {
        SearchKind::Web
    }

    fn priority(&self) -> u32 {
        20
    }

    fn request(&self, params: &FetchParams) -> Result<SourceRequest> {
        let mut request = SourceRequest::get(&self.base_url)
            .param("q", &params.query)
            .param("setlang", &params.locale.lang);

        if params.offset > 0 {
            request = request.param("first", (params.offset * 10 + 1).to_string());
        }
        if let Some(tld) = params.locale.country_tld() {
            request = request.param("cc", tld);
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

/// Bing image search. Image metadata lives in a JSON blob on each
/// `a.iusc` anchor's `m` attribute. Pages by units of 35.
pub struct BingImages {
    base_url: String,
}

impl BingImages {
    pub fn new() -> Self {
        Self {
            base_url: "https://www.bing.com/images/search".to_string(),
        }
    }

    fn parse_results(&self, html: &str) -> Vec<ImageResult> {
        let document = Html::parse_document(html);
        let mut results = Vec::new();

        let result_selector = Selector::parse("a.iusc").unwrap();

        for element in document.select(&result_selector) {
            let m_attr = match element.value().attr("m") {
                Some(m) => m,
                None => continue,
            };
            let json: serde_json::Value = match serde_json::from_str(m_attr) {
                Ok(j) => j,
                Err(_) => continue,
            };

            let page_url = json.get("purl").and_then(|v| v.as_str()).unwrap_or_default();
            let img_src = json.get("murl").and_then(|v| v.as_str()).unwrap_or_default();
            let thumb = json.get("turl").and_then(|v| v.as_str());
            let title = json.get("t").and_then(|v| v.as_str()).unwrap_or("Image");

            // ImageResult::new drops records without an absolute image URL
            if let Some(mut result) = ImageResult::new(title, img_src, page_url) {
                if let Some(thumb) = thumb {
                    result = result.with_thumbnail(thumb);
                }
                results.push(result);
            }
        }

        results
    }
}

impl Default for BingImages {
    fn default() -> Self {
        Self::new()
    }
}

impl Source for BingImages {
    fn name(&self) -> &str {
        "bing_images"
    }

    fn kind(&self) -> SearchKind {
        SearchKind::Images
    }

    fn priority(&self) -> u32 {
        10
    }

    fn request(&self, params: &FetchParams) -> Result<SourceRequest> {
        let mut request = SourceRequest::get(&self.base_url)
            .param("q", &params.query)
            .param("form", "HDRSC2");

        if params.offset > 0 {
            request = request.param("first", (params.offset * 35 + 1).to_string());
        }

        Ok(request)
    }

    fn parse(&self, response: SourceResponse) -> Result<SearchData> {
        if !response.is_success() {
            anyhow::bail!("HTTP error: {}", response.status);
        }

        Ok(SearchData::Images(self.parse_results(&response.text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bing_request_pagination() {
        let bing = Bing::new();
        let request = bing
            .request(&FetchParams::new("rust").with_offset(1))
            .unwrap();
        assert_eq!(request.params.get("first").map(String::as_str), Some("11"));
    }

    #[test]
    fn test_bing_images_parse() {
        let html = r#"
            <a class="iusc" m='{"purl":"https://example.com/page","murl":"https://cdn.example.com/full.jpg","turl":"https://tse.example.com/th.jpg","t":"A picture"}'></a>
            <a class="iusc" m='{"purl":"https://example.com/bad","murl":"not-a-url","t":"Broken"}'></a>
        "#;
        let images = BingImages::new();
        let results = images.parse_results(html);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].image, "https://cdn.example.com/full.jpg");
        assert_eq!(results[0].thumbnail.as_deref(), Some("https://tse.example.com/th.jpg"));
    }
}
