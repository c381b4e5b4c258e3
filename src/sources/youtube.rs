//! YouTube video search adapter (no API key required)
//!
//! Scrapes the results page and parses the embedded `ytInitialData`
//! JSON blob.

use super::traits::*;
use crate::results::{SearchData, SearchKind, VideoResult};
use anyhow::Result;

/// YouTube video search. No pagination: YouTube pages by continuation
/// tokens, so every logical offset fetches the first page.
pub struct YouTube {
    base_url: String,
}

impl YouTube {
    pub fn new() -> Self {
        Self {
            base_url: "https://www.youtube.com/results".to_string(),
        }
    }

    /// Extract text from YouTube's `runs`/`simpleText` structures
    fn get_text(element: &serde_json::Value) -> String {
        if let Some(runs) = element.get("runs").and_then(|r| r.as_array()) {
            return runs
                .iter()
                .filter_map(|r| r.get("text").and_then(|t| t.as_str()))
                .collect::<Vec<_>>()
                .join("");
        }
        element
            .get("simpleText")
            .and_then(|s| s.as_str())
            .unwrap_or("")
            .to_string()
    }

    /// Extract the ytInitialData JSON from the page HTML
    fn extract_initial_data(html: &str) -> Option<serde_json::Value> {
        let start_marker = "ytInitialData = ";
        let start = html.find(start_marker)?;
        let json_start = start + start_marker.len();

        let end_marker = ";</script>";
        let end = html[json_start..].find(end_marker)?;

        serde_json::from_str(&html[json_start..json_start + end]).ok()
    }

    fn parse_videos(&self, data: &serde_json::Value) -> Vec<VideoResult> {
        let mut results = Vec::new();

        let sections = data
            .get("contents")
            .and_then(|c| c.get("twoColumnSearchResultsRenderer"))
            .and_then(|r| r.get("primaryContents"))
            .and_then(|p| p.get("sectionListRenderer"))
            .and_then(|s| s.get("contents"))
            .and_then(|c| c.as_array());

        let sections = match sections {
            Some(s) => s,
            None => return results,
        };

        for section in sections {
            let contents = section
                .get("itemSectionRenderer")
                .and_then(|r| r.get("contents"))
                .and_then(|c| c.as_array());

            let contents = match contents {
                Some(c) => c,
                None => continue,
            };

            for container in contents {
                let video = match container.get("videoRenderer") {
                    Some(v) => v,
                    None => continue,
                };

                let video_id = match video.get("videoId").and_then(|v| v.as_str()) {
                    Some(id) => id,
                    None => continue,
                };

                let title = Self::get_text(video.get("title").unwrap_or(&serde_json::Value::Null));
                if title.is_empty() {
                    continue;
                }

                let url = format!("https://www.youtube.com/watch?v={}", video_id);
                let thumbnail = format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", video_id);

                if let Some(result) = VideoResult::new(title, url, thumbnail, self.name()) {
                    results.push(result);
                }
            }
        }

        results
    }
}

impl Default for YouTube {
    fn default() -> Self {
        Self::new()
    }
}

impl Source for YouTube {
    fn name(&self) -> &str {
        "youtube"
    }

    fn kind(&self) -> SearchKind {
        SearchKind::Videos
    }

    fn priority(&self) -> u32 {
        10
    }

    // Large HTML payloads with the full app shell
    fn timeout(&self) -> u64 {
        10
    }

    fn request(&self, params: &FetchParams) -> Result<SourceRequest> {
        // CONSENT cookie bypasses the EU consent interstitial
        Ok(SourceRequest::get(&self.base_url)
            .param("search_query", &params.query)
            .cookie("CONSENT", "YES+"))
    }

    fn parse(&self, response: SourceResponse) -> Result<SearchData> {
        if !response.is_success() {
            anyhow::bail!("HTTP error: {}", response.status);
        }

        let data = Self::extract_initial_data(&response.text)
            .ok_or_else(|| anyhow::anyhow!("ytInitialData blob not found"))?;

        Ok(SearchData::Videos(self.parse_videos(&data)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_text_variants() {
        let simple = serde_json::json!({"simpleText": "Hello World"});
        assert_eq!(YouTube::get_text(&simple), "Hello World");

        let runs = serde_json::json!({"runs": [{"text": "Hello "}, {"text": "World"}]});
        assert_eq!(YouTube::get_text(&runs), "Hello World");
    }

    #[test]
    fn test_parse_embedded_blob() {
        let data = serde_json::json!({
            "contents": {"twoColumnSearchResultsRenderer": {"primaryContents": {
                "sectionListRenderer": {"contents": [
                    {"itemSectionRenderer": {"contents": [
                        {"videoRenderer": {
                            "videoId": "abc123",
                            "title": {"runs": [{"text": "Cats compilation"}]}
                        }},
                        {"adSlotRenderer": {}}
                    ]}}
                ]}
            }}}
        });
        let html = format!(
            "<script>var ytInitialData = {};</script>",
            serde_json::to_string(&data).unwrap()
        );

        let youtube = YouTube::new();
        let parsed = YouTube::extract_initial_data(&html).unwrap();
        let videos = youtube.parse_videos(&parsed);
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].url, "https://www.youtube.com/watch?v=abc123");
        assert!(videos[0].thumbnail.contains("abc123"));
    }

    #[test]
    fn test_missing_blob_is_parse_failure() {
        let youtube = YouTube::new();
        let response = SourceResponse {
            status: 200,
            text: "<html>no data here</html>".to_string(),
            url: String::new(),
        };
        assert!(youtube.parse(response).is_err());
    }
}
