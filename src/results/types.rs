//! Normalized result type definitions
//!
//! Every source adapter emits one of these shapes. Records are immutable
//! once constructed; the ranker produces new orderings rather than
//! mutating in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// A normalized web or news result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebResult {
    /// Result title
    pub title: String,
    /// Absolute, scheme-qualified destination URL
    pub link: String,
    /// Content snippet
    pub snippet: String,
    /// Human-readable URL shown next to the title
    pub display_url: String,
    /// Source that produced this record
    pub source: String,
    /// Publication time, when the source reports one (news)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<DateTime<Utc>>,
}

impl WebResult {
    /// Build a result, enforcing the adapter-boundary invariants:
    /// title present and link an absolute http(s) URL.
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        source: impl Into<String>,
    ) -> Option<Self> {
        let title = title.into();
        let link = link.into();
        if title.trim().is_empty() {
            return None;
        }
        let parsed = Url::parse(&link).ok()?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return None;
        }
        let display_url = display_url_for(&parsed);
        Some(Self {
            title,
            link,
            snippet: String::new(),
            display_url,
            source: source.into(),
            published: None,
        })
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }

    pub fn with_published(mut self, published: DateTime<Utc>) -> Self {
        self.published = Some(published);
        self
    }

    /// Hostname of the result link
    pub fn hostname(&self) -> Option<String> {
        Url::parse(&self.link)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
    }
}

/// A normalized image result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageResult {
    pub title: String,
    /// Absolute http(s) URL of the full-size image
    pub image: String,
    pub thumbnail: Option<String>,
    /// Page the image was found on
    pub link: String,
}

impl ImageResult {
    /// Build an image result; records whose image URL is not an
    /// absolute http(s) URL are dropped at the adapter boundary.
    pub fn new(
        title: impl Into<String>,
        image: impl Into<String>,
        link: impl Into<String>,
    ) -> Option<Self> {
        let image = image.into();
        let parsed = Url::parse(&image).ok()?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return None;
        }
        Some(Self {
            title: title.into(),
            image,
            thumbnail: None,
            link: link.into(),
        })
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }
}

/// A normalized video result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoResult {
    pub title: String,
    pub url: String,
    pub thumbnail: String,
    pub source: String,
}

impl VideoResult {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        thumbnail: impl Into<String>,
        source: impl Into<String>,
    ) -> Option<Self> {
        let title = title.into();
        let url = url.into();
        if title.trim().is_empty() || Url::parse(&url).is_err() {
            return None;
        }
        Some(Self {
            title,
            url,
            thumbnail: thumbnail.into(),
            source: source.into(),
        })
    }
}

/// An encyclopedia summary: singleton per query, not a list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WikiSummary {
    pub title: String,
    pub summary: String,
    pub image: Option<String>,
    pub url: String,
}

/// Kind of search a request asks for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Web,
    Images,
    Videos,
    News,
    Wiki,
}

impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Images => "images",
            Self::Videos => "videos",
            Self::News => "news",
            Self::Wiki => "wiki",
        }
    }
}

impl std::fmt::Display for SearchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tagged union of per-kind response payloads
///
/// Each branch carries exactly the fields valid for its kind; the
/// external interface is generated from this variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "results", rename_all = "lowercase")]
pub enum SearchData {
    Web(Vec<WebResult>),
    Images(Vec<ImageResult>),
    Videos(Vec<VideoResult>),
    News(Vec<WebResult>),
    Wiki(Option<WikiSummary>),
}

impl SearchData {
    /// The empty value for a kind (what a failed source degrades to)
    pub fn empty(kind: SearchKind) -> Self {
        match kind {
            SearchKind::Web => Self::Web(Vec::new()),
            SearchKind::Images => Self::Images(Vec::new()),
            SearchKind::Videos => Self::Videos(Vec::new()),
            SearchKind::News => Self::News(Vec::new()),
            SearchKind::Wiki => Self::Wiki(None),
        }
    }

    pub fn kind(&self) -> SearchKind {
        match self {
            Self::Web(_) => SearchKind::Web,
            Self::Images(_) => SearchKind::Images,
            Self::Videos(_) => SearchKind::Videos,
            Self::News(_) => SearchKind::News,
            Self::Wiki(_) => SearchKind::Wiki,
        }
    }

    /// Whether this payload carries nothing worth caching.
    ///
    /// `Wiki(None)` is deliberately NOT empty: a confirmed not-found
    /// from the encyclopedia API is cached to avoid repeat work.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Web(v) | Self::News(v) => v.is_empty(),
            Self::Images(v) => v.is_empty(),
            Self::Videos(v) => v.is_empty(),
            Self::Wiki(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Web(v) | Self::News(v) => v.len(),
            Self::Images(v) => v.len(),
            Self::Videos(v) => v.len(),
            Self::Wiki(o) => usize::from(o.is_some()),
        }
    }
}

/// Normalize a URL into the identity key used for cross-source dedup
///
/// Scheme, `www.` prefix and trailing slashes are identity-irrelevant:
/// two sources returning the same page with cosmetic URL differences
/// must collapse to one record.
pub fn identity_key(url: &str) -> String {
    url.trim()
        .trim_end_matches('/')
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_start_matches("www.")
        .to_lowercase()
}

fn display_url_for(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    let path = url.path().trim_end_matches('/');
    if path.is_empty() {
        host.to_string()
    } else {
        format!("{}{}", host, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_result_requires_absolute_link() {
        assert!(WebResult::new("Title", "https://example.com/a", "google").is_some());
        assert!(WebResult::new("Title", "/relative/path", "google").is_none());
        assert!(WebResult::new("Title", "ftp://example.com", "google").is_none());
        assert!(WebResult::new("", "https://example.com", "google").is_none());
    }

    #[test]
    fn test_display_url() {
        let r = WebResult::new("T", "https://www.example.com/docs/intro/", "bing").unwrap();
        assert_eq!(r.display_url, "www.example.com/docs/intro");

        let root = WebResult::new("T", "https://example.com/", "bing").unwrap();
        assert_eq!(root.display_url, "example.com");
    }

    #[test]
    fn test_image_result_validation() {
        assert!(
            ImageResult::new("img", "https://cdn.example.com/x.jpg", "https://example.com")
                .is_some()
        );
        assert!(
            ImageResult::new("img", "data:image/png;base64,xyz", "https://example.com").is_none()
        );
    }

    #[test]
    fn test_identity_key_normalization() {
        assert_eq!(
            identity_key("https://www.Example.com/Page/"),
            identity_key("http://example.com/page")
        );
        assert_ne!(identity_key("https://a.com/x"), identity_key("https://a.com/y"));
    }

    #[test]
    fn test_wiki_none_is_not_empty() {
        assert!(!SearchData::Wiki(None).is_empty());
        assert!(SearchData::Web(vec![]).is_empty());
        assert_eq!(SearchData::Wiki(None).len(), 0);
    }
}
