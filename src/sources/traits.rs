//! Source adapter contract
//!
//! Each external source is translated into the normalized result schema
//! by exactly one adapter. Adapters build a request from logical fetch
//! parameters and parse the raw response; the aggregate executor owns
//! the HTTP call, the timeout and the degrade-to-empty policy.

use crate::locales::Locale;
use crate::network::RetryPolicy;
use crate::results::{SearchData, SearchKind};
use std::collections::HashMap;

/// Logical fetch parameters shared by every adapter
///
/// `offset` is the zero-based source-agnostic pagination cursor; each
/// adapter translates it into its source's native paging unit.
#[derive(Debug, Clone)]
pub struct FetchParams {
    pub query: String,
    pub offset: u32,
    pub locale: Locale,
    /// API key for keyed sources, from configuration
    pub api_key: Option<String>,
}

impl FetchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            offset: 0,
            locale: Locale::default(),
            api_key: None,
        }
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }
}

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// HTTP request to be made on behalf of an adapter
#[derive(Debug, Clone)]
pub struct SourceRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub params: HashMap<String, String>,
    pub form: Option<HashMap<String, String>>,
    pub cookies: HashMap<String, String>,
}

impl SourceRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            headers: HashMap::new(),
            params: HashMap::new(),
            form: None,
            cookies: HashMap::new(),
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            ..Self::get(url)
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn cookie(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(key.into(), value.into());
        self
    }

    pub fn form(mut self, data: HashMap<String, String>) -> Self {
        self.form = Some(data);
        self
    }
}

/// Raw HTTP response handed back to the adapter for parsing
#[derive(Debug)]
pub struct SourceResponse {
    pub status: u16,
    /// Response body as text
    pub text: String,
    /// Final URL after redirects
    pub url: String,
}

impl SourceResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Parse the body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> anyhow::Result<T> {
        Ok(serde_json::from_str(&self.text)?)
    }
}

/// Contract every source adapter implements
///
/// `request` and `parse` may fail with `anyhow::Error`; the executor
/// recovers every failure into the kind's empty value, so errors never
/// cross the aggregator boundary.
pub trait Source: Send + Sync {
    /// Unique source name, also used in cache keys and logs
    fn name(&self) -> &str;

    /// The result kind this source produces
    fn kind(&self) -> SearchKind;

    /// Merge priority: lower values win the identity slot on duplicate
    /// URLs during cross-source merge.
    fn priority(&self) -> u32 {
        100
    }

    /// Per-call timeout in seconds. Slower sources get longer budgets.
    fn timeout(&self) -> u64 {
        crate::DEFAULT_TIMEOUT_SECS
    }

    /// Retry policy for sources known to return transient rate-limit
    /// responses; `None` means fail straight to empty.
    fn retry(&self) -> Option<RetryPolicy> {
        None
    }

    /// Build the HTTP request for the given fetch parameters
    fn request(&self, params: &FetchParams) -> anyhow::Result<SourceRequest>;

    /// Parse the HTTP response into normalized results
    fn parse(&self, response: SourceResponse) -> anyhow::Result<SearchData>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builders() {
        let req = SourceRequest::get("https://example.com/search")
            .param("q", "rust")
            .cookie("CONSENT", "YES+");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.params.get("q").map(String::as_str), Some("rust"));
        assert!(req.cookies.contains_key("CONSENT"));

        let post = SourceRequest::post("https://example.com").form(HashMap::new());
        assert_eq!(post.method, HttpMethod::Post);
        assert!(post.form.is_some());
    }

    #[test]
    fn test_response_status_helpers() {
        let resp = SourceResponse {
            status: 429,
            text: String::new(),
            url: String::new(),
        };
        assert!(resp.is_rate_limited());
        assert!(!resp.is_success());
    }
}
