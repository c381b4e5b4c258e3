//! Source telemetry
//!
//! Source failures are externally identical (empty contribution) but
//! must stay distinguishable in telemetry: a timeout and a markup
//! change need different operator responses.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use thiserror::Error;

/// Why a source contributed nothing
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("request timed out")]
    Timeout,
    #[error("network error")]
    Network,
    #[error("HTTP error: {0}")]
    Http(u16),
    #[error("failed to parse response")]
    Parse,
    #[error("rate limited")]
    RateLimited,
}

impl SourceError {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Network => "network",
            Self::Http(_) => "http",
            Self::Parse => "parse",
            Self::RateLimited => "rate_limited",
        }
    }
}

/// Per-source success/error counters
pub struct Metrics {
    total_searches: AtomicU64,
    source_successes: RwLock<HashMap<String, u64>>,
    /// Errors keyed by (source, error label)
    source_errors: RwLock<HashMap<(String, &'static str), u64>>,
    /// Rolling response times in ms, last 100 per source
    response_times: RwLock<HashMap<String, Vec<u64>>>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            total_searches: AtomicU64::new(0),
            source_successes: RwLock::new(HashMap::new()),
            source_errors: RwLock::new(HashMap::new()),
            response_times: RwLock::new(HashMap::new()),
        }
    }

    pub fn inc_search(&self) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self, source: &str, time_ms: u64) {
        let mut successes = self.source_successes.write().unwrap();
        *successes.entry(source.to_string()).or_insert(0) += 1;
        drop(successes);

        let mut times = self.response_times.write().unwrap();
        let entry = times.entry(source.to_string()).or_default();
        if entry.len() >= 100 {
            entry.remove(0);
        }
        entry.push(time_ms);
    }

    pub fn record_error(&self, source: &str, error: &SourceError) {
        let mut errors = self.source_errors.write().unwrap();
        *errors
            .entry((source.to_string(), error.label()))
            .or_insert(0) += 1;
    }

    pub fn total_searches(&self) -> u64 {
        self.total_searches.load(Ordering::Relaxed)
    }

    pub fn error_count(&self, source: &str, label: &'static str) -> u64 {
        *self
            .source_errors
            .read()
            .unwrap()
            .get(&(source.to_string(), label))
            .unwrap_or(&0)
    }

    /// Success percentage for a source
    pub fn reliability(&self, source: &str) -> f64 {
        let successes = *self
            .source_successes
            .read()
            .unwrap()
            .get(source)
            .unwrap_or(&0);
        let errors: u64 = self
            .source_errors
            .read()
            .unwrap()
            .iter()
            .filter(|((name, _), _)| name == source)
            .map(|(_, count)| count)
            .sum();

        let total = successes + errors;
        if total == 0 {
            100.0
        } else {
            (successes as f64 / total as f64) * 100.0
        }
    }

    pub fn avg_response_time(&self, source: &str) -> Option<u64> {
        let times = self.response_times.read().unwrap();
        times.get(source).and_then(|t| {
            if t.is_empty() {
                None
            } else {
                Some(t.iter().sum::<u64>() / t.len() as u64)
            }
        })
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_counted_separately() {
        let metrics = Metrics::new();
        metrics.record_error("google", &SourceError::Timeout);
        metrics.record_error("google", &SourceError::Parse);
        metrics.record_error("google", &SourceError::Parse);

        assert_eq!(metrics.error_count("google", "timeout"), 1);
        assert_eq!(metrics.error_count("google", "parse"), 2);
        assert_eq!(metrics.error_count("bing", "parse"), 0);
    }

    #[test]
    fn test_reliability() {
        let metrics = Metrics::new();
        assert_eq!(metrics.reliability("google"), 100.0);

        metrics.record_success("google", 120);
        metrics.record_error("google", &SourceError::Network);
        assert_eq!(metrics.reliability("google"), 50.0);
        assert_eq!(metrics.avg_response_time("google"), Some(120));
    }
}
