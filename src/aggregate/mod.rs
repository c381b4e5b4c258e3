//! Concurrent fan-out and cross-source merge
//!
//! The aggregator owns the unreliable part of the pipeline: every
//! source call is guarded by its own cache, its own timeout, and the
//! degrade-to-empty policy. A failed or slow source contributes an
//! empty payload without delaying or aborting its siblings.

use crate::cache::SearchCache;
use crate::locales::Locale;
use crate::metrics::{Metrics, SourceError};
use crate::network::HttpClient;
use crate::results::{identity_key, SearchData, SearchKind};
use crate::sources::{FetchParams, Source, SourceRegistry};
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub struct Aggregator {
    client: HttpClient,
    registry: SourceRegistry,
    cache: Arc<SearchCache>,
    metrics: Arc<Metrics>,
}

impl Aggregator {
    pub fn new(
        client: HttpClient,
        registry: SourceRegistry,
        cache: Arc<SearchCache>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            client,
            registry,
            cache,
            metrics,
        }
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Fan out to every source of `kind` concurrently and merge the
    /// settled contributions in fixed priority order.
    ///
    /// Fetches always go out at logical offset zero: pagination is
    /// served by slicing the stored aggregate downstream, so one
    /// fan-out covers every page within the cache window. The
    /// per-source offset translation stays on [`fetch_source`] for
    /// callers that fetch deeper pages from a single source.
    ///
    /// [`fetch_source`]: Self::fetch_source
    pub async fn aggregate(&self, query: &str, kind: SearchKind, locale: &Locale) -> SearchData {
        let sources = self.registry.of_kind(kind);
        if sources.is_empty() {
            return SearchData::empty(kind);
        }

        let fetches = sources.iter().map(|source| {
            let params = FetchParams {
                query: query.to_string(),
                offset: 0,
                locale: locale.clone(),
                api_key: self.registry.api_key(source.name()),
            };
            self.fetch_source(source.clone(), params)
        });

        // of_kind is priority-ordered and join_all preserves input
        // order, so the merge tie-break falls out of iteration order
        let parts = join_all(fetches).await;
        merge(kind, parts)
    }

    /// One guarded source call: cache check, bounded timeout, optional
    /// rate-limit retry, and recovery of every failure into the kind's
    /// empty value.
    pub async fn fetch_source(&self, source: Arc<dyn Source>, params: FetchParams) -> SearchData {
        let name = source.name().to_string();
        let kind = source.kind();
        let key = SearchCache::source_key(&name, &params.locale, params.offset, &params.query);

        if let Some(cached) = self.cache.get(&key).await {
            debug!(source = %name, "source cache hit");
            return (*cached).clone();
        }

        let request = match source.request(&params) {
            Ok(request) => request,
            Err(e) => {
                warn!(source = %name, "request build failed: {}", e);
                self.metrics.record_error(&name, &SourceError::Parse);
                return SearchData::empty(kind);
            }
        };

        let budget = Duration::from_secs(self.registry.effective_timeout(&name));
        let policy = source.retry();
        let max_attempts = policy.map(|p| p.max_attempts).unwrap_or(1);
        let started = Instant::now();

        for attempt in 1..=max_attempts {
            let response =
                match tokio::time::timeout(budget, self.client.execute(request.clone())).await {
                    Err(_) => {
                        warn!(source = %name, "timed out after {:?}", budget);
                        self.metrics.record_error(&name, &SourceError::Timeout);
                        return SearchData::empty(kind);
                    }
                    Ok(Err(e)) => {
                        warn!(source = %name, "request failed: {}", e);
                        self.metrics.record_error(&name, &SourceError::Network);
                        return SearchData::empty(kind);
                    }
                    Ok(Ok(response)) => response,
                };

            if response.is_rate_limited() {
                if let Some(policy) = policy.filter(|_| attempt < max_attempts) {
                    let delay = policy.delay_for(attempt);
                    debug!(source = %name, attempt, "rate limited, retrying in {:?}", delay);
                    tokio::time::sleep(delay).await;
                    continue;
                }
                warn!(source = %name, "rate limited, giving up");
                self.metrics.record_error(&name, &SourceError::RateLimited);
                return SearchData::empty(kind);
            }

            let status = response.status;
            let http_ok = response.is_success();

            // Parse gets a shot even on non-2xx so confirmed
            // not-founds (wiki 404) survive as data; a failed parse of
            // a non-2xx body is source unavailability, not a markup
            // problem.
            match source.parse(response) {
                Ok(data) => {
                    let elapsed = started.elapsed().as_millis() as u64;
                    self.metrics.record_success(&name, elapsed);
                    debug!(source = %name, count = data.len(), elapsed_ms = elapsed, "source ok");
                    self.cache.set(key, data.clone()).await;
                    return data;
                }
                Err(_) if !http_ok => {
                    warn!(source = %name, "HTTP error: {}", status);
                    self.metrics.record_error(&name, &SourceError::Http(status));
                    return SearchData::empty(kind);
                }
                Err(e) => {
                    warn!(source = %name, "parse failed: {}", e);
                    self.metrics.record_error(&name, &SourceError::Parse);
                    return SearchData::empty(kind);
                }
            }
        }

        SearchData::empty(kind)
    }
}

/// Merge per-source payloads into one deduplicated list.
///
/// Identity is the normalized destination URL; the first payload to
/// produce a key wins the slot and later duplicates are dropped whole,
/// never merged field-by-field. Wiki takes the first present summary.
pub fn merge(kind: SearchKind, parts: Vec<SearchData>) -> SearchData {
    let mut seen = HashSet::new();

    match kind {
        SearchKind::Web | SearchKind::News => {
            let mut out = Vec::new();
            for part in parts {
                let results = match part {
                    SearchData::Web(r) | SearchData::News(r) => r,
                    _ => continue,
                };
                for result in results {
                    if seen.insert(identity_key(&result.link)) {
                        out.push(result);
                    }
                }
            }
            match kind {
                SearchKind::News => SearchData::News(out),
                _ => SearchData::Web(out),
            }
        }
        SearchKind::Images => {
            let mut out = Vec::new();
            for part in parts {
                if let SearchData::Images(results) = part {
                    for result in results {
                        if seen.insert(identity_key(&result.image)) {
                            out.push(result);
                        }
                    }
                }
            }
            SearchData::Images(out)
        }
        SearchKind::Videos => {
            let mut out = Vec::new();
            for part in parts {
                if let SearchData::Videos(results) = part {
                    for result in results {
                        if seen.insert(identity_key(&result.url)) {
                            out.push(result);
                        }
                    }
                }
            }
            SearchData::Videos(out)
        }
        SearchKind::Wiki => {
            for part in parts {
                if let SearchData::Wiki(Some(summary)) = part {
                    return SearchData::Wiki(Some(summary));
                }
            }
            SearchData::Wiki(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::WebResult;

    fn web(pairs: &[(&str, &str, &str)]) -> SearchData {
        SearchData::Web(
            pairs
                .iter()
                .map(|(title, link, source)| WebResult::new(*title, *link, *source).unwrap())
                .collect(),
        )
    }

    #[test]
    fn test_merge_first_priority_wins() {
        let high = web(&[("From google", "https://example.com/page", "google")]);
        let low = web(&[("From bing", "https://www.example.com/page/", "bing")]);

        let merged = merge(SearchKind::Web, vec![high, low]);
        assert_eq!(merged.len(), 1);
        if let SearchData::Web(results) = merged {
            assert_eq!(results[0].source, "google");
            assert_eq!(results[0].title, "From google");
        } else {
            panic!("expected web payload");
        }
    }

    #[test]
    fn test_merge_is_idempotent() {
        let a = web(&[
            ("A", "https://a.com/1", "google"),
            ("B", "https://b.com/2", "google"),
        ]);
        let b = web(&[("B2", "https://b.com/2", "bing"), ("C", "https://c.com/3", "bing")]);

        let once = merge(SearchKind::Web, vec![a.clone(), b.clone()]);
        let twice = merge(SearchKind::Web, vec![once.clone(), a, b]);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);
    }

    #[test]
    fn test_merge_preserves_priority_order_across_sources() {
        let first = web(&[("A", "https://a.com", "google")]);
        let second = web(&[("B", "https://b.com", "bing")]);
        let merged = merge(SearchKind::Web, vec![first, second]);
        if let SearchData::Web(results) = merged {
            assert_eq!(results[0].source, "google");
            assert_eq!(results[1].source, "bing");
        } else {
            panic!("expected web payload");
        }
    }

    #[test]
    fn test_merge_wiki_first_present_wins() {
        let none = SearchData::Wiki(None);
        let some = SearchData::Wiki(Some(crate::results::WikiSummary {
            title: "T".into(),
            summary: "S".into(),
            image: None,
            url: "https://en.wikipedia.org/wiki/T".into(),
        }));
        let merged = merge(SearchKind::Wiki, vec![none, some.clone()]);
        assert_eq!(merged, some);
    }
}
