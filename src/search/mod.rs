//! Search orchestration
//!
//! The thin boundary the outer HTTP layer calls into. A query passes
//! through the bang check, the aggregate-level cache, the fan-out, the
//! ranker, and finally pagination; everything stateful is an explicit
//! injected instance so tests get isolated pipelines.

use crate::aggregate::Aggregator;
use crate::bangs;
use crate::cache::SearchCache;
use crate::config::Settings;
use crate::locales::{self, Locale};
use crate::metrics::Metrics;
use crate::network::HttpClient;
use crate::ranking;
use crate::results::{SearchData, SearchKind};
use crate::sources::SourceRegistry;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub struct SearchService {
    aggregator: Aggregator,
    cache: Arc<SearchCache>,
    metrics: Arc<Metrics>,
    client: HttpClient,
    settings: Settings,
}

impl SearchService {
    /// Build a full pipeline from settings.
    pub fn new(settings: Settings) -> Result<Self> {
        let client = HttpClient::with_settings(&settings.outgoing)?;
        let registry = SourceRegistry::from_settings(&settings)?;
        let cache = Arc::new(SearchCache::with_settings(&settings.cache));
        let metrics = Arc::new(Metrics::new());
        Ok(Self::with_parts(client, registry, cache, metrics, settings))
    }

    /// Assemble a pipeline from explicit parts. Tests use this to
    /// inject a custom registry or an isolated cache.
    pub fn with_parts(
        client: HttpClient,
        registry: SourceRegistry,
        cache: Arc<SearchCache>,
        metrics: Arc<Metrics>,
        settings: Settings,
    ) -> Self {
        let aggregator = Aggregator::new(client.clone(), registry, cache.clone(), metrics.clone());
        Self {
            aggregator,
            cache,
            metrics,
            client,
            settings,
        }
    }

    /// Resolve the request locale. An empty tag falls back to the
    /// IP-geolocation hint when an endpoint is configured; the hint is
    /// best-effort and never gates the request.
    async fn resolve_locale(&self, tag: &str) -> Locale {
        if !tag.trim().is_empty() {
            return Locale::parse(tag);
        }
        if let Some(ref endpoint) = self.settings.geoip_endpoint {
            if let Some(hint) = locales::locale_hint(&self.client, endpoint).await {
                debug!(lang = %hint.lang, country = %hint.country, "geoip locale hint");
                return hint;
            }
        }
        Locale::default()
    }

    /// Resolve a bang shorthand to its redirect URL.
    ///
    /// Callers must check this before `search`: a matching bang fully
    /// replaces the pipeline for that request.
    pub fn bang_redirect(&self, query: &str) -> Option<String> {
        bangs::resolve(query)
    }

    /// Run the full pipeline for one query and return the requested
    /// page of results. `start` is the zero-based index into the ranked
    /// aggregate; wiki responses are singletons and ignore it. An empty
    /// `locale_tag` is resolved through the geoip hint when configured.
    pub async fn search(
        &self,
        query: &str,
        kind: SearchKind,
        start: u32,
        locale_tag: &str,
    ) -> SearchData {
        let query = query.trim();
        if query.is_empty() {
            return SearchData::empty(kind);
        }

        self.metrics.inc_search();
        let locale = self.resolve_locale(locale_tag).await;
        let key = SearchCache::aggregate_key(kind, &locale, query);

        // The aggregate cache is pagination-independent: later pages
        // slice the stored full list instead of re-fetching.
        if let Some(cached) = self.cache.get(&key).await {
            debug!(%query, kind = %kind, "aggregate cache hit");
            return page(&cached, start);
        }

        let merged = self.aggregator.aggregate(query, kind, &locale).await;

        let ranked = match merged {
            SearchData::Web(results) => {
                SearchData::Web(ranking::rank(&results, query, &locale, &self.settings))
            }
            SearchData::News(results) => {
                SearchData::News(ranking::rank(&results, query, &locale, &self.settings))
            }
            other => other,
        };

        info!(%query, kind = %kind, count = ranked.len(), "search complete");
        // A Wiki(None) here may be a degraded source failure, not a
        // confirmed 404. Only the source-level cache, written on
        // successful parses, may persist not-found; re-aggregating hits
        // it when the 404 was real.
        if !matches!(ranked, SearchData::Wiki(None)) {
            self.cache.set(key, ranked.clone()).await;
        }
        page(&ranked, start)
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn registry(&self) -> &SourceRegistry {
        self.aggregator.registry()
    }
}

/// One page of a ranked aggregate, `start` through `start + PAGE_SIZE`.
fn page(data: &SearchData, start: u32) -> SearchData {
    let start = start as usize;
    let take = crate::PAGE_SIZE;

    match data {
        SearchData::Web(v) => SearchData::Web(slice(v, start, take)),
        SearchData::News(v) => SearchData::News(slice(v, start, take)),
        SearchData::Images(v) => SearchData::Images(slice(v, start, take)),
        SearchData::Videos(v) => SearchData::Videos(slice(v, start, take)),
        SearchData::Wiki(summary) => SearchData::Wiki(summary.clone()),
    }
}

fn slice<T: Clone>(items: &[T], start: usize, take: usize) -> Vec<T> {
    items.iter().skip(start).take(take).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::WebResult;

    fn results(n: usize) -> SearchData {
        SearchData::Web(
            (0..n)
                .map(|i| {
                    WebResult::new(format!("R{}", i), format!("https://site{}.com", i), "test")
                        .unwrap()
                })
                .collect(),
        )
    }

    #[test]
    fn test_page_slices_to_page_size() {
        let data = results(25);
        assert_eq!(page(&data, 0).len(), crate::PAGE_SIZE);
        assert_eq!(page(&data, 20).len(), 5);
        assert_eq!(page(&data, 30).len(), 0);
    }

    #[test]
    fn test_page_is_offset_not_page_number() {
        let data = results(25);
        if let SearchData::Web(v) = page(&data, 3) {
            assert_eq!(v[0].title, "R3");
        } else {
            panic!("expected web payload");
        }
    }

    #[tokio::test]
    async fn test_empty_query_short_circuits() {
        let service = SearchService::new(Settings::default()).unwrap();
        let out = service.search("   ", SearchKind::Web, 0, "en").await;
        assert!(out.is_empty());
        assert_eq!(service.metrics().total_searches(), 0);
    }

    #[test]
    fn test_bang_redirect_passthrough() {
        let service = SearchService::new(Settings::default()).unwrap();
        assert_eq!(
            service.bang_redirect("!gh express").as_deref(),
            Some("https://github.com/search?q=express")
        );
        assert!(service.bang_redirect("plain query").is_none());
    }
}
