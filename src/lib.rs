//! Metaseek: a multi-source search aggregation core
//!
//! Fans a query out to several external search sources concurrently,
//! normalizes and deduplicates their results, ranks the merged list
//! with locale and domain heuristics, and caches everything behind a
//! fixed TTL. Bang shorthands (`!gh rust`) bypass the pipeline with a
//! direct redirect. The outer HTTP layer calls into [`SearchService`].

pub mod aggregate;
pub mod bangs;
pub mod cache;
pub mod config;
pub mod locales;
pub mod metrics;
pub mod network;
pub mod ranking;
pub mod results;
pub mod search;
pub mod sources;

pub use cache::SearchCache;
pub use config::Settings;
pub use locales::Locale;
pub use results::{SearchData, SearchKind};
pub use search::SearchService;
pub use sources::{Source, SourceRegistry};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default per-source timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Results per response page
pub const PAGE_SIZE: usize = 10;
