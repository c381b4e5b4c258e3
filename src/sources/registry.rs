//! Source registry: builds and indexes the configured adapters

use super::traits::Source;
use super::{bing, duckduckgo, ecosia, gnews, google, searx, wikipedia, yandex, youtube};
use crate::config::{Settings, SourceConfig};
use crate::results::SearchKind;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Registry of all active source adapters
pub struct SourceRegistry {
    sources: HashMap<String, Arc<dyn Source>>,
    configs: HashMap<String, SourceConfig>,
    /// Source names per kind, sorted by effective merge priority
    by_kind: HashMap<SearchKind, Vec<String>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self {
            sources: HashMap::new(),
            configs: HashMap::new(),
            by_kind: HashMap::new(),
        }
    }

    /// Build a registry from settings, skipping disabled sources and
    /// keyed sources without a key.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let mut registry = Self::new();

        for config in &settings.sources {
            if !config.enabled {
                info!("skipping disabled source: {}", config.name);
                continue;
            }
            if config.name == "gnews" && config.api_key.is_none() {
                warn!("skipping gnews: no API key configured");
                continue;
            }

            match create_source(config) {
                Ok(source) => {
                    registry.register(source, config.clone());
                }
                Err(e) => {
                    warn!("failed to load source {}: {}", config.name, e);
                }
            }
        }

        info!("loaded {} sources", registry.len());
        Ok(registry)
    }

    /// Register a source with its configuration
    pub fn register(&mut self, source: Arc<dyn Source>, config: SourceConfig) {
        let name = source.name().to_string();
        let kind = source.kind();

        self.sources.insert(name.clone(), source);
        self.configs.insert(name.clone(), config);

        // Keep per-kind lists in merge priority order
        let mut names = self.by_kind.remove(&kind).unwrap_or_default();
        names.push(name);
        names.sort_by_key(|n| self.effective_priority(n));
        self.by_kind.insert(kind, names);
    }

    /// Sources of a kind, in fixed merge priority order
    pub fn of_kind(&self, kind: SearchKind) -> Vec<Arc<dyn Source>> {
        self.by_kind
            .get(&kind)
            .map(|names| {
                names
                    .iter()
                    .filter_map(|n| self.sources.get(n).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Source>> {
        self.sources.get(name)
    }

    pub fn get_config(&self, name: &str) -> Option<&SourceConfig> {
        self.configs.get(name)
    }

    /// Effective timeout: config override, else the adapter's default
    pub fn effective_timeout(&self, name: &str) -> u64 {
        self.configs
            .get(name)
            .and_then(|c| c.timeout)
            .or_else(|| self.sources.get(name).map(|s| s.timeout()))
            .unwrap_or(crate::DEFAULT_TIMEOUT_SECS)
    }

    /// Effective merge priority: config override, else the adapter's
    fn effective_priority(&self, name: &str) -> u32 {
        self.configs
            .get(name)
            .and_then(|c| c.priority)
            .or_else(|| self.sources.get(name).map(|s| s.priority()))
            .unwrap_or(u32::MAX)
    }

    pub fn api_key(&self, name: &str) -> Option<String> {
        self.configs.get(name).and_then(|c| c.api_key.clone())
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create an adapter instance by configured name
fn create_source(config: &SourceConfig) -> Result<Arc<dyn Source>> {
    let source: Arc<dyn Source> = match config.name.as_str() {
        "google" => Arc::new(google::Google::new()),
        "bing" => Arc::new(bing::Bing::new()),
        "bing_images" => Arc::new(bing::BingImages::new()),
        "duckduckgo" => Arc::new(duckduckgo::DuckDuckGo::new()),
        "yandex" => Arc::new(yandex::Yandex::new()),
        "ecosia" => Arc::new(ecosia::Ecosia::new()),
        "searx" => match config.base_url {
            Some(ref base) => Arc::new(searx::Searx::new(base.clone())),
            None => Arc::new(searx::Searx::default()),
        },
        "youtube" => Arc::new(youtube::YouTube::new()),
        "gnews" => Arc::new(gnews::GNews::new()),
        "wikipedia" => Arc::new(wikipedia::Wikipedia::new()),
        other => anyhow::bail!("unknown source: {}", other),
    };

    Ok(source)
}
