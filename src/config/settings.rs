//! Settings structures for the aggregation pipeline

use crate::results::SearchKind;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Locale whose country TLD receives the aggressive ranking boost
    pub primary_locale: String,
    pub outgoing: OutgoingSettings,
    pub cache: CacheSettings,
    pub ranking: RankingWeights,
    pub sources: Vec<SourceConfig>,
    /// Unicode ranges whose presence in title/snippet drops a result
    pub unwanted_scripts: Vec<ScriptRange>,
    /// Reference/community sites that get a flat ranking bonus
    pub informative_domains: Vec<String>,
    /// IP-geolocation endpoint used only for locale hinting
    pub geoip_endpoint: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            primary_locale: "tr".to_string(),
            outgoing: OutgoingSettings::default(),
            cache: CacheSettings::default(),
            ranking: RankingWeights::default(),
            sources: default_sources(),
            unwanted_scripts: default_unwanted_scripts(),
            informative_domains: default_informative_domains(),
            geoip_endpoint: None,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (METASEEK_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("METASEEK_PRIMARY_LOCALE") {
            self.primary_locale = val;
        }
        if let Ok(val) = std::env::var("METASEEK_CACHE_TTL") {
            if let Ok(ttl) = val.parse() {
                self.cache.ttl_seconds = ttl;
            }
        }
        if let Ok(val) = std::env::var("METASEEK_GNEWS_API_KEY") {
            if let Some(gnews) = self.sources.iter_mut().find(|s| s.name == "gnews") {
                gnews.api_key = Some(val);
            }
        }
    }

    /// Get source config by name
    pub fn get_source(&self, name: &str) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.name == name)
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Client-level request timeout in seconds (per-source budgets are
    /// enforced separately and may be shorter)
    pub request_timeout: u64,
    /// Pool max idle connections per host
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy URL for all outbound traffic
    pub proxy: Option<String>,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 30,
            pool_maxsize: 20,
            verify_ssl: true,
            proxy: None,
        }
    }
}

/// Cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Fixed TTL per entry, in seconds
    pub ttl_seconds: u64,
    /// Maximum entry count; oldest entries are evicted beyond this
    pub max_capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_seconds: 900,
            max_capacity: 10_000,
        }
    }
}

/// Ranking bonus magnitudes
///
/// These are empirically tuned values. The contract is the relative
/// ordering of the tiers, not the exact numbers; all of them are whole
/// numbers so the sub-1.0 jitter can only reorder exact ties.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingWeights {
    /// Query appears as the registrable-domain label
    pub exact_domain: f64,
    /// Query appears as a subdomain component
    pub subdomain: f64,
    /// Query appears somewhere else in the hostname
    pub partial_host: f64,
    /// Full lowercased query appears verbatim in the title
    pub exact_phrase: f64,
    /// Country TLD boost when the locale is the primary locale
    pub locale_tld_boost: f64,
    /// Per query term (length > 2) present in the title
    pub term_in_title: f64,
    /// Per query term (length > 2) present in the snippet
    pub term_in_snippet: f64,
    /// Flat bonus for allow-listed reference/community domains
    pub informative: f64,
    /// Country-code TLD matching the locale's country
    pub country_tld: f64,
    /// English-speaking-country TLD under an English locale
    pub english_tld: f64,
    /// Generic TLD (.com/.org/...)
    pub generic_tld: f64,
    /// Everything else
    pub baseline_tld: f64,
    /// Upper bound of the random tie-break jitter; must stay below 1.0
    pub jitter: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            exact_domain: 400.0,
            subdomain: 200.0,
            partial_host: 100.0,
            exact_phrase: 120.0,
            locale_tld_boost: 350.0,
            term_in_title: 40.0,
            term_in_snippet: 15.0,
            informative: 60.0,
            country_tld: 80.0,
            english_tld: 40.0,
            generic_tld: 20.0,
            baseline_tld: 5.0,
            jitter: 0.99,
        }
    }
}

/// An inclusive Unicode codepoint range
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScriptRange {
    pub start: u32,
    pub end: u32,
}

impl ScriptRange {
    pub fn contains(&self, c: char) -> bool {
        let cp = c as u32;
        cp >= self.start && cp <= self.end
    }
}

/// Individual source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Source name (unique identifier)
    pub name: String,
    /// Result kind the source contributes to
    pub kind: SearchKind,
    /// Whether the source participates in aggregation
    pub enabled: bool,
    /// Merge priority override; lower wins the identity slot
    pub priority: Option<u32>,
    /// Timeout override in seconds
    pub timeout: Option<u64>,
    /// API key for keyed sources
    pub api_key: Option<String>,
    /// Base URL override (used by self-hosted instances and tests)
    pub base_url: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: SearchKind::Web,
            enabled: true,
            priority: None,
            timeout: None,
            api_key: None,
            base_url: None,
        }
    }
}

impl SourceConfig {
    pub fn new(name: impl Into<String>, kind: SearchKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Default::default()
        }
    }
}

/// Default source configurations
fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig::new("google", SearchKind::Web),
        SourceConfig::new("bing", SearchKind::Web),
        SourceConfig::new("duckduckgo", SearchKind::Web),
        SourceConfig::new("yandex", SearchKind::Web),
        SourceConfig::new("ecosia", SearchKind::Web),
        SourceConfig::new("searx", SearchKind::Web),
        SourceConfig::new("bing_images", SearchKind::Images),
        SourceConfig::new("youtube", SearchKind::Videos),
        SourceConfig::new("gnews", SearchKind::News),
        SourceConfig::new("wikipedia", SearchKind::Wiki),
    ]
}

/// Scripts outside the target language family. Results carrying any of
/// these characters in title or snippet are filtered before scoring.
fn default_unwanted_scripts() -> Vec<ScriptRange> {
    vec![
        // Cyrillic
        ScriptRange { start: 0x0400, end: 0x04FF },
        // Arabic
        ScriptRange { start: 0x0600, end: 0x06FF },
        // Hiragana + Katakana
        ScriptRange { start: 0x3040, end: 0x30FF },
        // CJK unified ideographs
        ScriptRange { start: 0x4E00, end: 0x9FFF },
        // Hangul syllables
        ScriptRange { start: 0xAC00, end: 0xD7AF },
    ]
}

fn default_informative_domains() -> Vec<String> {
    [
        "wikipedia.org",
        "wiktionary.org",
        "stackoverflow.com",
        "stackexchange.com",
        "github.com",
        "reddit.com",
        "quora.com",
        "medium.com",
        "britannica.com",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.primary_locale, "tr");
        assert!(!settings.sources.is_empty());
        assert!(settings.ranking.exact_domain > settings.ranking.subdomain);
        assert!(settings.ranking.subdomain > settings.ranking.partial_host);
        assert!(settings.ranking.jitter < 1.0);
    }

    #[test]
    fn test_source_lookup() {
        let settings = Settings::default();
        let google = settings.get_source("google");
        assert!(google.is_some());
        assert_eq!(google.unwrap().kind, SearchKind::Web);
    }

    #[test]
    fn test_script_range() {
        let cyrillic = ScriptRange { start: 0x0400, end: 0x04FF };
        assert!(cyrillic.contains('Ж'));
        assert!(!cyrillic.contains('z'));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let settings = Settings::default();
        let yaml = serde_yaml::to_string(&settings).unwrap();
        let parsed: Settings = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.primary_locale, settings.primary_locale);
        assert_eq!(parsed.sources.len(), settings.sources.len());
    }
}
