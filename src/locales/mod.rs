//! Locale handling
//!
//! A locale is a language/country pair steering ranking bonuses and
//! source query parameters. Tags like `tr`, `en-US` or `de-DE` are
//! accepted; a bare language implies the matching country where one
//! exists (`tr` -> TR).

use serde::{Deserialize, Serialize};

use crate::network::HttpClient;
use crate::sources::SourceRequest;

/// Country-code TLDs considered "English speaking" for the secondary
/// ranking tier when the active language is English.
pub const ENGLISH_TLDS: &[&str] = &["uk", "us", "ca", "au", "nz", "ie"];

/// Generic TLDs that get the baseline-plus tier.
pub const GENERIC_TLDS: &[&str] = &["com", "org", "net", "io", "dev", "app", "edu", "gov"];

/// A resolved language/country pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Locale {
    /// Lowercase ISO 639-1 language code
    pub lang: String,
    /// Lowercase ISO 3166-1 country code, empty when unknown
    pub country: String,
}

impl Locale {
    pub fn new(lang: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            lang: lang.into().to_lowercase(),
            country: country.into().to_lowercase(),
        }
    }

    /// Parse a locale tag. Unknown or empty tags fall back to `en`.
    pub fn parse(tag: &str) -> Self {
        let tag = tag.trim();
        if tag.is_empty() {
            return Self::new("en", "");
        }
        let mut parts = tag.splitn(2, |c| c == '-' || c == '_');
        let lang = parts.next().unwrap_or("en").to_lowercase();
        let country = parts
            .next()
            .map(|c| c.to_lowercase())
            .unwrap_or_else(|| implied_country(&lang).to_string());
        Self { lang, country }
    }

    /// The country-code TLD for this locale, e.g. `tr` -> `tr`.
    pub fn country_tld(&self) -> Option<&str> {
        if self.country.is_empty() {
            None
        } else {
            Some(self.country.as_str())
        }
    }

    /// Cache-key form, stable across equivalent tags.
    pub fn cache_tag(&self) -> String {
        if self.country.is_empty() {
            self.lang.clone()
        } else {
            format!("{}-{}", self.lang, self.country)
        }
    }

    pub fn is_english(&self) -> bool {
        self.lang == "en"
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new("en", "")
    }
}

/// Languages whose primary country shares the language code.
fn implied_country(lang: &str) -> &'static str {
    match lang {
        "tr" => "tr",
        "de" => "de",
        "fr" => "fr",
        "es" => "es",
        "it" => "it",
        "nl" => "nl",
        "pl" => "pl",
        "ru" => "ru",
        "ja" => "jp",
        "ko" => "kr",
        "pt" => "pt",
        _ => "",
    }
}

/// Best-effort IP-geolocation locale hint
///
/// Used only as a hint for callers that received no explicit locale;
/// never gates anything. Any failure resolves to `None`.
pub async fn locale_hint(client: &HttpClient, endpoint: &str) -> Option<Locale> {
    let request = SourceRequest::get(endpoint);
    let response = client.execute(request).await.ok()?;
    if !response.is_success() {
        return None;
    }
    let json: serde_json::Value = response.json().ok()?;
    let country = json.get("countryCode").and_then(|v| v.as_str())?;
    let lang = match country.to_lowercase().as_str() {
        "tr" => "tr",
        "de" | "at" | "ch" => "de",
        "fr" => "fr",
        "es" | "mx" | "ar" => "es",
        _ => "en",
    };
    Some(Locale::new(lang, country))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_language() {
        let locale = Locale::parse("tr");
        assert_eq!(locale.lang, "tr");
        assert_eq!(locale.country, "tr");
        assert_eq!(locale.country_tld(), Some("tr"));
    }

    #[test]
    fn test_parse_language_country() {
        let locale = Locale::parse("en-US");
        assert_eq!(locale.lang, "en");
        assert_eq!(locale.country, "us");
        assert!(locale.is_english());
    }

    #[test]
    fn test_parse_unknown_defaults() {
        let locale = Locale::parse("");
        assert_eq!(locale.lang, "en");
        assert_eq!(locale.country_tld(), None);
    }

    #[test]
    fn test_cache_tag() {
        assert_eq!(Locale::parse("tr").cache_tag(), "tr-tr");
        assert_eq!(Locale::parse("en").cache_tag(), "en");
    }
}
