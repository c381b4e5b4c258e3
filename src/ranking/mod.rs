//! Result scoring and filtering
//!
//! `rank` is a pure function over a merged candidate list: it drops
//! results in unwanted scripts, scores every survivor against the query
//! and locale, and returns a new descending-ordered list. All bonus
//! magnitudes are whole numbers from [`RankingWeights`]; the only
//! nondeterminism is a sub-1.0 jitter that can reorder exact ties and
//! nothing else.

use crate::config::{RankingWeights, ScriptRange, Settings};
use crate::locales::{Locale, ENGLISH_TLDS, GENERIC_TLDS};
use crate::results::WebResult;
use rand::Rng;
use url::Url;

/// Second-level suffixes under which the registrable label sits one
/// position deeper (`example.co.uk` registers `example`, not `co`).
const SECOND_LEVEL_SUFFIXES: &[&str] = &["co", "com", "org", "net", "gov", "ac", "edu"];

/// Filter and reorder a merged web/news candidate list.
pub fn rank(results: &[WebResult], query: &str, locale: &Locale, settings: &Settings) -> Vec<WebResult> {
    let query = query.trim().to_lowercase();
    let query_label = query_domain_label(&query);
    let terms: Vec<&str> = query.split_whitespace().filter(|t| t.len() > 2).collect();
    let primary = Locale::parse(&settings.primary_locale);

    let mut rng = rand::thread_rng();
    let mut scored: Vec<(f64, WebResult)> = results
        .iter()
        .filter(|r| !has_unwanted_script(&r.title, &settings.unwanted_scripts))
        .filter(|r| !has_unwanted_script(&r.snippet, &settings.unwanted_scripts))
        .map(|r| {
            let score = score_result(
                r,
                &query,
                &query_label,
                &terms,
                locale,
                &primary,
                settings,
                &mut rng,
            );
            (score, r.clone())
        })
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().map(|(_, r)| r).collect()
}

#[allow(clippy::too_many_arguments)]
fn score_result(
    result: &WebResult,
    query: &str,
    query_label: &str,
    terms: &[&str],
    locale: &Locale,
    primary: &Locale,
    settings: &Settings,
    rng: &mut impl Rng,
) -> f64 {
    let weights = &settings.ranking;

    // Malformed URLs sink below every scored candidate
    let host = match Url::parse(&result.link).ok().and_then(|u| u.host_str().map(str::to_lowercase)) {
        Some(h) => h,
        None => return 0.0,
    };
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if labels.is_empty() {
        return 0.0;
    }

    let mut score = 0.0;

    // Domain tiers are mutually exclusive: best match only
    if !query_label.is_empty() {
        if registrable_label(&labels) == Some(query_label) {
            score += weights.exact_domain;
        } else if labels.iter().any(|l| *l == query_label) {
            score += weights.subdomain;
        } else if host.contains(query_label) {
            score += weights.partial_host;
        }
    }

    let title = result.title.to_lowercase();
    let snippet = result.snippet.to_lowercase();

    if !query.is_empty() && title.contains(query) {
        score += weights.exact_phrase;
    }

    let tld = labels[labels.len() - 1];

    if locale.lang == primary.lang {
        if let Some(country) = locale.country_tld() {
            if tld == country {
                score += weights.locale_tld_boost;
            }
        }
    }

    for term in terms {
        if title.contains(term) {
            score += weights.term_in_title;
        }
        if snippet.contains(term) {
            score += weights.term_in_snippet;
        }
    }

    if settings
        .informative_domains
        .iter()
        .any(|d| host == *d || host.ends_with(&format!(".{}", d)))
    {
        score += weights.informative;
    }

    score += tld_tier(tld, locale, weights);

    // Tie-break only: every weight above is a whole number
    score += rng.gen::<f64>() * weights.jitter;

    score
}

/// One of four TLD tiers, highest applicable
fn tld_tier(tld: &str, locale: &Locale, weights: &RankingWeights) -> f64 {
    if locale.country_tld() == Some(tld) {
        weights.country_tld
    } else if locale.is_english() && ENGLISH_TLDS.contains(&tld) {
        weights.english_tld
    } else if GENERIC_TLDS.contains(&tld) {
        weights.generic_tld
    } else {
        weights.baseline_tld
    }
}

/// The label the domain registrant chose, skipping second-level
/// suffixes like `co.uk`.
fn registrable_label<'a>(labels: &[&'a str]) -> Option<&'a str> {
    match labels.len() {
        0 => None,
        1 => Some(labels[0]),
        2 => Some(labels[0]),
        n => {
            let second = labels[n - 2];
            if labels[n - 1].len() == 2 && SECOND_LEVEL_SUFFIXES.contains(&second) {
                Some(labels[n - 3])
            } else {
                Some(labels[n - 2])
            }
        }
    }
}

/// Reduce a query to a comparable domain label: strip protocol, `www.`,
/// any path, and a trailing common TLD suffix.
fn query_domain_label(query: &str) -> String {
    let mut q = query.trim();
    for prefix in ["https://", "http://"] {
        if let Some(rest) = q.strip_prefix(prefix) {
            q = rest;
        }
    }
    if let Some(rest) = q.strip_prefix("www.") {
        q = rest;
    }
    let host = q.split('/').next().unwrap_or(q);

    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    registrable_label(&labels).unwrap_or_default().to_string()
}

fn has_unwanted_script(text: &str, ranges: &[ScriptRange]) -> bool {
    text.chars().any(|c| ranges.iter().any(|r| r.contains(c)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(title: &str, link: &str, snippet: &str) -> WebResult {
        WebResult::new(title, link, "test")
            .map(|r| r.with_snippet(snippet))
            .unwrap()
    }

    fn settings() -> Settings {
        Settings::default()
    }

    #[test]
    fn test_exact_domain_beats_term_matches() {
        let candidates = vec![
            result("OpenAI mentioned in blog post", "https://someblog.net/openai", "openai news"),
            result("OpenAI", "https://openai.com", "AI research company"),
        ];
        let ranked = rank(&candidates, "openai", &Locale::parse("tr"), &settings());
        assert_eq!(ranked[0].link, "https://openai.com");
    }

    #[test]
    fn test_locale_tld_dominates_under_primary_locale() {
        let candidates = vec![
            result("Weather forecast", "https://weather.com/today", "forecast"),
            result("Hava durumu", "https://havadurumu.tr/bugun", "hava"),
        ];
        let ranked = rank(&candidates, "hava durumu", &Locale::parse("tr"), &settings());
        assert_eq!(ranked[0].link, "https://havadurumu.tr/bugun");
    }

    #[test]
    fn test_unwanted_script_filtered() {
        let candidates = vec![
            result("Результаты поиска", "https://example.ru/page", "поиск"),
            result("Search results", "https://example.com/page", "results"),
        ];
        let ranked = rank(&candidates, "search", &Locale::parse("en"), &settings());
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].title, "Search results");
    }

    #[test]
    fn test_malformed_url_sinks() {
        let mut bad = result("Good title match query words", "https://example.com/x", "query");
        bad.link = "not a url".to_string();
        let good = result("Unrelated", "https://other.org/y", "nothing");
        let ranked = rank(&[bad, good], "query words match", &Locale::parse("en"), &settings());
        assert_eq!(ranked[ranked.len() - 1].link, "not a url");
    }

    #[test]
    fn test_registrable_label_second_level() {
        assert_eq!(registrable_label(&["news", "bbc", "co", "uk"]), Some("bbc"));
        assert_eq!(registrable_label(&["openai", "com"]), Some("openai"));
        assert_eq!(registrable_label(&["docs", "rs"]), Some("docs"));
    }

    #[test]
    fn test_query_domain_label() {
        assert_eq!(query_domain_label("openai"), "openai");
        assert_eq!(query_domain_label("openai.com"), "openai");
        assert_eq!(query_domain_label("https://www.openai.com/about"), "openai");
    }

    #[test]
    fn test_subdomain_tier_between_exact_and_partial() {
        let candidates = vec![
            result("a", "https://myopenaithing.com", "x"),
            result("b", "https://openai.example.org", "x"),
            result("c", "https://openai.com", "x"),
        ];
        let ranked = rank(&candidates, "openai", &Locale::parse("en"), &settings());
        assert_eq!(ranked[0].link, "https://openai.com");
        assert_eq!(ranked[1].link, "https://openai.example.org");
    }

    #[test]
    fn test_informative_domain_bonus() {
        let candidates = vec![
            result("Topic overview", "https://randomsite.biz/topic", "an overview"),
            result("Topic overview", "https://en.wikipedia.org/wiki/Topic", "an overview"),
        ];
        let ranked = rank(&candidates, "nonmatching", &Locale::parse("en"), &settings());
        assert!(ranked[0].link.contains("wikipedia.org"));
    }
}
