//! Bang shorthand resolver
//!
//! A query whose first whitespace-delimited token matches a known
//! shorthand (`!gh`, `!yt`, ...) redirects straight to the target site,
//! replacing the whole search pipeline for that request. Callers must
//! check this before invoking any adapter.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// One bang target: a search URL template the encoded query is appended
/// to, and the bare homepage used when the remainder is empty.
struct BangTarget {
    search: &'static str,
    home: &'static str,
}

static BANGS: Lazy<HashMap<&'static str, BangTarget>> = Lazy::new(|| {
    let mut map = HashMap::new();
    let mut add = |token, search, home| {
        map.insert(token, BangTarget { search, home });
    };

    add("!g", "https://www.google.com/search?q=", "https://www.google.com");
    add("!b", "https://www.bing.com/search?q=", "https://www.bing.com");
    add("!ddg", "https://duckduckgo.com/?q=", "https://duckduckgo.com");
    add("!yt", "https://www.youtube.com/results?search_query=", "https://www.youtube.com");
    add("!gh", "https://github.com/search?q=", "https://github.com");
    add("!so", "https://stackoverflow.com/search?q=", "https://stackoverflow.com");
    add("!w", "https://en.wikipedia.org/wiki/Special:Search?search=", "https://en.wikipedia.org");
    add("!wiki", "https://en.wikipedia.org/wiki/Special:Search?search=", "https://en.wikipedia.org");
    add("!tw", "https://twitter.com/search?q=", "https://twitter.com");
    add("!r", "https://www.reddit.com/search/?q=", "https://www.reddit.com");
    add("!amz", "https://www.amazon.com/s?k=", "https://www.amazon.com");
    add("!imdb", "https://www.imdb.com/find?q=", "https://www.imdb.com");

    map
});

/// Resolve a bang query to its redirect URL.
///
/// Returns `None` when the first token is not a known shorthand. An
/// empty remainder resolves to the site's homepage rather than a
/// malformed search URL.
pub fn resolve(query: &str) -> Option<String> {
    let trimmed = query.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let token = parts.next()?.to_lowercase();

    let target = BANGS.get(token.as_str())?;

    let remainder = parts.next().map(str::trim).unwrap_or_default();
    if remainder.is_empty() {
        Some(target.home.to_string())
    } else {
        Some(format!("{}{}", target.search, urlencoding::encode(remainder)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bang_with_query() {
        assert_eq!(
            resolve("!gh express").as_deref(),
            Some("https://github.com/search?q=express")
        );
        assert_eq!(
            resolve("!yt cats").as_deref(),
            Some("https://www.youtube.com/results?search_query=cats")
        );
    }

    #[test]
    fn test_bang_percent_encodes_remainder() {
        assert_eq!(
            resolve("!g rust async traits").as_deref(),
            Some("https://www.google.com/search?q=rust%20async%20traits")
        );
    }

    #[test]
    fn test_empty_remainder_goes_home() {
        assert_eq!(resolve("!gh").as_deref(), Some("https://github.com"));
        assert_eq!(resolve("!yt  ").as_deref(), Some("https://www.youtube.com"));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(resolve("openai"), None);
        assert_eq!(resolve("!unknownbang query"), None);
        assert_eq!(resolve(""), None);
    }

    #[test]
    fn test_bang_only_matches_first_token() {
        // A bang mid-query is part of the query, not a shorthand
        assert_eq!(resolve("search for !gh"), None);
    }
}
