//! Tracking/redirect URL unwrapping
//!
//! Engines rarely link straight to the destination: Google wraps hits
//! in `/url?q=`, DuckDuckGo in `uddg=` params, Bing in base64-encoded
//! `/ck/a` click trackers. Adapters must fully resolve these before a
//! record leaves the adapter boundary; unresolvable redirects are
//! dropped, not passed through.

use base64::Engine as _;
use url::Url;

/// Unwrap a possibly-wrapped engine URL to its final destination.
///
/// Returns `None` when the input is recognizably a redirect wrapper but
/// the target cannot be recovered. Plain absolute URLs pass through
/// unchanged.
pub fn unwrap_redirect(raw: &str) -> Option<String> {
    if raw.starts_with("/url?") || raw.starts_with("https://www.google.com/url?") {
        return unwrap_query_param(raw, "q").or_else(|| unwrap_query_param(raw, "url"));
    }
    if raw.contains("duckduckgo.com/l/?") || raw.starts_with("//duckduckgo.com/l/?") {
        return unwrap_query_param(raw, "uddg");
    }
    if raw.starts_with("https://www.bing.com/ck/a") {
        return decode_bing_click(raw);
    }
    // Not a known wrapper
    if raw.starts_with("http://") || raw.starts_with("https://") {
        return Some(raw.to_string());
    }
    None
}

/// Pull an absolute URL out of a query parameter.
fn unwrap_query_param(raw: &str, param: &str) -> Option<String> {
    // Relative and scheme-relative wrappers need a base to parse
    let absolute = if raw.starts_with("//") {
        format!("https:{}", raw)
    } else if raw.starts_with('/') {
        format!("https://placeholder.invalid{}", raw)
    } else {
        raw.to_string()
    };

    let parsed = Url::parse(&absolute).ok()?;
    let target = parsed
        .query_pairs()
        .find(|(k, _)| k == param)
        .map(|(_, v)| v.into_owned())?;

    if target.starts_with("http://") || target.starts_with("https://") {
        Some(target)
    } else {
        None
    }
}

/// Decode Bing's `/ck/a?...&u=a1<base64>` click tracker.
///
/// The real URL is base64 encoded in the `u` parameter after an `a1`
/// prefix, URL-safe alphabet, padding stripped.
fn decode_bing_click(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    let encoded = parsed
        .query_pairs()
        .find(|(k, _)| k == "u")
        .map(|(_, v)| v.into_owned())?;

    let payload = encoded.strip_prefix("a1")?;
    let trimmed = payload.trim_end_matches('=');

    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(trimmed)
        .or_else(|_| base64::engine::general_purpose::STANDARD_NO_PAD.decode(trimmed))
        .ok()?;

    let target = String::from_utf8(bytes).ok()?;
    if target.starts_with("http://") || target.starts_with("https://") {
        Some(target)
    } else {
        None
    }
}

/// Resolve a possibly-relative href against a base URL.
pub fn ensure_absolute(base: &str, href: &str) -> Option<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }
    let base = Url::parse(base).ok()?;
    base.join(href).ok().map(|u| u.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;

    fn bing_wrap(target: &str) -> String {
        let encoded = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(target);
        format!(
            "https://www.bing.com/ck/a?!&&p=deadbeef&u=a1{}&ntb=1",
            encoded
        )
    }

    #[test]
    fn test_google_redirect_roundtrip() {
        let samples = [
            (
                "/url?q=https://openai.com/&sa=U&ved=abc",
                "https://openai.com/",
            ),
            (
                "https://www.google.com/url?q=https://docs.rs/tokio&sa=U",
                "https://docs.rs/tokio",
            ),
        ];
        for (wrapped, want) in samples {
            assert_eq!(unwrap_redirect(wrapped).as_deref(), Some(want));
        }
    }

    #[test]
    fn test_duckduckgo_uddg_roundtrip() {
        let wrapped =
            "//duckduckgo.com/l/?uddg=https%3A%2F%2Fgithub.com%2Ftokio-rs%2Ftokio&rut=abc";
        assert_eq!(
            unwrap_redirect(wrapped).as_deref(),
            Some("https://github.com/tokio-rs/tokio")
        );
    }

    #[test]
    fn test_bing_click_roundtrip() {
        let targets = [
            "https://openai.com/",
            "https://en.wikipedia.org/wiki/Rust_(programming_language)",
            "https://example.com/path?a=1&b=2",
        ];
        for target in targets {
            assert_eq!(unwrap_redirect(&bing_wrap(target)).as_deref(), Some(target));
        }
    }

    #[test]
    fn test_unresolvable_redirects_dropped() {
        // Wrapper with a non-URL payload
        assert_eq!(unwrap_redirect("/url?q=javascript:void(0)"), None);
        // Bing tracker with garbage base64
        assert_eq!(
            unwrap_redirect("https://www.bing.com/ck/a?u=a1%%%%"),
            None
        );
        // Bare relative path: no destination recoverable
        assert_eq!(unwrap_redirect("/search?q=more"), None);
    }

    #[test]
    fn test_plain_urls_pass_through() {
        assert_eq!(
            unwrap_redirect("https://openai.com/blog").as_deref(),
            Some("https://openai.com/blog")
        );
    }

    #[test]
    fn test_ensure_absolute() {
        assert_eq!(
            ensure_absolute("https://tr.wikipedia.org/api/", "/wiki/Istanbul").as_deref(),
            Some("https://tr.wikipedia.org/wiki/Istanbul")
        );
        assert_eq!(
            ensure_absolute("https://a.com", "https://b.com/x").as_deref(),
            Some("https://b.com/x")
        );
    }
}
