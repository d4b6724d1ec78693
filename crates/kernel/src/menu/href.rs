//! Navigable target sanitization.
//!
//! Menu entries may carry an internal slug, an external URL, both, or
//! neither. Rendering a raw stored value into the page chrome is an open
//! redirect / injection vector, so every target passes through here first.

use tracing::debug;
use url::Url;

/// Schemes accepted for absolute URLs.
const ALLOWED_SCHEMES: [&str; 5] = ["http", "https", "mailto", "tel", "sms"];

/// Resolve a menu entry's navigable target.
///
/// The `url` field wins when it sanitizes successfully; otherwise the slug
/// is tried. When neither yields a safe destination the neutral placeholder
/// `"#"` is returned — callers must render it as a disabled link rather than
/// dropping the entry, to keep layout stable.
///
/// Pure and idempotent; never errors on malformed input.
pub fn resolve_menu_href(slug: Option<&str>, url: Option<&str>) -> String {
    if let Some(url) = url
        && let Some(href) = sanitize_url(url)
    {
        return href;
    }

    if let Some(slug) = slug
        && let Some(href) = sanitize_slug(slug)
    {
        return href;
    }

    "#".to_string()
}

/// Sanitize a stored URL value.
///
/// A root-relative path (single leading `/`) passes through with repeated
/// slashes collapsed. Anything else must parse as an absolute URL with an
/// allow-listed scheme: `http`/`https` are re-serialized through the URL
/// parser (normalizing encoding and dropping default ports), the remaining
/// schemes are returned verbatim.
///
/// Protocol-relative values (`//evil.com`) fail both branches: the
/// root-relative check requires a single leading slash, and `Url::parse`
/// rejects scheme-less input.
fn sanitize_url(url: &str) -> Option<String> {
    if url.starts_with('/') && !url.starts_with("//") {
        return Some(collapse_slashes(url));
    }

    let Ok(parsed) = Url::parse(url) else {
        debug!(url = %url, "rejected menu url: not root-relative and failed to parse");
        return None;
    };

    let scheme = parsed.scheme();
    if !ALLOWED_SCHEMES.contains(&scheme) {
        debug!(url = %url, scheme = %scheme, "rejected menu url: scheme not allow-listed");
        return None;
    }

    match scheme {
        "http" | "https" => Some(parsed.to_string()),
        _ => Some(url.to_string()),
    }
}

/// Sanitize a stored slug value.
///
/// Leading slashes are stripped, then the remainder must consist solely of
/// ASCII letters, digits, hyphens, and forward slashes — no dots, percent
/// escapes, or unicode, blocking path traversal and encoded injection.
/// Accepted slugs come back with exactly one leading `/`.
fn sanitize_slug(slug: &str) -> Option<String> {
    let trimmed = slug.trim_start_matches('/');
    if trimmed.is_empty() {
        return None;
    }

    let valid = trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '/');
    if !valid {
        debug!(slug = %slug, "rejected menu slug: disallowed characters");
        return None;
    }

    Some(format!("/{trimmed}"))
}

/// Collapse runs of `/` into a single slash.
fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_was_slash = false;
    for c in path.chars() {
        if c == '/' {
            if !prev_was_slash {
                out.push('/');
            }
            prev_was_slash = true;
        } else {
            out.push(c);
            prev_was_slash = false;
        }
    }
    out
}
