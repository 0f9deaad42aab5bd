// src/prober/normalize.rs
// =============================================================================
// Turns a stored site URL into something we can send a request to.
//
// Users type URLs the way they see them in a browser bar ("archive.org"),
// so anything without an http:// or https:// prefix gets https:// in front.
// =============================================================================

use url::Url;

const DEFAULT_SCHEME: &str = "https://";

// Prefixes we accept as-is (compared case-insensitively)
const KNOWN_SCHEMES: [&str; 2] = ["http://", "https://"];

/// Prepends `https://` unless the URL already starts with a known scheme.
///
/// Example:
///   "example.com"         -> "https://example.com"
///   "http://example.com"  -> "http://example.com"
pub fn with_default_scheme(raw: &str) -> String {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();

    if KNOWN_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
        trimmed.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME, trimmed)
    }
}

/// Scheme-normalizes and parses a stored URL.
///
/// Returns None for anything that still is not a valid http(s) URL with a host.
pub fn probe_target(raw: &str) -> Option<Url> {
    let parsed = Url::parse(&with_default_scheme(raw)).ok()?;

    if parsed.host_str().map_or(true, str::is_empty) {
        return None;
    }
    Some(parsed)
}
