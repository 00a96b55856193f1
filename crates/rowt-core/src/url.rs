//! Deep link parsing and app-URL building
//!
//! The parser targets the narrow `scheme://host[path][?query]` shape used by
//! app deep links. It is not a general URI parser: there is no userinfo,
//! port or fragment handling, and anything after the first `?` is query.

use std::collections::{BTreeMap, HashMap};

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::{Result, RowtError};
use crate::types::ParsedDeepLink;

/// Characters left unescaped in query keys and values.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

// =============================================================================
// Scheme Extraction
// =============================================================================

/// Word characters as matched by `\w`: ASCII alphanumerics and `_`.
#[inline]
fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Split `url` into its scheme and everything after `://`.
/// Returns None unless the URL starts with one or more word characters
/// followed immediately by `://`.
#[inline]
fn split_scheme(url: &str) -> Option<(&str, &str)> {
    let bytes = url.as_bytes();
    let scheme_len = bytes.iter().position(|&b| !is_word(b))?;
    if scheme_len == 0 {
        return None;
    }
    let rest = url[scheme_len..].strip_prefix("://")?;
    Some((&url[..scheme_len], rest))
}

// =============================================================================
// Deep Link Parsing
// =============================================================================

/// Parse a deep link into its scheme, host, path, segments and query params.
///
/// # Examples
///
/// ```
/// use rowt_core::url::parse_deep_link;
///
/// let link = parse_deep_link("rowtapp://open/profile/42?ref=abc").unwrap();
/// assert_eq!(link.host, "open");
/// assert_eq!(link.segments, vec!["profile", "42"]);
/// assert_eq!(link.param("ref"), Some("abc"));
/// ```
pub fn parse_deep_link(url: &str) -> Result<ParsedDeepLink> {
    let invalid = || {
        log::trace!("rejected deep link {url:?}");
        RowtError::InvalidFormat(url.to_string())
    };

    let (scheme, rest) = split_scheme(url).ok_or_else(invalid)?;

    // Host runs until the first '/' or '?'
    let host_end = rest.find(['/', '?']).unwrap_or(rest.len());
    let host = &rest[..host_end];
    let after_host = &rest[host_end..];

    let (path, query) = match after_host.find('?') {
        Some(q_pos) => (&after_host[..q_pos], Some(&after_host[q_pos + 1..])),
        None => (after_host, None),
    };

    // The query may not span lines
    if query.is_some_and(|q| q.contains(['\n', '\r', '\u{2028}', '\u{2029}'])) {
        return Err(invalid());
    }

    let segments = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    let params = match query {
        Some(q) if !q.is_empty() => parse_query(q),
        _ => HashMap::new(),
    };

    Ok(ParsedDeepLink {
        scheme: scheme.to_string(),
        host: host.to_string(),
        path: if path.is_empty() { "/".to_string() } else { path.to_string() },
        segments,
        params,
        original_url: url.to_string(),
    })
}

/// Parse a raw query string. Values are percent-decoded, keys are kept as-is.
///
/// Invalid escapes such as `%zz` pass through untouched and decoded bytes
/// that are not UTF-8 are replaced lossily, so this never fails.
pub fn parse_query(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for pair in query.split('&') {
        let (key, value) = match pair.split_once('=') {
            Some((key, value)) => (key, value),
            None => (pair, ""),
        };
        let value = percent_decode_str(value).decode_utf8_lossy().into_owned();
        params.insert(key.to_string(), value);
    }
    params
}

// =============================================================================
// App-URL Building
// =============================================================================

/// Build an app URL by joining `prefix` (e.g. `myapp://`) with `path` and
/// appending `params` as an encoded query string.
///
/// A leading `/` on `path` is dropped; a `/` is inserted when `prefix`
/// does not already end with one. Keys are emitted in sorted order.
pub fn build_app_url(prefix: &str, path: &str, params: &BTreeMap<String, String>) -> String {
    let path = path.trim_start_matches('/');

    let mut url = String::with_capacity(prefix.len() + path.len() + 1);
    url.push_str(prefix);
    if !path.is_empty() {
        if !prefix.ends_with('/') {
            url.push('/');
        }
        url.push_str(path);
    }

    if params.is_empty() {
        return url;
    }

    let query = params
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k, QUERY_COMPONENT),
                utf8_percent_encode(v, QUERY_COMPONENT)
            )
        })
        .collect::<Vec<_>>()
        .join("&");

    url.push(if url.contains('?') { '&' } else { '?' });
    url.push_str(&query);
    url
}
