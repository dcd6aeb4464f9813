//! Pagination `Link` header parsing.
//!
//! GitHub advertises pagination as an RFC-5988-style header:
//!
//! ```text
//! Link: <https://api.github.com/user/issues?page=2>; rel="next",
//!       <https://api.github.com/user/issues?page=5>; rel="last"
//! ```
//!
//! [`parse_link`] decodes it into a map from relation name (`next`, `prev`,
//! `first`, `last`) to the target path and its query parameters. A segment
//! that does not match the documented form is a protocol error, not
//! something to skip over: it means the API contract changed.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

/// Request query parameters.
pub type Params = BTreeMap<String, String>;

/// One relation from a `Link` header: the target path (host stripped) and
/// its query parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkEntry {
    pub uri: String,
    pub params: Params,
}

/// Parse a `Link` header value into a map of relation name to [`LinkEntry`].
pub fn parse_link(header_value: &str) -> Result<HashMap<String, LinkEntry>> {
    let mut links = HashMap::new();

    for segment in header_value.split(',') {
        let mut parts = segment.split(';');

        let target = parts.next().unwrap_or("").trim();
        let target = target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .ok_or_else(|| Error::Protocol(format!("failed to match link uri: {segment}")))?;
        let url = Url::parse(target)
            .map_err(|_| Error::Protocol(format!("failed to match link uri: {segment}")))?;

        let rel = parts
            .map(str::trim)
            .find_map(|attr| attr.strip_prefix("rel=\"")?.strip_suffix('"'))
            .ok_or_else(|| Error::Protocol(format!("failed to match link rel: {segment}")))?;

        let params: Params = url
            .query_pairs()
            .map(|(key, val)| (key.into_owned(), val.into_owned()))
            .collect();

        debug!(rel, page = params.get("page").map(String::as_str), "parsed link relation");

        links.insert(
            rel.to_string(),
            LinkEntry {
                uri: url.path().to_string(),
                params,
            },
        );
    }

    Ok(links)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_next_and_last() {
        let header = "<https://api.github.com/user/issues?page=2>; rel=\"next\", \
                      <https://api.github.com/user/issues?page=5>; rel=\"last\"";
        let links = parse_link(header).unwrap();

        assert_eq!(links.len(), 2);

        let next = &links["next"];
        assert_eq!(next.uri, "/user/issues");
        assert_eq!(next.params.get("page").map(String::as_str), Some("2"));

        let last = &links["last"];
        assert_eq!(last.uri, "/user/issues");
        assert_eq!(last.params.get("page").map(String::as_str), Some("5"));
    }

    #[test]
    fn test_parse_multiple_query_params() {
        let header =
            "<https://api.github.com/repos/o/r/issues?state=open&page=3&per_page=100>; rel=\"next\"";
        let links = parse_link(header).unwrap();

        let next = &links["next"];
        assert_eq!(next.uri, "/repos/o/r/issues");
        assert_eq!(next.params.get("state").map(String::as_str), Some("open"));
        assert_eq!(next.params.get("page").map(String::as_str), Some("3"));
        assert_eq!(next.params.get("per_page").map(String::as_str), Some("100"));
    }

    #[test]
    fn test_missing_page_param_is_fine() {
        let header = "<https://api.github.com/user/issues?since=2026-01-01>; rel=\"next\"";
        let links = parse_link(header).unwrap();
        assert!(links["next"].params.get("page").is_none());
    }

    #[test]
    fn test_missing_rel_is_protocol_error() {
        let header = "<https://api.github.com/user/issues?page=2>";
        let err = parse_link(header).unwrap_err();
        assert!(matches!(err, Error::Protocol(msg) if msg.contains("rel")));
    }

    #[test]
    fn test_malformed_uri_is_protocol_error() {
        let header = "https://api.github.com/user/issues?page=2; rel=\"next\"";
        let err = parse_link(header).unwrap_err();
        assert!(matches!(err, Error::Protocol(msg) if msg.contains("uri")));

        let header = "<not a url>; rel=\"next\"";
        let err = parse_link(header).unwrap_err();
        assert!(matches!(err, Error::Protocol(msg) if msg.contains("uri")));
    }
}
