//! Response parsing: content-type detection, body decoding, link decoding,
//! rate-limit logging, and typed failures.

use std::collections::HashMap;

use reqwest::header::{HeaderMap, CONTENT_TYPE, LINK};
use tracing::info;

use crate::element::{parse_element, Element};
use crate::error::{Error, Result};
use crate::link::{parse_link, LinkEntry};

/// The result of sending one request: the transport-level response data
/// plus the decoded body and pagination links.
#[derive(Debug)]
pub struct ParsedResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers, as received
    pub headers: HeaderMap,
    /// Raw response body
    pub body: String,
    /// Decoded JSON body; an empty object for bodyless (204) responses
    pub parsed: Element,
    /// Pagination relations from the `Link` header, empty when absent
    pub parsed_link: HashMap<String, LinkEntry>,
}

/// Header value as a string, `None` when absent or not valid UTF-8.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Content type with any charset suffix stripped.
fn content_type(headers: &HeaderMap) -> Option<&str> {
    let value = header_str(headers, CONTENT_TYPE.as_str())?;
    Some(value.split(';').next().unwrap_or(value).trim())
}

/// Parse a raw HTTP response into a [`ParsedResponse`].
///
/// Link decoding and rate-limit logging happen before the content-type and
/// status checks, so diagnostics are emitted even for calls that fail.
///
/// Fails with [`Error::Protocol`] on an unhandled content type (status 204
/// excepted: those responses legitimately carry no body) and with
/// [`Error::Api`] on a status outside {200, 201, 204}, carrying the parsed
/// error body.
pub async fn parse_response(response: reqwest::Response) -> Result<ParsedResponse> {
    let status = response.status().as_u16();
    let headers = response.headers().clone();
    let ctype = content_type(&headers).map(str::to_owned);

    let parsed_link = match header_str(&headers, LINK.as_str()) {
        Some(value) => parse_link(value)?,
        None => HashMap::new(),
    };

    info!(
        status,
        ratelimit_limit = header_str(&headers, "x-ratelimit-limit"),
        ratelimit_remaining = header_str(&headers, "x-ratelimit-remaining"),
        "api response"
    );

    let body = response.text().await?;

    let parsed = if status == 204 {
        // No Content: nothing to decode, whatever the declared type
        Element::empty()
    } else if ctype.as_deref() == Some("application/json") {
        parse_element(serde_json::from_str(&body)?)
    } else {
        return Err(Error::Protocol(format!(
            "unhandled content type: {}",
            ctype.as_deref().unwrap_or("none")
        )));
    };

    if !matches!(status, 200 | 201 | 204) {
        return Err(Error::Api {
            status,
            payload: parsed,
        });
    }

    Ok(ParsedResponse {
        status,
        headers,
        body,
        parsed,
        parsed_link,
    })
}

// =============================================================================
// Tests
// =============================================================================
