//! Connection to the GitHub API.

use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use tracing::debug;

use crate::error::Result;
use crate::link::Params;
use crate::response::{parse_response, ParsedResponse};

/// Default GitHub API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.github.com";

/// User agent sent with every request.
const USER_AGENT: &str = concat!("hubwire/", env!("CARGO_PKG_VERSION"));

/// A connection to the API: fixed endpoint, fixed auth identity.
///
/// Immutable after construction, so one `Connection` can be shared across
/// any number of sequential calls. Anonymous when built without a token.
pub struct Connection {
    endpoint: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl Connection {
    /// Create a connection to the default endpoint (anonymous if no token).
    pub fn new(token: Option<&str>) -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT, token)
    }

    /// Create a connection to a custom endpoint (for testing with httpmock,
    /// or GitHub Enterprise).
    pub fn with_endpoint(endpoint: impl Into<String>, token: Option<&str>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            token: token.map(str::to_owned),
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// The base endpoint this connection targets.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a request for the given relative URI and parse the response.
    ///
    /// `uri` is relative to the endpoint (e.g. `/user/issues`). Transport
    /// failures propagate as [`crate::Error::Transport`]; protocol and API
    /// failures come from [`parse_response`].
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        params: Option<&Params>,
        body: Option<String>,
    ) -> Result<ParsedResponse> {
        let url = format!("{}{}", self.endpoint, uri);
        debug!(%method, %url, "sending request");

        let mut request = self.client.request(method, &url);

        if let Some(params) = params {
            if !params.is_empty() {
                request = request.query(params);
            }
        }

        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("token {token}"));
        }

        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        parse_response(response).await
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trailing_slash_is_trimmed() {
        let conn = Connection::with_endpoint("https://github.example.com/", None);
        assert_eq!(conn.endpoint(), "https://github.example.com");
    }

    // =========================================================================
    // Integration tests with httpmock
    // =========================================================================

    mod integration {
        use super::*;
        use crate::error::Error;
        use httpmock::prelude::*;

        #[tokio::test]
        async fn test_token_and_user_agent_headers() {
            let server = MockServer::start();
            let mock = server.mock(|when, then| {
                when.method(GET)
                    .path("/user")
                    .header("authorization", "token sekrit")
                    .header_exists("user-agent");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(serde_json::json!({"login": "alice"}));
            });

            let conn = Connection::with_endpoint(server.base_url(), Some("sekrit"));
            let response = conn.send(Method::GET, "/user", None, None).await.unwrap();

            mock.assert();
            assert_eq!(response.parsed["login"].as_str(), Some("alice"));
        }

        #[tokio::test]
        async fn test_anonymous_connection_sends_no_auth() {
            let server = MockServer::start();
            let mock = server.mock(|when, then| {
                when.method(GET).path("/rate_limit");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(serde_json::json!({"rate": {"limit": 60}}));
            });

            let conn = Connection::with_endpoint(server.base_url(), None);
            let response = conn
                .send(Method::GET, "/rate_limit", None, None)
                .await
                .unwrap();

            mock.assert();
            assert_eq!(response.parsed["rate"]["limit"].as_u64(), Some(60));
        }

        #[tokio::test]
        async fn test_params_are_sent_as_query() {
            let server = MockServer::start();
            let mock = server.mock(|when, then| {
                when.method(GET)
                    .path("/user/issues")
                    .query_param("state", "open")
                    .query_param("per_page", "10");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(serde_json::json!([]));
            });

            let mut params = Params::new();
            params.insert("state".to_string(), "open".to_string());
            params.insert("per_page".to_string(), "10".to_string());

            let conn = Connection::with_endpoint(server.base_url(), None);
            conn.send(Method::GET, "/user/issues", Some(&params), None)
                .await
                .unwrap();

            mock.assert();
        }

        #[tokio::test]
        async fn test_post_body_is_forwarded() {
            let server = MockServer::start();
            let mock = server.mock(|when, then| {
                when.method(POST)
                    .path("/gists")
                    .body(r#"{"description":"a gist"}"#);
                then.status(201)
                    .header("content-type", "application/json")
                    .json_body(serde_json::json!({"id": "abc123"}));
            });

            let conn = Connection::with_endpoint(server.base_url(), None);
            let response = conn
                .send(
                    Method::POST,
                    "/gists",
                    None,
                    Some(r#"{"description":"a gist"}"#.to_string()),
                )
                .await
                .unwrap();

            mock.assert();
            assert_eq!(response.status, 201);
            assert_eq!(response.parsed["id"].as_str(), Some("abc123"));
        }

        #[tokio::test]
        async fn test_api_error_surfaces() {
            let server = MockServer::start();
            server.mock(|when, then| {
                when.method(DELETE).path("/repos/o/r");
                then.status(403)
                    .header("content-type", "application/json")
                    .json_body(serde_json::json!({"message": "Must have admin rights"}));
            });

            let conn = Connection::with_endpoint(server.base_url(), Some("sekrit"));
            let err = conn
                .send(Method::DELETE, "/repos/o/r", None, None)
                .await
                .unwrap_err();

            match err {
                Error::Api { status, payload } => {
                    assert_eq!(status, 403);
                    assert_eq!(payload["message"].as_str(), Some("Must have admin rights"));
                }
                other => panic!("expected Api error, got {other:?}"),
            }
        }
    }
}
