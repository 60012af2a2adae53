// HTTP client construction and shared request helpers

use pfolio_core::domain::BearerToken;
use pfolio_core::error::{AppError, Result};
use pfolio_core::port::GatewayError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

/// Connect timeout shared by all adapters
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Create an HTTP client.
///
/// Per-request timeouts are set by each adapter; only the connect timeout
/// lives here.
pub fn create_client() -> Result<Client> {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .user_agent(concat!("pfolio/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AppError::Internal(format!("HTTP client creation failed: {}", e)))
}

/// `Authorization: Bearer`, `Accept` and `Content-Type` headers
pub fn auth_headers(token: &BearerToken) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let mut auth = HeaderValue::from_str(&token.header_value()).map_err(|_| {
        AppError::Validation("Bearer token contains invalid header characters".to_string())
    })?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

/// Parse and check a service base URL (http or https)
pub(crate) fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| AppError::Validation(format!("Invalid base URL '{}': {}", raw, e)))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(AppError::Validation(format!(
            "Base URL must be http(s): {}",
            raw
        )));
    }
    Ok(url)
}

/// Append path segments to a base URL (segments are percent-encoded)
pub(crate) fn join_segments(base: &Url, segments: &[&str]) -> std::result::Result<Url, GatewayError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| GatewayError::Network(format!("Cannot append path to {}", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Flatten an error and its sources into one line
pub(crate) fn describe(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

pub(crate) fn network_error(err: reqwest::Error) -> GatewayError {
    GatewayError::Network(describe(&err))
}

/// Read the whole body and parse it as JSON.
///
/// Non-success statuses with a JSON body are returned as the body; callers
/// decide what a missing field means. A non-JSON body keeps its raw text.
pub(crate) async fn read_json(response: Response) -> std::result::Result<Value, GatewayError> {
    read_json_with_status(response).await.map(|(_, body)| body)
}

/// Like [`read_json`], also returning the HTTP status code
pub(crate) async fn read_json_with_status(
    response: Response,
) -> std::result::Result<(u16, Value), GatewayError> {
    let status = response.status();
    let url = response.url().clone();
    let text = response.text().await.map_err(network_error)?;

    if !status.is_success() {
        warn!(status = status.as_u16(), url = %url, "Non-success response");
    }

    match serde_json::from_str(&text) {
        Ok(body) => Ok((status.as_u16(), body)),
        Err(_) => Err(GatewayError::MalformedResponse {
            status: status.as_u16(),
            body: text,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_headers() {
        let token = BearerToken::new("abc123").unwrap();
        let headers = auth_headers(&token).unwrap();

        assert_eq!(headers[AUTHORIZATION], "Bearer abc123");
        assert!(headers[AUTHORIZATION].is_sensitive());
        assert_eq!(headers[ACCEPT], "application/json");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_auth_headers_reject_newlines() {
        let token = BearerToken::new("abc\n123").unwrap();
        assert!(auth_headers(&token).is_err());
    }

    #[test]
    fn test_parse_base_url() {
        tokio_test::assert_ok!(parse_base_url("https://crew.example.com"));
        tokio_test::assert_err!(parse_base_url("ftp://crew.example.com"));
        tokio_test::assert_err!(parse_base_url("not a url"));
    }

    #[test]
    fn test_join_segments() {
        let base = parse_base_url("https://crew.example.com/").unwrap();
        let url = join_segments(&base, &["status", "job-42"]).unwrap();
        assert_eq!(url.as_str(), "https://crew.example.com/status/job-42");

        let base = parse_base_url("https://crew.example.com/api").unwrap();
        let url = join_segments(&base, &["status", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "https://crew.example.com/api/status/a%2Fb%20c");
    }

    #[test]
    fn test_describe_walks_sources() {
        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let outer = pfolio_core::AppError::Io(inner);
        assert_eq!(describe(&outer), "IO error: refused: refused");
    }
}
