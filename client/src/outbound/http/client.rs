//! Shared reqwest client for the matching API.
//!
//! Owns transport concerns only: endpoint construction, bearer auth, timeout,
//! status mapping, and error-detail extraction. Port adapters translate the
//! resulting [`ApiError`] into their own error enums.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use zeroize::Zeroizing;

/// Bearer token for the matching API.
///
/// The value is wiped on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(Zeroizing<String>);

impl ApiToken {
    /// Wrap a raw token; blank input yields `None`.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = Zeroizing::new(raw.into());
        if raw.trim().is_empty() {
            return None;
        }
        Some(Self(raw))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(<redacted>)")
    }
}

/// Connection settings for the matching API.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub base_url: Url,
    pub token: Option<ApiToken>,
    pub timeout: Duration,
}

/// Failure category of one API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    Unauthorized,
    Forbidden,
    NotFound,
    Rejected,
    Timeout,
    Transport,
    Decode,
}

/// Transport-level failure with the remote detail text when available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Thin wrapper over `reqwest::Client` bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<ApiToken>,
}

impl ApiClient {
    /// Build a client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: HttpClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url,
            token: config.token,
        })
    }

    pub(super) async fn get_json<T: DeserializeOwned>(&self, path: &[&str]) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let body = self.send(self.client.get(url)).await?;
        decode(&body)
    }

    pub(super) async fn put_json<T: DeserializeOwned>(&self, path: &[&str]) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let body = self.send(self.client.put(url)).await?;
        decode(&body)
    }

    pub(super) async fn post_json<B, T>(&self, path: &[&str], payload: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let body = self.send(self.client.post(url).json(payload)).await?;
        decode(&body)
    }

    pub(super) async fn delete(&self, path: &[&str]) -> Result<(), ApiError> {
        let url = self.endpoint(path)?;
        self.send(self.client.delete(url)).await.map(|_| ())
    }

    fn endpoint(&self, path: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ApiError::new(
                    ApiErrorKind::Transport,
                    format!("base url {} cannot carry a path", self.base_url),
                )
            })?
            .pop_if_empty()
            .extend(path);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let request = request.header(reqwest::header::ACCEPT, "application/json");
        let request = match &self.token {
            Some(token) => request.bearer_auth(token.expose()),
            None => request,
        };
        let response = request.send().await.map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|error| {
        ApiError::new(
            ApiErrorKind::Decode,
            format!("invalid JSON payload: {error}; body: {}", body_preview(body)),
        )
    })
}

fn map_transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::new(ApiErrorKind::Timeout, error.to_string())
    } else {
        ApiError::new(ApiErrorKind::Transport, error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ApiError {
    let detail = error_detail(body).unwrap_or_else(|| body_preview(body));
    let message = if detail.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {detail}", status.as_u16())
    };

    let kind = match status {
        StatusCode::UNAUTHORIZED => ApiErrorKind::Unauthorized,
        StatusCode::FORBIDDEN => ApiErrorKind::Forbidden,
        StatusCode::NOT_FOUND => ApiErrorKind::NotFound,
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            ApiErrorKind::Rejected
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ApiErrorKind::Timeout,
        _ => ApiErrorKind::Transport,
    };
    ApiError::new(kind, message)
}

/// Pull the human-readable reason out of an error body.
///
/// Understands `{"detail": "..."}`, `{"detail": [{"msg": "..."}]}`, and
/// `{"error": "..."}`.
fn error_detail(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get("detail") {
        Some(Value::String(detail)) => return Some(detail.clone()),
        Some(Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if !messages.is_empty() {
                return Some(messages.join("; "));
            }
        }
        _ => {}
    }
    value
        .get("error")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network mapping helpers.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::unauthorized(StatusCode::UNAUTHORIZED, ApiErrorKind::Unauthorized)]
    #[case::forbidden(StatusCode::FORBIDDEN, ApiErrorKind::Forbidden)]
    #[case::not_found(StatusCode::NOT_FOUND, ApiErrorKind::NotFound)]
    #[case::bad_request(StatusCode::BAD_REQUEST, ApiErrorKind::Rejected)]
    #[case::conflict(StatusCode::CONFLICT, ApiErrorKind::Rejected)]
    #[case::unprocessable(StatusCode::UNPROCESSABLE_ENTITY, ApiErrorKind::Rejected)]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, ApiErrorKind::Timeout)]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, ApiErrorKind::Transport)]
    fn maps_statuses_to_error_kinds(#[case] status: StatusCode, #[case] expected: ApiErrorKind) {
        let error = map_status_error(status, b"{\"detail\":\"nope\"}");
        assert_eq!(error.kind, expected);
        assert_eq!(error.message, format!("status {}: nope", status.as_u16()));
    }

    #[rstest]
    #[case(r#"{"detail":"You already have a pending request"}"#, Some("You already have a pending request"))]
    #[case(r#"{"detail":[{"msg":"field required"},{"msg":"too short"}]}"#, Some("field required; too short"))]
    #[case(r#"{"error":"Validation failed","details":{}}"#, Some("Validation failed"))]
    #[case(r#"{"unexpected":true}"#, None)]
    #[case("<html>bad gateway</html>", None)]
    fn extracts_error_detail(#[case] body: &str, #[case] expected: Option<&str>) {
        assert_eq!(error_detail(body.as_bytes()).as_deref(), expected);
    }

    #[rstest]
    fn falls_back_to_compact_body_preview() {
        let error = map_status_error(StatusCode::BAD_GATEWAY, b"<html>\n  bad   gateway\n</html>");
        assert_eq!(error.message, "status 502: <html> bad gateway </html>");
    }

    #[rstest]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(400);
        let preview = body_preview(body.as_bytes());
        assert_eq!(preview.chars().count(), 163);
        assert!(preview.ends_with("..."));
    }

    #[rstest]
    #[case("http://localhost:8080/api", "http://localhost:8080/api/match-requests/incoming")]
    #[case("http://localhost:8080/api/", "http://localhost:8080/api/match-requests/incoming")]
    #[case("https://match.example.com", "https://match.example.com/match-requests/incoming")]
    fn endpoints_extend_the_base_path(#[case] base: &str, #[case] expected: &str) {
        let client = ApiClient::new(HttpClientConfig {
            base_url: Url::parse(base).expect("base url"),
            token: None,
            timeout: Duration::from_secs(5),
        })
        .expect("client");

        let url = client
            .endpoint(&["match-requests", "incoming"])
            .expect("endpoint");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    fn token_debug_is_redacted() {
        let token = ApiToken::new("s3cr3t").expect("token");
        assert_eq!(format!("{token:?}"), "ApiToken(<redacted>)");
        assert_eq!(token.expose(), "s3cr3t");
        assert!(ApiToken::new("   ").is_none());
    }
}
