//! Shared reqwest client for the remote search backend.
//!
//! Owns transport details only: URL joining, timeout and HTTP error mapping,
//! and JSON decoding into an untyped body for shape recognition.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tracing::debug;

use crate::domain::ports::SearchSourceError;

/// Query parameters for one request.
pub type QueryParams = Vec<(&'static str, String)>;

/// Reqwest client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Build a backend client with an explicit request timeout.
    ///
    /// Relative endpoint paths are resolved beneath `base_url`, so
    /// `http://host/api` and `http://host/api/` behave the same.
    ///
    /// ```rust,ignore
    /// let backend = HttpBackend::new(base_url, Duration::from_secs(10))?;
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(mut base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// Base URL requests are resolved against.
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET` `path` with `query` and decode the JSON body.
    pub(super) async fn get_json(
        &self,
        path: &str,
        query: &QueryParams,
    ) -> Result<Value, SearchSourceError> {
        let url = self.base_url.join(path).map_err(|error| {
            SearchSourceError::transport(format!("invalid endpoint path `{path}`: {error}"))
        })?;
        debug!(%url, "requesting search backend");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        serde_json::from_slice(body.as_ref()).map_err(|error| {
            SearchSourceError::shape_mismatch(format!("invalid JSON payload: {error}"))
        })
    }
}

fn map_transport_error(error: reqwest::Error) -> SearchSourceError {
    if error.is_timeout() {
        SearchSourceError::timeout(error.to_string())
    } else {
        SearchSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> SearchSourceError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            SearchSourceError::timeout(message)
        }
        _ => SearchSourceError::transport(message),
    }
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
    //! Coverage for non-network mapping helpers.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, "timeout")]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, "timeout")]
    #[case::not_found(StatusCode::NOT_FOUND, "transport")]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, "transport")]
    fn maps_http_statuses_to_source_errors(#[case] status: StatusCode, #[case] expected: &str) {
        let error = map_status_error(status, b"{\"message\":\"backend unavailable\"}");
        assert_eq!(error.kind(), expected);
        assert!(error.to_string().contains("backend unavailable"));
    }

    #[test]
    fn status_without_body_reports_code_only() {
        let error = map_status_error(StatusCode::BAD_GATEWAY, b"  \n ");
        assert_eq!(error, SearchSourceError::transport("status 502"));
    }

    #[test]
    fn long_bodies_are_compacted_and_truncated() {
        let body = format!("error:\n\n{}", "x".repeat(400));
        let preview = body_preview(body.as_bytes());
        assert!(preview.starts_with("error: x"));
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 163);
    }

    #[rstest]
    #[case("http://localhost:5000/api")]
    #[case("http://localhost:5000/api/")]
    fn base_url_gains_trailing_slash(#[case] raw: &str) {
        let url = Url::parse(raw).expect("valid url");
        let backend = HttpBackend::new(url, Duration::from_secs(1)).expect("client builds");
        assert_eq!(
            backend.base_url().join("users/search").expect("joins").as_str(),
            "http://localhost:5000/api/users/search"
        );
    }
}
