use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::header::{self, HeaderMap, HeaderName};
use axum::http::Method;
use axum::response::Response;
use tracing::{debug, error};

use crate::errors::AppError;

/// Headers that describe a single connection and must not be forwarded.
static HOP_BY_HOP: [HeaderName; 9] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
    header::HOST,
    header::CONTENT_LENGTH,
];

/// Forwards `/api/*` calls to the external chat backend unchanged. Nothing
/// here interprets the payloads.
#[derive(Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Unexpected(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }

    pub fn url_for(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base_url, path_and_query)
    }

    pub async fn forward(
        &self,
        method: Method,
        path_and_query: &str,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let url = self.url_for(path_and_query);
        debug!("Forwarding {method} {url}");

        let upstream = self
            .client
            .request(method, &url)
            .headers(forwardable(headers))
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!("Upstream request to {url} failed: {e}");
                if e.is_connect() || e.is_timeout() {
                    AppError::UpstreamUnavailable { url: self.base_url.clone(), source: e }
                } else {
                    AppError::UpstreamFailed { message: format!("request to {url}"), source: e }
                }
            })?;

        let status = upstream.status();
        let headers = forwardable(upstream.headers());
        let bytes = upstream.bytes().await.map_err(|e| {
            error!("Failed to read upstream response from {url}: {e}");
            AppError::UpstreamFailed { message: format!("reading response from {url}"), source: e }
        })?;

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

pub fn forwardable(headers: &HeaderMap) -> HeaderMap {
    let mut out = headers.clone();
    for name in HOP_BY_HOP.iter() {
        out.remove(name);
    }
    out.remove("keep-alive");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn hop_by_hop_headers_are_dropped() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(header::HOST, HeaderValue::from_static("localhost:3000"));
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("12"));

        let out = forwardable(&headers);
        assert_eq!(out.len(), 1);
        assert_eq!(out.get(header::CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn url_joins_without_double_slash() {
        let client = UpstreamClient::new("http://localhost:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.url_for("/api/chat_history/3?limit=5"),
            "http://localhost:5000/api/chat_history/3?limit=5"
        );
    }

    #[tokio::test]
    async fn unreachable_backend_is_unavailable() {
        // Port 9 (discard) is closed on test machines.
        let client = UpstreamClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = client
            .forward(Method::GET, "/api/conversations", &HeaderMap::new(), Bytes::new())
            .await
            .unwrap_err();
        assert!(err.is_upstream());
    }
}
