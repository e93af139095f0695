//! HTTP transport seam shared by every data source.
//!
//! Clients never talk to `reqwest` directly: they describe the call as an
//! [`HttpRequest`] and hand it to an [`HttpTransport`]. Production code uses
//! [`ReqwestTransport`]; tests plug in a scripted fake so the session state
//! machine and the parsers run without network access.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use tse_core::{Result, TseError};

/// HTTP verb used by the public feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A single outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    /// Absolute URL. May already carry a hand-built query string.
    pub url: String,
    /// Query pairs appended (URL-encoded) in this order.
    pub query: Vec<(String, String)>,
    /// Raw `application/x-www-form-urlencoded` body.
    pub form_body: Option<String>,
    pub headers: Vec<(String, String)>,
    /// Per-request timeout. Long polls pass the server hold time here.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            form_body: None,
            headers: Vec::new(),
            timeout: None,
        }
    }

    pub fn query<K: Into<String>, V: Into<String>>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        self.query.extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn form_body(mut self, body: impl Into<String>) -> Self {
        self.form_body = Some(body.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Value of a query parameter, if present.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

/// Sends a request and returns the decoded JSON body.
///
/// Implementations must map non-2xx statuses, connection failures and bodies
/// that are not JSON to [`TseError::Transport`]. Shape checks on the decoded
/// value belong to the caller ([`TseError::MalformedResponse`]). No retries.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<serde_json::Value>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for std::sync::Arc<T> {
    async fn send(&self, request: HttpRequest) -> Result<serde_json::Value> {
        (**self).send(request).await
    }
}

/// Production transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self { http: reqwest::Client::new() }
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<serde_json::Value> {
        let HttpRequest { method, url, query, form_body, headers, timeout } = request;

        let mut builder = match method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
        };
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        for (k, v) in &headers {
            builder = builder.header(k.as_str(), v.as_str());
        }
        match (method, form_body) {
            (_, Some(body)) => {
                builder = builder
                    .header(reqwest::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(body);
            }
            // IIS-hosted hubs answer 411 to a POST without a length.
            (Method::Post, None) => builder = builder.header(reqwest::header::CONTENT_LENGTH, "0"),
            (Method::Get, None) => {}
        }
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }

        debug!("[http] {method:?} {url}");
        let resp = builder
            .send()
            .await
            .map_err(|e| TseError::Transport(format!("{method:?} {url}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TseError::Transport(format!("{method:?} {url}: HTTP {status}")));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| TseError::Transport(format!("{method:?} {url}: {e}")))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| TseError::Transport(format!("{method:?} {url}: invalid JSON body: {e}")))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_query_order() {
        let req = HttpRequest::post("https://x/poll")
            .query([("clientProtocol", "2.1"), ("transport", "longPolling")])
            .form_body("messageId=abc")
            .timeout(Duration::from_secs(20));
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.query[0].0, "clientProtocol");
        assert_eq!(req.query_param("transport"), Some("longPolling"));
        assert_eq!(req.form_body.as_deref(), Some("messageId=abc"));
        assert_eq!(req.timeout, Some(Duration::from_secs(20)));
    }

    #[tokio::test]
    async fn bodyless_post_declares_zero_length() {
        let (base, server) = fake::serve_once("application/json", r#"{"Response":"started"}"#).await;
        let req = HttpRequest::post(format!("{base}/start")).query([("transport", "longPolling")]);
        let body = fake::direct().send(req).await.unwrap();
        assert_eq!(body["Response"], "started");

        let head = server.await.unwrap();
        assert!(head.starts_with("post /start?transport=longpolling"), "{head}");
        assert!(head.contains("content-length: 0\r\n"), "{head}");
    }

    #[tokio::test]
    async fn form_post_carries_body_length() {
        let (base, server) = fake::serve_once("application/json", "{}").await;
        let req = HttpRequest::post(format!("{base}/poll")).form_body("messageId=c-1");
        fake::direct().send(req).await.unwrap();

        let head = server.await.unwrap();
        assert!(head.contains("content-length: 12\r\n"), "{head}");
        assert!(head.contains("content-type: application/x-www-form-urlencoded"), "{head}");
    }

    #[tokio::test]
    async fn non_json_body_is_transport_error() {
        let (base, server) = fake::serve_once("text/html", "<html>maintenance</html>").await;
        let err = fake::direct().send(HttpRequest::get(format!("{base}/negotiate"))).await.unwrap_err();
        assert!(matches!(err, TseError::Transport(_)), "{err:?}");
        server.await.unwrap();
    }
}
