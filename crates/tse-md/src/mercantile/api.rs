//! Raw request/response layer for the long-polling hub.
//!
//! # Endpoints (relative to the configured base URL)
//!
//! | Step      | Method | Action      | Extra params                         |
//! |-----------|--------|-------------|--------------------------------------|
//! | negotiate | GET    | `negotiate` | `_` cache-buster                     |
//! | connect   | POST   | `connect`   | `transport`, `connectionToken`       |
//! | start     | POST   | `start`     | `transport`, `connectionToken`, `_`  |
//! | poll      | POST   | `poll`      | `transport`, `connectionToken`; body `messageId=<cursor>` |
//!
//! Every call carries `clientProtocol=2.1` and
//! `connectionData=[{"name":"marketshub"}]`.

use std::time::Duration;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;
use tse_core::{Result, time_util};

use super::router::MarketRecord;
use super::token::Token;
use crate::transport::{HttpRequest, HttpTransport};

pub const CLIENT_PROTOCOL: &str = "2.1";
pub const CONNECTION_DATA: &str = r#"[{"name":"marketshub"}]"#;
pub const TRANSPORT: &str = "longPolling";

/// Reply to `negotiate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NegotiateResponse {
    #[serde(default)]
    pub url: Option<String>,
    /// Kept raw so it can be validated as a [`Token`] by the caller.
    #[serde(default)]
    pub connection_token: Value,
    #[serde(default)]
    pub connection_id: Option<String>,
    #[serde(default)]
    pub keep_alive_timeout: Option<f64>,
    #[serde(default)]
    pub disconnect_timeout: Option<f64>,
    #[serde(default)]
    pub connection_timeout: Option<f64>,
    #[serde(default)]
    pub try_web_sockets: Option<bool>,
    #[serde(default)]
    pub protocol_version: Option<String>,
    #[serde(default)]
    pub transport_connect_timeout: Option<f64>,
    #[serde(default)]
    pub long_poll_delay: Option<f64>,
}

/// Reply to `connect`: the initial cursor and (usually empty) messages.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectResponse {
    #[serde(rename = "C", default)]
    pub cursor: Value,
    #[serde(rename = "S", default)]
    pub status: Option<i64>,
    #[serde(rename = "M", default, deserialize_with = "null_as_empty")]
    pub messages: Vec<Value>,
}

/// Reply to `start`.
#[derive(Debug, Clone, Deserialize)]
pub struct StartResponse {
    #[serde(rename = "Response", default)]
    pub response: Option<String>,
}

/// Reply to `poll`: the next cursor plus a batch of market updates.
#[derive(Debug, Clone, Deserialize)]
pub struct PollResponse {
    #[serde(rename = "C", default)]
    pub cursor: Value,
    #[serde(rename = "M", default, deserialize_with = "null_as_empty")]
    pub messages: Vec<MarketRecord>,
}

fn null_as_empty<'de, D, T>(de: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(de)?.unwrap_or_default())
}

/// Stateless client for the four hub actions.
pub struct MercantileApi<T> {
    transport: T,
    base_url: String,
}

impl<T: HttpTransport> MercantileApi<T> {
    /// `base_url` must end with the path separator; actions are appended verbatim.
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self { transport, base_url: base_url.into() }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn url(&self, action: &str) -> String {
        format!("{}{}", self.base_url, action)
    }

    fn general_params() -> Vec<(&'static str, String)> {
        vec![("clientProtocol", CLIENT_PROTOCOL.to_string()), ("connectionData", CONNECTION_DATA.to_string())]
    }

    fn channel_params(token: &Token) -> Vec<(&'static str, String)> {
        let mut params = Self::general_params();
        params.push(("transport", TRANSPORT.to_string()));
        params.push(("connectionToken", token.as_str().to_string()));
        params
    }

    pub async fn negotiate(&self) -> Result<NegotiateResponse> {
        let mut params = Self::general_params();
        params.push(("_", time_util::cache_buster()));
        let body = self.transport.send(HttpRequest::get(self.url("negotiate")).query(params)).await?;
        debug!("[mercantile] negotiate ok");
        Ok(serde_json::from_value(body)?)
    }

    pub async fn connect(&self, token: &Token) -> Result<ConnectResponse> {
        let params = Self::channel_params(token);
        let body = self.transport.send(HttpRequest::post(self.url("connect")).query(params)).await?;
        debug!("[mercantile] connect ok");
        Ok(serde_json::from_value(body)?)
    }

    pub async fn start(&self, token: &Token) -> Result<StartResponse> {
        let mut params = Self::channel_params(token);
        params.push(("_", time_util::cache_buster()));
        let body = self.transport.send(HttpRequest::post(self.url("start")).query(params)).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Long poll: blocks until the server has data or `timeout` elapses.
    pub async fn poll(&self, token: &Token, cursor: &Token, timeout: Duration) -> Result<PollResponse> {
        let request = HttpRequest::post(self.url("poll"))
            .query(Self::channel_params(token))
            .form_body(format!("messageId={}", cursor.as_str()))
            .timeout(timeout);
        let body = self.transport.send(request).await?;
        Ok(serde_json::from_value(body)?)
    }
}
