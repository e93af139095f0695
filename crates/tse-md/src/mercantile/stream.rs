//! Handshake orchestration and the poll loop.
//!
//! One [`MercantileStream`] owns one [`Session`]. Polls take `&mut self`, so a
//! single owner can never have two polls in flight. To share a stream between
//! tasks, wrap it with [`MercantileStream::into_shared`]; the async mutex then
//! serializes the token/cursor read-modify-write.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use tse_core::{Result, TseError};

use super::api::MercantileApi;
use super::router::{MarketRecord, MercantileData};
use super::token::{Session, Token};
use crate::transport::HttpTransport;

/// Literal the `start` action must answer with.
pub const STARTED: &str = "started";

pub type SharedStream<T> = Arc<Mutex<MercantileStream<T>>>;

pub struct MercantileStream<T> {
    api: MercantileApi<T>,
    session: Session,
}

impl<T: HttpTransport> MercantileStream<T> {
    pub fn new(api: MercantileApi<T>) -> Self {
        Self { api, session: Session::new() }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_shared(self) -> SharedStream<T> {
        Arc::new(Mutex::new(self))
    }

    /// Drop the current session; the next [`next_batch`](Self::next_batch) re-handshakes.
    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// negotiate → connect → start. Tokens are installed only if all three succeed.
    pub async fn handshake(&mut self) -> Result<()> {
        self.session.reset();

        let negotiated = self.api.negotiate().await?;
        let token = Token::from_json("ConnectionToken", &negotiated.connection_token)?;

        let connected = self.api.connect(&token).await?;
        let cursor = Token::from_json("C", &connected.cursor)?;

        let started = self.api.start(&token).await?;
        if started.response.as_deref() != Some(STARTED) {
            warn!("[mercantile] start rejected: {:?}", started.response);
            return Err(TseError::HandshakeFailed(format!(
                "start returned {:?}, expected {STARTED:?}",
                started.response
            )));
        }

        info!(
            "[mercantile] session started (protocol={}, connection_id={})",
            negotiated.protocol_version.as_deref().unwrap_or("?"),
            negotiated.connection_id.as_deref().unwrap_or("?"),
        );
        self.session.establish(token, cursor);
        Ok(())
    }

    /// Fetch the next batch, handshaking first if the session is empty.
    ///
    /// On success the server's cursor replaces the current one even when the
    /// batch is empty. On failure the session is left as it was.
    pub async fn next_batch(&mut self, timeout: Duration) -> Result<Vec<MarketRecord>> {
        if !self.session.is_established() {
            self.handshake().await?;
        }
        let (token, cursor) = match (self.session.connection_token(), self.session.message_cursor()) {
            (Some(t), Some(c)) => (t.clone(), c.clone()),
            _ => return Err(TseError::HandshakeFailed("session not established".into())),
        };

        let polled = self.api.poll(&token, &cursor, timeout).await?;
        let next = Token::from_json("C", &polled.cursor)?;
        self.session.advance(next)?;

        debug!("[mercantile] poll ok: {} record(s)", polled.messages.len());
        Ok(polled.messages)
    }

    /// Poll once and replace `data`'s batch with the result.
    pub async fn refresh(&mut self, data: &mut MercantileData, timeout: Duration) -> Result<()> {
        let batch = self.next_batch(timeout).await?;
        data.update(batch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::mercantile::router::MarketName;
    use crate::transport::fake::FakeTransport;

    fn stream() -> MercantileStream<Arc<FakeTransport>> {
        let fake = Arc::new(FakeTransport::new());
        MercantileStream::new(MercantileApi::new(fake, "https://hub.test/"))
    }

    fn fake(s: &MercantileStream<Arc<FakeTransport>>) -> Arc<FakeTransport> {
        s.api.transport().clone()
    }

    fn script_handshake(f: &FakeTransport, start: &str) {
        f.push_ok(json!({"ConnectionToken": "conn-token", "ConnectionId": "id-1", "ProtocolVersion": "1.5"}))
            .push_ok(json!({"C": "cursor-0", "S": 1, "M": []}))
            .push_ok(json!({"Response": start}));
    }

    #[tokio::test]
    async fn pending_start_fails_without_tokens() {
        let mut s = stream();
        script_handshake(&fake(&s), "pending");

        let err = s.handshake().await.unwrap_err();
        assert!(matches!(err, TseError::HandshakeFailed(_)));
        assert!(s.session().message_cursor().is_none());
        assert!(s.session().connection_token().is_none());
    }

    #[tokio::test]
    async fn invalid_negotiate_token_aborts() {
        let mut s = stream();
        fake(&s).push_ok(json!({"ConnectionToken": "x"}));
        assert!(matches!(s.handshake().await, Err(TseError::InvalidToken(_))));
        assert_eq!(fake(&s).requests().len(), 1);
        assert!(!s.session().is_established());
    }

    #[tokio::test]
    async fn first_batch_handshakes_then_polls_with_new_cursor() {
        let mut s = stream();
        let f = fake(&s);
        script_handshake(&f, STARTED);
        f.push_ok(json!({"C": "cursor-1", "M": [{"H": "marketsHub", "M": "updateAllMarketData", "A": [{"id": 1}]}]}))
            .push_ok(json!({"C": "cursor-2", "M": []}));

        let batch = s.next_batch(Duration::from_secs(5)).await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(s.session().message_cursor().unwrap().as_str(), "cursor-1");

        let batch = s.next_batch(Duration::from_secs(5)).await.unwrap();
        assert!(batch.is_empty());
        assert_eq!(s.session().message_cursor().unwrap().as_str(), "cursor-2");

        let requests = f.requests();
        assert_eq!(requests.len(), 5);
        assert_eq!(requests[3].form_body.as_deref(), Some("messageId=cursor-0"));
        assert_eq!(requests[4].form_body.as_deref(), Some("messageId=cursor-1"));
        assert_eq!(requests[4].query_param("connectionToken"), Some("conn-token"));
    }

    #[tokio::test]
    async fn failed_poll_keeps_cursor() {
        let mut s = stream();
        let f = fake(&s);
        script_handshake(&f, STARTED);
        f.push_err(TseError::Transport("HTTP 502".into()))
            .push_ok(json!({"C": "cursor-1", "M": []}));

        assert!(matches!(s.next_batch(Duration::from_secs(1)).await, Err(TseError::Transport(_))));
        assert_eq!(s.session().message_cursor().unwrap().as_str(), "cursor-0");

        s.next_batch(Duration::from_secs(1)).await.unwrap();
        let requests = f.requests();
        // no second handshake, retried with the same cursor
        assert_eq!(requests.len(), 5);
        assert_eq!(requests[4].form_body.as_deref(), Some("messageId=cursor-0"));
    }

    #[tokio::test]
    async fn refresh_feeds_router() {
        let mut s = stream();
        let f = fake(&s);
        script_handshake(&f, STARTED);
        f.push_ok(json!({"C": "cursor-1", "M": [{"H": "marketsHub", "M": "updateFutureDateTime", "A": [null]}]}));

        let mut data = MercantileData::new();
        s.refresh(&mut data, Duration::from_secs(1)).await.unwrap();
        assert_eq!(data.extract(MarketName::FutureDateTime).unwrap(), &serde_json::Value::Null);
    }

    #[tokio::test]
    async fn shared_stream_serializes_polls() {
        let s = stream();
        let f = fake(&s);
        script_handshake(&f, STARTED);
        f.push_ok(json!({"C": "cursor-1", "M": []})).push_ok(json!({"C": "cursor-2", "M": []}));

        let shared = s.into_shared();
        let a = tokio::spawn({
            let shared = shared.clone();
            async move { shared.lock().await.next_batch(Duration::from_secs(1)).await }
        });
        let b = tokio::spawn({
            let shared = shared.clone();
            async move { shared.lock().await.next_batch(Duration::from_secs(1)).await }
        });
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        let bodies: Vec<_> = f.requests().iter().filter_map(|r| r.form_body.clone()).collect();
        assert_eq!(bodies, ["messageId=cursor-0", "messageId=cursor-1"]);
        assert_eq!(shared.lock().await.session().message_cursor().unwrap().as_str(), "cursor-2");
    }
}
