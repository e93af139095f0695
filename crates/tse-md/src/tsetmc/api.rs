//! TSETMC option market watch client.

use rand::seq::SliceRandom;
use serde_json::Value;
use tracing::{debug, info};
use tse_core::config::TsetmcConfig;
use tse_core::{Frame, OptionContract, Result, TseError};

use super::schema::{MarketSegment, OPTION_RESHAPE_RULES};
use crate::reshape::split_call_put;
use crate::transport::{HttpRequest, HttpTransport};

const MARKET_WATCH_KEY: &str = "instrumentOptMarketWatch";

pub struct TsetmcClient<T> {
    transport: T,
    config: TsetmcConfig,
}

impl<T: HttpTransport> TsetmcClient<T> {
    pub fn new(transport: T, config: TsetmcConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &TsetmcConfig {
        &self.config
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// A random non-blank configured agent.
    fn user_agent(&self) -> Option<&str> {
        let agents: Vec<&str> =
            self.config.user_agents.iter().map(String::as_str).filter(|a| !a.trim().is_empty()).collect();
        agents.choose(&mut rand::thread_rng()).copied()
    }

    /// GET with a random agent and the configured timeout.
    pub(crate) async fn get(&self, path: &str) -> Result<Value> {
        let mut request = HttpRequest::get(self.url(path)).timeout(self.config.request_timeout());
        if let Some(agent) = self.user_agent() {
            request = request.header("User-Agent", agent);
        }
        self.transport.send(request).await
    }

    /// Raw wide-form rows of one segment.
    pub async fn fetch_option_market_watch(&self, segment: MarketSegment) -> Result<Vec<Value>> {
        let body = self
            .get(&format!("Instrument/GetInstrumentOptionMarketWatch/{}", segment.id()))
            .await?;
        let rows = body
            .get(MARKET_WATCH_KEY)
            .and_then(Value::as_array)
            .ok_or_else(|| TseError::MalformedResponse(format!("{segment}: missing {MARKET_WATCH_KEY} array")))?;
        debug!("[tsetmc] {segment}: {} wide row(s)", rows.len());
        Ok(rows.clone())
    }

    /// Both segments, fetched concurrently; bourse rows first.
    pub async fn fetch_entire_market(&self) -> Result<Vec<Value>> {
        let (mut bourse, fara_bourse) = tokio::try_join!(
            self.fetch_option_market_watch(MarketSegment::Bourse),
            self.fetch_option_market_watch(MarketSegment::FaraBourse),
        )?;
        bourse.extend(fara_bourse);
        Ok(bourse)
    }

    /// Whole market in long form, one row per contract.
    pub async fn entire_market_frame(&self) -> Result<Frame> {
        let raw = self.fetch_entire_market().await?;
        let long = clean_market_watch(&raw)?;
        info!("[tsetmc] option snapshot: {} wide → {} contract row(s)", raw.len(), long.len());
        Ok(long)
    }

    /// Whole market as typed contracts.
    pub async fn options_snapshot(&self) -> Result<Vec<OptionContract>> {
        self.entire_market_frame().await?.to_typed()
    }
}

/// Reshape raw market-watch rows into the renamed long table.
pub fn clean_market_watch(raw: &[Value]) -> Result<Frame> {
    let wide = Frame::from_records(raw)?;
    Ok(split_call_put(&wide, &OPTION_RESHAPE_RULES))
}
