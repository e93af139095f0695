//! Tadbir quote handlers: bulk last prices and single-symbol detail.
//!
//! Both handlers take a JSON object as the raw query string, already
//! percent-escaped in the exact form the server expects:
//!
//! ```text
//! StockInformationHandler?%7B%22Type%22:%22getstockprice2%22,%22la%22:%22Fa%22,%22arr%22:%22<codes>%22%7D
//! StockFutureInfoHandler?%7B%22Type%22:%22getLightSymbolInfoAndQueue%22,%22la%22:%22Fa%22,%22nscCode%22:%22<code>%22%7D
//! ```

use serde_json::{Map, Value};
use tracing::{debug, info};
use tse_core::config::TadbirConfig;
use tse_core::{Frame, Result, TseError};

use super::schema::{BULK_DATA_COLUMN_NAMES, OrderBookLevel, SYMBOL_INFO_COLUMN_NAMES, SymbolDetail};
use crate::transport::{HttpRequest, HttpTransport};

const BULK_TYPE: &str = "getstockprice2";
const DETAIL_TYPE: &str = "getLightSymbolInfoAndQueue";
const LANGUAGE: &str = "Fa";

pub struct TadbirClient<T> {
    transport: T,
    config: TadbirConfig,
}

impl<T: HttpTransport> TadbirClient<T> {
    pub fn new(transport: T, config: TadbirConfig) -> Self {
        Self { transport, config }
    }

    pub fn bulk_data_url<S: AsRef<str>>(&self, codes: &[S]) -> String {
        let arr = codes
            .iter()
            .map(|c| urlencoding::encode(c.as_ref()).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{}StockInformationHandler?%7B%22Type%22:%22{BULK_TYPE}%22,%22la%22:%22{LANGUAGE}%22,%22arr%22:%22{arr}%22%7D",
            self.config.base_url
        )
    }

    pub fn detail_data_url(&self, code: &str) -> String {
        format!(
            "{}StockFutureInfoHandler?%7B%22Type%22:%22{DETAIL_TYPE}%22,%22la%22:%22{LANGUAGE}%22,%22nscCode%22:%22{}%22%7D",
            self.config.base_url,
            urlencoding::encode(code)
        )
    }

    /// Raw bulk rows, requested in batches of at most `batch_size` codes and
    /// concatenated in request order.
    ///
    /// An empty code list returns an empty result without touching the network.
    pub async fn fetch_bulk_raw<S: AsRef<str> + Sync>(&self, codes: &[S]) -> Result<Vec<Value>> {
        if self.config.batch_size == 0 {
            return Err(TseError::InvalidParameter("tadbir batch_size must be positive".into()));
        }
        let mut rows = Vec::with_capacity(codes.len());
        for (i, batch) in codes.chunks(self.config.batch_size).enumerate() {
            let body = self.transport.send(HttpRequest::get(self.bulk_data_url(batch))).await?;
            let Value::Array(part) = body else {
                return Err(TseError::MalformedResponse(format!("bulk batch {i}: expected an array")));
            };
            debug!("[tadbir] bulk batch {i}: {} code(s) → {} row(s)", batch.len(), part.len());
            rows.extend(part);
        }
        Ok(rows)
    }

    /// Bulk quotes with readable column names.
    pub async fn bulk_quotes<S: AsRef<str> + Sync>(&self, codes: &[S]) -> Result<Frame> {
        let raw = self.fetch_bulk_raw(codes).await?;
        let mut frame = Frame::from_records(&raw)?;
        frame.rename(BULK_DATA_COLUMN_NAMES);
        info!("[tadbir] bulk quotes: {} row(s) for {} code(s)", frame.len(), codes.len());
        Ok(frame)
    }

    /// Symbol info and order queue for one instrument.
    pub async fn symbol_detail(&self, code: &str) -> Result<SymbolDetail> {
        let body = self.transport.send(HttpRequest::get(self.detail_data_url(code))).await?;

        let info = body
            .get("symbolinfo")
            .and_then(Value::as_object)
            .ok_or_else(|| TseError::MalformedResponse(format!("{code}: missing symbolinfo object")))?;
        let queue = body
            .get("symbolqueue")
            .and_then(|q| q.get("Value"))
            .and_then(Value::as_array)
            .ok_or_else(|| TseError::MalformedResponse(format!("{code}: missing symbolqueue.Value array")))?;

        let symbol_info: Map<String, Value> = info
            .iter()
            .map(|(k, v)| (rename_key(k), v.clone()))
            .collect();
        let order_book = queue
            .iter()
            .map(|level| {
                serde_json::from_value::<OrderBookLevel>(level.clone())
                    .map_err(|e| TseError::MalformedResponse(format!("{code}: symbolqueue level: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(SymbolDetail { symbol_info, order_book })
    }
}

fn rename_key(key: &str) -> String {
    SYMBOL_INFO_COLUMN_NAMES
        .iter()
        .find(|(from, _)| *from == key)
        .map_or_else(|| key.to_string(), |(_, to)| (*to).to_string())
}
