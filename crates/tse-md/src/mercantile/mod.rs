//! Mercantile exchange real-time hub.
//!
//! A long-polling session: `negotiate` hands out a connection token,
//! `connect` the first message cursor, `start` activates the channel, and
//! every `poll` returns a batch of tagged market records plus the next cursor.
//!
//! - [`api`] — the four raw HTTP actions
//! - [`token`] — validated tokens and the session they form
//! - [`stream`] — handshake state machine and poll loop
//! - [`router`] — per-market extraction from a batch
//! - [`schema`] — typed sub-market rows

pub mod api;
pub mod router;
pub mod schema;
pub mod stream;
pub mod token;

pub use api::MercantileApi;
pub use router::{MarketName, MarketRecord, MercantileData, extract};
pub use stream::{MercantileStream, SharedStream};
pub use token::{Session, Token};

use crate::transport::HttpTransport;

/// Build a stream over `transport` rooted at `base_url`.
pub fn connect_stream<T: HttpTransport>(transport: T, base_url: impl Into<String>) -> MercantileStream<T> {
    MercantileStream::new(MercantileApi::new(transport, base_url))
}
