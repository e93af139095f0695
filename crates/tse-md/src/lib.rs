//! # tse-md
//!
//! Market data sources for TSE options.
//!
//! ## Sources
//!
//! - [`mercantile`] — long-polling real-time hub (handshake, poll loop, router)
//! - [`tsetmc`] — option market watch snapshot and historical order book
//! - [`tadbir`] — bulk quotes and symbol detail
//!
//! ## Shared infrastructure
//!
//! - [`transport`] — `HttpTransport` seam; every client takes one by injection
//! - [`reshape`] — wide call/put table → one row per contract

pub mod mercantile;
pub mod reshape;
pub mod tadbir;
pub mod transport;
pub mod tsetmc;

pub use transport::{HttpRequest, HttpTransport, ReqwestTransport};
