//! Tadbir (core.tadbirrlc.com) quote source.

pub mod api;
pub mod schema;

pub use api::TadbirClient;
pub use schema::{OrderBookLevel, SymbolDetail};
