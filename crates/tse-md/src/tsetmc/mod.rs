//! TSETMC public API: option market watch and historical order book.

pub mod api;
pub mod order_book;
pub mod schema;

pub use api::{TsetmcClient, clean_market_watch};
pub use order_book::{HistoricalLobRequest, LobLevel, take_lob_snapshot};
pub use schema::MarketSegment;
