//! # tse-screen
//!
//! Read-only analytics over a normalized option snapshot.
//!
//! - [`screen`] — total trade value, open-interest movers, most traded
//! - [`chains`] — per-underlying option chains by expiry or strike

pub mod chains;
pub mod screen;

pub use chains::{DateChain, OptionChains, StrikeChain, UnderlyingAsset};
pub use screen::{OptionMarket, format_billion_toman};
