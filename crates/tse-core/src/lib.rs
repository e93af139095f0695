//! # tse-core
//!
//! Core crate for the TSE option data system, providing:
//!
//! - **Types** (`types`) — option-type enums and the normalized option contract
//! - **Frame** (`frame`) — ordered-column table over heterogeneous JSON rows
//! - **Configuration** (`config`) — JSON config deserialization with defaults
//! - **Error types** (`error`) — domain-specific `TseError` via thiserror
//! - **Calendar** (`calendar`) — Jalali ↔ Gregorian conversion, trading days
//! - **Time utilities** (`time_util`) — epoch timestamps, cache-busters
//! - **Logging** (`logging`) — tracing-based structured logging

pub mod calendar;
pub mod config;
pub mod error;
pub mod frame;
pub mod logging;
pub mod time_util;
pub mod types;

pub use error::{Result, TseError};
pub use frame::Frame;
pub use types::*;
