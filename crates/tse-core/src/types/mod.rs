//! Core domain types shared by the data sources and the screening views.

pub mod enums;
pub mod option;

pub use enums::*;
pub use option::*;
