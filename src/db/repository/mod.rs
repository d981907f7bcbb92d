//! Data access layer.
//!
//! Free functions over a `&Connection`, one module per aggregate.
//! Connections come from `db::sqlite`; callers own transaction scope.

pub mod applications;
pub mod counters;

pub use applications::*;
pub use counters::*;
