//! HTTP layer for the admission service.
//!
//! Exposes registration, lookup, result, and staff endpoints under
//! `/api/`, and serves the built front end for every other path.
//! The router is composable; `admission_router()` can be mounted on
//! any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::admission_router;
pub use server::{start_server, AdmissionServer};
pub use types::ApiContext;
