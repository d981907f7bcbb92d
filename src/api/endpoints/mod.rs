//! API endpoint handlers.

pub mod admin;
pub mod applications;
pub mod auth;
pub mod health;
pub mod lookup;
pub mod results;
pub mod statistics;
