//! TUNS admission service.
//!
//! Online registration for the school's M1/M4 admission rounds.
//! Applicants submit a form and immediately receive an application
//! number, an exam ID, and an exam seat; the same record later
//! answers exam-card lookups and result checks. Staff review the
//! registry behind a passphrase login.

pub mod allocator;
pub mod announcements;
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod models;
pub mod registry;
pub mod state;
pub mod statistics;

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the default filter from
/// `config` applies.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
