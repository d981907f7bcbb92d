//! API middleware stack.
//!
//! Two layers: `admin` guards the staff routes with a session token
//! check, `request_log` runs innermost and logs every request with
//! its response status.

pub mod admin;
pub mod request_log;
