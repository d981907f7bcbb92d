//! Sequential allocation of application IDs, exam IDs, and seats.
//!
//! All three draw from named counters persisted in the database, so
//! allocations survive restarts and stay strictly increasing under
//! concurrent submissions. The mapping from applicant category to
//! prefix, counter, and rooms is data, not code (see [`plan`]).

pub mod ids;
pub mod plan;
pub mod seats;

pub use ids::{next_application_id, next_exam_id};
pub use plan::{AllocationPlan, PlanError};
pub use seats::{allocate_seat, SeatAssignment};
