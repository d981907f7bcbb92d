//! Exam seat allocation.
//!
//! Seats are handed out in counter order: each cohort's counter value
//! maps to a room (filled 1..=capacity before spilling into the next)
//! and a seat label within it. Special-talent rounds skip numbered
//! seating entirely and resolve to a fixed venue per category.

use rusqlite::Connection;

use crate::allocator::plan::AllocationPlan;
use crate::db::repository::counters;
use crate::db::DatabaseError;
use crate::models::{AdmissionRound, GradeLevel};

/// Outcome of a seat allocation. Callers render `Exhausted` however
/// their surface requires; the allocator never invents a venue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatAssignment {
    /// Numbered seat in a scheduled exam room.
    Assigned {
        building: String,
        room: String,
        seat: String,
    },
    /// Fixed talent venue; the exact spot is announced on site.
    ByAnnouncement {
        building: String,
        room: String,
        note: String,
    },
    /// No seat could be produced: rooms full, unknown talent category,
    /// or no seating rule for the cohort.
    Exhausted,
}

/// Allocate the next seat for an applicant.
///
/// Draws from the cohort's seating counter, so every call consumes one
/// position even if the caller later discards the result.
pub fn allocate_seat(
    conn: &Connection,
    plan: &AllocationPlan,
    grade: GradeLevel,
    round: AdmissionRound,
    talent_category: Option<&str>,
) -> Result<SeatAssignment, DatabaseError> {
    if round == AdmissionRound::SpecialTalent {
        return Ok(talent_assignment(plan, talent_category));
    }

    let Some(rule) = plan.seating_rule(grade, round) else {
        tracing::warn!(
            grade = grade.as_str(),
            round = round.as_str(),
            "No seating rule for cohort"
        );
        return Ok(SeatAssignment::Exhausted);
    };

    let count = counters::allocate(conn, &rule.counter)?;
    let capacity = i64::from(plan.room_capacity);
    let position = count - 1;
    let room_index = position / capacity;

    let Some(room) = rule.rooms.get(room_index as usize) else {
        tracing::warn!(cohort = %rule.cohort, count, "Seating rooms exhausted");
        return Ok(SeatAssignment::Exhausted);
    };

    let seat_number = position % capacity + 1;
    Ok(SeatAssignment::Assigned {
        building: room.building.clone(),
        room: room.room.clone(),
        seat: format!("A-{seat_number:02}"),
    })
}

fn talent_assignment(plan: &AllocationPlan, category: Option<&str>) -> SeatAssignment {
    let venue = category.and_then(|c| plan.talent_venue(c));
    match venue {
        Some(venue) => SeatAssignment::ByAnnouncement {
            building: venue.building.clone(),
            room: venue.room.clone(),
            note: plan.talent_seat_note.clone(),
        },
        None => {
            tracing::warn!(category = category.unwrap_or("-"), "Unknown talent category");
            SeatAssignment::Exhausted
        }
    }
}
