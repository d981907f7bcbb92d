//! Admission registry: submission, edit, and lookup.
//!
//! Orchestrates the allocators and the data layer. A submission is
//! validated, then receives an application ID, an exam ID, and a seat
//! in that order; the rendered exam-card snapshot is stored alongside
//! the raw form data. Edits keep the original allocation and only
//! refresh the applicant-provided fields.

use chrono::Utc;
use rusqlite::Connection;
use thiserror::Error;

use crate::allocator::{self, AllocationPlan, SeatAssignment};
use crate::db::repository::applications;
use crate::db::DatabaseError;
use crate::models::{
    AdmissionRound, Application, ApplicationDraft, GradeLevel, SeatingSnapshot,
};

/// Shown to applicants when neither an application number nor a
/// national ID matches a stored record.
pub const LOOKUP_MISS_MESSAGE: &str =
    "ไม่พบข้อมูลผู้สมัคร กรุณาตรวจสอบเลขที่ใบสมัครหรือเลขบัตรประชาชน";

// ═══════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Invalid application: {0}")]
    Validation(String),

    #[error("Unknown application: {0}")]
    UnknownApplication(String),

    #[error("National ID already registered to application {0}")]
    NationalIdTaken(String),
}

// ═══════════════════════════════════════════════════════════
// Submission
// ═══════════════════════════════════════════════════════════

/// Register a new application.
///
/// Allocation happens after validation so rejected drafts never consume
/// counter values. If the national ID is already registered, the new
/// submission replaces the old record and receives a fresh allocation.
pub fn submit(
    conn: &Connection,
    plan: &AllocationPlan,
    draft: ApplicationDraft,
) -> Result<Application, RegistryError> {
    validate(&draft)?;

    if let Some(previous) =
        applications::get_application_by_national_id(conn, &draft.student.national_id)?
    {
        tracing::info!(
            previous = %previous.application_id,
            "Returning applicant, previous application will be replaced"
        );
    }

    let application_id = allocator::next_application_id(conn, plan)?;
    let exam_id = allocator::next_exam_id(
        conn,
        plan,
        draft.grade_level,
        draft.admission_round,
        draft.study_plan.as_deref(),
    )?;
    let assignment = allocator::allocate_seat(
        conn,
        plan,
        draft.grade_level,
        draft.admission_round,
        draft.special_talent_type.as_deref(),
    )?;

    let seating = seating_snapshot(plan, &draft, &application_id, exam_id, assignment);
    let application = Application {
        application_id: application_id.clone(),
        details: draft,
        seating,
        submitted_at: Utc::now(),
    };

    applications::upsert_application(conn, &application)?;
    tracing::info!(
        application_id = %application.application_id,
        exam_id = %application.seating.exam_id,
        "Application registered"
    );
    Ok(application)
}

/// Rewrite an existing application with corrected form data.
///
/// The application ID, exam ID, and seat stay exactly as first
/// allocated. Only the applicant-entered fields, the displayed name,
/// and the submission timestamp change.
pub fn resubmit(
    conn: &Connection,
    application_id: &str,
    draft: ApplicationDraft,
) -> Result<Application, RegistryError> {
    validate(&draft)?;

    let existing = applications::get_application(conn, application_id)?
        .ok_or_else(|| RegistryError::UnknownApplication(application_id.to_string()))?;

    if let Some(holder) =
        applications::get_application_by_national_id(conn, &draft.student.national_id)?
    {
        if holder.application_id != application_id {
            return Err(RegistryError::NationalIdTaken(holder.application_id));
        }
    }

    let mut seating = existing.seating;
    seating.name = draft.student.full_name();
    if let Some(photo) = &draft.photo {
        seating.photo_url = photo.clone();
    }

    let application = Application {
        application_id: application_id.to_string(),
        details: draft,
        seating,
        submitted_at: Utc::now(),
    };

    applications::update_application(conn, &application)?;
    tracing::info!(application_id, "Application updated");
    Ok(application)
}

/// Find an application by either identifier: the application ID is
/// tried first, then the national ID.
pub fn lookup(conn: &Connection, query: &str) -> Result<Option<Application>, RegistryError> {
    let query = query.trim();
    if let Some(found) = applications::get_application(conn, query)? {
        return Ok(Some(found));
    }
    Ok(applications::get_application_by_national_id(conn, query)?)
}

/// Remove an application (staff operation).
pub fn remove(conn: &Connection, application_id: &str) -> Result<(), RegistryError> {
    match applications::delete_application(conn, application_id) {
        Ok(()) => Ok(()),
        Err(DatabaseError::NotFound { .. }) => {
            Err(RegistryError::UnknownApplication(application_id.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

// ═══════════════════════════════════════════════════════════
// Exam card rendering
// ═══════════════════════════════════════════════════════════

fn seating_snapshot(
    plan: &AllocationPlan,
    draft: &ApplicationDraft,
    application_id: &str,
    exam_id: String,
    assignment: SeatAssignment,
) -> SeatingSnapshot {
    let (building, room, seat) = match assignment {
        SeatAssignment::Assigned {
            building,
            room,
            seat,
        } => (building, room, seat),
        SeatAssignment::ByAnnouncement {
            building,
            room,
            note,
        } => (building, room, note),
        SeatAssignment::Exhausted => (
            plan.placeholder.building.clone(),
            plan.placeholder.room.clone(),
            plan.placeholder.seat.clone(),
        ),
    };

    SeatingSnapshot {
        name: draft.student.full_name(),
        application_id: application_id.to_string(),
        exam_id,
        date: plan
            .exam_date(draft.grade_level, draft.admission_round)
            .to_string(),
        time: plan.exam_time.clone(),
        building,
        room,
        seat,
        photo_url: draft.photo.clone().unwrap_or_default(),
    }
}

// ═══════════════════════════════════════════════════════════
// Validation
// ═══════════════════════════════════════════════════════════

fn validate(draft: &ApplicationDraft) -> Result<(), RegistryError> {
    let student = &draft.student;

    if student.title.trim().is_empty()
        || student.first_name.trim().is_empty()
        || student.last_name.trim().is_empty()
    {
        return Err(RegistryError::Validation(
            "Student name is incomplete".into(),
        ));
    }

    let nid = student.national_id.trim();
    if nid.len() != 13 || !nid.chars().all(|c| c.is_ascii_digit()) {
        return Err(RegistryError::Validation(
            "National ID must be 13 digits".into(),
        ));
    }

    if student.phone.trim().is_empty() {
        return Err(RegistryError::Validation("Phone number is required".into()));
    }

    match draft.school.gpax.trim().parse::<f64>() {
        Ok(g) if (0.0..=4.0).contains(&g) => {}
        _ => {
            return Err(RegistryError::Validation(
                "GPAX must be a number between 0.00 and 4.00".into(),
            ));
        }
    }

    match draft.admission_round {
        AdmissionRound::General => {
            if draft.area_type.is_none() {
                return Err(RegistryError::Validation(
                    "General round requires an area type".into(),
                ));
            }
        }
        AdmissionRound::SpecialProgram => {
            if draft.grade_level == GradeLevel::M4 && draft.study_plan.is_none() {
                return Err(RegistryError::Validation(
                    "M4 special program requires a study plan".into(),
                ));
            }
        }
        AdmissionRound::SpecialTalent => {
            if draft.special_talent_type.is_none() {
                return Err(RegistryError::Validation(
                    "Talent round requires a talent category".into(),
                ));
            }
        }
    }

    if let Some(photo) = &draft.photo {
        if !photo.starts_with("data:image/") || !photo.contains(";base64,") {
            return Err(RegistryError::Validation(
                "Photo must be a base64 image data URL".into(),
            ));
        }
    }

    Ok(())
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
