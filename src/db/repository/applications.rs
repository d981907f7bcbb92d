//! Application records.
//!
//! One row per applicant. The full record is stored as JSON in the
//! `record` column; allocation results and identity fields are
//! denormalized into columns for listing and statistics. `national_id`
//! is UNIQUE, so storing a record for an already-registered applicant
//! replaces the previous row (last write wins).

use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::Application;

fn encode_record(application: &Application) -> Result<String, DatabaseError> {
    serde_json::to_string(application)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("Unencodable record: {e}")))
}

fn decode_record(json: &str) -> Result<Application, DatabaseError> {
    serde_json::from_str(json)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("Invalid stored record: {e}")))
}

/// Store an application, replacing any previous row with the same
/// application ID or national ID.
pub fn upsert_application(
    conn: &Connection,
    application: &Application,
) -> Result<(), DatabaseError> {
    let record = encode_record(application)?;
    let details = &application.details;
    conn.execute(
        "INSERT OR REPLACE INTO applications (
             application_id, national_id, grade_level, admission_round,
             area_type, study_plan, special_talent_type, student_name,
             exam_id, exam_date, exam_time, building, room, seat,
             record, submitted_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            application.application_id,
            details.student.national_id,
            details.grade_level.as_str(),
            details.admission_round.as_str(),
            details.area_type.map(|a| a.as_str()),
            details.study_plan,
            details.special_talent_type,
            details.student.full_name(),
            application.seating.exam_id,
            application.seating.date,
            application.seating.time,
            application.seating.building,
            application.seating.room,
            application.seating.seat,
            record,
            application.submitted_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// Rewrite an existing application in place. Fails with `NotFound` if the
/// application ID is unknown; the row's national ID may change but must
/// stay unique.
pub fn update_application(
    conn: &Connection,
    application: &Application,
) -> Result<(), DatabaseError> {
    let record = encode_record(application)?;
    let details = &application.details;
    let rows = conn.execute(
        "UPDATE applications SET
             national_id = ?2, grade_level = ?3, admission_round = ?4,
             area_type = ?5, study_plan = ?6, special_talent_type = ?7,
             student_name = ?8, exam_id = ?9, exam_date = ?10, exam_time = ?11,
             building = ?12, room = ?13, seat = ?14, record = ?15,
             submitted_at = ?16
         WHERE application_id = ?1",
        params![
            application.application_id,
            details.student.national_id,
            details.grade_level.as_str(),
            details.admission_round.as_str(),
            details.area_type.map(|a| a.as_str()),
            details.study_plan,
            details.special_talent_type,
            details.student.full_name(),
            application.seating.exam_id,
            application.seating.date,
            application.seating.time,
            application.seating.building,
            application.seating.room,
            application.seating.seat,
            record,
            application.submitted_at.to_rfc3339(),
        ],
    )?;

    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "application".to_string(),
            id: application.application_id.clone(),
        });
    }
    Ok(())
}

pub fn get_application(
    conn: &Connection,
    application_id: &str,
) -> Result<Option<Application>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT record FROM applications WHERE application_id = ?1")?;
    match stmt.query_row([application_id], |row| row.get::<_, String>(0)) {
        Ok(json) => Ok(Some(decode_record(&json)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::from(e)),
    }
}

pub fn get_application_by_national_id(
    conn: &Connection,
    national_id: &str,
) -> Result<Option<Application>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT record FROM applications WHERE national_id = ?1")?;
    match stmt.query_row([national_id], |row| row.get::<_, String>(0)) {
        Ok(json) => Ok(Some(decode_record(&json)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::from(e)),
    }
}

/// Whether a row exists for this application ID. Used by the
/// collision-avoiding ID allocator, so it must stay a cheap point query.
pub fn application_exists(
    conn: &Connection,
    application_id: &str,
) -> Result<bool, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT 1 FROM applications WHERE application_id = ?1")?;
    match stmt.query_row([application_id], |row| row.get::<_, i64>(0)) {
        Ok(_) => Ok(true),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(false),
        Err(e) => Err(DatabaseError::from(e)),
    }
}

/// All applications, newest submission first (admin listing order).
pub fn list_applications(conn: &Connection) -> Result<Vec<Application>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT record FROM applications ORDER BY submitted_at DESC")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut applications = Vec::new();
    for row in rows {
        applications.push(decode_record(&row?)?);
    }
    Ok(applications)
}

pub fn count_applications(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM applications", [], |row| row.get(0))?;
    Ok(count)
}

pub fn delete_application(
    conn: &Connection,
    application_id: &str,
) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "DELETE FROM applications WHERE application_id = ?1",
        [application_id],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "application".to_string(),
            id: application_id.to_string(),
        });
    }
    tracing::info!(application_id, "Application deleted");
    Ok(())
}

// ──────────────────────────────────────────────
// Statistics queries
// ──────────────────────────────────────────────

/// (day, grade_level, count) for submissions on or after `since`
/// (ISO date string), grouped per day.
pub fn daily_counts_since(
    conn: &Connection,
    since: &str,
) -> Result<Vec<(String, String, i64)>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT date(submitted_at) AS day, grade_level, COUNT(*)
         FROM applications
         WHERE date(submitted_at) >= date(?1)
         GROUP BY day, grade_level
         ORDER BY day",
    )?;
    let rows = stmt
        .query_map([since], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// (study_plan, count) for submissions on or after `since`; NULL plans
/// come back as None.
pub fn counts_by_study_plan(
    conn: &Connection,
    since: &str,
) -> Result<Vec<(Option<String>, i64)>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT study_plan, COUNT(*) FROM applications
         WHERE date(submitted_at) >= date(?1)
         GROUP BY study_plan ORDER BY COUNT(*) DESC",
    )?;
    let rows = stmt
        .query_map([since], |row| {
            Ok((row.get::<_, Option<String>>(0)?, row.get::<_, i64>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// (area_type, count) for submissions on or after `since`; NULL areas
/// come back as None.
pub fn counts_by_area(
    conn: &Connection,
    since: &str,
) -> Result<Vec<(Option<String>, i64)>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT area_type, COUNT(*) FROM applications
         WHERE date(submitted_at) >= date(?1)
         GROUP BY area_type ORDER BY COUNT(*) DESC",
    )?;
    let rows = stmt
        .query_map([since], |row| {
            Ok((row.get::<_, Option<String>>(0)?, row.get::<_, i64>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
