//! Application and exam ID allocation.
//!
//! Both ID kinds are zero-padded counter reads. Application IDs
//! additionally skip over values already present in the registry, so a
//! database seeded from an older deployment whose counter lags its
//! records still hands out fresh IDs.

use rusqlite::Connection;

use crate::allocator::plan::AllocationPlan;
use crate::db::repository::{applications, counters};
use crate::db::DatabaseError;
use crate::models::{AdmissionRound, GradeLevel};

/// Allocate the next application ID: a 5-digit, zero-padded sequence
/// number that is guaranteed not to collide with an existing record.
pub fn next_application_id(
    conn: &Connection,
    plan: &AllocationPlan,
) -> Result<String, DatabaseError> {
    loop {
        let value = counters::allocate(conn, &plan.application_counter)?;
        let candidate = format!("{value:05}");
        if !applications::application_exists(conn, &candidate)? {
            return Ok(candidate);
        }
        tracing::warn!(candidate, "Application ID already in use, skipping");
    }
}

/// Allocate the next exam ID for an applicant category.
///
/// The prefix and backing counter come from the first matching plan
/// rule. When no rule matches (a plan file without catch-all rules),
/// an `ERR-` ID derived from the clock is issued so registration still
/// completes; staff resolve these against the published announcement.
pub fn next_exam_id(
    conn: &Connection,
    plan: &AllocationPlan,
    grade: GradeLevel,
    round: AdmissionRound,
    study_plan: Option<&str>,
) -> Result<String, DatabaseError> {
    match plan.prefix_rule(grade, round, study_plan) {
        Some(rule) => {
            let value = counters::allocate(conn, &rule.counter)?;
            Ok(format!("{}{value:05}", rule.prefix))
        }
        None => {
            tracing::warn!(
                grade = grade.as_str(),
                round = round.as_str(),
                "No exam ID rule matched, issuing ERR id"
            );
            let millis = chrono::Utc::now().timestamp_millis();
            Ok(format!("ERR-{:05}", millis % 100_000))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use rusqlite::params;

    fn setup() -> (Connection, AllocationPlan) {
        let conn = open_memory_database().expect("in-memory DB should open");
        let plan = AllocationPlan::bundled().expect("bundled plan should parse");
        (conn, plan)
    }

    /// Minimal registry row so ID-collision checks see an occupant.
    fn occupy_id(conn: &Connection, application_id: &str) {
        conn.execute(
            "INSERT INTO applications (
                 application_id, national_id, grade_level, admission_round,
                 student_name, exam_id, exam_date, exam_time,
                 building, room, seat, record, submitted_at
             ) VALUES (?1, ?2, 'm1', 'general', 'x', 'M1-00001', 'd', 't',
                       'b', 'r', 's', '{}', datetime('now'))",
            params![application_id, format!("nid-{application_id}")],
        )
        .unwrap();
    }

    #[test]
    fn application_ids_are_padded_and_sequential() {
        let (conn, plan) = setup();
        assert_eq!(next_application_id(&conn, &plan).unwrap(), "00001");
        assert_eq!(next_application_id(&conn, &plan).unwrap(), "00002");
        assert_eq!(next_application_id(&conn, &plan).unwrap(), "00003");
    }

    #[test]
    fn application_id_skips_occupied_values() {
        let (conn, plan) = setup();
        occupy_id(&conn, "00001");
        occupy_id(&conn, "00002");

        // Counter starts behind the seeded records and walks past them
        assert_eq!(next_application_id(&conn, &plan).unwrap(), "00003");
        assert_eq!(next_application_id(&conn, &plan).unwrap(), "00004");
    }

    #[test]
    fn exam_ids_use_program_prefixes() {
        let (conn, plan) = setup();

        let mep = next_exam_id(
            &conn,
            &plan,
            GradeLevel::M1,
            AdmissionRound::SpecialProgram,
            None,
        )
        .unwrap();
        assert_eq!(mep, "MEP-00001");

        let igp = next_exam_id(
            &conn,
            &plan,
            GradeLevel::M4,
            AdmissionRound::SpecialProgram,
            Some("Intensive Gifted (IGP)"),
        )
        .unwrap();
        assert_eq!(igp, "IGP-00001");

        let sme = next_exam_id(
            &conn,
            &plan,
            GradeLevel::M4,
            AdmissionRound::SpecialProgram,
            Some("Science Mathematics and English(SME)"),
        )
        .unwrap();
        assert_eq!(sme, "SME-00001");
    }

    #[test]
    fn each_prefix_counts_independently() {
        let (conn, plan) = setup();

        for _ in 0..3 {
            next_exam_id(
                &conn,
                &plan,
                GradeLevel::M1,
                AdmissionRound::SpecialProgram,
                None,
            )
            .unwrap();
        }
        let m1 = next_exam_id(&conn, &plan, GradeLevel::M1, AdmissionRound::General, None)
            .unwrap();
        assert_eq!(m1, "M1-00001");

        let mep = next_exam_id(
            &conn,
            &plan,
            GradeLevel::M1,
            AdmissionRound::SpecialProgram,
            None,
        )
        .unwrap();
        assert_eq!(mep, "MEP-00004");
    }

    #[test]
    fn unknown_special_plan_falls_through_to_grade_prefix() {
        let (conn, plan) = setup();
        let id = next_exam_id(
            &conn,
            &plan,
            GradeLevel::M4,
            AdmissionRound::SpecialProgram,
            Some("แผนการเรียนอื่น"),
        )
        .unwrap();
        assert_eq!(id, "M4-00001");
    }

    #[test]
    fn talent_round_uses_grade_prefix() {
        let (conn, plan) = setup();
        let id = next_exam_id(
            &conn,
            &plan,
            GradeLevel::M1,
            AdmissionRound::SpecialTalent,
            None,
        )
        .unwrap();
        assert_eq!(id, "M1-00001");
    }

    #[test]
    fn no_matching_rule_issues_err_id() {
        let (conn, mut plan) = setup();
        plan.exam_prefixes.clear();
        let id = next_exam_id(&conn, &plan, GradeLevel::M1, AdmissionRound::General, None)
            .unwrap();
        assert!(id.starts_with("ERR-"));
        assert_eq!(id.len(), 9);
        assert!(id[4..].chars().all(|c| c.is_ascii_digit()));
    }
}
