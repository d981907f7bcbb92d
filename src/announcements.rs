//! Published announcements: the exam-candidate list and selection
//! results.
//!
//! The candidate list is a registry lookup dressed with the
//! publication date. Selection results are not graded here: until the
//! academic office imports real scores, the verdict is derived
//! deterministically from the application ID so repeated checks always
//! agree.

use rusqlite::Connection;
use serde::Serialize;

use crate::models::Application;
use crate::registry::{self, RegistryError};

/// Candidate list publication date, shown on the eligibility page.
pub const CANDIDATES_ANNOUNCED_ON: &str = "15 กุมภาพันธ์ 2569";

/// Result publication date.
pub const RESULTS_ANNOUNCED_ON: &str = "15 เมษายน 2569";

/// Enrollment window admitted students report in.
const ENROLLMENT_PERIOD: &str = "25-26 เมษายน 2569";

/// Study plan admitted students are placed into.
const ADMITTED_PLAN: &str = "แผนการเรียนวิทยาศาสตร์-คณิตศาสตร์";

/// One entry on the exam-candidate announcement: the stored
/// application under the date the list was published.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateNotice {
    pub announced_on: String,
    #[serde(flatten)]
    pub application: Application,
}

/// Look an applicant up on the exam-candidate announcement, by
/// application ID or national ID.
pub fn find_candidate(
    conn: &Connection,
    query: &str,
) -> Result<Option<CandidateNotice>, RegistryError> {
    let Some(application) = registry::lookup(conn, query)? else {
        return Ok(None);
    };
    Ok(Some(CandidateNotice {
        announced_on: CANDIDATES_ANNOUNCED_ON.to_string(),
        application,
    }))
}

/// Selection verdict for one applicant.
#[derive(Debug, Clone, Serialize)]
pub struct ExamResult {
    pub student_name: String,
    pub application_id: String,
    pub exam_id: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admitted_plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_period: Option<String>,
    pub announced_on: String,
}

/// Look up the selection result for an application ID or national ID.
/// Returns `None` when neither identifier is registered.
pub fn check_result(
    conn: &Connection,
    query: &str,
) -> Result<Option<ExamResult>, RegistryError> {
    let Some(application) = registry::lookup(conn, query)? else {
        return Ok(None);
    };
    Ok(Some(result_for(&application)))
}

fn result_for(application: &Application) -> ExamResult {
    let passed = passes(&application.application_id);
    ExamResult {
        student_name: application.seating.name.clone(),
        application_id: application.application_id.clone(),
        exam_id: application.seating.exam_id.clone(),
        passed,
        admitted_plan: passed.then(|| ADMITTED_PLAN.to_string()),
        enrollment_period: passed.then(|| ENROLLMENT_PERIOD.to_string()),
        announced_on: RESULTS_ANNOUNCED_ON.to_string(),
    }
}

/// Roughly seven in ten applicants pass.
fn passes(application_id: &str) -> bool {
    fold_hash(application_id).unsigned_abs() % 10 < 7
}

/// 31-based string fold in wrapping 32-bit arithmetic, over UTF-16
/// code units. The verdict for a given ID must never change between
/// checks, so do not touch this without migrating stored expectations.
fn fold_hash(input: &str) -> i32 {
    let mut hash: i32 = 0;
    for unit in input.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit));
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::AllocationPlan;
    use crate::db::sqlite::open_memory_database;
    use crate::models::samples;
    use crate::registry::submit;

    #[test]
    fn fold_hash_matches_known_values() {
        assert_eq!(fold_hash(""), 0);
        assert_eq!(fold_hash("00001"), 45_806_641);
        assert_eq!(fold_hash("00007"), 45_806_647);
    }

    #[test]
    fn verdicts_are_deterministic_and_mostly_pass() {
        assert!(passes("00001"));
        assert!(passes("00002"));
        assert!(!passes("00007"));
        assert!(!passes("00008"));
        assert!(!passes("00009"));

        let passed = (0..100)
            .filter(|n| passes(&format!("{n:05}")))
            .count();
        assert_eq!(passed, 70);
    }

    #[test]
    fn result_carries_plan_only_for_passers() {
        let passing = samples::application("00001", "1103700000001");
        let result = result_for(&passing);
        assert!(result.passed);
        assert_eq!(
            result.admitted_plan.as_deref(),
            Some("แผนการเรียนวิทยาศาสตร์-คณิตศาสตร์")
        );
        assert_eq!(result.enrollment_period.as_deref(), Some("25-26 เมษายน 2569"));
        assert_eq!(result.announced_on, "15 เมษายน 2569");

        let failing = samples::application("00007", "1103700000002");
        let result = result_for(&failing);
        assert!(!result.passed);
        assert!(result.admitted_plan.is_none());
        assert!(result.enrollment_period.is_none());
    }

    #[test]
    fn check_result_resolves_both_identifiers() {
        let conn = open_memory_database().unwrap();
        let plan = AllocationPlan::bundled().unwrap();
        let app = submit(&conn, &plan, samples::draft("1103700000003")).unwrap();

        let by_id = check_result(&conn, &app.application_id).unwrap().unwrap();
        let by_nid = check_result(&conn, "1103700000003").unwrap().unwrap();
        assert_eq!(by_id.application_id, by_nid.application_id);
        assert_eq!(by_id.exam_id, app.seating.exam_id);
        assert_eq!(by_id.passed, by_nid.passed);

        assert!(check_result(&conn, "99999").unwrap().is_none());
    }

    #[test]
    fn candidate_notice_wraps_the_application() {
        let conn = open_memory_database().unwrap();
        let plan = AllocationPlan::bundled().unwrap();
        let app = submit(&conn, &plan, samples::draft("1103700000004")).unwrap();

        let notice = find_candidate(&conn, "1103700000004").unwrap().unwrap();
        assert_eq!(notice.announced_on, "15 กุมภาพันธ์ 2569");
        assert_eq!(notice.application.application_id, app.application_id);

        // The flattened form keeps the record fields at the top level
        let json = serde_json::to_value(&notice).unwrap();
        assert_eq!(json["announced_on"], "15 กุมภาพันธ์ 2569");
        assert_eq!(json["application_id"], app.application_id);
        assert!(json["seating"]["exam_id"].is_string());

        assert!(find_candidate(&conn, "99999").unwrap().is_none());
    }
}
