//! Allocation plan configuration.
//!
//! Everything venue-specific lives here: which counter backs which ID
//! prefix, which rooms each cohort sits in, fixed talent venues, and the
//! exam calendar. The bundled plan describes the current admission year;
//! deployments can point at an edited copy to change rooms or dates
//! without touching code.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{AdmissionRound, GradeLevel};

const BUNDLED_PLAN: &str = include_str!("../../resources/allocation_plan.json");

// ═══════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Failed to read allocation plan {0}: {1}")]
    Read(String, String),

    #[error("Failed to parse allocation plan: {0}")]
    Parse(String),

    #[error("Invalid allocation plan: {0}")]
    Invalid(String),
}

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// A physical exam room, filled seat by seat before moving to the next.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamRoom {
    pub building: String,
    pub room: String,
}

/// Seating rooms for one cohort (grade + round), backed by its own counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatingRule {
    /// Label used in logs and diagnostics, e.g. "M1_SPECIAL".
    pub cohort: String,
    pub grade: GradeLevel,
    pub round: AdmissionRound,
    /// Counter key that hands out positions within this cohort.
    pub counter: String,
    pub rooms: Vec<ExamRoom>,
}

/// Maps an applicant category to an exam ID prefix and its counter.
/// `None` fields match anything; rules are evaluated in file order and
/// the first match wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefixRule {
    pub prefix: String,
    pub counter: String,
    #[serde(default)]
    pub grade: Option<GradeLevel>,
    #[serde(default)]
    pub round: Option<AdmissionRound>,
    #[serde(default)]
    pub study_plan: Option<String>,
}

/// Fixed venue for a special-talent category. These rounds are examined
/// at practice facilities, not numbered seats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TalentVenue {
    pub category: String,
    pub building: String,
    pub room: String,
}

/// Exam date for a round (optionally narrowed by grade). First match wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamDateRule {
    #[serde(default)]
    pub round: Option<AdmissionRound>,
    #[serde(default)]
    pub grade: Option<GradeLevel>,
    pub date: String,
}

/// Rendered venue when no seat could be assigned or no rule matched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceholderVenue {
    pub building: String,
    pub room: String,
    pub seat: String,
}

/// The full allocation plan for one admission year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationPlan {
    /// Seats per room before spilling into the next room.
    pub room_capacity: u32,
    /// Counter key backing application ID allocation.
    pub application_counter: String,
    pub exam_time: String,
    /// Date shown when no `exam_dates` rule matches.
    pub exam_date_fallback: String,
    pub placeholder: PlaceholderVenue,
    /// Seat text for talent venues ("per announcement at the venue").
    pub talent_seat_note: String,
    pub seating: Vec<SeatingRule>,
    pub exam_prefixes: Vec<PrefixRule>,
    pub talent_venues: Vec<TalentVenue>,
    pub exam_dates: Vec<ExamDateRule>,
}

// ═══════════════════════════════════════════════════════════
// Loading and lookups
// ═══════════════════════════════════════════════════════════

impl AllocationPlan {
    /// Parse the plan bundled into the binary.
    pub fn bundled() -> Result<Self, PlanError> {
        Self::parse(BUNDLED_PLAN)
    }

    /// Load a plan from an external JSON file.
    pub fn load(path: &std::path::Path) -> Result<Self, PlanError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| PlanError::Read(path.display().to_string(), e.to_string()))?;
        Self::parse(&json)
    }

    fn parse(json: &str) -> Result<Self, PlanError> {
        let plan: Self =
            serde_json::from_str(json).map_err(|e| PlanError::Parse(e.to_string()))?;
        plan.validate()?;
        Ok(plan)
    }

    fn validate(&self) -> Result<(), PlanError> {
        if self.room_capacity == 0 {
            return Err(PlanError::Invalid("room_capacity must be positive".into()));
        }
        if self.application_counter.is_empty() {
            return Err(PlanError::Invalid("application_counter is empty".into()));
        }
        let mut cohorts = HashSet::new();
        let mut counters = HashSet::new();
        for rule in &self.seating {
            if rule.rooms.is_empty() {
                return Err(PlanError::Invalid(format!(
                    "seating cohort {} has no rooms",
                    rule.cohort
                )));
            }
            if rule.counter.is_empty() {
                return Err(PlanError::Invalid(format!(
                    "seating cohort {} has no counter key",
                    rule.cohort
                )));
            }
            // One rule per (grade, round); a duplicate would shadow
            // its twin and split a cohort across two counters.
            if !cohorts.insert((rule.grade, rule.round)) {
                return Err(PlanError::Invalid(format!(
                    "duplicate seating rule for {:?} {:?}",
                    rule.grade, rule.round
                )));
            }
            if !counters.insert(rule.counter.as_str()) {
                return Err(PlanError::Invalid(format!(
                    "seating counter {} is shared by two cohorts",
                    rule.counter
                )));
            }
        }
        for rule in &self.exam_prefixes {
            if rule.prefix.is_empty() || rule.counter.is_empty() {
                return Err(PlanError::Invalid(
                    "exam prefix rule missing prefix or counter".into(),
                ));
            }
        }
        Ok(())
    }

    /// Seating rooms for a cohort, if that cohort sits numbered seats.
    pub fn seating_rule(
        &self,
        grade: GradeLevel,
        round: AdmissionRound,
    ) -> Option<&SeatingRule> {
        self.seating
            .iter()
            .find(|rule| rule.grade == grade && rule.round == round)
    }

    /// First prefix rule matching the applicant. `None` fields in a rule
    /// match any value, so order in the plan file is significant.
    pub fn prefix_rule(
        &self,
        grade: GradeLevel,
        round: AdmissionRound,
        study_plan: Option<&str>,
    ) -> Option<&PrefixRule> {
        self.exam_prefixes.iter().find(|rule| {
            rule.grade.map_or(true, |g| g == grade)
                && rule.round.map_or(true, |r| r == round)
                && rule
                    .study_plan
                    .as_deref()
                    .map_or(true, |p| Some(p) == study_plan)
        })
    }

    pub fn talent_venue(&self, category: &str) -> Option<&TalentVenue> {
        self.talent_venues.iter().find(|v| v.category == category)
    }

    /// Exam date for the applicant, or the configured fallback text.
    pub fn exam_date(&self, grade: GradeLevel, round: AdmissionRound) -> &str {
        self.exam_dates
            .iter()
            .find(|rule| {
                rule.round.map_or(true, |r| r == round)
                    && rule.grade.map_or(true, |g| g == grade)
            })
            .map(|rule| rule.date.as_str())
            .unwrap_or(&self.exam_date_fallback)
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_plan_parses() {
        let plan = AllocationPlan::bundled().unwrap();
        assert_eq!(plan.room_capacity, 20);
        assert_eq!(plan.application_counter, "applicationIdCounter");
        assert_eq!(plan.seating.len(), 4);
        assert_eq!(plan.exam_prefixes.len(), 5);
        assert_eq!(plan.talent_venues.len(), 5);
    }

    #[test]
    fn seating_rooms_match_published_layout() {
        let plan = AllocationPlan::bundled().unwrap();

        let m1_special = plan
            .seating_rule(GradeLevel::M1, AdmissionRound::SpecialProgram)
            .unwrap();
        assert_eq!(m1_special.rooms.len(), 3);
        assert_eq!(m1_special.rooms[0].building, "อาคาร 2");
        assert_eq!(m1_special.rooms[0].room, "232");

        let m4_special = plan
            .seating_rule(GradeLevel::M4, AdmissionRound::SpecialProgram)
            .unwrap();
        assert_eq!(m4_special.rooms.len(), 4);

        let m1_general = plan
            .seating_rule(GradeLevel::M1, AdmissionRound::General)
            .unwrap();
        assert_eq!(m1_general.rooms.len(), 23);
        // Room 443 is skipped in the published layout
        assert!(!m1_general.rooms.iter().any(|r| r.room == "443"));
    }

    #[test]
    fn talent_round_has_no_seating_rule() {
        let plan = AllocationPlan::bundled().unwrap();
        assert!(plan
            .seating_rule(GradeLevel::M1, AdmissionRound::SpecialTalent)
            .is_none());
    }

    #[test]
    fn prefix_rules_match_in_order() {
        let plan = AllocationPlan::bundled().unwrap();

        let mep = plan
            .prefix_rule(GradeLevel::M1, AdmissionRound::SpecialProgram, None)
            .unwrap();
        assert_eq!(mep.prefix, "MEP-");

        let igp = plan
            .prefix_rule(
                GradeLevel::M4,
                AdmissionRound::SpecialProgram,
                Some("Intensive Gifted (IGP)"),
            )
            .unwrap();
        assert_eq!(igp.prefix, "IGP-");

        let sme = plan
            .prefix_rule(
                GradeLevel::M4,
                AdmissionRound::SpecialProgram,
                Some("Science Mathematics and English(SME)"),
            )
            .unwrap();
        assert_eq!(sme.prefix, "SME-");

        // Unknown special-program plan falls through to the grade catch-all
        let fallthrough = plan
            .prefix_rule(
                GradeLevel::M4,
                AdmissionRound::SpecialProgram,
                Some("แผนการเรียนอื่น"),
            )
            .unwrap();
        assert_eq!(fallthrough.prefix, "M4-");

        let general = plan
            .prefix_rule(GradeLevel::M1, AdmissionRound::General, None)
            .unwrap();
        assert_eq!(general.prefix, "M1-");
    }

    #[test]
    fn exam_dates_resolve_per_round_and_grade() {
        let plan = AllocationPlan::bundled().unwrap();
        assert_eq!(
            plan.exam_date(GradeLevel::M1, AdmissionRound::SpecialProgram),
            "21 กุมภาพันธ์ 2569"
        );
        assert_eq!(
            plan.exam_date(GradeLevel::M4, AdmissionRound::SpecialProgram),
            "22 กุมภาพันธ์ 2569"
        );
        assert_eq!(
            plan.exam_date(GradeLevel::M1, AdmissionRound::SpecialTalent),
            "25 มีนาคม 2569"
        );
        assert_eq!(
            plan.exam_date(GradeLevel::M4, AdmissionRound::SpecialTalent),
            "25 มีนาคม 2569"
        );
        assert_eq!(
            plan.exam_date(GradeLevel::M1, AdmissionRound::General),
            "28 มีนาคม 2569"
        );
        assert_eq!(
            plan.exam_date(GradeLevel::M4, AdmissionRound::General),
            "29 มีนาคม 2569"
        );
    }

    #[test]
    fn unmatched_date_uses_fallback() {
        let mut plan = AllocationPlan::bundled().unwrap();
        plan.exam_dates.clear();
        assert_eq!(
            plan.exam_date(GradeLevel::M1, AdmissionRound::General),
            "โปรดตรวจสอบประกาศจากโรงเรียน"
        );
    }

    #[test]
    fn talent_venues_by_category() {
        let plan = AllocationPlan::bundled().unwrap();
        let sport = plan.talent_venue("ด้านกีฬา").unwrap();
        assert_eq!(sport.building, "ลานอเนกประสงค์");
        assert_eq!(sport.room, "ตามประเภทกีฬา");
        assert!(plan.talent_venue("ด้านอื่น").is_none());
    }

    #[test]
    fn rejects_zero_room_capacity() {
        let mut plan = AllocationPlan::bundled().unwrap();
        plan.room_capacity = 0;
        assert!(matches!(plan.validate(), Err(PlanError::Invalid(_))));
    }

    #[test]
    fn rejects_cohort_without_rooms() {
        let mut plan = AllocationPlan::bundled().unwrap();
        plan.seating[0].rooms.clear();
        assert!(matches!(plan.validate(), Err(PlanError::Invalid(_))));
    }

    #[test]
    fn rejects_duplicate_cohort_rule() {
        let mut plan = AllocationPlan::bundled().unwrap();
        let mut twin = plan.seating[0].clone();
        twin.counter = "seatingCounter_TWIN".into();
        plan.seating.push(twin);
        assert!(matches!(plan.validate(), Err(PlanError::Invalid(_))));
    }

    #[test]
    fn rejects_shared_seating_counter() {
        let mut plan = AllocationPlan::bundled().unwrap();
        let shared = plan.seating[0].counter.clone();
        plan.seating[1].counter = shared;
        assert!(matches!(plan.validate(), Err(PlanError::Invalid(_))));
    }

    #[test]
    fn load_reads_external_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        std::fs::write(&path, super::BUNDLED_PLAN).unwrap();
        let plan = AllocationPlan::load(&path).unwrap();
        assert_eq!(plan.room_capacity, 20);

        let missing = AllocationPlan::load(&dir.path().join("absent.json"));
        assert!(matches!(missing, Err(PlanError::Read(_, _))));
    }
}
