use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{AdmissionRound, AreaType, GradeLevel, LivesWith};

/// Thai postal address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub detail: String,
    pub subdistrict: String,
    pub district: String,
    pub province: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentInfo {
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
    pub national_id: String,
    pub phone: String,
    pub gender: String,
    pub blood_type: String,
    pub religion: String,
    pub other_religion: Option<String>,
    pub nationality: String,
    pub other_nationality: Option<String>,
    pub permanent_address: Address,
    pub current_address: Address,
    pub chronic_disease: Option<String>,
}

impl StudentInfo {
    /// Display name as printed on the exam card (title glued to first name).
    pub fn full_name(&self) -> String {
        format!("{}{} {}", self.title, self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardianInfo {
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub relationship: String,
    pub phone: String,
    pub occupation: String,
    pub national_id: String,
    pub address: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentInfo {
    pub father_title: String,
    pub father_first_name: String,
    pub father_last_name: String,
    pub father_phone: String,
    pub father_occupation: String,
    pub father_national_id: String,
    pub father_address: Address,
    pub mother_title: String,
    pub mother_first_name: String,
    pub mother_last_name: String,
    pub mother_phone: String,
    pub mother_occupation: String,
    pub mother_national_id: String,
    pub mother_address: Address,
    pub contact_email: String,
    pub lives_with: Option<LivesWith>,
    pub guardian: Option<GuardianInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolInfo {
    pub previous_school: String,
    pub previous_school_province: String,
    pub gpax: String,
}

/// What the application form submits. Everything the registry needs to
/// allocate IDs and a seat, but none of the allocated results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationDraft {
    pub grade_level: GradeLevel,
    pub admission_round: AdmissionRound,
    pub area_type: Option<AreaType>,
    pub study_plan: Option<String>,
    pub special_talent_type: Option<String>,
    pub special_talent_description: Option<String>,
    pub student: StudentInfo,
    pub parent: ParentInfo,
    pub school: SchoolInfo,
    /// Applicant photo as a `data:image/...;base64,` URL.
    pub photo: Option<String>,
}

/// The exam-card view of one allocation, stored on the record and
/// returned by seat lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatingSnapshot {
    pub name: String,
    pub application_id: String,
    pub exam_id: String,
    pub date: String,
    pub time: String,
    pub building: String,
    pub room: String,
    pub seat: String,
    pub photo_url: String,
}

/// A stored application: the submitted draft plus everything the
/// registry allocated for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub application_id: String,
    pub details: ApplicationDraft,
    pub seating: SeatingSnapshot,
    pub submitted_at: DateTime<Utc>,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_glues_title_to_first_name() {
        let student = StudentInfo {
            title: "เด็กชาย".to_string(),
            first_name: "สมชาย".to_string(),
            last_name: "ใจดี".to_string(),
            birth_date: "2013-05-14".to_string(),
            national_id: "1103700000001".to_string(),
            phone: "0812345678".to_string(),
            gender: "ชาย".to_string(),
            blood_type: "O".to_string(),
            religion: "พุทธ".to_string(),
            other_religion: None,
            nationality: "ไทย".to_string(),
            other_nationality: None,
            permanent_address: samples::address(),
            current_address: samples::address(),
            chronic_disease: None,
        };
        assert_eq!(student.full_name(), "เด็กชายสมชาย ใจดี");
    }

    #[test]
    fn application_json_round_trip() {
        let json = r#"{
            "grade_level": "M1",
            "admission_round": "General",
            "area_type": "InArea",
            "study_plan": "วิทยาศาสตร์ - คณิตศาสตร์",
            "special_talent_type": null,
            "special_talent_description": null,
            "student": {
                "title": "เด็กหญิง", "first_name": "สมหญิง", "last_name": "เรียนดี",
                "birth_date": "2013-01-30", "national_id": "1103700000002",
                "phone": "0898765432", "gender": "หญิง", "blood_type": "A",
                "religion": "พุทธ", "other_religion": null,
                "nationality": "ไทย", "other_nationality": null,
                "permanent_address": {"detail": "1", "subdistrict": "บางเมือง", "district": "เมือง", "province": "สมุทรปราการ", "postal_code": "10270"},
                "current_address": {"detail": "1", "subdistrict": "บางเมือง", "district": "เมือง", "province": "สมุทรปราการ", "postal_code": "10270"},
                "chronic_disease": null
            },
            "parent": {
                "father_title": "นาย", "father_first_name": "พ่อ", "father_last_name": "เรียนดี",
                "father_phone": "0811111111", "father_occupation": "ค้าขาย", "father_national_id": "3103700000001",
                "father_address": {"detail": "1", "subdistrict": "บางเมือง", "district": "เมือง", "province": "สมุทรปราการ", "postal_code": "10270"},
                "mother_title": "นาง", "mother_first_name": "แม่", "mother_last_name": "เรียนดี",
                "mother_phone": "0822222222", "mother_occupation": "รับจ้าง", "mother_national_id": "3103700000002",
                "mother_address": {"detail": "1", "subdistrict": "บางเมือง", "district": "เมือง", "province": "สมุทรปราการ", "postal_code": "10270"},
                "contact_email": "parent@example.com",
                "lives_with": "Parents",
                "guardian": null
            },
            "school": {"previous_school": "โรงเรียนประถมตัวอย่าง", "previous_school_province": "สมุทรปราการ", "gpax": "3.75"},
            "photo": null
        }"#;

        let draft: ApplicationDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.grade_level, GradeLevel::M1);
        assert_eq!(draft.parent.lives_with, Some(LivesWith::Parents));

        let back = serde_json::to_string(&draft).unwrap();
        let again: ApplicationDraft = serde_json::from_str(&back).unwrap();
        assert_eq!(again.student.national_id, "1103700000002");
    }
}
