// Wire-level DTOs mirrored from the skolr server.
//
// The server is the source of truth for every one of these -- the client
// never holds an authoritative copy and refetches on demand. Field names
// follow the server's camelCase JSON.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ── Users & roles ───────────────────────────────────────────────────

/// Account role. Determines which dashboard and routes a user may reach.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

/// An authenticated account. Replaced wholesale on profile refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    /// Present when the account belongs to a student.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student: Option<Student>,
    /// Present when the account belongs to a teacher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher: Option<Teacher>,
}

// ── Auth payloads ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

// ── Domain entities ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    /// School-assigned student number (unique).
    pub student_number: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    /// Id of the class the student is enrolled in, if any.
    #[serde(default)]
    pub class_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Subject ids this teacher is qualified to teach.
    #[serde(default)]
    pub subject_ids: Vec<i64>,
}

/// A class (homeroom group), e.g. "7B".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolClass {
    pub id: i64,
    pub name: String,
    /// School year, e.g. 2025 for 2025/26.
    pub year: i32,
    /// Homeroom teacher, if assigned.
    #[serde(default)]
    pub teacher_id: Option<i64>,
    #[serde(default)]
    pub student_count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    /// Numeric mark on the server's grading scale.
    pub value: f64,
    #[serde(default)]
    pub comment: Option<String>,
    pub graded_at: DateTime<Utc>,
    /// Teacher who entered the grade.
    #[serde(default)]
    pub teacher_id: Option<i64>,
}

// ── Create / update request shapes ──────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentUpsert {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub student_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherUpsert {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub subject_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassUpsert {
    pub name: String,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectUpsert {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeUpsert {
    pub student_id: i64,
    pub subject_id: i64,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

// ── Dashboard summaries ─────────────────────────────────────────────

/// Role-specific dashboard payload from `GET /dashboard/{role}`.
///
/// The server tailors the fields per role; absent sections deserialize
/// to their defaults so one shape covers all three dashboards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    #[serde(default)]
    pub student_count: Option<u64>,
    #[serde(default)]
    pub teacher_count: Option<u64>,
    #[serde(default)]
    pub class_count: Option<u64>,
    #[serde(default)]
    pub subject_count: Option<u64>,
    /// Recent grades relevant to the requesting role.
    #[serde(default)]
    pub recent_grades: Vec<Grade>,
    /// Overall grade average visible to the requesting role.
    #[serde(default)]
    pub average_grade: Option<f64>,
}

// ── Reports ─────────────────────────────────────────────────────────

/// Per-subject aggregate inside a class report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAverage {
    pub subject_id: i64,
    pub subject_name: String,
    pub average: f64,
    pub grade_count: u64,
}

/// Server-computed class report from `GET /reports/class/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassReport {
    pub class_id: i64,
    pub class_name: String,
    pub student_count: u64,
    #[serde(default)]
    pub subject_averages: Vec<SubjectAverage>,
    #[serde(default)]
    pub grades: Vec<Grade>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_serde_lowercase() {
        let json = serde_json::to_string(&Role::Admin).unwrap();
        assert_eq!(json, "\"admin\"");
        let back: Role = serde_json::from_str("\"teacher\"").unwrap();
        assert_eq!(back, Role::Teacher);
    }

    #[test]
    fn role_parses_case_insensitively() {
        let role: Role = "Admin".parse().unwrap();
        assert_eq!(role, Role::Admin);
        assert!("principal".parse::<Role>().is_err());
    }

    #[test]
    fn user_tolerates_missing_profile_sections() {
        let user: User = serde_json::from_str(
            r#"{"id": 1, "username": "jdoe", "email": "j@example.edu", "role": "admin"}"#,
        )
        .unwrap();
        assert!(user.student.is_none());
        assert!(user.teacher.is_none());
    }

    #[test]
    fn dashboard_summary_defaults_absent_sections() {
        let summary: DashboardSummary = serde_json::from_str(r#"{"studentCount": 120}"#).unwrap();
        assert_eq!(summary.student_count, Some(120));
        assert!(summary.recent_grades.is_empty());
        assert!(summary.average_grade.is_none());
    }
}
