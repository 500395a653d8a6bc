// Grade endpoints.
//
// Grades support scoped listing (per student, per class) in addition to
// the usual CRUD verbs -- the dashboards and reports filter server-side
// rather than fetching the whole table.

use serde::Serialize;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Grade, GradeUpsert};

#[derive(Serialize)]
struct GradeQuery {
    #[serde(skip_serializing_if = "Option::is_none", rename = "studentId")]
    student_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "classId")]
    class_id: Option<i64>,
}

impl ApiClient {
    /// List all grades visible to the caller.
    ///
    /// `GET /grades`
    pub async fn list_grades(&self) -> Result<Vec<Grade>, Error> {
        self.get("grades").await
    }

    /// List grades for one student.
    ///
    /// `GET /grades?studentId={id}`
    pub async fn list_grades_for_student(&self, student_id: i64) -> Result<Vec<Grade>, Error> {
        let query = GradeQuery {
            student_id: Some(student_id),
            class_id: None,
        };
        self.get_with_query("grades", &query).await
    }

    /// List grades for one class.
    ///
    /// `GET /grades?classId={id}`
    pub async fn list_grades_for_class(&self, class_id: i64) -> Result<Vec<Grade>, Error> {
        let query = GradeQuery {
            student_id: None,
            class_id: Some(class_id),
        };
        self.get_with_query("grades", &query).await
    }

    /// Fetch a single grade.
    ///
    /// `GET /grades/{id}`
    pub async fn get_grade(&self, id: i64) -> Result<Grade, Error> {
        self.get(&format!("grades/{id}")).await
    }

    /// Record a grade.
    ///
    /// `POST /grades`
    pub async fn create_grade(&self, grade: &GradeUpsert) -> Result<Grade, Error> {
        debug!(
            student = grade.student_id,
            subject = grade.subject_id,
            "recording grade"
        );
        self.post("grades", grade).await
    }

    /// Replace a grade record.
    ///
    /// `PUT /grades/{id}`
    pub async fn update_grade(&self, id: i64, grade: &GradeUpsert) -> Result<Grade, Error> {
        debug!(id, "updating grade");
        self.put(&format!("grades/{id}"), grade).await
    }

    /// Delete a grade.
    ///
    /// `DELETE /grades/{id}`
    pub async fn delete_grade(&self, id: i64) -> Result<(), Error> {
        debug!(id, "deleting grade");
        self.delete(&format!("grades/{id}")).await
    }
}
