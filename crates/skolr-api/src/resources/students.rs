// Student endpoints.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Student, StudentUpsert};

impl ApiClient {
    /// List all students.
    ///
    /// `GET /students`
    pub async fn list_students(&self) -> Result<Vec<Student>, Error> {
        self.get("students").await
    }

    /// Fetch a single student.
    ///
    /// `GET /students/{id}`
    pub async fn get_student(&self, id: i64) -> Result<Student, Error> {
        self.get(&format!("students/{id}")).await
    }

    /// Create a student.
    ///
    /// `POST /students`
    pub async fn create_student(&self, student: &StudentUpsert) -> Result<Student, Error> {
        debug!(number = %student.student_number, "creating student");
        self.post("students", student).await
    }

    /// Replace a student record.
    ///
    /// `PUT /students/{id}`
    pub async fn update_student(&self, id: i64, student: &StudentUpsert) -> Result<Student, Error> {
        debug!(id, "updating student");
        self.put(&format!("students/{id}"), student).await
    }

    /// Delete a student.
    ///
    /// `DELETE /students/{id}`
    pub async fn delete_student(&self, id: i64) -> Result<(), Error> {
        debug!(id, "deleting student");
        self.delete(&format!("students/{id}")).await
    }
}
