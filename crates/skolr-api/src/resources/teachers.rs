// Teacher endpoints.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Teacher, TeacherUpsert};

impl ApiClient {
    /// List all teachers.
    ///
    /// `GET /teachers`
    pub async fn list_teachers(&self) -> Result<Vec<Teacher>, Error> {
        self.get("teachers").await
    }

    /// Fetch a single teacher.
    ///
    /// `GET /teachers/{id}`
    pub async fn get_teacher(&self, id: i64) -> Result<Teacher, Error> {
        self.get(&format!("teachers/{id}")).await
    }

    /// Create a teacher.
    ///
    /// `POST /teachers`
    pub async fn create_teacher(&self, teacher: &TeacherUpsert) -> Result<Teacher, Error> {
        debug!(name = %teacher.last_name, "creating teacher");
        self.post("teachers", teacher).await
    }

    /// Replace a teacher record.
    ///
    /// `PUT /teachers/{id}`
    pub async fn update_teacher(&self, id: i64, teacher: &TeacherUpsert) -> Result<Teacher, Error> {
        debug!(id, "updating teacher");
        self.put(&format!("teachers/{id}"), teacher).await
    }

    /// Delete a teacher.
    ///
    /// `DELETE /teachers/{id}`
    pub async fn delete_teacher(&self, id: i64) -> Result<(), Error> {
        debug!(id, "deleting teacher");
        self.delete(&format!("teachers/{id}")).await
    }
}
