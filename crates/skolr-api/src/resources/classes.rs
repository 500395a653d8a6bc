// Class endpoints.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{ClassUpsert, SchoolClass, Student};

impl ApiClient {
    /// List all classes.
    ///
    /// `GET /classes`
    pub async fn list_classes(&self) -> Result<Vec<SchoolClass>, Error> {
        self.get("classes").await
    }

    /// Fetch a single class.
    ///
    /// `GET /classes/{id}`
    pub async fn get_class(&self, id: i64) -> Result<SchoolClass, Error> {
        self.get(&format!("classes/{id}")).await
    }

    /// List the students enrolled in a class.
    ///
    /// `GET /classes/{id}/students`
    pub async fn list_class_students(&self, id: i64) -> Result<Vec<Student>, Error> {
        self.get(&format!("classes/{id}/students")).await
    }

    /// Create a class.
    ///
    /// `POST /classes`
    pub async fn create_class(&self, class: &ClassUpsert) -> Result<SchoolClass, Error> {
        debug!(name = %class.name, "creating class");
        self.post("classes", class).await
    }

    /// Replace a class record.
    ///
    /// `PUT /classes/{id}`
    pub async fn update_class(&self, id: i64, class: &ClassUpsert) -> Result<SchoolClass, Error> {
        debug!(id, "updating class");
        self.put(&format!("classes/{id}"), class).await
    }

    /// Delete a class.
    ///
    /// `DELETE /classes/{id}`
    pub async fn delete_class(&self, id: i64) -> Result<(), Error> {
        debug!(id, "deleting class");
        self.delete(&format!("classes/{id}")).await
    }
}
