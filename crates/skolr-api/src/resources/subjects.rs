// Subject endpoints.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Subject, SubjectUpsert};

impl ApiClient {
    /// List all subjects.
    ///
    /// `GET /subjects`
    pub async fn list_subjects(&self) -> Result<Vec<Subject>, Error> {
        self.get("subjects").await
    }

    /// Fetch a single subject.
    ///
    /// `GET /subjects/{id}`
    pub async fn get_subject(&self, id: i64) -> Result<Subject, Error> {
        self.get(&format!("subjects/{id}")).await
    }

    /// Create a subject.
    ///
    /// `POST /subjects`
    pub async fn create_subject(&self, subject: &SubjectUpsert) -> Result<Subject, Error> {
        debug!(name = %subject.name, "creating subject");
        self.post("subjects", subject).await
    }

    /// Replace a subject record.
    ///
    /// `PUT /subjects/{id}`
    pub async fn update_subject(&self, id: i64, subject: &SubjectUpsert) -> Result<Subject, Error> {
        debug!(id, "updating subject");
        self.put(&format!("subjects/{id}"), subject).await
    }

    /// Delete a subject.
    ///
    /// `DELETE /subjects/{id}`
    pub async fn delete_subject(&self, id: i64) -> Result<(), Error> {
        debug!(id, "deleting subject");
        self.delete(&format!("subjects/{id}")).await
    }
}
