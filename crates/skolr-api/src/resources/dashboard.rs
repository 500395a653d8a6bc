// Dashboard endpoint.

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{DashboardSummary, Role};

impl ApiClient {
    /// Fetch the dashboard summary tailored to a role.
    ///
    /// `GET /dashboard/{role}` -- the server scopes the payload to what
    /// the role may see (a student gets only their own recent grades).
    pub async fn dashboard(&self, role: Role) -> Result<DashboardSummary, Error> {
        self.get(&format!("dashboard/{role}")).await
    }
}
