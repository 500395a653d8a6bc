// ── Application context ──
//
// Explicit construction of the process's long-lived services. There is
// no global registry: `AppContext` is built once in `main` and handed
// down by reference. Everything inside is cheap to share (`Arc` or
// internally synchronized).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use skolr_api::client::{ApiClient, ClientConfig};
use skolr_api::models::{DashboardSummary, Grade, SchoolClass, Student, Subject, Teacher};

use crate::cache::{self, TtlCache, TTL_DEFAULT, TTL_STABLE, TTL_VOLATILE};
use crate::error::CoreError;
use crate::notify::NotificationBus;
use crate::session::SessionStore;

/// How often the background sweeper visits the caches.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// One cache per resource family, each with a TTL matched to how fast
/// the underlying data moves.
pub struct Caches {
    pub students: Arc<TtlCache<Vec<Student>>>,
    pub teachers: Arc<TtlCache<Vec<Teacher>>>,
    pub classes: Arc<TtlCache<Vec<SchoolClass>>>,
    pub subjects: Arc<TtlCache<Vec<Subject>>>,
    pub grades: Arc<TtlCache<Vec<Grade>>>,
    pub dashboards: Arc<TtlCache<DashboardSummary>>,
}

impl Default for Caches {
    fn default() -> Self {
        Self {
            students: Arc::new(TtlCache::new(TTL_DEFAULT)),
            teachers: Arc::new(TtlCache::new(TTL_DEFAULT)),
            classes: Arc::new(TtlCache::new(TTL_DEFAULT)),
            subjects: Arc::new(TtlCache::new(TTL_STABLE)),
            grades: Arc::new(TtlCache::new(TTL_VOLATILE)),
            dashboards: Arc::new(TtlCache::new(TTL_VOLATILE)),
        }
    }
}

impl Caches {
    /// Drop every cached value across all families. Called on logout so
    /// nothing fetched under one account leaks into the next.
    pub fn clear_all(&self) {
        self.students.clear();
        self.teachers.clear();
        self.classes.clear();
        self.subjects.clear();
        self.grades.clear();
        self.dashboards.clear();
        debug!("all caches cleared");
    }
}

/// The wired-together application: API client, session, notifications,
/// and caches, plus the cancellation token that stops background work.
pub struct AppContext {
    pub api: ApiClient,
    pub session: SessionStore,
    pub notifications: NotificationBus,
    pub caches: Caches,
    cancel: CancellationToken,
    sweepers: Vec<JoinHandle<()>>,
}

impl AppContext {
    /// Build the context with the platform-default session file.
    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        let api = ApiClient::new(config)?;
        let session = SessionStore::new(api.clone());
        Ok(Self::assemble(api, session))
    }

    /// Build the context with an explicit session file path.
    pub fn with_session_path(config: &ClientConfig, path: PathBuf) -> Result<Self, CoreError> {
        let api = ApiClient::new(config)?;
        let session = SessionStore::with_vault_path(api.clone(), path);
        Ok(Self::assemble(api, session))
    }

    fn assemble(api: ApiClient, session: SessionStore) -> Self {
        Self {
            api,
            session,
            notifications: NotificationBus::default(),
            caches: Caches::default(),
            cancel: CancellationToken::new(),
            sweepers: Vec::new(),
        }
    }

    /// Start the periodic cache sweepers. Idempotent in effect but not
    /// meant to be called twice; call once after construction when a
    /// runtime is available.
    pub fn start_sweepers(&mut self) {
        for handle in [
            cache::spawn_sweeper(
                Arc::clone(&self.caches.students),
                SWEEP_INTERVAL,
                self.cancel.clone(),
            ),
            cache::spawn_sweeper(
                Arc::clone(&self.caches.teachers),
                SWEEP_INTERVAL,
                self.cancel.clone(),
            ),
            cache::spawn_sweeper(
                Arc::clone(&self.caches.classes),
                SWEEP_INTERVAL,
                self.cancel.clone(),
            ),
            cache::spawn_sweeper(
                Arc::clone(&self.caches.subjects),
                SWEEP_INTERVAL,
                self.cancel.clone(),
            ),
            cache::spawn_sweeper(
                Arc::clone(&self.caches.grades),
                SWEEP_INTERVAL,
                self.cancel.clone(),
            ),
            cache::spawn_sweeper(
                Arc::clone(&self.caches.dashboards),
                SWEEP_INTERVAL,
                self.cancel.clone(),
            ),
        ] {
            self.sweepers.push(handle);
        }
        debug!("cache sweepers started");
    }

    /// End the session and drop all cached data.
    pub async fn sign_out(&self) {
        self.session.logout().await;
        self.caches.clear_all();
    }

    /// Stop background tasks and wait for them to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        for handle in self.sweepers.drain(..) {
            let _ = handle.await;
        }
        debug!("context shut down");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> ClientConfig {
        ClientConfig {
            base_url: "https://school.invalid/api".parse().unwrap(),
            transport: skolr_api::transport::TransportConfig::default(),
        }
    }

    #[tokio::test]
    async fn context_builds_and_shuts_down_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx =
            AppContext::with_session_path(&test_config(), dir.path().join("session.json"))
                .unwrap();
        ctx.start_sweepers();
        assert!(!ctx.session.is_authenticated());
        ctx.shutdown().await;
    }

    #[tokio::test]
    async fn clear_all_empties_every_cache() {
        let caches = Caches::default();
        caches.subjects.set("all", Vec::new());
        caches.grades.set("student:7", Vec::new());
        assert!(caches.subjects.has("all"));

        caches.clear_all();

        assert!(!caches.subjects.has("all"));
        assert!(!caches.grades.has("student:7"));
    }
}
