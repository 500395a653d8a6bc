// ── Notification bus ──
//
// Transient user-facing messages, observable as a list. Success, info,
// and warning messages dismiss themselves after a timeout; errors stay
// until the user dismisses them.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

/// How long non-error notifications stay visible.
pub const DEFAULT_DISMISS_AFTER: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Info,
    Warning,
    Error,
}

impl NotificationKind {
    /// Errors are sticky by default; everything else auto-dismisses.
    fn persistent_by_default(self) -> bool {
        self == NotificationKind::Error
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NotificationKind::Success => "success",
            NotificationKind::Info => "info",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub title: Option<String>,
    /// How long the notification stays visible when not persistent.
    pub duration: Duration,
    /// Persistent notifications stay until dismissed explicitly.
    pub persistent: bool,
    pub created_at: DateTime<Utc>,
}

/// Per-notification overrides for [`NotificationBus::show_with`].
/// Unset fields fall back to the kind's defaults.
#[derive(Debug, Clone, Default)]
pub struct ShowOptions {
    pub title: Option<String>,
    pub duration: Option<Duration>,
    pub persistent: Option<bool>,
}

/// Fan-out point for notifications. The active list lives behind a
/// `watch` channel; renderers subscribe and repaint on change.
pub struct NotificationBus {
    active: Arc<watch::Sender<Vec<Notification>>>,
    dismiss_after: Duration,
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(DEFAULT_DISMISS_AFTER)
    }
}

impl NotificationBus {
    pub fn new(dismiss_after: Duration) -> Self {
        let (tx, _) = watch::channel(Vec::new());
        Self {
            active: Arc::new(tx),
            dismiss_after,
        }
    }

    /// Publish a notification with the kind's defaults: errors persist,
    /// everything else is removed after the bus's dismiss timeout.
    /// Returns the id for manual dismissal.
    pub fn show(&self, kind: NotificationKind, message: impl Into<String>) -> Uuid {
        self.show_with(kind, message, ShowOptions::default())
    }

    /// Publish a notification with explicit overrides. A non-persistent
    /// notification is removed automatically after its duration; a later
    /// timer fire after a manual dismissal is harmless.
    pub fn show_with(
        &self,
        kind: NotificationKind,
        message: impl Into<String>,
        options: ShowOptions,
    ) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            title: options.title,
            duration: options.duration.unwrap_or(self.dismiss_after),
            persistent: options.persistent.unwrap_or(kind.persistent_by_default()),
            created_at: Utc::now(),
        };
        let id = notification.id;
        let persistent = notification.persistent;
        let after = notification.duration;
        debug!(%kind, %id, persistent, "notification shown");
        self.active.send_modify(|list| list.push(notification));

        if !persistent {
            let tx = Arc::clone(&self.active);
            tokio::spawn(async move {
                tokio::time::sleep(after).await;
                tx.send_if_modified(|list| {
                    let before = list.len();
                    list.retain(|n| n.id != id);
                    list.len() != before
                });
            });
        }
        id
    }

    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.show(NotificationKind::Success, message)
    }

    pub fn info(&self, message: impl Into<String>) -> Uuid {
        self.show(NotificationKind::Info, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> Uuid {
        self.show(NotificationKind::Warning, message)
    }

    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.show(NotificationKind::Error, message)
    }

    /// Dismiss by id. Returns whether anything was removed; dismissing
    /// twice is a no-op.
    pub fn dismiss(&self, id: Uuid) -> bool {
        self.active.send_if_modified(|list| {
            let before = list.len();
            list.retain(|n| n.id != id);
            list.len() != before
        })
    }

    /// Drop everything, errors included.
    pub fn clear(&self) {
        self.active.send_if_modified(|list| {
            let had_any = !list.is_empty();
            list.clear();
            had_any
        });
    }

    /// Snapshot of the currently visible notifications, oldest first.
    pub fn active(&self) -> Vec<Notification> {
        self.active.borrow().clone()
    }

    /// Observe the active list.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.active.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test(start_paused = true)]
    async fn info_auto_dismisses_after_timeout() {
        let bus = NotificationBus::default();
        let mut rx = bus.subscribe();

        bus.info("saved");
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().len(), 1);

        tokio::time::advance(DEFAULT_DISMISS_AFTER + Duration::from_millis(1)).await;
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn short_lived_notification_is_gone_after_its_duration() {
        let bus = NotificationBus::default();
        bus.show_with(
            NotificationKind::Info,
            "blink",
            ShowOptions {
                duration: Some(Duration::from_millis(100)),
                ..ShowOptions::default()
            },
        );
        assert_eq!(bus.active().len(), 1);

        tokio::time::advance(Duration::from_millis(150)).await;
        tokio::task::yield_now().await;
        assert!(bus.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_override_outlives_the_timeout() {
        let bus = NotificationBus::default();
        let id = bus.show_with(
            NotificationKind::Info,
            "pinned",
            ShowOptions {
                title: Some("Heads up".into()),
                persistent: Some(true),
                ..ShowOptions::default()
            },
        );

        tokio::time::advance(Duration::from_secs(3600)).await;
        tokio::task::yield_now().await;

        let active = bus.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].title.as_deref(), Some("Heads up"));
        assert!(bus.dismiss(id));
    }

    #[tokio::test(start_paused = true)]
    async fn error_persists_until_dismissed() {
        let bus = NotificationBus::default();
        let id = bus.error("import failed");

        tokio::time::advance(Duration::from_secs(3600)).await;
        tokio::task::yield_now().await;

        assert_eq!(bus.active().len(), 1);
        assert!(bus.dismiss(id));
        assert!(bus.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dismissing_twice_is_a_noop() {
        let bus = NotificationBus::default();
        let id = bus.warning("careful");
        assert!(bus.dismiss(id));
        assert!(!bus.dismiss(id));
    }

    #[tokio::test(start_paused = true)]
    async fn manual_dismiss_before_timeout_does_not_double_remove() {
        let bus = NotificationBus::default();
        let keep = bus.error("sticky");
        let id = bus.success("done");
        assert!(bus.dismiss(id));

        // The expired auto-dismiss must not touch other notifications.
        tokio::time::advance(DEFAULT_DISMISS_AFTER + Duration::from_millis(1)).await;
        tokio::task::yield_now().await;

        let active = bus.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, keep);
    }

    #[tokio::test(start_paused = true)]
    async fn active_list_is_oldest_first() {
        let bus = NotificationBus::default();
        bus.info("first");
        bus.info("second");
        let active = bus.active();
        assert_eq!(active[0].message, "first");
        assert_eq!(active[1].message, "second");
    }

    #[tokio::test(start_paused = true)]
    async fn clear_drops_errors_too() {
        let bus = NotificationBus::default();
        bus.error("boom");
        bus.info("ok");
        bus.clear();
        assert!(bus.active().is_empty());
    }
}
