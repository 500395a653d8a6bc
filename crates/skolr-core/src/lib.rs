//! Client-side services between `skolr-api` and UI consumers (CLI).
//!
//! This crate owns the session/authorization model and the cooperating
//! utilities of the skolr workspace:
//!
//! - **[`SessionStore`]** — the single authenticated session. Holds the
//!   current user and token behind a `watch` channel, persists them across
//!   process restarts, and recomputes authentication from the token's
//!   expiry claim on demand.
//!
//! - **[`guard`]** — pure, synchronous route authorization: given a session
//!   snapshot and a route's role allow-list, decide allow / redirect-to-login
//!   / redirect-to-dashboard.
//!
//! - **[`TtlCache`]** — generic key→value store with per-entry expiry,
//!   lazy eviction, a periodic sweeper, and push-based `watch`
//!   subscriptions. Avoids redundant refetches of server data.
//!
//! - **[`NotificationBus`]** — broadcast of transient UI messages with
//!   auto-dismiss timers; errors stay until dismissed.
//!
//! - **[`report`]** — in-memory aggregation of fetched grades for
//!   dashboards and class reports.
//!
//! - **[`AppContext`]** — explicit construction of the above: one instance
//!   per process, passed by reference. No global registration.

pub mod cache;
pub mod context;
pub mod error;
pub mod guard;
pub mod notify;
pub mod report;
pub mod session;

pub use cache::TtlCache;
pub use context::AppContext;
pub use error::CoreError;
pub use guard::{GuardDecision, Route};
pub use notify::{Notification, NotificationBus, NotificationKind, ShowOptions};
pub use session::{Session, SessionStore};
