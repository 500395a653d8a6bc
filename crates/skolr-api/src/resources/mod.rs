// ── Resource clients ──
//
// One module per REST resource, each implemented as inherent methods on
// `ApiClient`. All of them ride the shared pipeline in `client.rs`:
// bearer auth, the in-flight gauge, and centralized error mapping.

mod classes;
mod dashboard;
mod grades;
mod reports;
mod students;
mod subjects;
mod teachers;

pub use reports::{ExportFormat, ImportOutcome, ReportExport};
