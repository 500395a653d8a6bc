//! Role-scoped dashboard view.

use std::fmt::Write;

use skolr_api::models::DashboardSummary;
use skolr_core::AppContext;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(summary: &DashboardSummary) -> String {
    let mut out = String::new();
    if let Some(n) = summary.student_count {
        let _ = writeln!(out, "Students: {n}");
    }
    if let Some(n) = summary.teacher_count {
        let _ = writeln!(out, "Teachers: {n}");
    }
    if let Some(n) = summary.class_count {
        let _ = writeln!(out, "Classes:  {n}");
    }
    if let Some(n) = summary.subject_count {
        let _ = writeln!(out, "Subjects: {n}");
    }
    if let Some(avg) = summary.average_grade {
        let _ = writeln!(out, "Average grade: {avg:.2}");
    }
    if !summary.recent_grades.is_empty() {
        let _ = writeln!(out, "\nRecent grades:");
        for g in &summary.recent_grades {
            let _ = writeln!(
                out,
                "  {}  student {}  subject {}  {:.1}",
                g.graded_at.format("%Y-%m-%d"),
                g.student_id,
                g.subject_id,
                g.value
            );
        }
    }
    out.trim_end().to_owned()
}

/// Fetch and render the dashboard for the signed-in user's role.
pub async fn handle(ctx: &AppContext, global: &GlobalOpts) -> Result<(), CliError> {
    util::require_auth(ctx)?;
    let Some(user) = ctx.session.current_user() else {
        return Err(CliError::NotSignedIn);
    };

    let cache_key = user.role.to_string();
    let summary = match ctx.caches.dashboards.get(&cache_key) {
        Some(cached) => cached,
        None => {
            let fetched = ctx.api.dashboard(user.role).await?;
            ctx.caches.dashboards.set(cache_key, fetched.clone());
            fetched
        }
    };

    let out = output::render_single(&global.output, &summary, detail, |s| {
        s.average_grade.map(|a| a.to_string()).unwrap_or_default()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
