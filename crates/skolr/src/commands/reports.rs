//! Class report viewing and export.

use std::fmt::Write as _;
use std::io::Write as _;

use tabled::Tabled;

use skolr_api::models::{ClassReport, SubjectAverage};
use skolr_api::resources::ExportFormat;
use skolr_core::AppContext;

use crate::cli::{ExportFormatArg, GlobalOpts, OutputFormat, ReportsArgs, ReportsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

impl From<ExportFormatArg> for ExportFormat {
    fn from(arg: ExportFormatArg) -> Self {
        match arg {
            ExportFormatArg::Pdf => ExportFormat::Pdf,
            ExportFormatArg::Csv => ExportFormat::Csv,
            ExportFormatArg::Excel => ExportFormat::Excel,
        }
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SubjectAverageRow {
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Average")]
    average: String,
    #[tabled(rename = "Grades")]
    grades: u64,
}

fn average_row(avg: &SubjectAverage) -> SubjectAverageRow {
    SubjectAverageRow {
        subject: avg.subject_name.clone(),
        average: format!("{:.2}", avg.average),
        grades: avg.grade_count,
    }
}

fn detail(report: &ClassReport) -> String {
    let mut out = format!(
        "Class:    {} (id {})\nStudents: {}",
        report.class_name, report.class_id, report.student_count
    );
    if !report.subject_averages.is_empty() {
        let table = output::render_list(
            &OutputFormat::Table,
            &report.subject_averages,
            average_row,
            |avg| avg.subject_id.to_string(),
        );
        let _ = write!(out, "\n\n{table}");
    }
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ctx: &AppContext,
    args: ReportsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_auth(ctx)?;

    match args.command {
        ReportsCommand::Class { id } => {
            let report = ctx.api.class_report(id).await?;
            let out = output::render_single(&global.output, &report, detail, |r| {
                r.class_id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ReportsCommand::Export { id, format, out } => {
            let export = ctx.api.export_class_report(id, format.into()).await?;

            let path = out.unwrap_or_else(|| export.filename.clone().into());
            let mut file = std::fs::File::create(&path)?;
            file.write_all(&export.bytes)?;

            output::success(
                &format!(
                    "Report written to {} ({} bytes)",
                    path.display(),
                    export.bytes.len()
                ),
                output::should_color(&global.color),
                global.quiet,
            );
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn class_detail_renders_subject_averages_as_a_table() {
        let report = ClassReport {
            class_id: 7,
            class_name: "7B".into(),
            student_count: 24,
            subject_averages: vec![SubjectAverage {
                subject_id: 1,
                subject_name: "Mathematics".into(),
                average: 4.25,
                grade_count: 48,
            }],
            grades: Vec::new(),
        };

        let out = detail(&report);

        assert!(out.contains("Class:    7B (id 7)"));
        assert!(out.contains("Subject"));
        assert!(out.contains("Mathematics"));
        assert!(out.contains("4.25"));
    }

    #[test]
    fn class_detail_without_averages_skips_the_table() {
        let report = ClassReport {
            class_id: 3,
            class_name: "3A".into(),
            student_count: 18,
            subject_averages: Vec::new(),
            grades: Vec::new(),
        };
        assert!(!detail(&report).contains("Subject"));
    }
}
