//! Grade command handlers.

use tabled::Tabled;

use skolr_api::models::{Grade, GradeUpsert};
use skolr_core::AppContext;

use crate::cli::{GlobalOpts, GradesArgs, GradesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct GradeRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Student")]
    student: i64,
    #[tabled(rename = "Subject")]
    subject: i64,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Graded at")]
    graded_at: String,
    #[tabled(rename = "Comment")]
    comment: String,
}

impl From<&Grade> for GradeRow {
    fn from(g: &Grade) -> Self {
        Self {
            id: g.id,
            student: g.student_id,
            subject: g.subject_id,
            value: format!("{:.1}", g.value),
            graded_at: g.graded_at.format("%Y-%m-%d").to_string(),
            comment: util::cell(g.comment.as_ref()),
        }
    }
}

fn detail(g: &Grade) -> String {
    let mut out = format!(
        "ID:        {}\nStudent:   {}\nSubject:   {}\nValue:     {}\nGraded at: {}",
        g.id, g.student_id, g.subject_id, g.value, g.graded_at
    );
    if let Some(ref comment) = g.comment {
        out.push_str(&format!("\nComment:   {comment}"));
    }
    if let Some(teacher_id) = g.teacher_id {
        out.push_str(&format!("\nEntered by: {teacher_id}"));
    }
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ctx: &AppContext,
    args: GradesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_auth(ctx)?;

    match args.command {
        GradesCommand::List { student, class } => {
            let cache_key = match (student, class) {
                (Some(id), _) => format!("student:{id}"),
                (None, Some(id)) => format!("class:{id}"),
                (None, None) => "all".to_owned(),
            };
            let grades = match ctx.caches.grades.get(&cache_key) {
                Some(cached) => cached,
                None => {
                    let fetched = match (student, class) {
                        (Some(id), _) => ctx.api.list_grades_for_student(id).await?,
                        (None, Some(id)) => ctx.api.list_grades_for_class(id).await?,
                        (None, None) => ctx.api.list_grades().await?,
                    };
                    ctx.caches.grades.set(cache_key, fetched.clone());
                    fetched
                }
            };
            let out = output::render_list(
                &global.output,
                &grades,
                |g| GradeRow::from(g),
                |g| g.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GradesCommand::Get { id } => {
            let grade = ctx.api.get_grade(id).await?;
            let out = output::render_single(&global.output, &grade, detail, |g| g.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GradesCommand::Create {
            student_id,
            subject_id,
            value,
            comment,
        } => {
            let created = ctx
                .api
                .create_grade(&GradeUpsert {
                    student_id,
                    subject_id,
                    value,
                    comment,
                })
                .await?;
            ctx.caches.grades.clear();
            output::success(
                &format!("Grade entered (id {})", created.id),
                output::should_color(&global.color),
                global.quiet,
            );
            Ok(())
        }

        GradesCommand::Update {
            id,
            student_id,
            subject_id,
            value,
            comment,
        } => {
            let updated = ctx
                .api
                .update_grade(
                    id,
                    &GradeUpsert {
                        student_id,
                        subject_id,
                        value,
                        comment,
                    },
                )
                .await?;
            ctx.caches.grades.clear();
            output::success(
                &format!("Grade {} updated", updated.id),
                output::should_color(&global.color),
                global.quiet,
            );
            Ok(())
        }

        GradesCommand::Delete { id } => {
            if !util::confirm(&format!("Delete grade {id}?"), global.yes)? {
                return Ok(());
            }
            ctx.api.delete_grade(id).await?;
            ctx.caches.grades.clear();
            output::success(
                &format!("Grade {id} deleted"),
                output::should_color(&global.color),
                global.quiet,
            );
            Ok(())
        }

        GradesCommand::Import { file } => {
            let (filename, bytes) = util::read_upload(&file)?;
            let outcome = ctx.api.import_grades(&filename, bytes).await?;
            ctx.caches.grades.clear();

            output::success(
                &format!(
                    "Imported {} grades ({} skipped)",
                    outcome.imported, outcome.skipped
                ),
                output::should_color(&global.color),
                global.quiet,
            );
            for err in &outcome.errors {
                eprintln!("  {err}");
            }
            Ok(())
        }
    }
}
