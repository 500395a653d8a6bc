//! Student command handlers.

use tabled::Tabled;

use skolr_api::models::{Student, StudentUpsert};
use skolr_core::AppContext;

use crate::cli::{GlobalOpts, StudentsArgs, StudentsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct StudentRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Number")]
    number: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Class")]
    class: String,
}

impl From<&Student> for StudentRow {
    fn from(s: &Student) -> Self {
        Self {
            id: s.id,
            number: s.student_number.clone(),
            name: format!("{} {}", s.first_name, s.last_name),
            email: util::cell(s.email.as_ref()),
            class: util::cell(s.class_id.as_ref()),
        }
    }
}

/// Row constructor shared with the class roster view.
pub(crate) fn row(s: &Student) -> StudentRow {
    StudentRow::from(s)
}

fn detail(s: &Student) -> String {
    let mut out = format!(
        "ID:             {}\nName:           {} {}\nStudent number: {}",
        s.id, s.first_name, s.last_name, s.student_number
    );
    if let Some(ref email) = s.email {
        out.push_str(&format!("\nEmail:          {email}"));
    }
    if let Some(dob) = s.date_of_birth {
        out.push_str(&format!("\nDate of birth:  {dob}"));
    }
    if let Some(class_id) = s.class_id {
        out.push_str(&format!("\nClass:          {class_id}"));
    }
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ctx: &AppContext,
    args: StudentsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_auth(ctx)?;

    match args.command {
        StudentsCommand::List => {
            let students = match ctx.caches.students.get("all") {
                Some(cached) => cached,
                None => {
                    let fetched = ctx.api.list_students().await?;
                    ctx.caches.students.set("all", fetched.clone());
                    fetched
                }
            };
            let out = output::render_list(
                &global.output,
                &students,
                |s| StudentRow::from(s),
                |s| s.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        StudentsCommand::Get { id } => {
            let student = ctx.api.get_student(id).await?;
            let out =
                output::render_single(&global.output, &student, detail, |s| s.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        StudentsCommand::Create {
            first_name,
            last_name,
            student_number,
            email,
            date_of_birth,
            class_id,
        } => {
            let created = ctx
                .api
                .create_student(&StudentUpsert {
                    first_name,
                    last_name,
                    email,
                    student_number,
                    date_of_birth,
                    class_id,
                })
                .await?;
            ctx.caches.students.remove("all");
            output::success(
                &format!("Student {} created (id {})", created.student_number, created.id),
                output::should_color(&global.color),
                global.quiet,
            );
            Ok(())
        }

        StudentsCommand::Update {
            id,
            first_name,
            last_name,
            student_number,
            email,
            date_of_birth,
            class_id,
        } => {
            // Partial flags merged over the current server state.
            let current = ctx.api.get_student(id).await?;
            let updated = ctx
                .api
                .update_student(
                    id,
                    &StudentUpsert {
                        first_name: first_name.unwrap_or(current.first_name),
                        last_name: last_name.unwrap_or(current.last_name),
                        email: email.or(current.email),
                        student_number: student_number.unwrap_or(current.student_number),
                        date_of_birth: date_of_birth.or(current.date_of_birth),
                        class_id: class_id.or(current.class_id),
                    },
                )
                .await?;
            ctx.caches.students.remove("all");
            output::success(
                &format!("Student {} updated", updated.id),
                output::should_color(&global.color),
                global.quiet,
            );
            Ok(())
        }

        StudentsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete student {id}?"), global.yes)? {
                return Ok(());
            }
            ctx.api.delete_student(id).await?;
            ctx.caches.students.remove("all");
            output::success(
                &format!("Student {id} deleted"),
                output::should_color(&global.color),
                global.quiet,
            );
            Ok(())
        }

        StudentsCommand::Import { file } => {
            let (filename, bytes) = util::read_upload(&file)?;
            let outcome = ctx.api.import_students(&filename, bytes).await?;
            ctx.caches.students.clear();

            output::success(
                &format!(
                    "Imported {} students ({} skipped)",
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
