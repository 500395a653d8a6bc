//! Class command handlers.

use tabled::Tabled;

use skolr_api::models::{ClassUpsert, SchoolClass};
use skolr_core::AppContext;

use crate::cli::{ClassesArgs, ClassesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{students, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ClassRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Year")]
    year: i32,
    #[tabled(rename = "Teacher")]
    teacher: String,
    #[tabled(rename = "Students")]
    students: String,
}

impl From<&SchoolClass> for ClassRow {
    fn from(c: &SchoolClass) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            year: c.year,
            teacher: util::cell(c.teacher_id.as_ref()),
            students: util::cell(c.student_count.as_ref()),
        }
    }
}

fn detail(c: &SchoolClass) -> String {
    let mut out = format!("ID:    {}\nName:  {}\nYear:  {}", c.id, c.name, c.year);
    if let Some(teacher_id) = c.teacher_id {
        out.push_str(&format!("\nHomeroom teacher: {teacher_id}"));
    }
    if let Some(count) = c.student_count {
        out.push_str(&format!("\nStudents:         {count}"));
    }
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ctx: &AppContext,
    args: ClassesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_auth(ctx)?;

    match args.command {
        ClassesCommand::List => {
            let classes = match ctx.caches.classes.get("all") {
                Some(cached) => cached,
                None => {
                    let fetched = ctx.api.list_classes().await?;
                    ctx.caches.classes.set("all", fetched.clone());
                    fetched
                }
            };
            let out = output::render_list(
                &global.output,
                &classes,
                |c| ClassRow::from(c),
                |c| c.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ClassesCommand::Get { id } => {
            let class = ctx.api.get_class(id).await?;
            let out = output::render_single(&global.output, &class, detail, |c| c.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ClassesCommand::Students { id } => {
            let roster = ctx.api.list_class_students(id).await?;
            let out = output::render_list(
                &global.output,
                &roster,
                students::row,
                |s| s.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ClassesCommand::Create {
            name,
            year,
            teacher_id,
        } => {
            let created = ctx
                .api
                .create_class(&ClassUpsert {
                    name,
                    year,
                    teacher_id,
                })
                .await?;
            ctx.caches.classes.remove("all");
            output::success(
                &format!("Class {} created (id {})", created.name, created.id),
                output::should_color(&global.color),
                global.quiet,
            );
            Ok(())
        }

        ClassesCommand::Update {
            id,
            name,
            year,
            teacher_id,
        } => {
            let current = ctx.api.get_class(id).await?;
            let updated = ctx
                .api
                .update_class(
                    id,
                    &ClassUpsert {
                        name: name.unwrap_or(current.name),
                        year: year.unwrap_or(current.year),
                        teacher_id: teacher_id.or(current.teacher_id),
                    },
                )
                .await?;
            ctx.caches.classes.remove("all");
            output::success(
                &format!("Class {} updated", updated.id),
                output::should_color(&global.color),
                global.quiet,
            );
            Ok(())
        }

        ClassesCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete class {id}? Enrolled students keep their records."),
                global.yes,
            )? {
                return Ok(());
            }
            ctx.api.delete_class(id).await?;
            ctx.caches.classes.remove("all");
            output::success(
                &format!("Class {id} deleted"),
                output::should_color(&global.color),
                global.quiet,
            );
            Ok(())
        }
    }
}
