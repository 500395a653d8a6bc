//! Teacher command handlers.

use tabled::Tabled;

use skolr_api::models::{Teacher, TeacherUpsert};
use skolr_core::AppContext;

use crate::cli::{GlobalOpts, TeachersArgs, TeachersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct TeacherRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Subjects")]
    subjects: String,
}

impl From<&Teacher> for TeacherRow {
    fn from(t: &Teacher) -> Self {
        Self {
            id: t.id,
            name: format!("{} {}", t.first_name, t.last_name),
            email: util::cell(t.email.as_ref()),
            subjects: t
                .subject_ids
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ctx: &AppContext,
    args: TeachersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_auth(ctx)?;

    match args.command {
        TeachersCommand::List => {
            let teachers = match ctx.caches.teachers.get("all") {
                Some(cached) => cached,
                None => {
                    let fetched = ctx.api.list_teachers().await?;
                    ctx.caches.teachers.set("all", fetched.clone());
                    fetched
                }
            };
            let out = output::render_list(
                &global.output,
                &teachers,
                |t| TeacherRow::from(t),
                |t| t.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TeachersCommand::Get { id } => {
            let teacher = ctx.api.get_teacher(id).await?;
            let out = output::render_single(
                &global.output,
                &teacher,
                |t| {
                    let mut s = format!("ID:       {}\nName:     {} {}", t.id, t.first_name, t.last_name);
                    if let Some(ref email) = t.email {
                        s.push_str(&format!("\nEmail:    {email}"));
                    }
                    if !t.subject_ids.is_empty() {
                        s.push_str(&format!("\nSubjects: {}", TeacherRow::from(t).subjects));
                    }
                    s
                },
                |t| t.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TeachersCommand::Create {
            first_name,
            last_name,
            email,
            subject_ids,
        } => {
            let created = ctx
                .api
                .create_teacher(&TeacherUpsert {
                    first_name,
                    last_name,
                    email,
                    subject_ids,
                })
                .await?;
            ctx.caches.teachers.remove("all");
            output::success(
                &format!("Teacher created (id {})", created.id),
                output::should_color(&global.color),
                global.quiet,
            );
            Ok(())
        }

        TeachersCommand::Update {
            id,
            first_name,
            last_name,
            email,
            subject_ids,
        } => {
            let current = ctx.api.get_teacher(id).await?;
            let updated = ctx
                .api
                .update_teacher(
                    id,
                    &TeacherUpsert {
                        first_name: first_name.unwrap_or(current.first_name),
                        last_name: last_name.unwrap_or(current.last_name),
                        email: email.or(current.email),
                        subject_ids: if subject_ids.is_empty() {
                            current.subject_ids
                        } else {
                            subject_ids
                        },
                    },
                )
                .await?;
            ctx.caches.teachers.remove("all");
            output::success(
                &format!("Teacher {} updated", updated.id),
                output::should_color(&global.color),
                global.quiet,
            );
            Ok(())
        }

        TeachersCommand::Delete { id } => {
            if !util::confirm(&format!("Delete teacher {id}?"), global.yes)? {
                return Ok(());
            }
            ctx.api.delete_teacher(id).await?;
            ctx.caches.teachers.remove("all");
            output::success(
                &format!("Teacher {id} deleted"),
                output::should_color(&global.color),
                global.quiet,
            );
            Ok(())
        }
    }
}
