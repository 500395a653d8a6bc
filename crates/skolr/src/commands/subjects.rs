//! Subject command handlers.

use tabled::Tabled;

use skolr_api::models::{Subject, SubjectUpsert};
use skolr_core::AppContext;

use crate::cli::{GlobalOpts, SubjectsArgs, SubjectsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SubjectRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Code")]
    code: String,
}

impl From<&Subject> for SubjectRow {
    fn from(s: &Subject) -> Self {
        Self {
            id: s.id,
            name: s.name.clone(),
            code: util::cell(s.code.as_ref()),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ctx: &AppContext,
    args: SubjectsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_auth(ctx)?;

    match args.command {
        SubjectsCommand::List => {
            let subjects = match ctx.caches.subjects.get("all") {
                Some(cached) => cached,
                None => {
                    let fetched = ctx.api.list_subjects().await?;
                    ctx.caches.subjects.set("all", fetched.clone());
                    fetched
                }
            };
            let out = output::render_list(
                &global.output,
                &subjects,
                |s| SubjectRow::from(s),
                |s| s.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SubjectsCommand::Get { id } => {
            let subject = ctx.api.get_subject(id).await?;
            let out = output::render_single(
                &global.output,
                &subject,
                |s| {
                    let mut d = format!("ID:   {}\nName: {}", s.id, s.name);
                    if let Some(ref code) = s.code {
                        d.push_str(&format!("\nCode: {code}"));
                    }
                    d
                },
                |s| s.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SubjectsCommand::Create { name, code } => {
            let created = ctx.api.create_subject(&SubjectUpsert { name, code }).await?;
            ctx.caches.subjects.remove("all");
            output::success(
                &format!("Subject {} created (id {})", created.name, created.id),
                output::should_color(&global.color),
                global.quiet,
            );
            Ok(())
        }

        SubjectsCommand::Update { id, name, code } => {
            let current = ctx.api.get_subject(id).await?;
            let updated = ctx
                .api
                .update_subject(
                    id,
                    &SubjectUpsert {
                        name: name.unwrap_or(current.name),
                        code: code.or(current.code),
                    },
                )
                .await?;
            ctx.caches.subjects.remove("all");
            output::success(
                &format!("Subject {} updated", updated.id),
                output::should_color(&global.color),
                global.quiet,
            );
            Ok(())
        }

        SubjectsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete subject {id}?"), global.yes)? {
                return Ok(());
            }
            ctx.api.delete_subject(id).await?;
            ctx.caches.subjects.remove("all");
            output::success(
                &format!("Subject {id} deleted"),
                output::should_color(&global.color),
                global.quiet,
            );
            Ok(())
        }
    }
}
