//! Command dispatch: bridges CLI args -> core services -> output formatting.

pub mod auth_cmd;
pub mod classes;
pub mod config_cmd;
pub mod dashboard;
pub mod grades;
pub mod reports;
pub mod students;
pub mod subjects;
pub mod teachers;
pub mod util;

use skolr_core::AppContext;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    ctx: &AppContext,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth_cmd::login(ctx, args, profile_name, global).await,
        Command::Logout => auth_cmd::logout(ctx, global).await,
        Command::Whoami => auth_cmd::whoami(ctx, global).await,
        Command::Students(args) => students::handle(ctx, args, global).await,
        Command::Teachers(args) => teachers::handle(ctx, args, global).await,
        Command::Classes(args) => classes::handle(ctx, args, global).await,
        Command::Subjects(args) => subjects::handle(ctx, args, global).await,
        Command::Grades(args) => grades::handle(ctx, args, global).await,
        Command::Dashboard => dashboard::handle(ctx, global).await,
        Command::Reports(args) => reports::handle(ctx, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
