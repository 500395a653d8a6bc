//! Shared helpers for command handlers.

use std::path::Path;

use skolr_core::AppContext;

use crate::error::CliError;

/// Fail early with a sign-in hint when no valid session is held.
///
/// Every server endpoint would reject the request anyway; checking here
/// gives a clearer message before any network traffic.
pub fn require_auth(ctx: &AppContext) -> Result<(), CliError> {
    if ctx.session.is_authenticated() {
        Ok(())
    } else {
        Err(CliError::NotSignedIn)
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read an upload file for `import` commands.
pub fn read_upload(path: &Path) -> Result<(String, Vec<u8>), CliError> {
    let bytes = std::fs::read(path)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.csv".into());
    Ok((filename, bytes))
}

/// Format an optional value for table cells.
pub fn cell<T: std::fmt::Display>(value: Option<&T>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}
