//! Sign-in, sign-out, and whoami handlers.

use std::io::Read;

use dialoguer::Input;
use secrecy::SecretString;

use skolr_core::AppContext;

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        message: "interactive prompt failed".into(),
        detail: e.to_string(),
    }
}

/// Resolve the password: --password-stdin, then the profile's credential
/// chain (env, keyring, plaintext), then an interactive prompt.
fn resolve_password(
    args: &LoginArgs,
    profile_name: &str,
    username: &str,
) -> Result<SecretString, CliError> {
    if args.password_stdin {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(SecretString::from(buf.trim_end().to_owned()));
    }

    let cfg = config::load_config_or_default();
    if let Some(profile) = cfg.profiles.get(profile_name) {
        if let Ok((configured_user, password)) = config::resolve_credentials(profile, profile_name)
        {
            if configured_user == username {
                return Ok(password);
            }
        }
    }

    let pass = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
    if pass.is_empty() {
        return Err(CliError::Validation {
            message: "empty password".into(),
            detail: "password cannot be empty".into(),
        });
    }
    Ok(SecretString::from(pass))
}

pub async fn login(
    ctx: &AppContext,
    args: LoginArgs,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let username = match args.username.clone() {
        Some(u) => u,
        None => {
            // Fall back to the profile's username before prompting.
            let cfg = config::load_config_or_default();
            match cfg
                .profiles
                .get(profile_name)
                .and_then(|p| p.username.clone())
            {
                Some(u) => u,
                None => Input::new()
                    .with_prompt("Username")
                    .interact_text()
                    .map_err(prompt_err)?,
            }
        }
    };

    let password = resolve_password(&args, profile_name, &username)?;
    let user = ctx.session.login(&username, &password).await?;

    output::success(
        &format!("Signed in as {} ({})", user.username, user.role),
        output::should_color(&global.color),
        global.quiet,
    );
    Ok(())
}

pub async fn logout(ctx: &AppContext, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.sign_out().await;
    output::success(
        "Signed out",
        output::should_color(&global.color),
        global.quiet,
    );
    Ok(())
}

pub async fn whoami(ctx: &AppContext, global: &GlobalOpts) -> Result<(), CliError> {
    if !ctx.session.is_authenticated() {
        return Err(CliError::NotSignedIn);
    }
    // Refetch so the answer reflects the server, not a stale snapshot.
    let user = ctx.session.refresh_user().await?;

    let out = output::render_single(
        &global.output,
        &user,
        |u| {
            let mut s = format!("Username: {}\nEmail:    {}\nRole:     {}", u.username, u.email, u.role);
            if let Some(exp) = ctx.session.claims().and_then(|c| c.expires_at()) {
                s.push_str(&format!("\nSession expires: {exp}"));
            }
            s
        },
        |u| u.username.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
