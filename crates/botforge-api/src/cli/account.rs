//! Account CLI commands: register, login, logout, whoami, reset.

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input, Password};
use secrecy::SecretString;

use botforge_types::account::RegisterRequest;

use crate::state::AppState;

fn prompt_if_missing(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::<String>::new().with_prompt(prompt).interact_text()?),
    }
}

/// Create an account. Passwords are always prompted, never taken as flags.
pub async fn register(
    state: &AppState,
    name: Option<String>,
    email: Option<String>,
    json: bool,
) -> Result<()> {
    let name = match name {
        Some(n) => n,
        None => Input::<String>::new()
            .with_prompt("Name")
            .allow_empty(true)
            .interact_text()?,
    };
    let email = prompt_if_missing(email, "Email")?;
    let password = Password::new().with_prompt("Password").interact()?;
    let confirm_password = Password::new().with_prompt("Confirm password").interact()?;

    let account = state
        .account_service
        .register(RegisterRequest {
            name,
            email,
            password: SecretString::from(password),
            confirm_password: SecretString::from(confirm_password),
        })
        .await?;

    if json {
        println!(
            "{}",
            serde_json::json!({"id": account.id.0, "name": account.name, "email": account.email})
        );
        return Ok(());
    }

    println!();
    println!("  {} Account created for {}", style("✓").green().bold(), style(&account.email).cyan());
    println!("  Log in with: {}", style("bforge login").yellow());
    println!();
    Ok(())
}

pub async fn login(state: &AppState, email: Option<String>, json: bool) -> Result<()> {
    let email = prompt_if_missing(email, "Email")?;
    let password = Password::new().with_prompt("Password").interact()?;

    let session = state.account_service.login(&email, &password).await?;

    if json {
        println!("{}", serde_json::json!({"loggedIn": true, "email": session.email()}));
    } else {
        println!("  {} Logged in as {}", style("✓").green().bold(), style(&session).cyan());
    }
    Ok(())
}

pub async fn logout(state: &AppState, json: bool) -> Result<()> {
    state.account_service.logout().await?;
    if json {
        println!("{}", serde_json::json!({"loggedIn": false}));
    } else {
        println!("  Logged out.");
    }
    Ok(())
}

pub async fn whoami(state: &AppState, json: bool) -> Result<()> {
    let session = state.account_service.whoami().await?;

    if json {
        println!(
            "{}",
            serde_json::json!({"email": session.as_ref().map(|s| s.email())})
        );
        return Ok(());
    }

    match session {
        Some(s) => println!("  {}", style(s).cyan()),
        None => println!(
            "  {} Not logged in. Run {}",
            style("i").blue().bold(),
            style("bforge login").yellow()
        ),
    }
    println!("  {} {}", style("Data:").dim(), style(state.data_dir.display()).dim());
    Ok(())
}

/// Erase every account and bot. Bots already ingested into the knowledge
/// service are not touched.
pub async fn reset(state: &AppState, force: bool, json: bool) -> Result<()> {
    if !force {
        if json {
            anyhow::bail!("refusing to reset without --force");
        }
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Erase {} accounts, bots, and the session?",
                style("ALL").red().bold()
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    state.account_service.reset().await?;

    if json {
        println!("{}", serde_json::json!({"reset": true}));
    } else {
        println!("  {} Store reset.", style("✓").red().bold());
    }
    Ok(())
}
