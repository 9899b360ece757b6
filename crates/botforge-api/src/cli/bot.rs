//! Bot lifecycle CLI commands: create, list, show, delete.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::{Input, Password, Select};
use secrecy::SecretString;

use botforge_core::service::access::BotView;
use botforge_core::service::bot::{DeleteOutcome, check_bot_credentials};
use botforge_core::service::embed::embed_snippet;
use botforge_infra::filesystem::read_pdf;
use botforge_types::bot::{Bot, BotId, CreateBotRequest, UserType, delete_confirmation_phrase};
use botforge_types::error::{AuthError, BotError, ValidationError};
use botforge_types::session::Session;

use super::{print_sync, spinner};
use crate::state::AppState;

/// Public fields of a bot. The password digest never leaves the store.
fn bot_json(bot: &Bot) -> serde_json::Value {
    serde_json::json!({
        "id": bot.id.0,
        "company": bot.company,
        "website": bot.website,
        "userType": bot.user_type.to_string(),
        "createdAt": bot.created_at.to_rfc3339(),
    })
}

/// A bad `--company` flag cannot be fixed by prompting again.
fn is_company_error(err: &ValidationError) -> bool {
    *err == ValidationError::MissingField("company name")
}

fn optional_text(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Create a bot via the two-phase wizard or one-shot flags.
///
/// Phase one collects the company name and bot password and is checked before
/// moving on; phase two collects the website, audience, and optional training
/// material.
///
/// # Examples
///
/// ```bash
/// # Interactive wizard
/// bforge create bot
///
/// # One-shot (bot password is still prompted)
/// bforge create bot --company "Acme Co" --website https://acme.test --text "We sell looms."
/// ```
pub async fn create_bot(
    state: &AppState,
    company: Option<String>,
    website: Option<String>,
    user_type: Option<UserType>,
    text: Option<String>,
    pdf: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let session = state.require_session().await?;
    let interactive = company.is_none() || website.is_none();
    let company_flag = company;

    if !json {
        println!();
        println!("  {}", style("Step 1 of 2 · Bot credentials").bold());
    }
    let (company, bot_password, confirm_password) = loop {
        let company = match &company_flag {
            Some(c) => c.clone(),
            None => Input::<String>::new()
                .with_prompt("Company name")
                .interact_text()?,
        };
        let bot_password = Password::new().with_prompt("Bot password").interact()?;
        let confirm_password = Password::new()
            .with_prompt("Confirm bot password")
            .interact()?;

        match check_bot_credentials(&company, &bot_password, &confirm_password) {
            Ok(()) => break (company, bot_password, confirm_password),
            Err(e) if interactive && !(company_flag.is_some() && is_company_error(&e)) => {
                eprintln!("  {} {e}", style("✗").red());
            }
            Err(e) => return Err(e.into()),
        }
    };

    if !json {
        println!();
        println!("  {}", style("Step 2 of 2 · Knowledge").bold());
    }
    let website = match website {
        Some(w) => w,
        None => Input::<String>::new().with_prompt("Website").interact_text()?,
    };
    let user_type = match user_type {
        Some(t) => t,
        None if interactive => {
            let choices = [UserType::Business, UserType::Individual];
            let idx = Select::new()
                .with_prompt("Who is this bot for?")
                .items(&choices)
                .default(0)
                .interact()?;
            choices[idx]
        }
        None => UserType::default(),
    };
    let text = match text {
        Some(t) => Some(t),
        None if interactive => optional_text(Some(
            Input::<String>::new()
                .with_prompt("Training text (optional)")
                .allow_empty(true)
                .interact_text()?,
        )),
        None => None,
    };
    let pdf = match pdf {
        Some(p) => Some(p),
        None if interactive => optional_text(Some(
            Input::<String>::new()
                .with_prompt("PDF path (optional)")
                .allow_empty(true)
                .interact_text()?,
        ))
        .map(PathBuf::from),
        None => None,
    };
    let pdf_file = match pdf {
        Some(path) => Some(read_pdf(&path).await?),
        None => None,
    };

    let spinner = spinner("Creating bot...");
    let result = state
        .bot_lifecycle
        .create(
            &session,
            CreateBotRequest {
                company,
                bot_password: SecretString::from(bot_password),
                confirm_password: SecretString::from(confirm_password),
                website,
                user_type,
                knowledge_text: text,
                pdf_file,
            },
        )
        .await;
    spinner.finish_and_clear();

    let created = match result {
        Ok(created) => created,
        Err(BotError::Ingestion { source, progress }) => {
            if !json {
                println!();
                print_sync(&progress);
            }
            return Err(anyhow::Error::new(source).context("bot was not created"));
        }
        Err(e) => return Err(e.into()),
    };

    let bot = &created.bot;
    if json {
        let mut value = bot_json(bot);
        value["knowledge"] = serde_json::to_value(&created.knowledge)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!();
    println!("  {} Bot created successfully!", style("✓").green().bold());
    println!();
    println!("  {}  {}", style("Company:").bold(), style(&bot.company).cyan());
    println!("  {}  {}", style("Website:").bold(), &bot.website);
    println!("  {}       {}", style("ID:").bold(), style(bot.id).dim());
    println!();
    print_sync(&created.knowledge);
    println!(
        "  Embed it: {}",
        style(format!("bforge show {}", bot.id)).yellow()
    );
    println!();

    Ok(())
}

/// List the session account's bots in a table.
pub async fn list_bots(state: &AppState, json: bool) -> Result<()> {
    let session = state.require_session().await?;
    let bots = state.bot_lifecycle.list(&session).await?;

    if json {
        let values: Vec<_> = bots.iter().map(bot_json).collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
        return Ok(());
    }

    if bots.is_empty() {
        println!();
        println!(
            "  {} No bots found. Create one with: {}",
            style("i").blue().bold(),
            style("bforge create bot").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Company").fg(Color::White),
        Cell::new("Website").fg(Color::White),
        Cell::new("Type").fg(Color::White),
        Cell::new("Created").fg(Color::White),
    ]);

    for bot in &bots {
        table.add_row(vec![
            Cell::new(bot.id).fg(Color::DarkGrey),
            Cell::new(&bot.company).fg(Color::Cyan),
            Cell::new(&bot.website),
            Cell::new(bot.user_type),
            Cell::new(bot.created_at.format("%Y-%m-%d %H:%M UTC")).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} bot{}",
        style(bots.len()).bold(),
        if bots.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Open a bot and prompt for its password until it unlocks.
///
/// Gives up with the service's error once the view's attempt budget is spent.
pub(crate) async fn open_unlocked(
    state: &AppState,
    session: &Session,
    id: BotId,
) -> Result<BotView> {
    let mut view = state.bot_lifecycle.open(session, id).await?;
    loop {
        let supplied = Password::new()
            .with_prompt(format!("Bot password for '{}'", view.bot().company))
            .interact()?;
        match state.bot_lifecycle.unlock_view(&mut view, &supplied) {
            Ok(()) => return Ok(view),
            Err(BotError::Auth(AuthError::IncorrectBotPassword)) => {
                eprintln!("  {} Incorrect bot password", style("✗").red());
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Unlock a bot and print its details and embed snippet.
pub async fn show_bot(state: &AppState, id: BotId, json: bool) -> Result<()> {
    let session = state.require_session().await?;
    let view = open_unlocked(state, &session, id).await?;
    let bot = view.unlocked_bot()?;
    let snippet = embed_snippet(&state.config.embed.widget_base_url, bot.id);

    if json {
        let mut value = bot_json(bot);
        value["embed"] = serde_json::Value::String(snippet);
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!();
    println!("  {}", style(&bot.company).cyan().bold());
    println!();
    println!("  {}", style("── Details ──").dim());
    println!("  {}   {}", style("Website:").bold(), &bot.website);
    println!("  {}      {}", style("Type:").bold(), bot.user_type);
    println!("  {}        {}", style("ID:").bold(), style(bot.id).dim());
    println!(
        "  {}   {}",
        style("Created:").bold(),
        bot.created_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!();
    println!("  {}", style("── Embed ──").dim());
    println!("  {snippet}");
    println!();

    Ok(())
}

/// Delete a bot after the operator types `DELETE <company>`.
pub async fn delete_bot(
    state: &AppState,
    id: BotId,
    confirm: Option<String>,
    json: bool,
) -> Result<()> {
    let session = state.require_session().await?;
    let bot = state.bot_lifecycle.get(&session, id).await?;

    let typed = match confirm {
        Some(c) => c,
        None => {
            let phrase = delete_confirmation_phrase(&bot.company);
            println!(
                "  This permanently deletes '{}'. Type {} to confirm.",
                style(&bot.company).red().bold(),
                style(&phrase).yellow()
            );
            Input::<String>::new()
                .with_prompt("Confirmation")
                .allow_empty(true)
                .interact_text()?
        }
    };

    match state.bot_lifecycle.delete(&session, id, &typed).await? {
        DeleteOutcome::Deleted(removed) => {
            if json {
                println!("{}", serde_json::json!({"deleted": true, "id": removed.id.0}));
            } else {
                println!(
                    "  {} Bot '{}' deleted.",
                    style("✓").red().bold(),
                    removed.company
                );
            }
        }
        DeleteOutcome::NotConfirmed => {
            if json {
                println!("{}", serde_json::json!({"deleted": false, "id": id.0}));
            } else {
                println!("  Confirmation did not match. Nothing deleted.");
            }
        }
    }

    Ok(())
}
