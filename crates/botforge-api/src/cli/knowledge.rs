//! Knowledge CLI commands: update a bot's knowledge, ask a question.

use std::path::PathBuf;

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input};

use botforge_infra::filesystem::read_pdf;
use botforge_types::bot::BotId;
use botforge_types::error::BotError;
use botforge_types::knowledge::KnowledgeUpdate;

use super::bot::open_unlocked;
use super::{print_sync, spinner};
use crate::state::AppState;

/// Ingest new text and/or a PDF for an unlocked bot.
///
/// Text is sent before the PDF. If a step fails, the steps that already
/// completed stay completed and the operator may retry only the rest.
pub async fn update_knowledge(
    state: &AppState,
    id: BotId,
    text: Option<String>,
    pdf: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let session = state.require_session().await?;
    let view = open_unlocked(state, &session, id).await?;

    let (text, pdf) = if text.is_none() && pdf.is_none() {
        let text = Input::<String>::new()
            .with_prompt("Training text (optional)")
            .allow_empty(true)
            .interact_text()?;
        let pdf = Input::<String>::new()
            .with_prompt("PDF path (optional)")
            .allow_empty(true)
            .interact_text()?;
        let pdf = Some(pdf).filter(|p| !p.trim().is_empty()).map(PathBuf::from);
        (Some(text), pdf)
    } else {
        (text, pdf)
    };

    let pdf_file = match pdf {
        Some(path) => Some(read_pdf(&path).await?),
        None => None,
    };

    let mut saga = state
        .bot_lifecycle
        .plan_knowledge_update(KnowledgeUpdate { text, pdf_file })?;

    loop {
        let spinner = spinner("Updating knowledge...");
        let result = state.bot_lifecycle.sync_knowledge(&view, &mut saga).await;
        spinner.finish_and_clear();

        match result {
            Ok(sync) => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&sync)?);
                } else {
                    println!();
                    println!("  {} Knowledge updated.", style("✓").green().bold());
                    println!();
                    print_sync(&sync);
                }
                return Ok(());
            }
            Err(BotError::Ingestion { source, progress }) => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&progress)?);
                    return Err(source.into());
                }
                println!();
                print_sync(&progress);
                eprintln!("  {} {source}", style("✗").red().bold());
                let retry = Confirm::new()
                    .with_prompt("Retry the remaining steps?")
                    .default(false)
                    .interact()?;
                if !retry {
                    return Err(anyhow::Error::new(source).context("knowledge update incomplete"));
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Ask the knowledge service a question.
pub async fn ask(state: &AppState, question: &str, json: bool) -> Result<()> {
    let spinner = spinner("Thinking...");
    let result = state.bot_lifecycle.ask(question).await;
    spinner.finish_and_clear();
    let answer = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
        return Ok(());
    }

    println!();
    println!("  {}", answer.answer);
    println!(
        "  {}",
        style(format!("confidence {:.2}", answer.confidence)).dim()
    );
    println!();
    Ok(())
}
