//! Botforge CLI entry point.
//!
//! Binary name: `bforge`
//!
//! Parses CLI arguments, initializes tracing, the database and services,
//! then dispatches to the appropriate command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use console::style;

use botforge_observe::tracing_setup::{filter_for_verbosity, init_tracing, shutdown_tracing};
use botforge_types::error::{AccountError, AuthError, BotError, PersistenceError};

use cli::{Cli, Commands, CreateResource, DeleteResource, KnowledgeCommand, ListResource};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(filter_for_verbosity(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();

    if let Err(err) = &result {
        if let Some(hint) = recovery_hint(err) {
            eprintln!("  {} {hint}", style("hint:").yellow().bold());
        }
    }
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "bforge", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;
    let json = cli.json;

    match cli.command {
        Commands::Register { name, email } => {
            cli::account::register(&state, name, email, json).await?;
        }
        Commands::Login { email } => cli::account::login(&state, email, json).await?,
        Commands::Logout => cli::account::logout(&state, json).await?,
        Commands::Whoami => cli::account::whoami(&state, json).await?,
        Commands::Reset { force } => cli::account::reset(&state, force, json).await?,

        Commands::Create { resource } => match resource {
            CreateResource::Bot {
                company,
                website,
                user_type,
                text,
                pdf,
            } => {
                cli::bot::create_bot(&state, company, website, user_type, text, pdf, json).await?;
            }
        },

        Commands::List { resource } => match resource {
            ListResource::Bots => cli::bot::list_bots(&state, json).await?,
        },

        Commands::Show { id } => cli::bot::show_bot(&state, id, json).await?,

        Commands::Knowledge { action } => match action {
            KnowledgeCommand::Update { id, text, pdf } => {
                cli::knowledge::update_knowledge(&state, id, text, pdf, json).await?;
            }
        },

        Commands::Ask { question } => cli::knowledge::ask(&state, &question, json).await?,

        Commands::Delete { resource } => match resource {
            DeleteResource::Bot { id, confirm } => {
                cli::bot::delete_bot(&state, id, confirm, json).await?;
            }
        },

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Suggest a way out for errors the operator can act on.
fn recovery_hint(err: &anyhow::Error) -> Option<&'static str> {
    let persistence = err
        .downcast_ref::<PersistenceError>()
        .or_else(|| match err.downcast_ref::<BotError>() {
            Some(BotError::Persistence(p)) => Some(p),
            _ => None,
        })
        .or_else(|| match err.downcast_ref::<AccountError>() {
            Some(AccountError::Persistence(p)) => Some(p),
            _ => None,
        });

    match persistence {
        Some(PersistenceError::Malformed(_)) => Some(
            "stored data could not be read; `bforge reset --force` erases it and starts over",
        ),
        Some(PersistenceError::UnsupportedVersion { .. }) => {
            Some("stored data was written by a newer bforge; upgrade before continuing")
        }
        _ => match err.downcast_ref::<AccountError>() {
            Some(AccountError::Auth(AuthError::NotLoggedIn)) => {
                Some("run `bforge login` first")
            }
            _ => None,
        },
    }
}
