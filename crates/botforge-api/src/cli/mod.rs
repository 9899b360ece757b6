//! CLI command definitions for the `bforge` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI follows a verb-noun
//! pattern (e.g., `bforge create bot`, `bforge list bots`).

pub mod account;
pub mod bot;
pub mod knowledge;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use botforge_types::bot::{BotId, UserType};
use botforge_types::knowledge::{KnowledgeSync, StepStatus};

/// Register, train, and manage knowledge bots.
#[derive(Parser)]
#[command(name = "bforge", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans via OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an operator account.
    Register {
        /// Display name.
        #[arg(long)]
        name: Option<String>,

        /// Login email.
        #[arg(long)]
        email: Option<String>,
    },

    /// Log in and remember the session.
    Login {
        #[arg(long)]
        email: Option<String>,
    },

    /// Forget the current session.
    Logout,

    /// Show the logged-in account.
    Whoami,

    /// Create a new resource.
    Create {
        #[command(subcommand)]
        resource: CreateResource,
    },

    /// List resources.
    #[command(alias = "ls")]
    List {
        #[command(subcommand)]
        resource: ListResource,
    },

    /// Unlock a bot and show its details and embed snippet.
    Show {
        /// Bot id (see `bforge list bots`).
        id: BotId,
    },

    /// Manage bot knowledge.
    Knowledge {
        #[command(subcommand)]
        action: KnowledgeCommand,
    },

    /// Ask the knowledge service a question.
    Ask {
        question: String,
    },

    /// Delete a resource.
    #[command(alias = "rm")]
    Delete {
        #[command(subcommand)]
        resource: DeleteResource,
    },

    /// Erase every account, bot, and the session.
    Reset {
        /// Skip the confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum CreateResource {
    /// Create a bot (prompts for anything not given as a flag).
    Bot {
        #[arg(long)]
        company: Option<String>,

        #[arg(long)]
        website: Option<String>,

        /// Business or Individual.
        #[arg(long)]
        user_type: Option<UserType>,

        /// Training text to ingest.
        #[arg(long)]
        text: Option<String>,

        /// PDF file to ingest.
        #[arg(long)]
        pdf: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ListResource {
    /// List your bots.
    Bots,
}

#[derive(Subcommand)]
pub enum KnowledgeCommand {
    /// Add training text and/or a PDF to an existing bot.
    Update {
        id: BotId,

        #[arg(long)]
        text: Option<String>,

        #[arg(long)]
        pdf: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum DeleteResource {
    /// Delete a bot permanently.
    Bot {
        id: BotId,

        /// Confirmation phrase, exactly `DELETE <company>`.
        #[arg(long)]
        confirm: Option<String>,
    },
}

/// Steady-tick spinner with a message.
pub(crate) fn spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.into());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

/// Print the per-step outcome of an ingestion run.
pub(crate) fn print_sync(sync: &KnowledgeSync) {
    println!("  {}", style("── Knowledge ──").dim());
    for (label, step) in [("Text", &sync.text), ("PDF ", &sync.pdf)] {
        let mark = match step {
            StepStatus::Completed { .. } => style("✓").green(),
            StepStatus::Failed { .. } => style("✗").red(),
            StepStatus::Pending => style("…").yellow(),
            StepStatus::Skipped => style("-").dim(),
        };
        println!("  {mark} {}  {step}", style(label).bold());
    }
    println!();
}
