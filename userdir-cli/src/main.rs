//! userdir CLI - a user directory in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{browse, demo, import, list, logs, session, show, status};

/// userdir - browse users and their friends from the terminal
#[derive(Parser)]
#[command(name = "ud", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List users, optionally filtered by free text
    List {
        /// Case-insensitive text matched against id, name and friend ids
        query: Option<String>,
        /// Toggle selection of a user id (repeatable)
        #[arg(long)]
        select: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one user with resolved friend names
    Show {
        /// User id
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Browse the directory interactively
    Browse,

    /// Import users from a JSON or CSV file
    Import {
        /// Path to the file (.json or .csv)
        file: PathBuf,
        /// Remove existing users first
        #[arg(long)]
        replace: bool,
        /// Validate and report without writing
        #[arg(long)]
        preview: bool,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start a session
    Signup {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// End the current session
    Signout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show directory and session status
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage demo mode
    Demo {
        #[command(subcommand)]
        command: Option<demo::DemoCommands>,
    },

    /// View and manage application logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli).await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::List { query, select, json } => list::run(query, select, json).await,
        Commands::Show { id, json } => show::run(&id, json).await,
        Commands::Browse => browse::run().await,
        Commands::Import { file, replace, preview, force, json } => {
            import::run(file, replace, preview, force, json)
        }
        Commands::Signup { json } => session::run_signup(json),
        Commands::Signout { json } => session::run_signout(json),
        Commands::Status { json } => status::run(json),
        Commands::Demo { command } => demo::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
