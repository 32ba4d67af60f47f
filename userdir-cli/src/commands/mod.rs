//! CLI command implementations

pub mod browse;
pub mod demo;
pub mod import;
pub mod list;
pub mod logs;
pub mod session;
pub mod show;
pub mod status;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use userdir_core::ports::Navigator;
use userdir_core::services::{events, Directory, GateOutcome, LogEvent, LoggingService};
use userdir_core::DirectoryContext;

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the data directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("USERDIR_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".userdir"))
}

/// Get or create the directory context
pub fn get_context() -> Result<DirectoryContext> {
    let data_dir = get_data_dir()?;

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    DirectoryContext::new(&data_dir).context("Failed to initialize userdir context")
}

/// Tells the user where to sign up instead of showing the directory
pub struct CliNavigator<'a> {
    signup_url: Option<&'a str>,
    logger: &'a Option<LoggingService>,
    command: &'a str,
}

impl<'a> CliNavigator<'a> {
    pub fn new(
        signup_url: Option<&'a str>,
        logger: &'a Option<LoggingService>,
        command: &'a str,
    ) -> Self {
        Self {
            signup_url,
            logger,
            command,
        }
    }
}

impl Navigator for CliNavigator<'_> {
    fn redirect_to_signup(&self) {
        eprintln!("{}", "You are not signed in.".yellow());
        match self.signup_url {
            Some(url) => eprintln!("Sign up at {} or run 'ud signup'.", url),
            None => eprintln!("Run 'ud signup' to start a session."),
        }
        log_event(
            self.logger,
            LogEvent::new(events::SIGNUP_REDIRECT).with_command(self.command),
        );
    }
}

/// Consult the session gate once, as the view opens
pub fn check_session(
    ctx: &DirectoryContext,
    logger: &Option<LoggingService>,
    command: &str,
) -> Result<GateOutcome> {
    let navigator = CliNavigator::new(ctx.config.signup_url.as_deref(), logger, command);
    ctx.session_service
        .gate(&navigator, ctx.config.session_recheck)
        .check()
}

/// Load the directory snapshot, with a spinner for remote sources
pub async fn load_directory(
    ctx: &DirectoryContext,
    logger: &Option<LoggingService>,
    command: &str,
) -> Result<Directory> {
    let source = ctx.directory_service.source().to_string();

    let spinner = if source == "http" {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Loading directory...");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let result = ctx.directory_service.load().await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match result {
        Ok(directory) => {
            log_event(
                logger,
                LogEvent::new(events::DIRECTORY_LOADED)
                    .with_command(command)
                    .with_source(&source),
            );
            Ok(directory)
        }
        Err(e) => {
            log_event(
                logger,
                LogEvent::new(events::DIRECTORY_LOAD_FAILED)
                    .with_command(command)
                    .with_source(&source)
                    .with_error(format!("{:#}", e)),
            );
            Err(e)
        }
    }
}
