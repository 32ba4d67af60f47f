//! Logs command - inspect the directory event log

use anyhow::Result;
use chrono::{Duration, TimeZone, Utc};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use userdir_core::services::{events, LogEntry, LogQuery, LogStats, LoggingService};

use super::get_data_dir;
use crate::output;

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent events, newest first
    List {
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Only events that carry an error
        #[arg(long)]
        errors: bool,
        /// Only this event (e.g. directory_load_failed, signup_redirect)
        #[arg(long)]
        event: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Delete old events
    Clear {
        #[arg(long, default_value = "30")]
        older_than_days: i64,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Summarize sign-up redirects and failed directory loads per source
    Stats {
        #[arg(long)]
        json: bool,
    },
}

fn open_log() -> Result<LoggingService> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;
    LoggingService::new(&data_dir, env!("CARGO_PKG_VERSION"))
}

fn format_timestamp(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

pub fn run(command: LogsCommands) -> Result<()> {
    match command {
        LogsCommands::List {
            limit,
            errors,
            event,
            json,
        } => {
            let query = LogQuery {
                limit,
                errors_only: errors,
                event,
            };
            list(query, json)
        }
        LogsCommands::Clear {
            older_than_days,
            force,
            json,
        } => clear(older_than_days, force, json),
        LogsCommands::Stats { json } => stats(json),
    }
}

fn list(query: LogQuery, json: bool) -> Result<()> {
    let entries = open_log()?.recent(&query)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No log entries found.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Time", "Event", "Command", "Source", "Error"]);
    for entry in &entries {
        table.add_row(vec![
            format_timestamp(entry.timestamp),
            colored_event(entry),
            entry.command.clone().unwrap_or_default(),
            entry.source.clone().unwrap_or_default(),
            entry.error_message.clone().unwrap_or_default(),
        ]);
    }
    println!("{}", table);
    Ok(())
}

fn colored_event(entry: &LogEntry) -> String {
    if entry.error_message.is_some() {
        entry.event.red().to_string()
    } else if entry.event == events::SIGNUP_REDIRECT {
        entry.event.yellow().to_string()
    } else {
        entry.event.clone()
    }
}

fn clear(older_than_days: i64, force: bool, json: bool) -> Result<()> {
    let service = open_log()?;
    let cutoff_ms = (Utc::now() - Duration::days(older_than_days)).timestamp_millis();

    if !force
        && !json
        && !Confirm::new()
            .with_prompt(format!("Delete log entries older than {} days?", older_than_days))
            .default(false)
            .interact()?
    {
        println!("Cancelled.");
        return Ok(());
    }

    let deleted = service.delete_before(cutoff_ms)?;
    if json {
        println!("{}", serde_json::json!({ "deleted": deleted }));
    } else {
        println!("Deleted {} log entries", deleted);
    }
    Ok(())
}

fn stats(json: bool) -> Result<()> {
    let stats = open_log()?.stats()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    print_stats(&stats);
    Ok(())
}

fn print_stats(stats: &LogStats) {
    println!("{}", "Event Log".bold());
    println!("  Entries: {} ({} with errors)", stats.total, stats.errors);
    println!("  Sign-up redirects: {}", stats.signup_redirects);

    if stats.load_failures.is_empty() {
        println!("  Failed directory loads: {}", "none".green());
    } else {
        println!();
        println!("{}", "Failed directory loads".red().bold());
        let mut table = output::create_table();
        table.set_header(vec!["Source", "Count", "Last", "Last error"]);
        for failure in &stats.load_failures {
            table.add_row(vec![
                failure.source.clone(),
                failure.count.to_string(),
                format_timestamp(failure.last_timestamp),
                failure.last_error.clone().unwrap_or_default(),
            ]);
        }
        println!("{}", table);
    }

    if !stats.by_event.is_empty() {
        println!();
        println!("{}", "Events".bold());
        for count in &stats.by_event {
            println!("  {:<24} {}", count.event, count.count);
        }
    }

    let size = std::fs::metadata(&stats.db_path)
        .map(|m| m.len())
        .unwrap_or(0);
    println!();
    println!(
        "  Database: {} ({})",
        stats.db_path.display(),
        output::format_size(size)
    );
}
