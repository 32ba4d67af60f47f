//! List command - show the directory, optionally filtered

use anyhow::Result;
use userdir_core::services::{events, LogEvent};
use userdir_core::Selection;

use super::{check_session, get_context, get_logger, load_directory, log_event};
use crate::output;

pub async fn run(query: Option<String>, select: Vec<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();
    log_event(&logger, LogEvent::new(events::COMMAND_EXECUTED).with_command("list"));

    if !check_session(&ctx, &logger, "list")?.is_authenticated() {
        return Ok(());
    }

    let directory = load_directory(&ctx, &logger, "list").await?;

    // Each --select toggles, so repeating an id deselects it
    let mut selection = Selection::new();
    for id in &select {
        selection.toggle(id);
    }

    let view = directory.view(query.as_deref().unwrap_or(""), &selection);

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    if directory.is_empty() {
        output::warning("The directory is empty. Use 'ud import' or 'ud demo on' to add users.");
        return Ok(());
    }

    if view.entries.is_empty() {
        println!("No users match '{}'.", view.query);
        return Ok(());
    }

    println!("{}", output::view_table(&view));
    println!("{}", output::view_summary(&view));

    Ok(())
}
