//! Browse command - interactive filter and selection

use anyhow::{bail, Result};
use colored::Colorize;
use dialoguer::{Input, Select};
use userdir_core::services::{events, GateOutcome, LogEvent};
use userdir_core::Selection;

use super::{get_context, get_logger, load_directory, log_event, CliNavigator};
use crate::output;

const ACTIONS: [&str; 5] = ["Filter", "Toggle selection", "Show selected", "Reload", "Quit"];

pub async fn run() -> Result<()> {
    if atty::isnt(atty::Stream::Stdin) {
        bail!("'ud browse' needs an interactive terminal. Use 'ud list' instead.");
    }

    let ctx = get_context()?;
    let logger = get_logger();
    log_event(&logger, LogEvent::new(events::COMMAND_EXECUTED).with_command("browse"));

    let navigator = CliNavigator::new(ctx.config.signup_url.as_deref(), &logger, "browse");
    let gate = ctx.session_service.gate(&navigator, ctx.config.session_recheck);

    let mounted = gate.check()?;
    if !mounted.is_authenticated() {
        return Ok(());
    }

    let mut directory = load_directory(&ctx, &logger, "browse").await?;
    let mut selection = Selection::new();
    let mut query = String::new();
    let mut first_render = true;

    loop {
        if !first_render {
            if let GateOutcome::Redirected = gate.recheck(&mounted)? {
                return Ok(());
            }
        }
        first_render = false;

        let view = directory.view(&query, &selection);
        println!();
        if view.entries.is_empty() {
            output::warning("No users to show.");
        } else {
            println!("{}", output::view_table(&view));
        }
        println!("{}", output::view_summary(&view).dimmed());

        let action = Select::new()
            .with_prompt("Action")
            .items(&ACTIONS)
            .default(0)
            .interact()?;

        match action {
            0 => {
                query = Input::<String>::new()
                    .with_prompt("Filter")
                    .with_initial_text(query.clone())
                    .allow_empty(true)
                    .interact_text()?;
            }
            1 => {
                if view.entries.is_empty() {
                    continue;
                }
                let labels: Vec<String> = view
                    .entries
                    .iter()
                    .map(|entry| {
                        let marker = if entry.is_selected { "*" } else { " " };
                        format!("{} {} {}", marker, entry.user.id, entry.user.name)
                    })
                    .collect();
                let picked = Select::new()
                    .with_prompt("Toggle")
                    .items(&labels)
                    .default(0)
                    .interact()?;
                let id = view.entries[picked].user.id.clone();
                selection.toggle(&id);
            }
            2 => match selection.selected().and_then(|id| directory.get(id)) {
                Some(user) => {
                    println!();
                    output::print_user(user);
                }
                None => output::info("Nothing selected."),
            },
            3 => {
                directory = load_directory(&ctx, &logger, "browse").await?;
            }
            _ => return Ok(()),
        }
    }
}
