//! Show command - one user with resolved friends

use anyhow::{anyhow, Result};
use userdir_core::services::{events, LogEvent};

use super::{check_session, get_context, get_logger, load_directory, log_event};
use crate::output;

pub async fn run(id: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();
    log_event(&logger, LogEvent::new(events::COMMAND_EXECUTED).with_command("show"));

    if !check_session(&ctx, &logger, "show")?.is_authenticated() {
        return Ok(());
    }

    let directory = load_directory(&ctx, &logger, "show").await?;
    let user = directory
        .get(id)
        .ok_or_else(|| anyhow!("User '{}' not found", id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(user)?);
    } else {
        output::print_user(user);
    }

    Ok(())
}
