//! Import command - load users from a JSON or CSV file

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;
use userdir_core::services::{events, ImportOptions, LogEvent};

use super::{get_context, get_logger, log_event};

pub fn run(file: PathBuf, replace: bool, preview: bool, force: bool, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();
    log_event(&logger, LogEvent::new(events::IMPORT_STARTED).with_command("import"));

    if replace && !preview && !force && !json {
        let existing = ctx.store.count_users()?;
        if existing > 0
            && !Confirm::new()
                .with_prompt(format!("Replace all {} existing users?", existing))
                .default(false)
                .interact()?
        {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let options = ImportOptions { replace, preview };
    let result = match ctx.import_service.import_file(&file, &options) {
        Ok(result) => result,
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new(events::IMPORT_FAILED)
                    .with_command("import")
                    .with_error(format!("{:#}", e)),
            );
            return Err(e);
        }
    };

    if !preview {
        log_event(&logger, LogEvent::new(events::IMPORT_COMPLETED).with_command("import"));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if result.preview {
        println!("{}", "PREVIEW - No changes applied".yellow());
        println!("  Would import: {} users", result.imported);
    } else {
        println!("{} Imported {} users", "✓".green(), result.imported);
        if result.removed > 0 {
            println!("  Replaced: {} existing users", result.removed);
        }
    }

    if !result.dangling_friend_ids.is_empty() {
        println!(
            "{}",
            format!(
                "  Friend ids with no matching user: {}",
                result.dangling_friend_ids.join(", ")
            )
            .dimmed()
        );
    }

    Ok(())
}
