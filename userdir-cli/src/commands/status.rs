//! Status command - directory and session summary

use anyhow::Result;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::get_context;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let status = ctx.status_service.get_status(&ctx.config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Directory Status".bold());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec!["Users", &status.total_users.to_string()]);
    table.add_row(vec!["Friend links", &status.total_friend_links.to_string()]);
    table.add_row(vec!["Unknown friend ids", &status.dangling_friend_ids.len().to_string()]);
    table.add_row(vec!["Source", &format!("{} ({})", status.source.kind, status.source.location)]);

    println!("{}", table);
    println!();

    if status.demo_mode {
        println!("Demo mode is {}", "ON".green());
    }

    match &status.session_fingerprint {
        Some(fingerprint) => println!(
            "Signed in {}",
            format!("(session {})", fingerprint).dimmed()
        ),
        None => println!("{}", "Not signed in. Run 'ud signup'.".yellow()),
    }

    Ok(())
}
