//! Signup and signout commands

use anyhow::Result;
use colored::Colorize;
use userdir_core::services::{events, LogEvent};

use super::{get_context, get_logger, log_event};

pub fn run_signup(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    let existing = ctx.session_service.current()?;
    let (token, created) = match existing {
        Some(token) => (token, false),
        None => (ctx.session_service.sign_up()?, true),
    };

    if created {
        log_event(&logger, LogEvent::new(events::SIGNUP_COMPLETED).with_command("signup"));
    }

    if json {
        println!(
            "{}",
            serde_json::json!({
                "created": created,
                "fingerprint": token.fingerprint(),
                "createdAt": token.created_at.to_rfc3339(),
            })
        );
        return Ok(());
    }

    if created {
        println!("{} Signed up", "✓".green());
    } else {
        println!("Already signed in");
    }
    println!("{}", format!("  Session {}", token.fingerprint()).dimmed());

    Ok(())
}

pub fn run_signout(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    let removed = ctx.session_service.sign_out()?;
    if removed {
        log_event(&logger, LogEvent::new(events::SIGNOUT_COMPLETED).with_command("signout"));
    }

    if json {
        println!("{}", serde_json::json!({ "signedOut": removed }));
    } else if removed {
        println!("{}", "Signed out".yellow());
    } else {
        println!("Not signed in");
    }

    Ok(())
}
