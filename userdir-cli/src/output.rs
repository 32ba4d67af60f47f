//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};
use userdir_core::services::DirectoryView;
use userdir_core::EnrichedUser;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Render the visible users of a view, selected row highlighted
pub fn view_table(view: &DirectoryView<'_>) -> Table {
    let mut table = create_table();
    table.set_header(vec!["", "ID", "Rank", "Name", "Email", "Friends", "Best friend"]);

    for entry in &view.entries {
        let user = entry.user;
        let marker = if entry.is_selected { "*" } else { "" };
        let mut row = vec![
            Cell::new(marker),
            Cell::new(&user.id),
            Cell::new(user.rank),
            Cell::new(&user.name),
            Cell::new(&user.email),
            Cell::new(user.friend_names.join(", ")),
            Cell::new(&user.highest_ranking_friend_name),
        ];
        if entry.is_selected {
            row = row.into_iter().map(|c| c.fg(Color::Green)).collect();
        }
        table.add_row(row);
    }

    table
}

/// One-line summary under a view
pub fn view_summary(view: &DirectoryView<'_>) -> String {
    let mut summary = if view.query.is_empty() {
        format!("{} users", view.total)
    } else {
        format!("{} of {} users match '{}'", view.matched, view.total, view.query)
    };
    if let Some(id) = &view.selected {
        summary.push_str(&format!(", selected: {}", id));
    }
    summary
}

/// Detail card for one user
pub fn print_user(user: &EnrichedUser) {
    println!("{}", user.name.bold());
    println!("  ID:          {}", user.id);
    println!("  Rank:        {}", user.rank);
    println!("  Email:       {}", user.email);
    if !user.image.is_empty() {
        println!("  Image:       {}", user.image);
    }
    if user.highest_ranking_friend_name.is_empty() {
        println!("  Best friend: {}", "-".dimmed());
    } else {
        println!("  Best friend: {}", user.highest_ranking_friend_name);
    }

    if user.friends.is_empty() {
        println!("  Friends:     {}", "none".dimmed());
        return;
    }
    println!("  Friends:");
    for (id, name) in user.friends.iter().zip(&user.friend_names) {
        println!("    {} {}", name, format!("({})", id).dimmed());
    }
}

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
