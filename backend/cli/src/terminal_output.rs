//! Terminal output helpers: ANSI styling and chat transcript printing.

use codelens_core::{ConversationEntry, EntryContent, Role};

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const CYAN: &str = "\x1b[36m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

/// Print a formatted SUCCESS note.
pub fn note_success(msg: &str) {
    if supports_color() {
        println!("{GREEN}{BOLD}✓{RESET} {msg}");
    } else {
        println!("OK: {msg}");
    }
}

/// Print a formatted ERROR note.
pub fn note_error(msg: &str) {
    if supports_color() {
        eprintln!("{RED}{BOLD}✗{RESET} {msg}");
    } else {
        eprintln!("ERROR: {msg}");
    }
}

/// One conversation entry as terminal text.
pub fn format_entry(entry: &ConversationEntry, color: bool) -> String {
    let speaker = match entry.role {
        Role::User => "You:",
        Role::Bot => "Bot:",
    };
    let body = match &entry.content {
        EntryContent::Text(text) => text.clone(),
        EntryContent::Image(bytes) => format!("[image, {} bytes]", bytes.len()),
    };
    if color {
        let tint = if entry.role == Role::Bot { CYAN } else { DIM };
        format!("{tint}{BOLD}{speaker}{RESET} {body}")
    } else {
        format!("{speaker} {body}")
    }
}

/// Print the bot entries of a transcript, oldest first.
pub fn print_bot_entries(entries: &[ConversationEntry]) {
    let color = supports_color();
    for entry in entries.iter().filter(|e| e.role == Role::Bot) {
        println!("{}\n", format_entry(entry, color));
    }
}
