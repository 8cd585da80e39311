//! Terminal display for the chat session
//!
//! `format_*` functions build the text; [`Display`] prints it.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color as CellColor, Table};

use concierge_core::controller::EMAIL_PROMPT;
use concierge_core::source::parse_all;
use concierge_core::{
    BadgeColor, ChatMessage, LicenseRecord, LicenseReport, LicenseStatus, Message, Role, Source,
    EXAMPLE_QUESTIONS,
};

use super::markdown::render_markdown;

const NO_LICENSES: &str = "No active licenses found.";

fn colorize() -> bool {
    colored::control::SHOULD_COLORIZE.should_colorize()
}

/// Render any transcript message
pub fn format_message(message: &Message) -> String {
    match message {
        Message::Chat(chat) => match chat.role {
            Role::User => format_user(&chat.content),
            Role::Assistant => format_assistant(chat),
        },
        Message::License(license) => format_license_report(&license.report),
    }
}

pub fn format_user(content: &str) -> String {
    format!("{} {}", "You ›".bright_blue().bold(), content)
}

/// Assistant answer as rendered markdown plus its citation line
pub fn format_assistant(chat: &ChatMessage) -> String {
    let body = render_markdown(&chat.content);
    let mut out = format!("{} {}", "●".bright_green(), body);
    if let Some(sources) = format_sources(&chat.sources) {
        out.push('\n');
        out.push_str(&sources);
    }
    out
}

/// `Sources: host, host, plain`, or `None` when there are no citations
pub fn format_sources(sources: &[String]) -> Option<String> {
    if sources.is_empty() {
        return None;
    }
    let items: Vec<String> = parse_all(sources).iter().map(format_source).collect();
    Some(format!("{} {}", "Sources:".dimmed(), items.join(", ")))
}

fn format_source(source: &Source) -> String {
    match source {
        Source::Link { url, host } if colorize() => {
            // OSC 8 hyperlink so terminals can open the citation
            format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", url, host.cyan().underline())
        }
        Source::Link { host, .. } => host.clone(),
        Source::Plain(text) => text.clone(),
    }
}

/// License report grouped by discipline, one table per discipline
pub fn format_license_report(report: &LicenseReport) -> String {
    let mut out = format!(
        "{}",
        format!("License Status for {}", report.full_name).bold()
    );

    if report.is_empty() {
        out.push('\n');
        out.push_str(&NO_LICENSES.dimmed().to_string());
        return out;
    }

    for (discipline, records) in report.grouped() {
        if records.is_empty() {
            continue;
        }
        out.push_str("\n\n");
        out.push_str(&discipline.label().bright_cyan().bold().to_string());
        out.push('\n');
        out.push_str(&license_table(records).to_string());
    }
    out
}

fn license_table(records: &[LicenseRecord]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["License", "Issuer", "Issued", "Expires", "Status"]);
    if colorize() {
        table.enforce_styling();
    } else {
        table.force_no_tty();
    }

    for record in records {
        let color = cell_color(record.status);
        table.add_row(vec![
            Cell::new(&record.name),
            Cell::new(record.issuer.as_deref().unwrap_or("-")),
            Cell::new(record.issue_date.as_deref().unwrap_or("-")),
            Cell::new(record.expiration_date.as_deref().unwrap_or("-")).fg(color),
            badge(record.status),
        ]);
    }
    table
}

fn badge(status: LicenseStatus) -> Cell {
    let cell = Cell::new(status.label()).fg(cell_color(status));
    if status.is_emphasized() {
        cell.add_attribute(Attribute::Bold)
    } else {
        cell
    }
}

fn cell_color(status: LicenseStatus) -> CellColor {
    match status.badge_color() {
        BadgeColor::Green => CellColor::Green,
        BadgeColor::Yellow => CellColor::Yellow,
        BadgeColor::Orange => CellColor::Rgb {
            r: 255,
            g: 165,
            b: 0,
        },
        BadgeColor::Red => CellColor::Red,
    }
}

/// Display utilities for the chat session
pub struct Display;

impl Display {
    pub fn welcome_banner() {
        println!("\n{}", "⚽ Soccer Referee Concierge".bright_green().bold());
        println!("{}", "===========================".bright_green());
        println!("Ask about rules, procedures, assignments or your licenses.");
        println!();
        println!("{}", "Try one of these:".bold());
        for (i, question) in EXAMPLE_QUESTIONS.iter().enumerate() {
            println!("  {} {}", format!("/example {}", i + 1).green(), question);
        }
        println!();
        println!(
            "{} | {}",
            "/help for commands".dimmed(),
            "/quit to exit".dimmed()
        );
    }

    pub fn help() {
        println!("{}", "Commands:".bold());
        println!("  {} - Ask one of the example questions", "/example <n>".green());
        println!("  {} - Send feedback", "/feedback".green());
        println!("  {} - Save the conversation as JSON", "/export <path>".green());
        println!("  {} - Show this help", "/help".green());
        println!("  {} - Exit", "/quit".green());
    }

    pub fn splash(markdown: &str) {
        println!("\n{}", render_markdown(markdown));
        println!("\n{}", "Press Enter to continue".dimmed());
    }

    pub fn message(message: &Message) {
        println!("{}\n", format_message(message));
    }

    pub fn email_prompt() {
        println!("{} {}", "●".bright_green(), EMAIL_PROMPT);
        println!(
            "{}",
            "(press Enter on an empty line to cancel)".dimmed()
        );
    }

    pub fn info(text: &str) {
        println!("{} {}", "→".bright_cyan(), text);
    }

    pub fn success(text: &str) {
        println!("{} {}", "Success:".green().bold(), text);
    }

    pub fn error(text: &str) {
        eprintln!("{} {}", "Error:".red().bold(), text);
    }

    pub fn goodbye() {
        println!("{}", "Goodbye!".bright_blue());
    }
}
