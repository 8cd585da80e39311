//! Terminal output for chat messages, license reports and markdown

mod display;
mod markdown;

pub use display::{
    format_assistant, format_license_report, format_message, format_sources, format_user, Display,
};
pub use markdown::render_markdown;
