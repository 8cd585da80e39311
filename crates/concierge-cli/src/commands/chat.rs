//! Interactive chat session

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use concierge_core::{ChatController, QuestionStep, EXAMPLE_QUESTIONS};

use super::{feedback, spinner};
use crate::context::AppContext;
use crate::formatting::{format_user, Display};
use crate::input::{stdin_prompter, Prompter};

/// Slash command entered at the question prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Help,
    Quit,
    Feedback,
    /// Zero-based index into the example questions
    Example(usize),
    Export(PathBuf),
    /// Unknown command or bad arguments, with a message for the user
    Invalid(String),
}

impl SlashCommand {
    /// Parse a line starting with `/`; other lines are questions
    pub fn parse(line: &str) -> Option<Self> {
        let rest = line.trim().strip_prefix('/')?;
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        let command = match name {
            "help" | "h" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            "feedback" => Self::Feedback,
            "example" => match arg.parse::<usize>() {
                Ok(n) if (1..=EXAMPLE_QUESTIONS.len()).contains(&n) => Self::Example(n - 1),
                _ => Self::Invalid(format!(
                    "Usage: /example <1-{}>",
                    EXAMPLE_QUESTIONS.len()
                )),
            },
            "export" if !arg.is_empty() => Self::Export(PathBuf::from(arg)),
            "export" => Self::Invalid("Usage: /export <path>".to_string()),
            other => Self::Invalid(format!("Unknown command: /{other} (try /help)")),
        };
        Some(command)
    }
}

pub async fn execute(ctx: AppContext, no_splash: bool) -> Result<()> {
    let mut controller = ctx.controller();
    let mut prompter = stdin_prompter();

    if !no_splash && ctx.config.ui.show_splash {
        show_splash(&ctx, &controller, prompter.as_mut()).await?;
    }

    Display::welcome_banner();
    run_loop(&ctx, &mut controller, prompter.as_mut()).await?;
    Display::goodbye();
    Ok(())
}

async fn show_splash(
    ctx: &AppContext,
    controller: &ChatController,
    prompter: &mut dyn Prompter,
) -> Result<()> {
    let Some(document) = controller.load_splash(ctx.store.as_ref()).await else {
        return Ok(());
    };

    Display::splash(&document);
    // End of input is not an acknowledgement
    if prompter.read_line("")?.is_none() {
        debug!("Input ended before the splash was dismissed");
        return Ok(());
    }
    if let Err(e) = controller.dismiss_splash(ctx.store.as_ref()) {
        warn!("Could not persist splash dismissal: {}", e);
    }
    Ok(())
}

async fn run_loop(
    ctx: &AppContext,
    controller: &mut ChatController,
    prompter: &mut dyn Prompter,
) -> Result<()> {
    loop {
        if controller.awaiting_email() {
            Display::email_prompt();
            let Some(line) = prompter.read_line("Email")? else {
                return Ok(());
            };
            if line.trim().is_empty() {
                controller.cancel_license_lookup();
                Display::info("License lookup cancelled");
                continue;
            }
            lookup_license(controller, &line).await;
            continue;
        }

        let Some(line) = prompter.read_line("You")? else {
            return Ok(());
        };

        match SlashCommand::parse(&line) {
            None => ask(controller, &line).await,
            Some(SlashCommand::Quit) => return Ok(()),
            Some(SlashCommand::Help) => Display::help(),
            Some(SlashCommand::Feedback) => {
                feedback::run_form(controller, prompter, ctx.config.feedback_close_delay()).await?
            }
            Some(SlashCommand::Example(index)) => {
                let question = EXAMPLE_QUESTIONS[index];
                println!("{}", format_user(question));
                ask(controller, question).await;
            }
            Some(SlashCommand::Export(path)) => match export(controller, &path) {
                Ok(()) => Display::success(&format!("Saved conversation to {}", path.display())),
                Err(e) => Display::error(&format!("{e:#}")),
            },
            Some(SlashCommand::Invalid(message)) => Display::error(&message),
        }
    }
}

async fn ask(controller: &mut ChatController, text: &str) {
    let question = match controller.begin_question(text) {
        QuestionStep::Ask(question) => question,
        QuestionStep::Done(outcome) => {
            debug!("Question not sent: {:?}", outcome);
            return;
        }
    };

    let api = Arc::clone(controller.api());
    let pb = spinner("Thinking...");
    let result = api.ask(&question).await;
    pb.finish_and_clear();

    controller.finish_question(result);
    show_last(controller);
}

async fn lookup_license(controller: &mut ChatController, email: &str) {
    let Some(email) = controller.begin_license_lookup(email) else {
        return;
    };

    let api = Arc::clone(controller.api());
    let pb = spinner("Looking up licenses...");
    let result = api.license_status(&email).await;
    pb.finish_and_clear();

    controller.finish_license_lookup(result);
    show_last(controller);
}

fn show_last(controller: &ChatController) {
    if let Some(message) = controller.transcript().last() {
        Display::message(message);
    }
}

fn export(controller: &ChatController, path: &Path) -> Result<()> {
    let json = controller
        .transcript()
        .to_json()
        .context("Failed to serialize conversation")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert_eq!(SlashCommand::parse("What is offside?"), None);
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(SlashCommand::parse("/help"), Some(SlashCommand::Help));
        assert_eq!(SlashCommand::parse(" /quit "), Some(SlashCommand::Quit));
        assert_eq!(SlashCommand::parse("/feedback"), Some(SlashCommand::Feedback));
        assert_eq!(
            SlashCommand::parse("/export chat.json"),
            Some(SlashCommand::Export(PathBuf::from("chat.json")))
        );
    }

    #[test]
    fn test_example_index_is_one_based() {
        assert_eq!(SlashCommand::parse("/example 1"), Some(SlashCommand::Example(0)));
        assert_eq!(SlashCommand::parse("/example 3"), Some(SlashCommand::Example(2)));
        assert!(matches!(
            SlashCommand::parse("/example 0"),
            Some(SlashCommand::Invalid(_))
        ));
        assert!(matches!(
            SlashCommand::parse("/example x"),
            Some(SlashCommand::Invalid(_))
        ));
    }

    #[test]
    fn test_unknown_and_incomplete_commands() {
        assert!(matches!(
            SlashCommand::parse("/export"),
            Some(SlashCommand::Invalid(_))
        ));
        match SlashCommand::parse("/offside") {
            Some(SlashCommand::Invalid(message)) => assert!(message.contains("/offside")),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
