//! One-shot question

use anyhow::{bail, Result};

use concierge_core::controller::EMAIL_PROMPT;
use concierge_core::{ChatController, Role, SubmitOutcome};

use super::spinner;
use crate::context::AppContext;
use crate::formatting::Display;

pub async fn execute(
    ctx: AppContext,
    question: String,
    email: Option<String>,
    json: bool,
) -> Result<()> {
    let mut controller = ctx.controller();

    let pb = spinner("Thinking...");
    let mut outcome = controller.submit_question(&question).await;
    pb.finish_and_clear();

    if outcome == SubmitOutcome::EmailRequested {
        match email {
            Some(email) if email.trim().is_empty() => bail!("Email must not be empty"),
            Some(email) => {
                let pb = spinner("Looking up licenses...");
                outcome = controller.submit_license_email(&email).await;
                pb.finish_and_clear();
            }
            None if !json => {
                Display::info(EMAIL_PROMPT);
                Display::info("Re-run with --email <address> to look up your licenses.");
            }
            None => {}
        }
    }

    print_result(&controller, json)?;

    match outcome {
        SubmitOutcome::Ignored => bail!("Question must not be empty"),
        SubmitOutcome::Failed => bail!("Request to the concierge backend failed"),
        SubmitOutcome::Answered | SubmitOutcome::EmailRequested => Ok(()),
    }
}

/// Print the assistant side of the transcript, or all of it as JSON
pub(crate) fn print_result(controller: &ChatController, json: bool) -> Result<()> {
    let transcript = controller.transcript();
    if json {
        println!("{}", transcript.to_json()?);
        return Ok(());
    }
    for message in transcript.iter().filter(|m| m.role() == Role::Assistant) {
        Display::message(message);
    }
    Ok(())
}
