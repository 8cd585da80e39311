//! Feedback submission, both as a one-shot command and as the in-chat form

use anyhow::{bail, Result};
use std::time::Duration;
use tracing::debug;

use concierge_core::{ChatController, FeedbackForm, FeedbackOutcome};

use super::spinner;
use crate::context::AppContext;
use crate::formatting::Display;
use crate::input::Prompter;

const THANK_YOU: &str = "Thank you for your feedback!";
const SUBMIT_FAILED: &str = "Failed to submit feedback. Please try again.";

/// `concierge feedback --description ... [--name ...]`
pub async fn execute(ctx: AppContext, description: String, name: Option<String>) -> Result<()> {
    let controller = ctx.controller();
    let mut form = FeedbackForm::new(name.unwrap_or_default(), description);

    if !form.can_submit() {
        bail!("Feedback description must not be empty");
    }

    match send(&controller, &mut form).await {
        FeedbackOutcome::Sent => {
            Display::success(THANK_YOU);
            Ok(())
        }
        FeedbackOutcome::Failed(e) => bail!("{SUBMIT_FAILED} ({e})"),
        FeedbackOutcome::Ignored => Ok(()),
    }
}

/// Interactive form opened by `/feedback`.
///
/// A blank description closes the form without sending. On failure the
/// entered text is kept and the user may retry.
pub async fn run_form(
    controller: &ChatController,
    prompter: &mut dyn Prompter,
    close_delay: Duration,
) -> Result<()> {
    Display::info("Send feedback (leave the description blank to cancel)");

    let Some(name) = prompter.read_line("Name (optional)")? else {
        return Ok(());
    };
    let Some(description) = prompter.read_line("What worked? What didn't?")? else {
        return Ok(());
    };

    let mut form = FeedbackForm::new(name, description);
    if !form.can_submit() {
        Display::info("Feedback cancelled");
        return Ok(());
    }

    loop {
        match send(controller, &mut form).await {
            FeedbackOutcome::Sent => {
                Display::success(THANK_YOU);
                tokio::time::sleep(close_delay).await;
                return Ok(());
            }
            FeedbackOutcome::Failed(e) => {
                debug!("Feedback submission failed: {}", e);
                Display::error(SUBMIT_FAILED);
                if !prompter.confirm("Retry?")? {
                    return Ok(());
                }
            }
            FeedbackOutcome::Ignored => return Ok(()),
        }
    }
}

async fn send(controller: &ChatController, form: &mut FeedbackForm) -> FeedbackOutcome {
    let pb = spinner("Submitting...");
    let outcome = controller.submit_feedback(form).await;
    pb.finish_and_clear();
    outcome
}
