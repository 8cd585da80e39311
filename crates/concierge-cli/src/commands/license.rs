//! One-shot license lookup

use anyhow::{bail, Result};

use concierge_core::SubmitOutcome;

use super::ask::print_result;
use super::spinner;
use crate::context::AppContext;

pub async fn execute(ctx: AppContext, email: String, json: bool) -> Result<()> {
    let mut controller = ctx.controller();

    let pb = spinner("Looking up licenses...");
    let outcome = controller.submit_license_email(&email).await;
    pb.finish_and_clear();

    print_result(&controller, json)?;

    match outcome {
        SubmitOutcome::Ignored => bail!("Email must not be empty"),
        SubmitOutcome::Failed => bail!("License lookup failed"),
        _ => Ok(()),
    }
}
