//! Beta notice

use anyhow::{Context, Result};

use concierge_core::splash;

use crate::context::AppContext;
use crate::formatting::{render_markdown, Display};

/// Print the notice regardless of the dismissal flag, or clear the flag
pub async fn execute(ctx: AppContext, reset: bool) -> Result<()> {
    if reset {
        splash::reset(ctx.store.as_ref()).context("Failed to reset splash state")?;
        Display::success("The beta notice will show on the next chat launch.");
        return Ok(());
    }

    let document = ctx
        .api
        .fetch_splash()
        .await
        .context("Failed to load the beta notice")?;
    println!("{}", render_markdown(&document));
    Ok(())
}
