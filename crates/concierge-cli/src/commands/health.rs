//! Backend health check

use anyhow::{bail, Context, Result};
use colored::Colorize;

use crate::context::AppContext;

pub async fn execute(ctx: AppContext) -> Result<()> {
    let report = ctx
        .api
        .health()
        .await
        .context("Backend is unreachable")?;

    let status = if report.is_healthy() {
        report.status.green().bold()
    } else {
        report.status.red().bold()
    };
    println!("{} {}", "Backend:".bold(), ctx.config.backend.base_url);
    println!("{} {}", "Status:".bold(), status);
    if let Some(loaded) = report.vector_store_loaded {
        let text = if loaded { "loaded".green() } else { "not loaded".yellow() };
        println!("{} {}", "Knowledge base:".bold(), text);
    }

    if !report.is_healthy() {
        bail!("Backend reported status '{}'", report.status);
    }
    Ok(())
}
