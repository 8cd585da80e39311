use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use concierge_cli::{
    cli::{Cli, Commands, ConfigCommands},
    commands,
    context::AppContext,
};
use concierge_config::{ConciergeConfig, ConfigOverrides};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Writing a fresh config must work even when the current one is broken
    if let Some(Commands::Config(ConfigCommands::Init { path, force })) = &cli.command {
        return commands::config::init(path.clone(), *force);
    }

    let overrides = ConfigOverrides {
        base_url: cli.base_url.clone(),
        state_dir: cli.state_dir.clone(),
        log_level: cli.log_level_override(),
    };
    let config = ConciergeConfig::load(cli.config.clone(), overrides)?;

    init_logging(&config.logging.level);
    debug!("Loaded configuration: backend {}", config.backend.base_url);

    match cli.command {
        Some(Commands::Config(cmd)) => commands::config::execute(&config, cmd).await,
        Some(Commands::Ask {
            question,
            email,
            json,
        }) => {
            let ctx = AppContext::new(config, cli.no_persist)?;
            commands::ask::execute(ctx, question, email, json).await
        }
        Some(Commands::License { email, json }) => {
            commands::license::execute(AppContext::new(config, cli.no_persist)?, email, json).await
        }
        Some(Commands::Feedback { description, name }) => {
            let ctx = AppContext::new(config, cli.no_persist)?;
            commands::feedback::execute(ctx, description, name).await
        }
        Some(Commands::Splash { reset }) => {
            commands::splash::execute(AppContext::new(config, cli.no_persist)?, reset).await
        }
        Some(Commands::Health) => {
            commands::health::execute(AppContext::new(config, cli.no_persist)?).await
        }
        Some(Commands::Chat { no_splash }) => {
            commands::chat::execute(AppContext::new(config, cli.no_persist)?, no_splash).await
        }
        None => commands::chat::execute(AppContext::new(config, cli.no_persist)?, false).await,
    }
}

/// Log to stderr so answers on stdout stay clean. `RUST_LOG` wins when set.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "concierge_cli={level},concierge_core={level},concierge_config={level}"
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
