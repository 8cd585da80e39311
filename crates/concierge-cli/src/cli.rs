use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages (default for --verbose)
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser)]
#[command(name = "concierge")]
#[command(about = "concierge - ask the Soccer Referee Concierge about rules, procedures and your licenses")]
#[command(version)]
#[command(arg_required_else_help = false)]
pub struct Cli {
    /// Subcommand to execute (defaults to chat if not provided)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Set log level (off, error, warn, info, debug, trace)
    /// If not specified, uses config file value or defaults to 'warn'
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/concierge/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL (overrides config file)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Directory for persisted client state (overrides config file)
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,

    /// Keep client state in memory only
    #[arg(long, global = true)]
    pub no_persist: bool,
}

impl Cli {
    /// Log level from flags, if any was given
    pub fn log_level_override(&self) -> Option<String> {
        match (self.log_level, self.verbose) {
            (Some(level), _) => Some(level.as_str().to_string()),
            (None, true) => Some(LogLevel::Debug.as_str().to_string()),
            (None, false) => None,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive chat session
    Chat {
        /// Do not show the first-run beta notice
        #[arg(long)]
        no_splash: bool,
    },

    /// Ask a single question
    Ask {
        /// Question text
        question: String,

        /// Email to use if the question turns into a license lookup
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Print the resulting messages as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up license status for an email address
    License {
        /// Email associated with the US Soccer account
        email: String,

        /// Print the resulting messages as JSON
        #[arg(long)]
        json: bool,
    },

    /// Send feedback about the concierge
    Feedback {
        /// What worked or what didn't (required)
        #[arg(short = 'd', long)]
        description: String,

        /// Your name (optional)
        #[arg(short = 'n', long)]
        name: Option<String>,
    },

    /// Show the beta notice
    Splash {
        /// Clear the dismissal flag so the notice shows on next launch
        #[arg(long)]
        reset: bool,
    },

    /// Check backend health
    Health,

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Create a config file with example values
    Init {
        /// Where to write the file (defaults to ~/.config/concierge/config.toml)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show the effective configuration
    Show {
        /// Output format (toml, json)
        #[arg(short, long, default_value = "toml")]
        format: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_to_chat() {
        let cli = Cli::try_parse_from(["concierge"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level_override(), None);
    }

    #[test]
    fn test_verbose_means_debug_unless_level_given() {
        let cli = Cli::try_parse_from(["concierge", "-v"]).unwrap();
        assert_eq!(cli.log_level_override().as_deref(), Some("debug"));

        let cli = Cli::try_parse_from(["concierge", "-v", "--log-level", "trace"]).unwrap();
        assert_eq!(cli.log_level_override().as_deref(), Some("trace"));
    }

    #[test]
    fn test_log_level_strings_match_flag_values() {
        for level in LogLevel::value_variants() {
            let name = level.to_possible_value().unwrap();
            assert_eq!(level.as_str(), name.get_name());
        }
    }

    #[test]
    fn test_ask_with_email() {
        let cli = Cli::try_parse_from([
            "concierge",
            "ask",
            "Check my license status",
            "--email",
            "pat@example.com",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Ask {
                question, email, ..
            }) => {
                assert_eq!(question, "Check my license status");
                assert_eq!(email.as_deref(), Some("pat@example.com"));
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_feedback_requires_description() {
        assert!(Cli::try_parse_from(["concierge", "feedback", "--name", "Sam"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "concierge",
            "health",
            "--base-url",
            "http://127.0.0.1:9000",
            "--no-persist",
        ])
        .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://127.0.0.1:9000"));
        assert!(cli.no_persist);
    }
}
