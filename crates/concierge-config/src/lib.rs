//! # Concierge Configuration
//!
//! Typed configuration for the concierge client.
//!
//! Values are layered with precedence defaults < file < environment < CLI
//! arguments. The file format is TOML and lives at
//! `~/.config/concierge/config.toml` unless overridden.
//!
//! ```rust,no_run
//! use concierge_config::{ConciergeConfig, ConfigOverrides};
//!
//! let config = ConciergeConfig::load(None, ConfigOverrides::default()).unwrap();
//! println!("{}", config.backend.base_url);
//! ```

#![warn(missing_docs)]

mod config;
mod loader;

pub use config::*;
pub use loader::*;
