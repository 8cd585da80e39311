//! Shared wiring for commands: backend client and state store

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

use concierge_config::ConciergeConfig;
use concierge_core::{
    ChatController, ConciergeApi, FileStateStore, HttpConciergeClient, MemoryStateStore,
    StateStore,
};

pub struct AppContext {
    pub config: ConciergeConfig,
    pub api: Arc<dyn ConciergeApi>,
    pub store: Arc<dyn StateStore>,
}

impl AppContext {
    pub fn new(config: ConciergeConfig, no_persist: bool) -> Result<Self> {
        let api = HttpConciergeClient::new(&config.backend.base_url, config.request_timeout())
            .context("Failed to create backend client")?;
        debug!("Using backend {}", api.base_url());

        let store: Arc<dyn StateStore> = match config.state_dir() {
            Some(dir) if !no_persist => Arc::new(FileStateStore::open(&dir)),
            _ => Arc::new(MemoryStateStore::new()),
        };

        Ok(Self {
            config,
            api: Arc::new(api),
            store,
        })
    }

    pub fn controller(&self) -> ChatController {
        ChatController::new(Arc::clone(&self.api))
    }
}
