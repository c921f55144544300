//! Application state shared with the UI.
//!
//! - [`AppState`] - configuration, backend client and the sync channel

use anyhow::{Context, Result};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::config::AppConfig;
use crate::diagram::SyncOutcome;
use crate::io::{HttpBackend, Synchronizer};

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub sync: Synchronizer<HttpBackend>,
    sync_outcomes: Mutex<Option<UnboundedReceiver<SyncOutcome>>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Arc<Self>> {
        let backend = HttpBackend::new(&config.page_url, config.request_timeout)
            .context("Failed to create HTTP client")?;
        let (sync, outcomes) = Synchronizer::new(Arc::new(backend));

        Ok(Arc::new(Self {
            config,
            sync,
            sync_outcomes: Mutex::new(Some(outcomes)),
        }))
    }

    pub fn backend(&self) -> &HttpBackend {
        self.sync.backend()
    }

    /// Hands the outcome channel to the UI loop. Only the first call gets it.
    pub fn take_sync_outcomes(&self) -> Option<UnboundedReceiver<SyncOutcome>> {
        self.sync_outcomes.lock().ok()?.take()
    }
}
