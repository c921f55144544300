//! Sends diagram changes to the backend in the background.
//!
//! Every [`SyncCommand`] becomes its own task. Tasks are not ordered against
//! each other and are never retried; their [`SyncOutcome`]s arrive on the
//! channel returned by [`Synchronizer::new`] for the UI loop to reconcile.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::diagram::{DiagramController, LoadReport, SyncCommand, SyncOutcome};

use super::backend::ConnectionBackend;
use super::error::BackendError;

pub async fn send_command<B: ConnectionBackend>(
    backend: &B,
    command: &SyncCommand,
) -> Result<(), BackendError> {
    match command {
        SyncCommand::Connect(pair) => backend.connect(pair).await,
        SyncCommand::Disconnect(pair) => backend.disconnect(pair).await,
    }
}

/// Fetches a snapshot and builds a fresh controller from it.
pub async fn fetch_diagram<B: ConnectionBackend>(
    backend: &B,
) -> Result<(DiagramController, LoadReport), BackendError> {
    let snapshot = backend.current_state().await?;
    Ok(DiagramController::from_snapshot(&snapshot))
}

/// Runs autoconnect on the server, then reloads the diagram so it shows the
/// links the server made. Nothing is reloaded when autoconnect fails.
pub async fn autoconnect_and_reload<B: ConnectionBackend>(
    backend: &B,
) -> Result<(DiagramController, LoadReport), BackendError> {
    backend.autoconnect().await?;
    info!("Autoconnect done, reloading");
    fetch_diagram(backend).await
}

pub struct Synchronizer<B> {
    backend: Arc<B>,
    outcomes: mpsc::UnboundedSender<SyncOutcome>,
}

impl<B> Clone for Synchronizer<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            outcomes: self.outcomes.clone(),
        }
    }
}

impl<B: ConnectionBackend> Synchronizer<B> {
    pub fn new(backend: Arc<B>) -> (Self, mpsc::UnboundedReceiver<SyncOutcome>) {
        let (outcomes, rx) = mpsc::unbounded_channel();
        (Self { backend, outcomes }, rx)
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Spawns the request for `command`, issued by the controller at `epoch`.
    pub fn dispatch(&self, epoch: u64, command: SyncCommand) -> JoinHandle<()> {
        let backend = self.backend.clone();
        let outcomes = self.outcomes.clone();

        tokio::spawn(async move {
            info!("Sending {} {}", command.path(), command.pair());
            let result = send_command(backend.as_ref(), &command)
                .await
                .map_err(|e| e.to_string());
            if let Err(e) = &result {
                warn!("{} {} failed: {}", command.path(), command.pair(), e);
            }

            let outcome = SyncOutcome {
                epoch,
                command,
                result,
            };
            if outcomes.send(outcome).is_err() {
                warn!("Sync outcome dropped, receiver is gone");
            }
        })
    }
}
