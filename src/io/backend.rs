//! The seam between the diagram and the connection manager.

use std::future::Future;

use crate::model::{ConnectionPair, Snapshot};

use super::error::BackendError;

/// Operations the connection manager offers to the diagram.
pub trait ConnectionBackend: Send + Sync + 'static {
    /// Current endpoints and active links.
    fn current_state(&self) -> impl Future<Output = Result<Snapshot, BackendError>> + Send;

    fn connect(
        &self,
        pair: &ConnectionPair,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    fn disconnect(
        &self,
        pair: &ConnectionPair,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Asks the server to wire up every unambiguous pair of ports.
    fn autoconnect(&self) -> impl Future<Output = Result<(), BackendError>> + Send;
}
