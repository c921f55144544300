//! Diagram controller: turns snapshots and user gestures into canvas changes
//! and the backend requests that mirror them.
//!
//! Gestures are applied to the canvas right away. Each change the backend has
//! to know about comes back as a [`SyncCommand`]; once it has been sent, the
//! resulting [`SyncOutcome`] is fed to [`DiagramController::reconcile`], which
//! undoes the change on the canvas if the backend refused it.
//!
//! Every controller carries an epoch. Outcomes of requests sent by an older
//! controller (before a reload) are dropped instead of being applied to a
//! canvas that was rebuilt from a newer snapshot.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, warn};

use crate::model::{ConnectionPair, PortKey, Snapshot};

use super::canvas::Canvas;
use super::drag::DragContext;
use super::error::DiagramError;
use super::panel::PropertiesPanel;

/// A change the backend has to be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncCommand {
    Connect(ConnectionPair),
    Disconnect(ConnectionPair),
}

impl SyncCommand {
    pub fn pair(&self) -> &ConnectionPair {
        match self {
            SyncCommand::Connect(pair) | SyncCommand::Disconnect(pair) => pair,
        }
    }

    /// Path of the API call, relative to the API prefix.
    pub fn path(&self) -> &'static str {
        match self {
            SyncCommand::Connect(_) => "connect",
            SyncCommand::Disconnect(_) => "disconnect",
        }
    }
}

/// Result of sending a [`SyncCommand`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Epoch of the controller that produced the command.
    pub epoch: u64,
    pub command: SyncCommand,
    pub result: Result<(), String>,
}

/// Counts from loading a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub nodes: usize,
    pub duplicate_nodes: usize,
    pub connections: usize,
    pub skipped_connections: usize,
}

static NEXT_EPOCH: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
pub struct DiagramController {
    epoch: u64,
    canvas: Canvas,
    drag: Option<DragContext>,
    hovered: Option<String>,
    last_error: Option<String>,
}

impl Default for DiagramController {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagramController {
    pub fn new() -> Self {
        Self {
            epoch: NEXT_EPOCH.fetch_add(1, Ordering::Relaxed),
            canvas: Canvas::new(),
            drag: None,
            hovered: None,
            last_error: None,
        }
    }

    pub fn from_snapshot(snapshot: &Snapshot) -> (Self, LoadReport) {
        let mut controller = Self::new();
        let report = controller.load(snapshot);
        (controller, report)
    }

    /// Renders every endpoint, then draws the links that are already active.
    pub fn load(&mut self, snapshot: &Snapshot) -> LoadReport {
        let mut report = LoadReport::default();

        self.canvas.batch(|canvas| {
            for endpoint in &snapshot.endpoints {
                if canvas.add_node(endpoint) {
                    report.nodes += 1;
                } else {
                    report.duplicate_nodes += 1;
                }
            }

            for raw in &snapshot.active_connections {
                let drawn = raw
                    .parse::<ConnectionPair>()
                    .map_err(DiagramError::from)
                    .and_then(|pair| canvas.connect(pair));
                match drawn {
                    Ok(()) => report.connections += 1,
                    Err(e) => {
                        warn!("Skipping active connection {}: {}", raw, e);
                        report.skipped_connections += 1;
                    }
                }
            }
        });

        info!(
            "Loaded snapshot: {} nodes, {} connections ({} skipped)",
            report.nodes, report.connections, report.skipped_connections
        );
        report
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Tag for the commands this controller hands out.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn move_node(&mut self, id: &str, dx: f64, dy: f64) {
        self.canvas.move_node(id, dx, dy);
    }

    pub fn hover(&mut self, id: &str) {
        if self.canvas.node(id).is_some() {
            self.hovered = Some(id.to_string());
        }
    }

    /// Panel content for the node hovered last.
    pub fn panel(&self) -> Option<PropertiesPanel> {
        self.hovered
            .as_deref()
            .and_then(|id| self.canvas.node(id))
            .map(PropertiesPanel::for_node)
    }

    pub fn active_drag(&self) -> Option<&DragContext> {
        self.drag.as_ref()
    }

    /// A connection drag starts from `source`.
    pub fn before_drag(&mut self, source: &PortKey) -> Result<(), DiagramError> {
        if let Some(stale) = self.drag.take() {
            stale.end(&mut self.canvas);
        }
        self.drag = Some(DragContext::begin(&mut self.canvas, source)?);
        Ok(())
    }

    /// The drag was dropped on `target`. Draws the link and returns the
    /// request announcing it.
    pub fn on_connection(&mut self, target: &PortKey) -> Result<SyncCommand, DiagramError> {
        let drag = self.drag.as_ref().ok_or(DiagramError::NoActiveDrag)?;

        let interactive = self
            .canvas
            .handle(target)
            .ok_or_else(|| DiagramError::UnknownPort(target.clone()))?
            .is_interactive();
        if !interactive || !drag.accepts(target) {
            return Err(DiagramError::NotATarget {
                from: drag.source().clone(),
                to: target.clone(),
            });
        }

        let pair = ConnectionPair::new(drag.source().clone(), target.clone());
        self.canvas.connect(pair.clone())?;
        info!("Connected {}", pair);
        Ok(SyncCommand::Connect(pair))
    }

    /// The drag gesture ended, whether or not a link was formed.
    pub fn on_drag_stop(&mut self) {
        match self.drag.take() {
            Some(drag) => drag.end(&mut self.canvas),
            None => debug!("Drag stop without an active drag"),
        }
    }

    /// A link was detached. Only detaches that still name a target came
    /// from the user and need to reach the backend.
    pub fn on_connection_detached(
        &mut self,
        source: &PortKey,
        target: Option<&PortKey>,
    ) -> Option<SyncCommand> {
        let Some(target) = target else {
            debug!("Detach from {} without target, nothing to sync", source);
            return None;
        };

        let removed = self
            .canvas
            .detach(&ConnectionPair::new(source.clone(), target.clone()))?;
        info!("Disconnected {}", removed);
        Some(SyncCommand::Disconnect(removed))
    }

    /// Brings the canvas back in line with the backend after a request
    /// finished.
    pub fn reconcile(&mut self, outcome: &SyncOutcome) {
        if outcome.epoch != self.epoch {
            debug!(
                "Dropping {} {} from epoch {}, diagram was reloaded (epoch {})",
                outcome.command.path(),
                outcome.command.pair(),
                outcome.epoch,
                self.epoch
            );
            return;
        }

        let Err(reason) = &outcome.result else {
            debug!("Backend confirmed {} {}", outcome.command.path(), outcome.command.pair());
            return;
        };

        match &outcome.command {
            SyncCommand::Connect(pair) => {
                warn!("Connect {} failed, removing link: {}", pair, reason);
                self.canvas.detach(pair);
                self.last_error = Some(format!(
                    "Could not connect {} to {}: {}",
                    pair.source, pair.target, reason
                ));
            }
            SyncCommand::Disconnect(pair) => {
                warn!("Disconnect {} failed, restoring link: {}", pair, reason);
                if let Err(e) = self.canvas.connect(pair.clone()) {
                    warn!("Could not restore {}: {}", pair, e);
                }
                self.last_error = Some(format!(
                    "Could not disconnect {} from {}: {}",
                    pair.source, pair.target, reason
                ));
            }
        }
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Shows a failure that did not come from a sync request.
    pub fn report_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::canvas::tests::endpoint;

    fn snapshot() -> Snapshot {
        Snapshot {
            endpoints: vec![
                endpoint("a", &[("out", false, &["b:in", "c:in"])]),
                endpoint("b", &[("in", false, &["a:out"])]),
                endpoint("c", &[("in", true, &["a:out"])]),
            ],
            active_connections: Vec::new(),
        }
    }

    #[test]
    fn test_load_draws_active_connections() {
        let mut snap = snapshot();
        snap.endpoints.push(endpoint("a", &[]));
        snap.active_connections = vec![
            "a:out-b:in".to_string(),
            "garbage".to_string(),
            "a:out-missing:in".to_string(),
        ];

        let (controller, report) = DiagramController::from_snapshot(&snap);

        assert_eq!(report, LoadReport {
            nodes: 3,
            duplicate_nodes: 1,
            connections: 1,
            skipped_connections: 2,
        });
        assert_eq!(controller.canvas().nodes().len(), 3);
        assert_eq!(
            controller.canvas().connections(),
            &[ConnectionPair::new("a:out", "b:in")]
        );
    }

    #[test]
    fn test_drop_on_valid_target() {
        let (mut controller, _) = DiagramController::from_snapshot(&snapshot());

        controller.before_drag(&"a:out".into()).unwrap();
        let command = controller.on_connection(&"b:in".into()).unwrap();
        controller.on_drag_stop();

        assert_eq!(command, SyncCommand::Connect(ConnectionPair::new("a:out", "b:in")));
        assert_eq!(command.path(), "connect");
        assert!(controller.active_drag().is_none());
        assert!(controller.canvas().handles().iter().all(|h| h.is_interactive()));
    }

    #[test]
    fn test_drop_on_disabled_handle_is_refused() {
        let mut snap = snapshot();
        snap.endpoints.push(endpoint("d", &[("in", false, &[])]));
        let (mut controller, _) = DiagramController::from_snapshot(&snap);

        controller.before_drag(&"a:out".into()).unwrap();
        let err = controller.on_connection(&"d:in".into()).unwrap_err();
        assert!(matches!(err, DiagramError::NotATarget { .. }));
        assert!(controller.canvas().connections().is_empty());
    }

    #[test]
    fn test_drop_without_drag() {
        let (mut controller, _) = DiagramController::from_snapshot(&snapshot());
        assert_eq!(
            controller.on_connection(&"b:in".into()),
            Err(DiagramError::NoActiveDrag)
        );
    }

    #[test]
    fn test_detach_requires_target() {
        let mut snap = snapshot();
        snap.active_connections = vec!["a:out-b:in".to_string()];
        let (mut controller, _) = DiagramController::from_snapshot(&snap);

        assert_eq!(controller.on_connection_detached(&"a:out".into(), None), None);
        assert_eq!(controller.canvas().connections().len(), 1);

        let command = controller
            .on_connection_detached(&"a:out".into(), Some(&"b:in".into()))
            .unwrap();
        assert_eq!(command, SyncCommand::Disconnect(ConnectionPair::new("a:out", "b:in")));
        assert!(controller.canvas().connections().is_empty());
    }

    #[test]
    fn test_failed_connect_is_rolled_back() {
        let (mut controller, _) = DiagramController::from_snapshot(&snapshot());
        controller.before_drag(&"a:out".into()).unwrap();
        let command = controller.on_connection(&"c:in".into()).unwrap();
        controller.on_drag_stop();

        controller.reconcile(&SyncOutcome {
            epoch: controller.epoch(),
            command,
            result: Err("HTTP 500".to_string()),
        });

        assert!(controller.canvas().connections().is_empty());
        assert!(controller.last_error().unwrap().contains("HTTP 500"));

        controller.dismiss_error();
        assert!(controller.last_error().is_none());
    }

    #[test]
    fn test_failed_disconnect_is_restored() {
        let mut snap = snapshot();
        snap.active_connections = vec!["a:out-b:in".to_string()];
        let (mut controller, _) = DiagramController::from_snapshot(&snap);

        let command = controller
            .on_connection_detached(&"b:in".into(), Some(&"a:out".into()))
            .unwrap();
        controller.reconcile(&SyncOutcome {
            epoch: controller.epoch(),
            command,
            result: Err("refused".to_string()),
        });

        assert_eq!(
            controller.canvas().connections(),
            &[ConnectionPair::new("a:out", "b:in")]
        );
    }

    #[test]
    fn test_confirmed_outcome_keeps_canvas() {
        let (mut controller, _) = DiagramController::from_snapshot(&snapshot());
        controller.before_drag(&"a:out".into()).unwrap();
        let command = controller.on_connection(&"b:in".into()).unwrap();
        controller.on_drag_stop();

        controller.reconcile(&SyncOutcome {
            epoch: controller.epoch(),
            command,
            result: Ok(()),
        });
        assert_eq!(controller.canvas().connections().len(), 1);
        assert!(controller.last_error().is_none());
    }

    #[test]
    fn test_outcome_from_before_reload_is_dropped() {
        let (mut before, _) = DiagramController::from_snapshot(&snapshot());
        before.before_drag(&"a:out".into()).unwrap();
        let connect = before.on_connection(&"b:in".into()).unwrap();
        before.on_drag_stop();
        let disconnect = before
            .on_connection_detached(&"a:out".into(), Some(&"b:in".into()))
            .unwrap();

        // The server confirmed a:out-b:in in the meantime.
        let mut snap = snapshot();
        snap.active_connections = vec!["a:out-b:in".to_string()];
        let (mut reloaded, _) = DiagramController::from_snapshot(&snap);
        assert_ne!(before.epoch(), reloaded.epoch());

        reloaded.reconcile(&SyncOutcome {
            epoch: before.epoch(),
            command: connect,
            result: Err("409 Conflict".to_string()),
        });
        assert_eq!(
            reloaded.canvas().connections(),
            &[ConnectionPair::new("a:out", "b:in")]
        );
        assert!(reloaded.last_error().is_none());

        // And a late failed disconnect must not bring back a removed link.
        let (mut empty, _) = DiagramController::from_snapshot(&snapshot());
        empty.reconcile(&SyncOutcome {
            epoch: before.epoch(),
            command: disconnect,
            result: Err("refused".to_string()),
        });
        assert!(empty.canvas().connections().is_empty());
        assert!(empty.last_error().is_none());
    }

    #[test]
    fn test_hover_selects_panel() {
        let (mut controller, _) = DiagramController::from_snapshot(&snapshot());
        assert!(controller.panel().is_none());

        controller.hover("b");
        assert_eq!(controller.panel().unwrap().title, "b");

        controller.hover("unknown");
        assert_eq!(controller.panel().unwrap().title, "b");
    }
}
