//! Diagram state and interaction logic, independent of the UI toolkit.
//!
//! - [`canvas::Canvas`] - rendered nodes, port handles and links
//! - [`drag::DragContext`] - handle styling while a connection is dragged
//! - [`DiagramController`] - snapshot loading, gestures and reconciliation
//! - [`layout`] - node placement and connector geometry

pub mod canvas;
pub mod controller;
pub mod drag;
pub mod error;
pub mod handle;
pub mod layout;
pub mod panel;

pub use canvas::NodeView;
pub use controller::{DiagramController, LoadReport, SyncCommand, SyncOutcome};
pub use handle::{CONNECTOR_STYLE, HANDLE_STYLE};
pub use panel::PanelLine;
