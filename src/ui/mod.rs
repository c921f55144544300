//! User interface components.
//!
//! This module provides the Dioxus-based UI for the application:
//!
//! - [`app`] - Main application entry point, loading and autoconnect
//! - [`diagram`] - The canvas with nodes, port handles and links
//! - [`sidebar`] - Right sidebar with autoconnect and the properties panel

mod app;
mod diagram;
mod sidebar;

pub use app::App;
