//! Talking to the connection manager.
//!
//! - [`backend::ConnectionBackend`] - the operations the diagram needs from the server
//! - [`HttpBackend`] - the REST implementation via reqwest
//! - [`Synchronizer`] - background sync of diagram changes

pub mod backend;
pub mod error;
pub mod http;
pub mod sync;

pub use http::HttpBackend;
pub use sync::{Synchronizer, autoconnect_and_reload, fetch_diagram};
