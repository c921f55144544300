//! Wire types for the connection manager API.
//!
//! - [`Snapshot`] / [`Endpoint`] / [`Port`] - topology served by `currentState`
//! - [`PortKey`] / [`ConnectionPair`] - composite port ids and links
//! - [`EndpointIdent`] - display parts of an endpoint id

pub mod endpoint;
pub mod ident;
pub mod key;

pub use endpoint::{Endpoint, OrderedMap, Port, Snapshot};
pub use ident::EndpointIdent;
pub use key::{ConnectionPair, ParseConnectionError, PortKey};
