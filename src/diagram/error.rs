use crate::model::{ConnectionPair, ParseConnectionError, PortKey};

/// Reasons the canvas refuses a change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiagramError {
    #[error("no port handle registered for `{0}`")]
    UnknownPort(PortKey),

    #[error("port `{0}` takes no more connections")]
    PortFull(PortKey),

    #[error("`{to}` is not a valid target for `{from}`")]
    NotATarget { from: PortKey, to: PortKey },

    #[error("cannot connect `{0}` to itself")]
    SelfConnection(PortKey),

    #[error("`{0}` is already connected")]
    AlreadyConnected(ConnectionPair),

    #[error(transparent)]
    Malformed(#[from] ParseConnectionError),

    #[error("no connection drag in progress")]
    NoActiveDrag,
}
