/// Errors talking to the connection manager.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("connection manager returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}
