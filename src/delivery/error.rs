//! Errors raised by delivery channels

use thiserror::Error;

/// Transport-level failure: the channel could not be reached or its answer
/// could not be understood. A remote that answers "no" is not an error, see
/// [`super::DeliveryReceipt`].
#[derive(Debug, Error)]
pub enum SendError {
    /// Connection, TLS or timeout error from the HTTP client
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote answered successfully but the body was not what we expect
    #[error("undecodable response: {0}")]
    Decode(String),

    /// The remote refused a request that has no receipt, such as an auto-reply
    #[error("remote rejected request: {0}")]
    Rejected(String),

    /// The HTTP client could not be built
    #[error("client setup failed: {0}")]
    Client(String),
}
