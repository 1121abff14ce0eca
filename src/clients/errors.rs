//! Error types for the query execution path.
//!
//! # Error Handling
//!
//! Two layers of failure are distinguished:
//!
//! - [`TransportError`]: the HTTPS exchange itself failed: network or
//!   timeout errors, an unexpected HTTP status, or a body that was not JSON
//! - [`ClientError`]: the unified error for query execution, wrapping
//!   transport failures and token-acquisition failures
//!
//! GraphQL-level errors are NOT errors at this layer: a well-formed response
//! envelope is returned to the caller even when its `errors` field is
//! populated, because GraphQL allows partial data alongside errors.
//!
//! # Example
//!
//! ```rust,ignore
//! use nexar_api::{ClientError, TransportError};
//!
//! match client.query(query, None).await {
//!     Ok(envelope) => { /* inspect envelope.data / envelope.errors */ }
//!     Err(ClientError::Auth(e)) => eprintln!("credentials: {e}"),
//!     Err(ClientError::Transport(e)) => eprintln!("transport: {e}"),
//! }
//! ```

use crate::auth::AuthError;
use thiserror::Error;

/// Error for failures of the HTTPS exchange itself.
///
/// Timeouts surface as [`TransportError::Network`] with a `reqwest` error
/// whose `is_timeout()` is true.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network or timeout error while sending the request or reading the
    /// response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success HTTP status.
    #[error("unexpected HTTP status {status} from GraphQL endpoint: {body}")]
    Status {
        /// The HTTP status code of the response.
        status: u16,
        /// The raw response body.
        body: String,
    },

    /// The response body could not be parsed as a JSON envelope.
    #[error("response body was not a valid GraphQL envelope: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

/// Unified error type for query execution.
///
/// Wraps token-acquisition failures and transport failures transparently so
/// the underlying message reaches the caller unchanged.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Acquiring or refreshing the access token failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The HTTPS exchange failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
