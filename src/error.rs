//! Error types for crate configuration.
//!
//! This module contains the error type used for configuration and
//! validation failures.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use nexar_api::{ClientId, ConfigError};
//!
//! let result = ClientId::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyClientId)));
//! ```

use thiserror::Error;

/// Errors that can occur during client configuration.
///
/// This enum represents all possible errors that can occur when creating
/// or validating configuration types. Each variant provides a clear,
/// actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Client ID cannot be empty.
    #[error("Client ID cannot be empty. Please provide the application's Nexar client ID.")]
    EmptyClientId,

    /// Client secret cannot be empty.
    #[error("Client secret cannot be empty. Please provide the application's Nexar client secret.")]
    EmptyClientSecret,

    /// Endpoint URL is invalid.
    #[error("Invalid API endpoint '{url}'. Expected an absolute http(s) URL (e.g., 'https://api.nexar.com/graphql').")]
    InvalidEndpoint {
        /// The invalid URL that was provided.
        url: String,
    },

    /// Scope string is not one of the known Nexar scopes.
    #[error("Unknown scope '{scope}'. Known scopes: supply.domain, design.domain, user.access, offline_access.")]
    UnknownScope {
        /// The scope string that was provided.
        scope: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// A required environment variable is not set.
    #[error("Missing environment variable '{name}'. Set it to the application's Nexar credential value.")]
    MissingEnvVar {
        /// The name of the missing environment variable.
        name: &'static str,
    },
}
