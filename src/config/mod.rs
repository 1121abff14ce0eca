//! Configuration types for the Nexar API client.
//!
//! This module provides the core configuration types used to initialize
//! a [`crate::NexarClient`] for API communication with Nexar.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`NexarConfig`]: The main configuration struct holding all client settings
//! - [`NexarConfigBuilder`]: A builder for constructing [`NexarConfig`] instances
//! - [`ClientId`]: A validated client ID newtype
//! - [`ClientSecret`]: A validated client secret newtype with masked debug output
//! - [`ApiEndpoint`]: A validated API endpoint URL
//!
//! # Example
//!
//! ```rust
//! use nexar_api::{NexarConfig, ClientId, ClientSecret, ScopeSet};
//!
//! let config = NexarConfig::builder()
//!     .client_id(ClientId::new("my-client-id").unwrap())
//!     .client_secret(ClientSecret::new("my-secret").unwrap())
//!     .scope(ScopeSet::design())
//!     .build()
//!     .unwrap();
//! ```
//!
//! # Environment Loading
//!
//! Credentials are commonly supplied through the `NEXAR_CLIENT_ID` and
//! `NEXAR_CLIENT_SECRET` environment variables. The builder can be seeded
//! from them, failing fast with a descriptive error when either is absent:
//!
//! ```rust,no_run
//! use nexar_api::NexarConfig;
//!
//! let config = NexarConfig::builder_from_env()?.build()?;
//! # Ok::<(), nexar_api::ConfigError>(())
//! ```

mod newtypes;

pub use newtypes::{ApiEndpoint, ClientId, ClientSecret};

use crate::auth::ScopeSet;
use crate::error::ConfigError;
use std::time::Duration;

/// Default GraphQL endpoint for the Nexar API.
pub const DEFAULT_API_ENDPOINT: &str = "https://api.nexar.com/graphql";

/// Default token endpoint for the Nexar identity service.
pub const DEFAULT_IDENTITY_URL: &str = "https://identity.nexar.com/connect/token";

/// Default per-request timeout.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the client ID.
const ENV_CLIENT_ID: &str = "NEXAR_CLIENT_ID";

/// Environment variable holding the client secret.
const ENV_CLIENT_SECRET: &str = "NEXAR_CLIENT_SECRET";

/// Configuration for the Nexar API client.
///
/// This struct holds all configuration needed for client operations,
/// including application credentials, requested scopes, and endpoint
/// settings. Credentials are supplied once at construction and are
/// immutable for the lifetime of the configuration.
///
/// # Thread Safety
///
/// `NexarConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
///
/// # Example
///
/// ```rust
/// use nexar_api::{NexarConfig, ClientId, ClientSecret};
///
/// let config = NexarConfig::builder()
///     .client_id(ClientId::new("my-client-id").unwrap())
///     .client_secret(ClientSecret::new("my-secret").unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(config.endpoint().as_ref(), "https://api.nexar.com/graphql");
/// ```
#[derive(Clone, Debug)]
pub struct NexarConfig {
    client_id: ClientId,
    client_secret: ClientSecret,
    scope: ScopeSet,
    endpoint: ApiEndpoint,
    identity_url: ApiEndpoint,
    request_timeout: Duration,
}

impl NexarConfig {
    /// Creates a new builder for constructing a `NexarConfig`.
    #[must_use]
    pub fn builder() -> NexarConfigBuilder {
        NexarConfigBuilder::new()
    }

    /// Creates a builder pre-populated with credentials from the
    /// `NEXAR_CLIENT_ID` and `NEXAR_CLIENT_SECRET` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when either variable is unset
    /// or empty.
    pub fn builder_from_env() -> Result<NexarConfigBuilder, ConfigError> {
        let client_id = std::env::var(ENV_CLIENT_ID)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingEnvVar {
                name: ENV_CLIENT_ID,
            })?;
        let client_secret = std::env::var(ENV_CLIENT_SECRET)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingEnvVar {
                name: ENV_CLIENT_SECRET,
            })?;

        Ok(Self::builder()
            .client_id(ClientId::new(client_id)?)
            .client_secret(ClientSecret::new(client_secret)?))
    }

    /// Returns the client ID.
    #[must_use]
    pub const fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// Returns the client secret.
    #[must_use]
    pub const fn client_secret(&self) -> &ClientSecret {
        &self.client_secret
    }

    /// Returns the requested token scope set.
    #[must_use]
    pub const fn scope(&self) -> &ScopeSet {
        &self.scope
    }

    /// Returns the default GraphQL endpoint queries are sent to.
    #[must_use]
    pub const fn endpoint(&self) -> &ApiEndpoint {
        &self.endpoint
    }

    /// Returns the identity service URL used for token requests.
    #[must_use]
    pub const fn identity_url(&self) -> &ApiEndpoint {
        &self.identity_url
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

// Verify NexarConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<NexarConfig>();
};

/// Builder for constructing [`NexarConfig`] instances.
///
/// Required fields are `client_id` and `client_secret`. All other fields
/// have sensible defaults.
///
/// # Defaults
///
/// - `scope`: [`ScopeSet::supply()`]
/// - `endpoint`: [`DEFAULT_API_ENDPOINT`]
/// - `identity_url`: [`DEFAULT_IDENTITY_URL`]
/// - `request_timeout`: 30 seconds
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use nexar_api::{ApiEndpoint, ClientId, ClientSecret, NexarConfig, ScopeSet};
///
/// let config = NexarConfig::builder()
///     .client_id(ClientId::new("id").unwrap())
///     .client_secret(ClientSecret::new("secret").unwrap())
///     .scope(ScopeSet::design())
///     .endpoint(ApiEndpoint::new("https://eu.nexar.com/graphql").unwrap())
///     .request_timeout(Duration::from_secs(10))
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct NexarConfigBuilder {
    client_id: Option<ClientId>,
    client_secret: Option<ClientSecret>,
    scope: Option<ScopeSet>,
    endpoint: Option<ApiEndpoint>,
    identity_url: Option<ApiEndpoint>,
    request_timeout: Option<Duration>,
}

impl NexarConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the client ID (required).
    #[must_use]
    pub fn client_id(mut self, id: ClientId) -> Self {
        self.client_id = Some(id);
        self
    }

    /// Sets the client secret (required).
    #[must_use]
    pub fn client_secret(mut self, secret: ClientSecret) -> Self {
        self.client_secret = Some(secret);
        self
    }

    /// Sets the scope set requested when acquiring tokens.
    #[must_use]
    pub fn scope(mut self, scope: ScopeSet) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Sets the default GraphQL endpoint.
    #[must_use]
    pub fn endpoint(mut self, endpoint: ApiEndpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Sets the identity service URL used for token requests.
    #[must_use]
    pub fn identity_url(mut self, url: ApiEndpoint) -> Self {
        self.identity_url = Some(url);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Builds the [`NexarConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `client_id` or
    /// `client_secret` are not set.
    pub fn build(self) -> Result<NexarConfig, ConfigError> {
        let client_id = self.client_id.ok_or(ConfigError::MissingRequiredField {
            field: "client_id",
        })?;
        let client_secret = self
            .client_secret
            .ok_or(ConfigError::MissingRequiredField {
                field: "client_secret",
            })?;

        let endpoint = match self.endpoint {
            Some(endpoint) => endpoint,
            None => ApiEndpoint::new(DEFAULT_API_ENDPOINT)?,
        };
        let identity_url = match self.identity_url {
            Some(url) => url,
            None => ApiEndpoint::new(DEFAULT_IDENTITY_URL)?,
        };

        Ok(NexarConfig {
            client_id,
            client_secret,
            scope: self.scope.unwrap_or_else(ScopeSet::supply),
            endpoint,
            identity_url,
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
        })
    }
}
