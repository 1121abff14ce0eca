//! GraphQL client for the Nexar API.
//!
//! This module provides the [`NexarClient`] type for executing GraphQL
//! queries and mutations against Nexar API endpoints.

use serde_json::{Map, Value};

use crate::auth::TokenManager;
use crate::clients::errors::{ClientError, TransportError};
use crate::clients::pagination::PageIterator;
use crate::clients::response::ResponseEnvelope;
use crate::config::{ApiEndpoint, NexarConfig};

/// GraphQL API client for Nexar.
///
/// Wraps a [`TokenManager`] and an HTTPS client; every query is sent with a
/// freshly-validated bearer token and the configured per-request timeout.
///
/// # Endpoints
///
/// [`query`](Self::query) targets the endpoint from the configuration.
/// [`query_at`](Self::query_at) takes an explicit endpoint, which is how
/// regional or per-workspace API instances are addressed. The endpoint is a
/// per-call parameter, never client state: each outgoing request is bound to
/// the endpoint value passed at call time, so concurrent calls against
/// different hosts cannot race on a shared field.
///
/// # Thread Safety
///
/// `NexarClient` is `Send + Sync`; concurrent query executions share only
/// the token cache, which serializes refreshes internally.
///
/// # Example
///
/// ```rust,ignore
/// use nexar_api::{NexarClient, NexarConfig, ScopeSet};
/// use serde_json::json;
///
/// let config = NexarConfig::builder_from_env()?
///     .scope(ScopeSet::design())
///     .build()?;
/// let client = NexarClient::new(config);
///
/// // Simple query
/// let envelope = client
///     .query("query { desWorkspaces { url name } }", None)
///     .await?;
///
/// // Query with variables
/// let envelope = client
///     .query(
///         "query Projects($url: String!) { desProjects(workspaceUrl: $url) { nodes { id } } }",
///         Some(json!({ "url": "https://my-workspace" })),
///     )
///     .await?;
///
/// // GraphQL-level errors are returned in the envelope, not thrown
/// if envelope.has_errors() {
///     for error in &envelope.errors {
///         eprintln!("GraphQL error: {error}");
///     }
/// }
/// ```
#[derive(Debug)]
pub struct NexarClient {
    /// The shared HTTPS client; carries the request timeout.
    http: reqwest::Client,
    /// Immutable configuration supplied at construction.
    config: NexarConfig,
    /// Token acquisition and caching.
    tokens: TokenManager,
}

// Verify NexarClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<NexarClient>();
};

impl NexarClient {
    /// Creates a new client for the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTPS client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS
    /// initialization failure).
    #[must_use]
    pub fn new(config: NexarConfig) -> Self {
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.request_timeout())
            .build()
            .expect("Failed to create HTTP client");

        let tokens = TokenManager::new(&config, http.clone());

        Self {
            http,
            config,
            tokens,
        }
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &NexarConfig {
        &self.config
    }

    /// Returns the token manager backing this client.
    #[must_use]
    pub const fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Executes a GraphQL query against the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Auth`] when no valid token could be acquired
    /// and [`ClientError::Transport`] for network, timeout, status, or
    /// body-parse failures. GraphQL-level errors are returned inside the
    /// envelope, never as an `Err`.
    pub async fn query(
        &self,
        query: &str,
        variables: Option<Value>,
    ) -> Result<ResponseEnvelope, ClientError> {
        let endpoint = self.config.endpoint().clone();
        self.query_at(&endpoint, query, variables).await
    }

    /// Executes a GraphQL query against an explicit endpoint.
    ///
    /// Use this when a prior query returned the API service URL for a
    /// specific regional or workspace instance.
    ///
    /// # Errors
    ///
    /// Same contract as [`query`](Self::query).
    pub async fn query_at(
        &self,
        endpoint: &ApiEndpoint,
        query: &str,
        variables: Option<Value>,
    ) -> Result<ResponseEnvelope, ClientError> {
        let token = self.tokens.get_token().await?;

        let body = serde_json::json!({
            "query": query,
            "variables": variables.unwrap_or_else(|| Value::Object(Map::new())),
        });

        tracing::debug!(endpoint = endpoint.as_ref(), "POST GraphQL request");

        let response = self
            .http
            .post(endpoint.as_ref())
            .bearer_auth(token.value())
            .json(&body)
            .send()
            .await
            .map_err(TransportError::Network)?;

        let status = response.status();
        let text = response.text().await.map_err(TransportError::Network)?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            }
            .into());
        }

        let envelope: ResponseEnvelope =
            serde_json::from_str(&text).map_err(TransportError::InvalidBody)?;

        if envelope.has_errors() {
            tracing::debug!(
                endpoint = endpoint.as_ref(),
                errors = envelope.errors.len(),
                "GraphQL response carried errors"
            );
        }

        Ok(envelope)
    }

    /// Creates a page iterator over a cursor-paginated connection field,
    /// targeting the configured endpoint.
    ///
    /// See [`PageIterator`] for the traversal contract and an example.
    pub fn paginate<F>(
        &self,
        query: impl Into<String>,
        variables: Map<String, Value>,
        cursor_variable: impl Into<String>,
        extract: F,
    ) -> PageIterator<'_, F>
    where
        F: Fn(&Value) -> Option<Value>,
    {
        let endpoint = self.config.endpoint().clone();
        PageIterator::new(self, endpoint, query, variables, cursor_variable, extract)
    }

    /// Creates a page iterator targeting an explicit endpoint.
    pub fn paginate_at<F>(
        &self,
        endpoint: ApiEndpoint,
        query: impl Into<String>,
        variables: Map<String, Value>,
        cursor_variable: impl Into<String>,
        extract: F,
    ) -> PageIterator<'_, F>
    where
        F: Fn(&Value) -> Option<Value>,
    {
        PageIterator::new(self, endpoint, query, variables, cursor_variable, extract)
    }
}
