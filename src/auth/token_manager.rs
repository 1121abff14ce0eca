//! Token acquisition and caching for the Nexar identity service.
//!
//! This module implements the OAuth 2.0 Client Credentials Grant flow used
//! by headless applications: the application authenticates as itself (not as
//! a user) with its client ID and secret, and receives a bearer token scoped
//! to the requested API surfaces.
//!
//! # Caching and Single-Flight Refresh
//!
//! [`TokenManager`] caches one token and refreshes it lazily when a caller
//! finds it within the expiry safety margin. Concurrent callers during a
//! refresh observe a single outstanding network request: the cache lock is
//! held across the refresh, and callers that queued behind it receive the
//! refresher's outcome (the fresh token on success, a clone of the same
//! [`AuthError`] on failure) without issuing a duplicate request.
//!
//! A failed refresh never poisons the cache: the next call that was not
//! already waiting starts a fresh refresh.
//!
//! # Refresh Tokens
//!
//! When the identity service grants a refresh token (the `offline_access`
//! scope), the manager stores it and uses the `refresh_token` grant for
//! subsequent refreshes. A rejected refresh token is discarded so the next
//! attempt falls back to client credentials.
//!
//! # Example
//!
//! ```rust,ignore
//! use nexar_api::{NexarConfig, TokenManager};
//!
//! let config = NexarConfig::builder_from_env()?.build()?;
//! let manager = TokenManager::new(&config, reqwest::Client::new());
//!
//! let token = manager.get_token().await?;
//! println!("expires at {}", token.expires_at());
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::auth::token::{AccessToken, AccessTokenResponse};
use crate::auth::ScopeSet;
use crate::config::{ClientId, ClientSecret, NexarConfig};

/// Maximum refresh attempts before a failure is surfaced.
const TOKEN_RETRY_ATTEMPTS: u32 = 3;

/// Base delay for refresh retries; doubles per attempt.
const TOKEN_RETRY_BASE_DELAY: std::time::Duration = std::time::Duration::from_millis(250);

/// Grant type for client credentials.
const CLIENT_CREDENTIALS_GRANT_TYPE: &str = "client_credentials";

/// Grant type for refresh-token exchange.
const REFRESH_TOKEN_GRANT_TYPE: &str = "refresh_token";

/// Form body for a client-credentials token request.
#[derive(Debug, Serialize)]
struct ClientCredentialsRequest<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    scope: String,
}

/// Form body for a refresh-token request.
#[derive(Debug, Serialize)]
struct RefreshTokenRequest<'a> {
    grant_type: &'a str,
    refresh_token: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    scope: String,
}

/// Errors that can occur while acquiring or refreshing a token.
///
/// The type is `Clone` (plain data, no live handles) so the single-flight
/// cache can hand the same failure to every caller that awaited the refresh.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The token request could not reach the identity service.
    #[error("network error during token request: {message}")]
    Network {
        /// Description of the underlying transport failure.
        message: String,
    },

    /// The identity service answered with a non-success status.
    #[error("identity service rejected the token request (status {status}): {message}")]
    Rejected {
        /// The HTTP status code of the response.
        status: u16,
        /// The response body, typically an OAuth2 error document.
        message: String,
    },

    /// The identity service answered 2xx but the body was not a token.
    #[error("malformed token response: {message}")]
    InvalidResponse {
        /// Description of the parse failure.
        message: String,
    },
}

impl AuthError {
    /// Returns `true` for failures worth retrying: transport errors and
    /// server-side (5xx) responses. Credential rejections are terminal.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Rejected { status, .. } => *status >= 500,
            Self::InvalidResponse { .. } => false,
        }
    }
}

/// Cached token state guarded by the manager's mutex.
#[derive(Default)]
struct TokenCache {
    token: Option<AccessToken>,
    refresh_token: Option<String>,
    last_error: Option<AuthError>,
}

/// Acquires, caches, and refreshes access tokens.
///
/// One `TokenManager` serves all operations of a client instance. The cached
/// token is the only mutable state; it is read-mostly and updated under the
/// single-flight discipline described in the module docs.
///
/// # Thread Safety
///
/// `TokenManager` is `Send + Sync` and is designed to be shared by
/// concurrent query executions.
pub struct TokenManager {
    http: reqwest::Client,
    client_id: ClientId,
    client_secret: ClientSecret,
    scope: ScopeSet,
    token_url: String,
    cache: Mutex<TokenCache>,
    /// Bumped after every completed refresh attempt, success or failure.
    refresh_seq: AtomicU64,
}

// Verify TokenManager is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TokenManager>();
};

impl TokenManager {
    /// Creates a manager for the given configuration.
    ///
    /// The `http` client is shared with the query executor so both reuse one
    /// connection pool and the configured request timeout.
    #[must_use]
    pub fn new(config: &NexarConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            client_id: config.client_id().clone(),
            client_secret: config.client_secret().clone(),
            scope: config.scope().clone(),
            token_url: config.identity_url().as_ref().to_string(),
            cache: Mutex::new(TokenCache::default()),
            refresh_seq: AtomicU64::new(0),
        }
    }

    /// Returns a token valid for immediate use, refreshing if necessary.
    ///
    /// Returns the cached token when it is outside the expiry safety margin.
    /// Otherwise performs exactly one refresh for however many callers are
    /// waiting; see the module docs for the concurrency contract.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] when the refresh fails after its bounded
    /// retries. The cache is left unset so a subsequent call retries.
    pub async fn get_token(&self) -> Result<AccessToken, AuthError> {
        let observed_seq = self.refresh_seq.load(Ordering::Acquire);
        let mut cache = self.cache.lock().await;

        if let Some(token) = cache.token.as_ref() {
            if !token.is_expiring() {
                return Ok(token.clone());
            }
        }

        // A refresh completed while this caller waited on the lock. A valid
        // token would have been returned above, so share the failure rather
        // than issuing a duplicate request.
        if self.refresh_seq.load(Ordering::Acquire) != observed_seq {
            if let Some(error) = cache.last_error.clone() {
                return Err(error);
            }
        }

        let outcome = self.refresh(cache.refresh_token.as_deref()).await;
        self.refresh_seq.fetch_add(1, Ordering::AcqRel);

        match outcome {
            Ok(response) => {
                let token = AccessToken::from_response(&response, &self.scope);
                cache.token = Some(token.clone());
                cache.refresh_token = response.refresh_token;
                cache.last_error = None;
                Ok(token)
            }
            Err(error) => {
                cache.token = None;
                if matches!(error, AuthError::Rejected { status, .. } if status < 500) {
                    // A rejected refresh token is unusable; fall back to
                    // client credentials on the next attempt.
                    cache.refresh_token = None;
                }
                cache.last_error = Some(error.clone());
                Err(error)
            }
        }
    }

    /// Performs one refresh with bounded retries and backoff.
    async fn refresh(
        &self,
        refresh_token: Option<&str>,
    ) -> Result<AccessTokenResponse, AuthError> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.request_token(refresh_token).await {
                Ok(response) => {
                    tracing::debug!(attempt, "token refresh succeeded");
                    return Ok(response);
                }
                Err(error) => {
                    if !error.is_transient() || attempt >= TOKEN_RETRY_ATTEMPTS {
                        return Err(error);
                    }
                    let delay = TOKEN_RETRY_BASE_DELAY * 2_u32.pow(attempt - 1);
                    tracing::warn!(attempt, error = %error, "token refresh failed, retrying");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Sends a single token request to the identity service.
    async fn request_token(
        &self,
        refresh_token: Option<&str>,
    ) -> Result<AccessTokenResponse, AuthError> {
        let request = self.http.post(&self.token_url);
        let request = match refresh_token {
            Some(refresh_token) => {
                tracing::debug!(url = %self.token_url, "POST token request (refresh_token grant)");
                request.form(&RefreshTokenRequest {
                    grant_type: REFRESH_TOKEN_GRANT_TYPE,
                    refresh_token,
                    client_id: self.client_id.as_ref(),
                    client_secret: self.client_secret.as_ref(),
                    scope: self.scope.to_string(),
                })
            }
            None => {
                tracing::debug!(url = %self.token_url, "POST token request (client_credentials grant)");
                request.form(&ClientCredentialsRequest {
                    grant_type: CLIENT_CREDENTIALS_GRANT_TYPE,
                    client_id: self.client_id.as_ref(),
                    client_secret: self.client_secret.as_ref(),
                    scope: self.scope.to_string(),
                })
            }
        };

        let response = request.send().await.map_err(|e| AuthError::Network {
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message: body,
            });
        }

        response
            .json::<AccessTokenResponse>()
            .await
            .map_err(|e| AuthError::InvalidResponse {
                message: e.to_string(),
            })
    }
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("client_id", &self.client_id)
            .field("scope", &self.scope)
            .field("token_url", &self.token_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_errors_are_transient() {
        let error = AuthError::Network {
            message: "connection refused".to_string(),
        };
        assert!(error.is_transient());
    }

    #[test]
    fn test_server_errors_are_transient() {
        let error = AuthError::Rejected {
            status: 503,
            message: String::new(),
        };
        assert!(error.is_transient());
    }

    #[test]
    fn test_credential_rejections_are_terminal() {
        let error = AuthError::Rejected {
            status: 400,
            message: r#"{"error":"invalid_client"}"#.to_string(),
        };
        assert!(!error.is_transient());
    }

    #[test]
    fn test_malformed_responses_are_terminal() {
        let error = AuthError::InvalidResponse {
            message: "expected value".to_string(),
        };
        assert!(!error.is_transient());
    }

    #[test]
    fn test_auth_error_is_cloneable_for_single_flight_sharing() {
        let error = AuthError::Rejected {
            status: 401,
            message: "denied".to_string(),
        };
        assert_eq!(error.clone(), error);
    }

    #[test]
    fn test_rejected_error_message_carries_status() {
        let error = AuthError::Rejected {
            status: 401,
            message: "denied".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("401"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn test_client_credentials_request_serializes_form_fields() {
        let request = ClientCredentialsRequest {
            grant_type: CLIENT_CREDENTIALS_GRANT_TYPE,
            client_id: "id",
            client_secret: "secret",
            scope: "supply.domain".to_string(),
        };
        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(encoded["grant_type"], "client_credentials");
        assert_eq!(encoded["scope"], "supply.domain");
    }

    #[test]
    fn test_token_manager_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TokenManager>();
    }
}
