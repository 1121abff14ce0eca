//! Access token types for the Nexar identity service.
//!
//! This module provides the [`AccessToken`] type held by the
//! [`TokenManager`](crate::auth::TokenManager) and the serde shape of the
//! identity service's token response.

use crate::auth::ScopeSet;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::fmt;

/// Seconds before true expiry at which a token is treated as expired.
///
/// The margin avoids races where a token passes the expiry check but lapses
/// while the request that carries it is in flight.
pub const EXPIRY_SAFETY_MARGIN_SECS: i64 = 300;

/// Upper bound on an accepted token lifetime.
const MAX_TOKEN_LIFETIME_SECS: i64 = 366 * 24 * 60 * 60;

/// An access token issued by the Nexar identity service.
///
/// Tokens are owned by the [`TokenManager`](crate::auth::TokenManager);
/// callers receive clones and cannot mutate the cached value. A token
/// reports itself as expiring [`EXPIRY_SAFETY_MARGIN_SECS`] seconds before
/// its true expiry.
///
/// # Security
///
/// The `Debug` implementation masks the token value, displaying only
/// `AccessToken(*****)` instead of the bearer credential.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
    scope: ScopeSet,
}

impl AccessToken {
    /// Creates a token from its raw parts.
    #[must_use]
    pub const fn new(value: String, expires_at: DateTime<Utc>, scope: ScopeSet) -> Self {
        Self {
            value,
            expires_at,
            scope,
        }
    }

    /// Builds a token from the identity service's response.
    ///
    /// The absolute expiry is computed from the response's `expires_in`
    /// lifetime. When the response omits the granted scope, the requested
    /// scope is recorded instead.
    #[must_use]
    pub fn from_response(response: &AccessTokenResponse, requested_scope: &ScopeSet) -> Self {
        // Lifetimes beyond a year are clamped to keep the arithmetic in range
        let secs = i64::try_from(response.expires_in)
            .unwrap_or(MAX_TOKEN_LIFETIME_SECS)
            .min(MAX_TOKEN_LIFETIME_SECS);
        let lifetime = Duration::seconds(secs);
        let scope = response
            .scope
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| requested_scope.clone());

        Self {
            value: response.access_token.clone(),
            expires_at: Utc::now() + lifetime,
            scope,
        }
    }

    /// Returns the bearer credential value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the absolute expiry time.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns the scope the token was granted for.
    #[must_use]
    pub const fn scope(&self) -> &ScopeSet {
        &self.scope
    }

    /// Returns `true` if the token is within the expiry safety margin.
    #[must_use]
    pub fn is_expiring(&self) -> bool {
        Utc::now() + Duration::seconds(EXPIRY_SAFETY_MARGIN_SECS) >= self.expires_at
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"*****")
            .field("expires_at", &self.expires_at)
            .field("scope", &self.scope)
            .finish()
    }
}

/// The JSON body returned by the identity service's token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenResponse {
    /// The bearer token value.
    pub access_token: String,
    /// Token lifetime in seconds.
    pub expires_in: u64,
    /// Token type; `Bearer` for client-credentials grants.
    #[serde(default)]
    pub token_type: Option<String>,
    /// Refresh token, present when `offline_access` was granted.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Granted scope, space-separated; may differ from the requested scope.
    #[serde(default)]
    pub scope: Option<String>,
}
