//! Authentication types for the Nexar API client.
//!
//! This module provides OAuth scope handling, the access-token type, and
//! the token manager that acquires and refreshes tokens via the
//! client-credentials grant.
//!
//! # Overview
//!
//! - [`Scope`] / [`ScopeSet`]: the fixed set of Nexar OAuth scopes
//! - [`AccessToken`]: an immutable bearer token with its expiry and scope
//! - [`TokenManager`]: cached, single-flight token acquisition and refresh
//! - [`AuthError`]: failures while talking to the identity service
//!
//! # Token Lifecycle
//!
//! A token is created lazily on first use, replaced on refresh, and
//! discarded with the client. It is treated as expired slightly before its
//! true expiry so an in-flight request never carries a token that lapses
//! mid-request.
//!
//! # Example
//!
//! ```rust,ignore
//! use nexar_api::{NexarConfig, ScopeSet, TokenManager};
//!
//! let config = NexarConfig::builder_from_env()?
//!     .scope(ScopeSet::design())
//!     .build()?;
//!
//! let manager = TokenManager::new(&config, reqwest::Client::new());
//! let token = manager.get_token().await?;
//! ```

mod scopes;
pub mod token;
mod token_manager;

pub use scopes::{Scope, ScopeSet};
pub use token::{AccessToken, AccessTokenResponse, EXPIRY_SAFETY_MARGIN_SECS};
pub use token_manager::{AuthError, TokenManager};
