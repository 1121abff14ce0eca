//! # Nexar API Rust Client
//!
//! A Rust client for the Nexar GraphQL API, providing type-safe
//! configuration, OAuth2 token management, query execution, and cursor
//! pagination.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`NexarConfig`] and [`NexarConfigBuilder`]
//! - Validated newtypes for credentials and endpoint values
//! - OAuth 2.0 Client Credentials Grant with cached, single-flight refresh
//!   via [`TokenManager`]
//! - An async GraphQL client with per-call endpoint targeting via
//!   [`NexarClient`]
//! - A generic cursor-pagination engine via [`PageIterator`]
//!
//! ## Quick Start
//!
//! ```rust
//! use nexar_api::{ClientId, ClientSecret, NexarConfig, ScopeSet};
//!
//! // Create configuration using the builder pattern
//! let config = NexarConfig::builder()
//!     .client_id(ClientId::new("your-client-id").unwrap())
//!     .client_secret(ClientSecret::new("your-client-secret").unwrap())
//!     .scope(ScopeSet::design())
//!     .build()
//!     .unwrap();
//! ```
//!
//! Credentials are usually read from the environment:
//!
//! ```rust,no_run
//! use nexar_api::{NexarConfig, ScopeSet};
//!
//! let config = NexarConfig::builder_from_env()?
//!     .scope(ScopeSet::design())
//!     .build()?;
//! # Ok::<(), nexar_api::ConfigError>(())
//! ```
//!
//! ## Executing Queries
//!
//! ```rust,ignore
//! use nexar_api::NexarClient;
//!
//! let client = NexarClient::new(config);
//!
//! let envelope = client
//!     .query("query { desWorkspaces { url name location { apiServiceUrl } } }", None)
//!     .await?;
//!
//! // GraphQL errors come back in the envelope alongside any partial data;
//! // the client never swallows or throws them.
//! if envelope.has_errors() {
//!     for error in &envelope.errors {
//!         eprintln!("GraphQL error: {error}");
//!     }
//! }
//! ```
//!
//! ## Traversing Paginated Connections
//!
//! Any connection field exposing `nodes` and
//! `pageInfo { hasNextPage endCursor }` can be traversed without managing
//! cursors by hand:
//!
//! ```rust,ignore
//! use serde_json::Map;
//!
//! let query = r"query Projects($url: String!, $end: String) {
//!     desProjects(workspaceUrl: $url, first: 10, after: $end) {
//!       nodes { id name description }
//!       pageInfo { hasNextPage endCursor }
//!     }
//!   }";
//!
//! let mut variables = Map::new();
//! variables.insert("url".to_string(), workspace_url.into());
//!
//! let mut pages = client.paginate(query, variables, "end", |data| {
//!     data.get("desProjects").cloned()
//! });
//!
//! while let Some(page) = pages.next_page().await {
//!     for project in &page?.nodes {
//!         println!("{}: {}", project["id"], project["name"]);
//!     }
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All shared types are `Send + Sync`; the token cache is
//!   the only shared mutable state and refreshes are single-flight
//! - **Async-first**: Designed for use with the Tokio async runtime
//! - **Per-call endpoints**: The target host is a parameter, never mutable
//!   client state

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;

// Re-export public types at crate root for convenience
pub use auth::{AccessToken, AuthError, Scope, ScopeSet, TokenManager};
pub use config::{ApiEndpoint, ClientId, ClientSecret, NexarConfig, NexarConfigBuilder};
pub use error::ConfigError;

// Re-export client types
pub use clients::{
    ClientError, GraphqlError, NexarClient, Page, PageInfo, PageIterator, PaginationError,
    ResponseEnvelope, TransportError,
};
