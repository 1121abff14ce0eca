//! GraphQL client types for Nexar API communication.
//!
//! This module provides the query execution path and the pagination engine
//! built on top of it.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`NexarClient`]: the async GraphQL client
//! - [`ResponseEnvelope`] / [`GraphqlError`]: the parsed GraphQL response
//! - [`PageIterator`] / [`Page`] / [`PageInfo`]: cursor pagination
//! - [`TransportError`] / [`ClientError`] / [`PaginationError`]: failure taxonomy
//!
//! # Error Surfacing
//!
//! The executor distinguishes transport failures (returned as errors) from
//! GraphQL-level errors (returned inside the envelope, because partial data
//! may accompany them). The pagination layer is the one place GraphQL
//! errors become a failure: a page response with errors and no usable data
//! terminates the sequence with [`PaginationError::Graphql`].

mod errors;
mod graphql;
pub mod pagination;
mod response;

pub use errors::{ClientError, TransportError};
pub use graphql::NexarClient;
pub use response::{GraphqlError, ResponseEnvelope};

// Re-export pagination types at the clients module level
pub use pagination::{Page, PageInfo, PageIterator, PaginationError};
