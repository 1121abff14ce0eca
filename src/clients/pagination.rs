//! Cursor pagination over GraphQL connection fields.
//!
//! Any connection field exposing `nodes: [T]` and
//! `pageInfo { hasNextPage, endCursor }` can be traversed with
//! [`PageIterator`], given the name of the query's cursor variable and an
//! extractor locating the connection within the response data. The iterator
//! is generic over the query shape: the extractor is the only part that
//! knows where the connection lives.
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::Map;
//!
//! let query = r"query Projects($url: String!, $end: String) {
//!     desProjects(workspaceUrl: $url, first: 10, after: $end) {
//!       nodes { id name }
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
//!         println!("{}", project["name"]);
//!     }
//! }
//! ```

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::clients::errors::ClientError;
use crate::clients::graphql::NexarClient;
use crate::clients::response::GraphqlError;
use crate::config::ApiEndpoint;

/// Pagination metadata of a connection field.
///
/// `end_cursor` is an opaque token meaningful only to the server; it is
/// stored and echoed back, never parsed or compared.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether another page follows this one.
    pub has_next_page: bool,
    /// Cursor to request the next page with, if any.
    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// One page of a paginated connection.
///
/// Pages are ephemeral: constructed per fetch, yielded, then discarded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// The nodes of this page; may be empty.
    pub nodes: Vec<Value>,
    /// Pagination metadata.
    pub page_info: PageInfo,
}

/// Errors that terminate a pagination sequence.
#[derive(Debug, Error)]
pub enum PaginationError {
    /// Executing the page query failed at the auth or transport layer.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The response carried GraphQL errors and no usable data.
    ///
    /// The originating errors are preserved verbatim.
    #[error("GraphQL query returned errors and no usable data")]
    Graphql {
        /// The errors from the response envelope, in server order.
        errors: Vec<GraphqlError>,
    },

    /// The connection object or its pagination metadata was missing or
    /// malformed.
    #[error("paginated connection missing or malformed: {reason}")]
    Malformed {
        /// What was wrong with the response shape.
        reason: String,
    },
}

/// Traversal state. `Exhausted` and `Errored` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IterState {
    /// No page fetched yet; the cursor variable is absent.
    Init,
    /// At least one page yielded and another is expected.
    HasPage,
    /// The sequence ended normally.
    Exhausted,
    /// The sequence ended with an error.
    Errored,
}

/// A lazy sequence of pages over a cursor-paginated connection.
///
/// Each call to [`next_page`](Self::next_page) performs exactly one
/// request/response round trip; no page is pre-fetched, so stopping early
/// leaves nothing in flight. The iterator owns its copy of the query
/// variables and rewrites only the cursor variable between pages; the
/// caller's original mapping is never touched.
///
/// The sequence is not restartable: once exhausted or errored, further
/// calls return `None`. Create a new iterator to traverse again.
pub struct PageIterator<'a, F> {
    client: &'a NexarClient,
    endpoint: ApiEndpoint,
    query: String,
    variables: Map<String, Value>,
    cursor_variable: String,
    extract: F,
    state: IterState,
}

impl<'a, F> PageIterator<'a, F>
where
    F: Fn(&Value) -> Option<Value>,
{
    /// Creates an iterator; used by
    /// [`NexarClient::paginate`](crate::NexarClient::paginate).
    pub(crate) fn new(
        client: &'a NexarClient,
        endpoint: ApiEndpoint,
        query: impl Into<String>,
        variables: Map<String, Value>,
        cursor_variable: impl Into<String>,
        extract: F,
    ) -> Self {
        Self {
            client,
            endpoint,
            query: query.into(),
            variables,
            cursor_variable: cursor_variable.into(),
            extract,
            state: IterState::Init,
        }
    }

    /// Returns `true` once the sequence has terminated.
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self.state, IterState::Exhausted | IterState::Errored)
    }

    /// Fetches and yields the next page.
    ///
    /// Returns `None` once the sequence has terminated, either normally
    /// (final page's `hasNextPage` was false or its cursor was absent) or
    /// after an error. Errors are yielded once and are terminal.
    pub async fn next_page(&mut self) -> Option<Result<Page, PaginationError>> {
        if self.is_done() {
            return None;
        }

        match self.fetch_page().await {
            Ok(page) => {
                match page.page_info.end_cursor.as_ref() {
                    Some(cursor) if page.page_info.has_next_page => {
                        self.variables.insert(
                            self.cursor_variable.clone(),
                            Value::String(cursor.clone()),
                        );
                        self.state = IterState::HasPage;
                    }
                    _ => self.state = IterState::Exhausted,
                }
                Some(Ok(page))
            }
            Err(error) => {
                self.state = IterState::Errored;
                Some(Err(error))
            }
        }
    }

    /// Drains the remaining pages into a flat list of nodes.
    ///
    /// # Errors
    ///
    /// Returns the first [`PaginationError`] encountered; nodes from pages
    /// yielded before the failure are discarded.
    pub async fn collect_nodes(mut self) -> Result<Vec<Value>, PaginationError> {
        let mut nodes = Vec::new();
        while let Some(page) = self.next_page().await {
            nodes.extend(page?.nodes);
        }
        Ok(nodes)
    }

    /// Executes one page query and extracts the connection.
    async fn fetch_page(&self) -> Result<Page, PaginationError> {
        let variables = Value::Object(self.variables.clone());
        let envelope = self
            .client
            .query_at(&self.endpoint, &self.query, Some(variables))
            .await?;

        let Some(data) = envelope.usable_data() else {
            if envelope.has_errors() {
                return Err(PaginationError::Graphql {
                    errors: envelope.errors,
                });
            }
            return Err(PaginationError::Malformed {
                reason: "response carried neither data nor errors".to_string(),
            });
        };

        let connection = (self.extract)(data).ok_or_else(|| PaginationError::Malformed {
            reason: "extractor found no connection in response data".to_string(),
        })?;

        serde_json::from_value(connection).map_err(|e| PaginationError::Malformed {
            reason: format!("connection did not match nodes/pageInfo shape: {e}"),
        })
    }
}

impl<F> std::fmt::Debug for PageIterator<'_, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageIterator")
            .field("endpoint", &self.endpoint)
            .field("cursor_variable", &self.cursor_variable)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
