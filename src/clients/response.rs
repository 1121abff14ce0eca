//! The GraphQL response envelope.
//!
//! A GraphQL response is a JSON object with optional `data` and `errors`
//! fields; both may be present simultaneously (partial success). The
//! executor returns the envelope as-is and never inspects or fails on the
//! `errors` field, since that is the caller's decision point.
//!
//! # Example
//!
//! ```rust
//! use nexar_api::ResponseEnvelope;
//!
//! let envelope: ResponseEnvelope = serde_json::from_str(
//!     r#"{"data":{"desWorkspaces":[]},"errors":[{"message":"partial"}]}"#,
//! ).unwrap();
//!
//! assert!(envelope.data.is_some());
//! assert!(envelope.has_errors());
//! assert_eq!(envelope.errors[0].message, "partial");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A parsed GraphQL response.
///
/// `data` is `None` when the field was absent or JSON `null`. `errors` is
/// empty when the field was absent. Partial success (data alongside
/// errors) is representable and must be handled by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// The query result, if the server produced one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// GraphQL-level errors, in server order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphqlError>,
}

impl ResponseEnvelope {
    /// Returns `true` if the response carried any GraphQL-level errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns the data value if it is present and non-null.
    #[must_use]
    pub fn usable_data(&self) -> Option<&Value> {
        self.data.as_ref().filter(|d| !d.is_null())
    }
}

/// A single GraphQL error object, preserved verbatim.
///
/// Fields beyond `message` are optional per the GraphQL spec; `path`
/// segments are strings or indices and `extensions` is free-form, so both
/// are kept as raw JSON values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphqlError {
    /// Human-readable description of the error.
    pub message: String,

    /// Path to the response field the error is associated with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,

    /// Server-defined extra information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl fmt::Display for GraphqlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
