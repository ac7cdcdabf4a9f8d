//! Error types for route registration and request dispatch.
//!
//! The two classes never mix:
//!
//! - [`InitError`] is raised only while flattening a declaration tree or building
//!   the trie. It is fatal: a router that fails to build must not serve traffic.
//!   Each variant carries a stable machine-checkable [`ErrorCode`] and a
//!   remediation hint.
//! - [`DispatchError`] is raised per request. "Not found" is an ordinary outcome;
//!   invalid path parameters are reported with the offending template path and the
//!   validator's issues, never coerced into a 404.

use crate::method::RouteMethod;
use crate::validator::ValidationFailure;
use serde_json::{json, Value};
use std::fmt;

/// Stable identifiers for initialization failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    DuplicateRoutes,
    OverlappingRoutes,
    MissingRouteImplementation,
}

impl ErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::DuplicateRoutes => "init_duplicate_routes",
            ErrorCode::OverlappingRoutes => "init_overlapping_routes",
            ErrorCode::MissingRouteImplementation => "init_missing_route_implementation",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `METHOD path` pair identifying a declared route in error messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRef {
    pub method: RouteMethod,
    pub path: String,
}

impl RouteRef {
    pub fn new(method: RouteMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }
}

impl fmt::Display for RouteRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\"", self.method, self.path)
    }
}

/// Fatal registration-time failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InitError {
    /// Two leaves flattened to the identical `(path, method)` pair
    #[error("Duplicate routes: {new} is duplicated in your schema")]
    DuplicateRoutes { existing: RouteRef, new: RouteRef },
    /// Two distinct templates collapse onto the same trie slot once variable names are erased
    #[error("Overlapping routes: {new} matches same path as \"{}\"", .existing.path)]
    OverlappingRoutes { existing: RouteRef, new: RouteRef },
    /// A declared route has no handler in the implementation tree
    #[error("Missing route implementation: \"{name}\"")]
    MissingRouteImplementation { name: String },
}

impl InitError {
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            InitError::DuplicateRoutes { .. } => ErrorCode::DuplicateRoutes,
            InitError::OverlappingRoutes { .. } => ErrorCode::OverlappingRoutes,
            InitError::MissingRouteImplementation { .. } => ErrorCode::MissingRouteImplementation,
        }
    }

    /// Human-readable remediation hint
    #[must_use]
    pub fn suggestion(&self) -> String {
        match self {
            InitError::DuplicateRoutes { .. } | InitError::OverlappingRoutes { .. } => {
                "Update one of the routes in your schema, either by changing the path or the method"
                    .to_string()
            }
            InitError::MissingRouteImplementation { name } => {
                format!("Provide a route handler implementation for the route \"{name}\"")
            }
        }
    }
}

/// Two templates tie for best specificity against the same request path
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("You have two routes that match the same URL: '{first}' and '{second}'")]
pub struct AmbiguousRoutes {
    pub first: String,
    pub second: String,
}

/// Per-request dispatch failure
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    #[error("no route matches {method} {path}")]
    NotFound { method: RouteMethod, path: String },
    #[error("invalid path params for \"{template_path}\": {source}")]
    InvalidPathParams {
        template_path: String,
        #[source]
        source: ValidationFailure,
    },
    #[error(transparent)]
    AmbiguousRoutes(#[from] AmbiguousRoutes),
}

impl DispatchError {
    /// HTTP status the transport layer should answer with
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            DispatchError::NotFound { .. } => 404,
            DispatchError::InvalidPathParams { .. } => 400,
            DispatchError::AmbiguousRoutes(_) => 500,
        }
    }

    /// RFC 7807 problem details body describing the failure
    #[must_use]
    pub fn problem_details(&self) -> Value {
        match self {
            DispatchError::NotFound { method, path } => json!({
                "type": "about:blank",
                "title": "Not Found",
                "status": 404,
                "detail": format!("No route matches {method} {path}"),
            }),
            DispatchError::InvalidPathParams {
                template_path,
                source,
            } => json!({
                "type": "about:blank",
                "title": "Invalid path params",
                "status": 400,
                "detail": source.to_string(),
                "path": template_path,
                "errors": source.issues,
            }),
            DispatchError::AmbiguousRoutes(err) => json!({
                "type": "about:blank",
                "title": "Ambiguous routes",
                "status": 500,
                "detail": err.to_string(),
            }),
        }
    }
}
