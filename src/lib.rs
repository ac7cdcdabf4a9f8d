//! # routeweave
//!
//! **routeweave** is a contract-first path-template router. Routes are declared as a
//! tree of resources and templates, paired with a parallel tree of handlers, and
//! compiled once into a segment trie that rejects ambiguous route sets before any
//! request is served.
//!
//! ## Architecture
//!
//! - **[`segment`]** - splits path templates into literal and variable segments
//! - **[`contract`]** - route declarations and the flattener that composes base
//!   paths, shared responses and shared headers down to each leaf
//! - **[`router`]** - the trie builder, the specificity matcher and [`Router`]
//! - **[`dispatcher`]** - resolves a concrete `(path, method)` against the trie and
//!   validates path parameters
//! - **[`validator`]** - the validator capability attached to templates, with a
//!   JSON Schema implementation
//! - **[`error`]** - registration errors with stable codes, and per-request errors
//! - **[`runtime_config`]** / **[`logging`]** - environment-driven setup
//!
//! ### Build and Dispatch Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant App
//!     participant Flatten as contract::flatten
//!     participant Trie as router::trie
//!     participant Router
//!     participant Dispatch as dispatcher
//!     participant Validator
//!
//!     App->>Flatten: flatten(declaration, implementation)
//!     Flatten-->>App: Vec<FlattenedEntry> or init_duplicate_routes / init_missing_route_implementation
//!     App->>Router: Router::build(entries)
//!     Router->>Trie: insert each entry
//!     Trie-->>Router: trie or init_overlapping_routes
//!
//!     App->>Router: dispatch(GET, "/users/42")
//!     Router->>Dispatch: walk trie, zip params
//!     Dispatch->>Validator: validate({"id": "42"})
//!     Validator-->>Dispatch: {"id": 42}
//!     Dispatch-->>App: RouteMatch
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use routeweave::contract::{Implementation, PathTemplate, Resource};
//! use routeweave::runtime_config::RouterConfig;
//! use routeweave::validator::SchemaValidator;
//! use routeweave::{DispatchError, RouteMethod, Router};
//! use serde_json::json;
//!
//! let users = Resource::at("/users").route(
//!     "read",
//!     PathTemplate::get("/{id}").path_params(
//!         SchemaValidator::shared(json!({
//!             "type": "object",
//!             "properties": {"id": {"type": "integer"}},
//!             "required": ["id"]
//!         }))
//!         .unwrap(),
//!     ),
//! );
//! let handlers = Implementation::group().with("read", Implementation::handler("read_user"));
//!
//! let router =
//!     Router::from_declaration_with_config(&users.into(), handlers, RouterConfig::default())
//!         .unwrap();
//!
//! let matched = router.dispatch(RouteMethod::Get, "/users/42").unwrap();
//! assert_eq!(matched.params, json!({"id": 42}));
//!
//! let err = router.dispatch(RouteMethod::Get, "/users/abc").unwrap_err();
//! assert!(matches!(err, DispatchError::InvalidPathParams { .. }));
//! ```

pub mod contract;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod method;
pub mod router;
pub mod runtime_config;
pub mod segment;
pub mod validator;

pub use dispatcher::{dispatch, RouteMatch};
pub use error::{AmbiguousRoutes, DispatchError, ErrorCode, InitError};
pub use method::RouteMethod;
pub use router::Router;
pub use segment::{classify, Segment};
