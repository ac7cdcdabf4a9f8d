//! # Contract Module
//!
//! Route declarations and their flattening.
//!
//! A contract is a tree: [`Resource`]s group routes under a shared base path and
//! shared validators, and leaves are [`PathTemplate`]s. Handlers are supplied in a
//! parallel [`Implementation`] tree keyed by the same names. [`flatten`] walks both
//! trees together and produces one [`FlattenedEntry`] per `(full path, method)`,
//! ready for the router's trie builder.
//!
//! ```rust
//! use routeweave::contract::{flatten, Implementation, PathTemplate, Resource};
//!
//! let users = Resource::at("/users")
//!     .route("list", PathTemplate::get(""))
//!     .route("read", PathTemplate::get("/{id}"));
//! let api = Resource::at("/api").route("users", users);
//!
//! let handlers = Implementation::group().with(
//!     "users",
//!     Implementation::group()
//!         .with("list", Implementation::handler("list_users"))
//!         .with("read", Implementation::handler("read_user")),
//! );
//!
//! let entries = flatten(&api.into(), handlers).unwrap();
//! assert_eq!(entries[1].full_path, "/api/users/{id}");
//! ```

mod flatten;
mod types;

pub use flatten::flatten;
pub use types::{
    Declaration, FlattenedEntry, Implementation, PathTemplate, Resource, Responses,
};
