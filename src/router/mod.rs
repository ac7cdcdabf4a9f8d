//! # Router Module
//!
//! Path matching and route resolution.
//!
//! ## Architecture
//!
//! The router uses a two-phase approach:
//!
//! 1. **Build**: at startup, flattened entries are inserted one by one into a
//!    segment trie ([`trie`]). Literal segments become keyed children, variable
//!    segments share a single child per node, and each node holds at most one
//!    entry per method. Duplicates and overlaps fail the build.
//!
//! 2. **Matching**: for each request, the trie is walked segment by segment,
//!    preferring literal children and falling back to the variable child.
//!
//! [`specificity`] implements the same matching contract without a trie, ranking
//! a flat template list per request. [`Router`] can use either, selected through
//! [`RouterConfig`](crate::runtime_config::RouterConfig).
//!
//! ## Example
//!
//! ```rust
//! use routeweave::contract::{Implementation, PathTemplate, Resource};
//! use routeweave::runtime_config::RouterConfig;
//! use routeweave::{RouteMethod, Router};
//!
//! let contract = Resource::at("/pets")
//!     .route("list", PathTemplate::get(""))
//!     .route("read", PathTemplate::get("/{id}"))
//!     .into();
//! let handlers = Implementation::group()
//!     .with("list", Implementation::handler("list_pets"))
//!     .with("read", Implementation::handler("read_pet"));
//!
//! let router =
//!     Router::from_declaration_with_config(&contract, handlers, RouterConfig::default()).unwrap();
//!
//! let matched = router.dispatch(RouteMethod::Get, "/pets/12").unwrap();
//! assert_eq!(*matched.handler(), "read_pet");
//! assert_eq!(matched.get_path_param("id"), Some("12"));
//! ```

mod core;
pub mod specificity;
pub mod trie;

pub use self::core::Router;
pub use specificity::{match_by_specificity, SpecificityMatch};
pub use trie::{build, RouteEntry, TrieNode};
