//! Segment trie for O(k) route matching, where k is the number of path segments.
//!
//! Each node is reached either by literal segment text or by the single variable
//! marker, so `/users/{id}` and `/users/{user_id}` land on the *same* node. That is
//! what makes overlap detection possible at build time: the second template would
//! occupy a method slot that is already taken, and insertion fails instead of
//! silently overwriting.
//!
//! ## Example
//!
//! ```rust
//! use routeweave::contract::{FlattenedEntry, PathTemplate};
//! use routeweave::router::trie::build;
//! use routeweave::RouteMethod;
//!
//! let entry = |path: &str, handler: &'static str| FlattenedEntry {
//!     full_path: path.to_string(),
//!     method: RouteMethod::Get,
//!     template: PathTemplate::get(path),
//!     handler,
//! };
//!
//! let root = build(vec![entry("/users", "list"), entry("/users/{id}", "read")]).unwrap();
//! assert_eq!(root.route_count(), 2);
//!
//! // Same shape, different variable name: rejected at build time.
//! assert!(build(vec![entry("/{a}", "a"), entry("/{b}", "b")]).is_err());
//! ```

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;
use tracing::debug;

use crate::contract::{FlattenedEntry, PathTemplate};
use crate::error::{InitError, RouteRef};
use crate::method::RouteMethod;
use crate::segment::{ClassifiedPath, Segment, MAX_INLINE_SEGMENTS};

/// Positional values captured by variable segments during a walk
pub type Captures<'p> = SmallVec<[&'p str; MAX_INLINE_SEGMENTS]>;

/// A template and its handler, stored in a trie leaf slot
#[derive(Debug)]
pub struct RouteEntry<H> {
    pub template: PathTemplate,
    pub handler: H,
    /// Variable names of `template.path`, in order
    pub param_names: Vec<String>,
}

impl<H> RouteEntry<H> {
    #[must_use]
    pub fn route_ref(&self) -> RouteRef {
        RouteRef::new(self.template.method, self.template.path.clone())
    }
}

/// A node of the segment trie
pub struct TrieNode<H> {
    /// Children keyed by literal segment text
    children: HashMap<String, TrieNode<H>>,
    /// Child reached through any variable segment, whatever its name
    param_child: Option<Box<TrieNode<H>>>,
    /// At most one entry per method
    routes: HashMap<RouteMethod, Arc<RouteEntry<H>>>,
}

impl<H> Default for TrieNode<H> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            param_child: None,
            routes: HashMap::new(),
        }
    }
}

impl<H> fmt::Debug for TrieNode<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrieNode")
            .field("children", &self.children)
            .field("param_child", &self.param_child)
            .field("methods", &self.routes.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<H> TrieNode<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `entry` at the node addressed by `segments`
    ///
    /// # Errors
    ///
    /// Fails if the method slot at that node is already occupied:
    /// [`InitError::DuplicateRoutes`] when both templates have the identical path,
    /// [`InitError::OverlappingRoutes`] when they only share a shape.
    pub fn insert(
        &mut self,
        segments: &[Segment],
        entry: Arc<RouteEntry<H>>,
    ) -> Result<(), InitError> {
        let mut node = self;
        for segment in segments {
            node = match segment {
                Segment::Literal(text) => node.children.entry(text.clone()).or_default(),
                Segment::Variable => &mut **node.param_child.get_or_insert_with(Box::default),
            };
        }

        match node.routes.entry(entry.template.method) {
            Entry::Occupied(slot) => {
                let existing = slot.get().route_ref();
                let new = entry.route_ref();
                if existing.path == new.path {
                    Err(InitError::DuplicateRoutes { existing, new })
                } else {
                    Err(InitError::OverlappingRoutes { existing, new })
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(entry);
                Ok(())
            }
        }
    }

    /// Classify a flattened entry's template path and insert it, returning the stored entry
    ///
    /// # Errors
    ///
    /// See [`TrieNode::insert`].
    pub fn insert_entry(
        &mut self,
        entry: FlattenedEntry<H>,
    ) -> Result<Arc<RouteEntry<H>>, InitError> {
        let ClassifiedPath {
            segments,
            param_names,
        } = ClassifiedPath::parse(&entry.template.path);

        debug!(
            method = %entry.template.method,
            path = %entry.template.path,
            segments = segments.len(),
            "Inserting route into trie"
        );

        let stored = Arc::new(RouteEntry {
            template: entry.template,
            handler: entry.handler,
            param_names,
        });
        self.insert(&segments, Arc::clone(&stored))?;
        Ok(stored)
    }

    /// Walk the trie for a concrete request path
    ///
    /// Literal children are tried before the variable child. When the literal
    /// branch dead-ends (no deeper match, or no entry for `method`), the walk falls
    /// back to the variable child at the same depth. Values consumed by variable
    /// segments are pushed onto `captures` in path order.
    pub(crate) fn search<'n, 'p>(
        &'n self,
        segments: &[&'p str],
        method: RouteMethod,
        captures: &mut Captures<'p>,
    ) -> Option<&'n Arc<RouteEntry<H>>> {
        let Some((&first, rest)) = segments.split_first() else {
            return self.routes.get(&method);
        };

        if let Some(child) = self.children.get(first) {
            if let Some(found) = child.search(rest, method, captures) {
                return Some(found);
            }
        }

        if let Some(child) = &self.param_child {
            captures.push(first);
            if let Some(found) = child.search(rest, method, captures) {
                return Some(found);
            }
            captures.pop();
        }

        None
    }

    /// Methods registered directly on this node
    pub fn methods(&self) -> impl Iterator<Item = RouteMethod> + '_ {
        self.routes.keys().copied()
    }

    /// Total number of route entries in this subtree
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.len()
            + self.children.values().map(TrieNode::route_count).sum::<usize>()
            + self.param_child.as_ref().map_or(0, |c| c.route_count())
    }

    /// Total number of nodes in this subtree, including this one
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.values().map(TrieNode::node_count).sum::<usize>()
            + self.param_child.as_ref().map_or(0, |c| c.node_count())
    }
}

/// Build a trie from flattened entries by repeated single-route insertion
///
/// # Errors
///
/// Returns the first [`InitError`] raised by [`TrieNode::insert`]. Building the
/// same entries again reproduces the same error.
pub fn build<H>(
    entries: impl IntoIterator<Item = FlattenedEntry<H>>,
) -> Result<TrieNode<H>, InitError> {
    let mut root = TrieNode::new();
    for entry in entries {
        root.insert_entry(entry)?;
    }
    Ok(root)
}
