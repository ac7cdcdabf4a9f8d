//! Router core: build entry point and the request hot path.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use super::specificity::match_by_specificity;
use super::trie::{RouteEntry, TrieNode};
use crate::contract::{flatten, Declaration, FlattenedEntry, Implementation};
use crate::dispatcher::{dispatch, into_match, RouteMatch};
use crate::error::{DispatchError, InitError, RouteRef};
use crate::method::RouteMethod;
use crate::runtime_config::{RouterConfig, RoutingStrategy};
use crate::segment::param_names;

/// Templates registered for one method, in registration order
struct MethodTable<H> {
    templates: Vec<String>,
    entries: Vec<Arc<RouteEntry<H>>>,
}

impl<H> Default for MethodTable<H> {
    fn default() -> Self {
        Self {
            templates: Vec::new(),
            entries: Vec::new(),
        }
    }
}

/// Router that matches requests to handlers
///
/// Built once at startup and read-only afterwards; share it between threads behind
/// an `Arc`. With [`RoutingStrategy::Trie`] (the default) conflicts are detected
/// while building and matching is O(k) in the number of path segments. With
/// [`RoutingStrategy::Specificity`] the per-method template lists are ranked per
/// request instead, and overlapping templates surface as
/// [`DispatchError::AmbiguousRoutes`].
pub struct Router<H> {
    root: TrieNode<H>,
    /// All entries in registration order
    entries: Vec<Arc<RouteEntry<H>>>,
    by_method: HashMap<RouteMethod, MethodTable<H>>,
    config: RouterConfig,
}

impl<H> std::fmt::Debug for Router<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("strategy", &self.config.strategy)
            .field("routes", &self.path_patterns())
            .finish()
    }
}

impl<H> Router<H> {
    /// Build from flattened entries with configuration read from the environment
    ///
    /// # Errors
    ///
    /// See [`Router::build_with_config`].
    pub fn build(entries: Vec<FlattenedEntry<H>>) -> Result<Self, InitError> {
        Self::build_with_config(entries, RouterConfig::from_env())
    }

    /// Build from flattened entries
    ///
    /// # Errors
    ///
    /// Returns the [`InitError`] that makes the route set unservable:
    /// duplicate `(path, method)` pairs for either strategy, and overlapping
    /// templates for [`RoutingStrategy::Trie`].
    pub fn build_with_config(
        entries: Vec<FlattenedEntry<H>>,
        config: RouterConfig,
    ) -> Result<Self, InitError> {
        Self::try_build(entries, config).inspect_err(|err| {
            error!(
                code = %err.code(),
                error = %err,
                suggestion = %err.suggestion(),
                "Failed to build routing table"
            );
        })
    }

    /// Flatten a declaration tree against its implementation and build the router
    ///
    /// # Errors
    ///
    /// Any [`InitError`] from flattening or building.
    pub fn from_declaration(
        declaration: &Declaration,
        implementation: Implementation<H>,
    ) -> Result<Self, InitError> {
        Self::from_declaration_with_config(declaration, implementation, RouterConfig::from_env())
    }

    /// # Errors
    ///
    /// Any [`InitError`] from flattening or building.
    pub fn from_declaration_with_config(
        declaration: &Declaration,
        implementation: Implementation<H>,
        config: RouterConfig,
    ) -> Result<Self, InitError> {
        let entries = flatten(declaration, implementation).inspect_err(|err| {
            error!(
                code = %err.code(),
                error = %err,
                suggestion = %err.suggestion(),
                "Failed to flatten route declarations"
            );
        })?;
        Self::build_with_config(entries, config)
    }

    fn try_build(entries: Vec<FlattenedEntry<H>>, config: RouterConfig) -> Result<Self, InitError> {
        let mut root = TrieNode::new();
        let mut stored = Vec::with_capacity(entries.len());
        let mut by_method: HashMap<RouteMethod, MethodTable<H>> = HashMap::new();
        let mut seen: HashMap<(String, RouteMethod), RouteRef> = HashMap::new();

        for entry in entries {
            if entry.full_path != entry.template.path || entry.method != entry.template.method {
                warn!(
                    full_path = %entry.full_path,
                    method = %entry.method,
                    template_path = %entry.template.path,
                    template_method = %entry.template.method,
                    "Entry disagrees with its template; routing by the template"
                );
            }
            let route = RouteRef::new(entry.template.method, entry.template.path.clone());
            let key = (entry.template.path.clone(), entry.template.method);

            let stored_entry = match config.strategy {
                RoutingStrategy::Trie => root.insert_entry(entry)?,
                RoutingStrategy::Specificity => {
                    if let Some(existing) = seen.get(&key) {
                        return Err(InitError::DuplicateRoutes {
                            existing: existing.clone(),
                            new: route,
                        });
                    }
                    Arc::new(RouteEntry {
                        param_names: param_names(&entry.template.path),
                        template: entry.template,
                        handler: entry.handler,
                    })
                }
            };
            seen.insert(key, route);

            let table = by_method.entry(stored_entry.template.method).or_default();
            table.templates.push(stored_entry.template.path.clone());
            table.entries.push(Arc::clone(&stored_entry));
            stored.push(stored_entry);
        }

        let routes_summary: Vec<String> = stored
            .iter()
            .take(10)
            .map(|e| format!("{} {}", e.template.method, e.template.path))
            .collect();

        info!(
            routes_count = stored.len(),
            methods_count = by_method.len(),
            trie_nodes = root.node_count(),
            routes_summary = ?routes_summary,
            routing_algorithm = %config.strategy,
            "Routing table loaded"
        );

        Ok(Self {
            root,
            entries: stored,
            by_method,
            config,
        })
    }

    /// Match a request to a route
    ///
    /// # Errors
    ///
    /// [`DispatchError::NotFound`], [`DispatchError::InvalidPathParams`], or with the
    /// specificity strategy [`DispatchError::AmbiguousRoutes`].
    pub fn dispatch(&self, method: RouteMethod, path: &str) -> Result<RouteMatch<H>, DispatchError> {
        debug!(
            method = %method,
            path = %path,
            algorithm = %self.config.strategy,
            "Route match attempt"
        );

        let match_start = Instant::now();
        let result = match self.config.strategy {
            RoutingStrategy::Trie => dispatch(&self.root, path, method),
            RoutingStrategy::Specificity => self.dispatch_by_specificity(method, path),
        };
        let match_duration = match_start.elapsed();

        match &result {
            Ok(matched) if match_duration > self.config.slow_match_threshold() => {
                warn!(
                    method = %method,
                    path = %path,
                    route_pattern = %matched.template().path,
                    path_params = ?matched.raw_params,
                    duration_us = match_duration.as_micros(),
                    algorithm = %self.config.strategy,
                    "Slow route matching detected"
                );
            }
            Ok(matched) => {
                info!(
                    method = %method,
                    path = %path,
                    route_pattern = %matched.template().path,
                    path_params = ?matched.raw_params,
                    duration_us = match_duration.as_micros(),
                    algorithm = %self.config.strategy,
                    "Route matched"
                );
            }
            Err(DispatchError::NotFound { .. }) => {
                warn!(
                    method = %method,
                    path = %path,
                    duration_us = match_duration.as_micros(),
                    algorithm = %self.config.strategy,
                    "No route matched"
                );
            }
            Err(DispatchError::AmbiguousRoutes(err)) => {
                error!(
                    method = %method,
                    path = %path,
                    error = %err,
                    "Ambiguous routes"
                );
            }
            // Logged by the dispatcher with the template path.
            Err(DispatchError::InvalidPathParams { .. }) => {}
        }

        result
    }

    fn dispatch_by_specificity(
        &self,
        method: RouteMethod,
        path: &str,
    ) -> Result<RouteMatch<H>, DispatchError> {
        let not_found = || DispatchError::NotFound {
            method,
            path: path.to_string(),
        };

        let table = self.by_method.get(&method).ok_or_else(not_found)?;
        let found = match_by_specificity(path, table.templates.as_slice())?.ok_or_else(not_found)?;
        let entry = table.entries.get(found.index).ok_or_else(not_found)?;
        into_match(Arc::clone(entry), found.raw_params)
    }

    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    #[must_use]
    pub fn route_count(&self) -> usize {
        self.entries.len()
    }

    /// The trie built for [`RoutingStrategy::Trie`]; empty for the specificity strategy
    #[must_use]
    pub fn trie(&self) -> &TrieNode<H> {
        &self.root
    }

    /// Registered entries in registration order
    pub fn entries(&self) -> impl Iterator<Item = &Arc<RouteEntry<H>>> {
        self.entries.iter()
    }

    /// Methods that have at least one route
    pub fn methods(&self) -> impl Iterator<Item = RouteMethod> + '_ {
        RouteMethod::ALL
            .into_iter()
            .filter(|m| self.by_method.contains_key(m))
    }

    /// `METHOD path` for every registered route, in registration order
    #[must_use]
    pub fn path_patterns(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| format!("{} {}", e.template.method, e.template.path))
            .collect()
    }

    /// Print all registered routes to stdout
    pub fn dump_routes(&self) {
        println!(
            "[routes] strategy={} count={}",
            self.config.strategy,
            self.entries.len()
        );
        for entry in &self.entries {
            let deprecated = if entry.template.deprecated {
                " (deprecated)"
            } else {
                ""
            };
            println!(
                "[route] {} {}{deprecated}",
                entry.template.method, entry.template.path
            );
        }
    }
}
