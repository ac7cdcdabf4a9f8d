//! # Dispatcher Module
//!
//! Resolves a concrete `(path, method)` pair against a built trie and produces a
//! [`RouteMatch`]: the matched entry, the raw path variables and the validated
//! parameter value.
//!
//! ## Request Flow
//!
//! 1. Split the request path into concrete segments (empty segments dropped)
//! 2. Walk the trie, literal children first, variable child as fallback
//! 3. Zip the captured values with the variable names of the *matched* template
//! 4. Run the template's path-parameter validator, if it has one
//!
//! "Not found" and "invalid path params" are distinct outcomes. A request whose
//! shape matches a template but whose values fail validation is reported against
//! that template's path and never turned into a 404.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::warn;

use crate::contract::PathTemplate;
use crate::error::DispatchError;
use crate::method::RouteMethod;
use crate::router::trie::{Captures, RouteEntry, TrieNode};
use crate::segment::split_request_path;

/// Result of successfully dispatching a request
///
/// Produced per call and never stored by the router.
#[derive(Debug)]
pub struct RouteMatch<H> {
    /// The matched template and handler, shared with the trie
    pub entry: Arc<RouteEntry<H>>,
    /// Path variables as extracted from the URL (e.g. `{id}` -> `"123"`)
    pub raw_params: HashMap<String, String>,
    /// Output of the path-parameter validator, or `raw_params` as a JSON object
    pub params: Value,
}

impl<H> Clone for RouteMatch<H> {
    fn clone(&self) -> Self {
        Self {
            entry: Arc::clone(&self.entry),
            raw_params: self.raw_params.clone(),
            params: self.params.clone(),
        }
    }
}

impl<H> RouteMatch<H> {
    #[must_use]
    pub fn template(&self) -> &PathTemplate {
        &self.entry.template
    }

    #[must_use]
    pub fn handler(&self) -> &H {
        &self.entry.handler
    }

    /// Raw path parameter by name
    ///
    /// When a template repeats a variable name, the last occurrence wins.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.raw_params.get(name).map(String::as_str)
    }
}

/// Dispatch a request against a built trie
///
/// # Errors
///
/// - [`DispatchError::NotFound`] when no template matches the path and method
/// - [`DispatchError::InvalidPathParams`] when the matched template's
///   path-parameter validator rejects the extracted values
///
/// # Example
///
/// ```rust
/// use routeweave::contract::{FlattenedEntry, PathTemplate};
/// use routeweave::router::trie::build;
/// use routeweave::{dispatch, RouteMethod};
///
/// let root = build(vec![FlattenedEntry {
///     full_path: "/users/{id}".to_string(),
///     method: RouteMethod::Get,
///     template: PathTemplate::get("/users/{id}"),
///     handler: "read_user",
/// }])
/// .unwrap();
///
/// let matched = dispatch(&root, "/users/42", RouteMethod::Get).unwrap();
/// assert_eq!(*matched.handler(), "read_user");
/// assert_eq!(matched.get_path_param("id"), Some("42"));
/// ```
pub fn dispatch<H>(
    root: &TrieNode<H>,
    path: &str,
    method: RouteMethod,
) -> Result<RouteMatch<H>, DispatchError> {
    let segments = split_request_path(path);
    let mut captures = Captures::new();

    let Some(entry) = root.search(&segments, method, &mut captures) else {
        return Err(DispatchError::NotFound {
            method,
            path: path.to_string(),
        });
    };

    let raw_params = zip_params(&entry.param_names, &captures);
    into_match(Arc::clone(entry), raw_params)
}

/// Pair variable names with captured values positionally, last write wins
pub(crate) fn zip_params(names: &[String], values: &[&str]) -> HashMap<String, String> {
    let mut params = HashMap::with_capacity(names.len());
    for (name, value) in names.iter().zip(values) {
        params.insert(name.clone(), (*value).to_string());
    }
    params
}

/// Validate raw params against the entry's template and build the match
pub(crate) fn into_match<H>(
    entry: Arc<RouteEntry<H>>,
    raw_params: HashMap<String, String>,
) -> Result<RouteMatch<H>, DispatchError> {
    let params = validate_path_params(&entry.template, &raw_params)?;
    Ok(RouteMatch {
        entry,
        raw_params,
        params,
    })
}

fn validate_path_params(
    template: &PathTemplate,
    raw_params: &HashMap<String, String>,
) -> Result<Value, DispatchError> {
    let raw: Map<String, Value> = raw_params
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();
    let raw = Value::Object(raw);

    let Some(validator) = &template.path_params else {
        return Ok(raw);
    };

    validator.validate(&raw).map_err(|source| {
        warn!(
            method = %template.method,
            route_pattern = %template.path,
            error = %source,
            "Invalid path params"
        );
        DispatchError::InvalidPathParams {
            template_path: template.path.clone(),
            source,
        }
    })
}
