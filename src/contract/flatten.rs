use super::types::{Declaration, FlattenedEntry, Implementation, PathTemplate, Resource, Responses};
use crate::error::{InitError, RouteRef};
use crate::method::RouteMethod;
use crate::validator::{merge_validators, ValidatorRef};
use std::collections::HashMap;
use tracing::{debug, warn};

/// What ancestors contribute to every route below them
#[derive(Default)]
struct Scope {
    base_path: String,
    path_params: Option<ValidatorRef>,
    responses: Responses,
    headers: Option<ValidatorRef>,
}

impl Scope {
    fn enter(&self, resource: &Resource) -> Scope {
        let mut responses = self.responses.clone();
        responses.extend(
            resource
                .shared_responses
                .iter()
                .map(|(status, v)| (*status, ValidatorRef::clone(v))),
        );
        Scope {
            base_path: format!("{}{}", self.base_path, resource.base_path),
            path_params: merge_validators(self.path_params.as_ref(), resource.path_params.as_ref()),
            responses,
            headers: merge_validators(self.headers.as_ref(), resource.shared_headers.as_ref()),
        }
    }

    fn compose(&self, route: &PathTemplate) -> PathTemplate {
        let mut responses = self.responses.clone();
        responses.extend(
            route
                .responses
                .iter()
                .map(|(status, v)| (*status, ValidatorRef::clone(v))),
        );
        PathTemplate {
            method: route.method,
            path: format!("{}{}", self.base_path, route.path),
            responses,
            path_params: merge_validators(self.path_params.as_ref(), route.path_params.as_ref()),
            headers: merge_validators(self.headers.as_ref(), route.headers.as_ref()),
            ..route.clone()
        }
    }
}

struct Flattener<H> {
    entries: Vec<FlattenedEntry<H>>,
    seen: HashMap<(String, RouteMethod), usize>,
}

/// Flatten a declaration tree and its implementation into method-tagged leaves
///
/// Walks depth-first in declaration order. Every leaf is composed with its
/// ancestors: base paths are concatenated parent-then-child, shared responses are
/// overridden by deeper declarations on status collisions, and header and
/// path-parameter validators are merged structurally with the deeper one winning.
///
/// # Errors
///
/// - [`InitError::MissingRouteImplementation`] when a declared route has no handler
///   (or the implementation tree has a different shape at that name)
/// - [`InitError::DuplicateRoutes`] when two leaves share the same full path and method
pub fn flatten<H>(
    declaration: &Declaration,
    implementation: Implementation<H>,
) -> Result<Vec<FlattenedEntry<H>>, InitError> {
    let mut flattener = Flattener {
        entries: Vec::new(),
        seen: HashMap::new(),
    };
    let mut name = Vec::new();
    flattener.visit(declaration, implementation, &Scope::default(), &mut name)?;

    debug!(
        routes_count = flattener.entries.len(),
        "Flattened route declarations"
    );
    Ok(flattener.entries)
}

impl<H> Flattener<H> {
    fn visit<'d>(
        &mut self,
        declaration: &'d Declaration,
        implementation: Implementation<H>,
        scope: &Scope,
        name: &mut Vec<&'d str>,
    ) -> Result<(), InitError> {
        match (declaration, implementation) {
            (Declaration::Route(route), Implementation::Handler(handler)) => {
                self.push(scope.compose(route), handler)
            }
            (Declaration::Resource(resource), Implementation::Group(mut children)) => {
                let child_scope = scope.enter(resource);
                for (key, child) in resource.children() {
                    name.push(key);
                    let child_impl = children
                        .remove(key)
                        .ok_or_else(|| missing_implementation(name.as_slice()))?;
                    self.visit(child, child_impl, &child_scope, name)?;
                    name.pop();
                }
                for unused in children.keys() {
                    warn!(
                        implementation = %unused,
                        resource = %resource.base_path,
                        "Implementation provided for undeclared route"
                    );
                }
                Ok(())
            }
            _ => Err(missing_implementation(name.as_slice())),
        }
    }

    fn push(&mut self, template: PathTemplate, handler: H) -> Result<(), InitError> {
        let key = (template.path.clone(), template.method);
        if let Some(&index) = self.seen.get(&key) {
            let existing = &self.entries[index];
            return Err(InitError::DuplicateRoutes {
                existing: RouteRef::new(existing.method, existing.full_path.clone()),
                new: RouteRef::new(template.method, template.path.clone()),
            });
        }

        self.seen.insert(key, self.entries.len());
        self.entries.push(FlattenedEntry {
            full_path: template.path.clone(),
            method: template.method,
            template,
            handler,
        });
        Ok(())
    }
}

fn missing_implementation(name: &[&str]) -> InitError {
    InitError::MissingRouteImplementation {
        name: if name.is_empty() {
            "<root>".to_string()
        } else {
            name.join(".")
        },
    }
}
