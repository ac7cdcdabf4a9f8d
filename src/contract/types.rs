use crate::method::RouteMethod;
use crate::validator::ValidatorRef;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Response validators keyed by status code
pub type Responses = BTreeMap<u16, ValidatorRef>;

/// A declared route: method, path pattern and the validators attached to it.
///
/// `path` uses `{name}` for variable segments and may be empty, in which case the
/// route sits directly on its enclosing resource's base path.
#[derive(Debug, Clone)]
pub struct PathTemplate {
    pub method: RouteMethod,
    pub path: String,
    pub responses: Responses,
    pub path_params: Option<ValidatorRef>,
    pub query: Option<ValidatorRef>,
    pub headers: Option<ValidatorRef>,
    pub body: Option<ValidatorRef>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub deprecated: bool,
}

impl PathTemplate {
    pub fn new(method: RouteMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            responses: Responses::new(),
            path_params: None,
            query: None,
            headers: None,
            body: None,
            summary: None,
            description: None,
            deprecated: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(RouteMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(RouteMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(RouteMethod::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(RouteMethod::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(RouteMethod::Delete, path)
    }

    #[must_use]
    pub fn response(mut self, status: u16, validator: ValidatorRef) -> Self {
        self.responses.insert(status, validator);
        self
    }

    #[must_use]
    pub fn path_params(mut self, validator: ValidatorRef) -> Self {
        self.path_params = Some(validator);
        self
    }

    #[must_use]
    pub fn query(mut self, validator: ValidatorRef) -> Self {
        self.query = Some(validator);
        self
    }

    #[must_use]
    pub fn headers(mut self, validator: ValidatorRef) -> Self {
        self.headers = Some(validator);
        self
    }

    #[must_use]
    pub fn body(mut self, validator: ValidatorRef) -> Self {
        self.body = Some(validator);
        self
    }

    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }
}

/// A group of routes sharing a base path, path-parameter validator, responses and headers
#[derive(Debug, Clone, Default)]
pub struct Resource {
    pub base_path: String,
    pub path_params: Option<ValidatorRef>,
    pub shared_responses: Responses,
    pub shared_headers: Option<ValidatorRef>,
    /// Named children, kept in declaration order; names are unique
    pub routes: Vec<(String, Declaration)>,
}

impl Resource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resource mounted under `base_path` (e.g. `/api/{version}`)
    pub fn at(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn path_params(mut self, validator: ValidatorRef) -> Self {
        self.path_params = Some(validator);
        self
    }

    #[must_use]
    pub fn shared_response(mut self, status: u16, validator: ValidatorRef) -> Self {
        self.shared_responses.insert(status, validator);
        self
    }

    #[must_use]
    pub fn shared_responses(mut self, responses: Responses) -> Self {
        self.shared_responses.extend(responses);
        self
    }

    #[must_use]
    pub fn shared_headers(mut self, validator: ValidatorRef) -> Self {
        self.shared_headers = Some(validator);
        self
    }

    /// Declare a named child. Reusing a name replaces the earlier child in its position.
    #[must_use]
    pub fn route(mut self, name: impl Into<String>, declaration: impl Into<Declaration>) -> Self {
        let name = name.into();
        let declaration = declaration.into();
        match self.routes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = declaration,
            None => self.routes.push((name, declaration)),
        }
        self
    }

    /// Children with unique names: first position, last declaration
    pub(crate) fn children(&self) -> impl Iterator<Item = (&str, &Declaration)> {
        let routes = &self.routes;
        routes
            .iter()
            .enumerate()
            .filter(move |(index, (key, _))| !routes[..*index].iter().any(|(k, _)| k == key))
            .filter_map(move |(_, (key, _))| {
                routes
                    .iter()
                    .rev()
                    .find(|(k, _)| k == key)
                    .map(|(k, declaration)| (k.as_str(), declaration))
            })
    }
}

/// A node of the route declaration tree
#[derive(Debug, Clone)]
pub enum Declaration {
    Route(PathTemplate),
    Resource(Resource),
}

impl From<PathTemplate> for Declaration {
    fn from(template: PathTemplate) -> Self {
        Declaration::Route(template)
    }
}

impl From<Resource> for Declaration {
    fn from(resource: Resource) -> Self {
        Declaration::Resource(resource)
    }
}

/// Handlers arranged in the same shape as the declaration tree
#[derive(Debug, Clone)]
pub enum Implementation<H> {
    Handler(H),
    Group(HashMap<String, Implementation<H>>),
}

impl<H> Implementation<H> {
    pub fn handler(handler: H) -> Self {
        Implementation::Handler(handler)
    }

    /// Empty group, filled with [`Implementation::with`]
    pub fn group() -> Self {
        Implementation::Group(HashMap::new())
    }

    /// Add a named child to a group. A handler leaf is returned unchanged.
    #[must_use]
    pub fn with(self, name: impl Into<String>, child: impl Into<Implementation<H>>) -> Self {
        match self {
            Implementation::Group(mut children) => {
                children.insert(name.into(), child.into());
                Implementation::Group(children)
            }
            handler @ Implementation::Handler(_) => {
                let name: String = name.into();
                warn!(
                    child = %name,
                    "Ignoring child added to a handler implementation"
                );
                handler
            }
        }
    }
}

/// One fully-composed `(path, method)` leaf produced by flattening
///
/// `full_path` and `method` mirror the template. Both routing strategies read
/// `template.path` and `template.method`.
#[derive(Debug, Clone)]
pub struct FlattenedEntry<H> {
    pub full_path: String,
    pub method: RouteMethod,
    pub template: PathTemplate,
    pub handler: H,
}
