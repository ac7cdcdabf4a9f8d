//! HTTP methods a route template can be declared with.
//!
//! Routing is never method-agnostic: every trie leaf holds at most one entry per
//! [`RouteMethod`], and every dispatch names exactly one. The enum is closed over the
//! five methods a contract may declare, so it can be used directly as a map key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the five methods a route template may be declared with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RouteMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl RouteMethod {
    /// Every supported method, in declaration order
    pub const ALL: [RouteMethod; 5] = [
        RouteMethod::Get,
        RouteMethod::Post,
        RouteMethod::Put,
        RouteMethod::Patch,
        RouteMethod::Delete,
    ];

    /// Upper-case wire name (`"GET"`, `"POST"`, ...)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RouteMethod::Get => "GET",
            RouteMethod::Post => "POST",
            RouteMethod::Put => "PUT",
            RouteMethod::Patch => "PATCH",
            RouteMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for RouteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a method name is not one of the five routable methods
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported route method: {0}")]
pub struct UnsupportedMethod(pub String);

impl FromStr for RouteMethod {
    type Err = UnsupportedMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RouteMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnsupportedMethod(s.to_string()))
    }
}

impl TryFrom<&http::Method> for RouteMethod {
    type Error = UnsupportedMethod;

    fn try_from(method: &http::Method) -> Result<Self, Self::Error> {
        match *method {
            http::Method::GET => Ok(RouteMethod::Get),
            http::Method::POST => Ok(RouteMethod::Post),
            http::Method::PUT => Ok(RouteMethod::Put),
            http::Method::PATCH => Ok(RouteMethod::Patch),
            http::Method::DELETE => Ok(RouteMethod::Delete),
            _ => Err(UnsupportedMethod(method.to_string())),
        }
    }
}

impl TryFrom<http::Method> for RouteMethod {
    type Error = UnsupportedMethod;

    fn try_from(method: http::Method) -> Result<Self, Self::Error> {
        RouteMethod::try_from(&method)
    }
}

impl From<RouteMethod> for http::Method {
    fn from(method: RouteMethod) -> Self {
        match method {
            RouteMethod::Get => http::Method::GET,
            RouteMethod::Post => http::Method::POST,
            RouteMethod::Put => http::Method::PUT,
            RouteMethod::Patch => http::Method::PATCH,
            RouteMethod::Delete => http::Method::DELETE,
        }
    }
}
