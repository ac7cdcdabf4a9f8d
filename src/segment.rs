//! Segment classification for path templates and request paths.
//!
//! A template such as `/api/{version}/users/{id}` is split on `/`, empty pieces are
//! discarded, and each remaining piece becomes either a [`Segment::Literal`] or the
//! [`Segment::Variable`] marker. Parameter *names* are not part of the segment: two
//! templates that differ only in variable names classify identically, and the trie
//! relies on that to detect overlapping routes.
//!
//! Because empty pieces are dropped, `""`, `"/"`, `"/users"` and `"users/"` are all
//! handled uniformly.

use smallvec::SmallVec;

/// Number of request segments kept inline before spilling to the heap
pub const MAX_INLINE_SEGMENTS: usize = 8;

/// Concrete request path split into borrowed segments
pub type RequestSegments<'a> = SmallVec<[&'a str; MAX_INLINE_SEGMENTS]>;

/// A single classified template segment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Text that must match the request segment exactly (never empty, no braces)
    Literal(String),
    /// Matches any single request segment
    Variable,
}

impl Segment {
    #[inline]
    #[must_use]
    pub fn is_variable(&self) -> bool {
        matches!(self, Segment::Variable)
    }
}

/// A template's segments together with its variable names, in order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassifiedPath {
    pub segments: Vec<Segment>,
    pub param_names: Vec<String>,
}

impl ClassifiedPath {
    /// Classify a template path once, keeping segments and parameter names together
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let mut segments = Vec::with_capacity(path.matches('/').count() + 1);
        let mut param_names = Vec::with_capacity(path.matches('{').count());

        for piece in non_empty_pieces(path) {
            match variable_name(piece) {
                Some(name) => {
                    segments.push(Segment::Variable);
                    param_names.push(name.to_string());
                }
                None => segments.push(Segment::Literal(piece.to_string())),
            }
        }

        Self {
            segments,
            param_names,
        }
    }
}

/// Turn a template path into its ordered segment descriptors
#[must_use]
pub fn classify(path: &str) -> Vec<Segment> {
    ClassifiedPath::parse(path).segments
}

/// Variable names of a template path, in the order they appear
#[must_use]
pub fn param_names(path: &str) -> Vec<String> {
    non_empty_pieces(path)
        .filter_map(variable_name)
        .map(str::to_string)
        .collect()
}

/// Split a concrete request path into its segments
///
/// No classification happens here: `{x}` in a request is just text.
#[must_use]
pub fn split_request_path(path: &str) -> RequestSegments<'_> {
    non_empty_pieces(path).collect()
}

/// Return the variable name if `piece` has the exact form `{identifier}`
#[must_use]
pub fn variable_name(piece: &str) -> Option<&str> {
    let name = piece.strip_prefix('{')?.strip_suffix('}')?;
    if name.is_empty() || name.contains(['{', '}', '/']) {
        return None;
    }
    Some(name)
}

fn non_empty_pieces(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> Segment {
        Segment::Literal(s.to_string())
    }

    #[test]
    fn test_root_path() {
        assert!(classify("").is_empty());
        assert!(classify("/").is_empty());
        assert!(param_names("/").is_empty());
    }

    #[test]
    fn test_parameterized_path() {
        assert_eq!(classify("/items/{id}"), vec![lit("items"), Segment::Variable]);
        assert_eq!(param_names("/items/{id}"), vec!["id"]);
    }

    #[test]
    fn test_nested_path() {
        let classified = ClassifiedPath::parse("/a/{b}/c/{d}");
        assert_eq!(
            classified.segments,
            vec![lit("a"), Segment::Variable, lit("c"), Segment::Variable]
        );
        assert_eq!(classified.param_names, vec!["b", "d"]);
    }

    #[test]
    fn test_leading_and_trailing_slashes_are_ignored() {
        assert_eq!(classify("users/"), classify("/users"));
        assert_eq!(classify("//users//{id}/"), vec![lit("users"), Segment::Variable]);
    }

    #[test]
    fn test_variable_names_are_erased_from_segments() {
        assert_eq!(classify("/{a}"), classify("/{b}"));
    }

    #[test]
    fn test_partial_braces_are_literal() {
        assert_eq!(classify("/{}"), vec![lit("{}")]);
        assert_eq!(classify("/v{id}"), vec![lit("v{id}")]);
        assert_eq!(classify("/{id"), vec![lit("{id")]);
        assert_eq!(variable_name("{{id}}"), None);
    }

    #[test]
    fn test_split_request_path() {
        let segments = split_request_path("/users/42/");
        assert_eq!(segments.as_slice(), &["users", "42"]);
        assert!(split_request_path("").is_empty());
    }
}
