//! Whole-path matching over a flat template list, ranked by specificity.
//!
//! This needs no prebuilt trie, and so performs no build-time conflict check.
//! Two templates that match the same request with the same literal/variable
//! layout are reported as [`AmbiguousRoutes`] when that request arrives.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::AmbiguousRoutes;
use crate::segment::{split_request_path, ClassifiedPath, Segment};

/// The single most specific template matching a request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecificityMatch<'t> {
    pub template: &'t str,
    /// Position of `template` in the input list
    pub index: usize,
    pub raw_params: HashMap<String, String>,
}

struct Candidate<'t> {
    template: &'t str,
    index: usize,
    segments: Vec<Segment>,
    raw_params: HashMap<String, String>,
}

/// Find the most specific template matching `path`
///
/// A template matches when it has as many segments as the path and every literal
/// segment equals the request segment at that position. Among matches, a literal
/// beats a variable at the leftmost position where two templates differ.
///
/// # Errors
///
/// Returns [`AmbiguousRoutes`] when two matching templates tie for best.
///
/// # Example
///
/// ```rust
/// use routeweave::router::specificity::match_by_specificity;
///
/// let found = match_by_specificity("/a/b", &["/{a}/{b}", "/a/{b}"]).unwrap().unwrap();
/// assert_eq!(found.template, "/a/{b}");
/// assert_eq!(found.raw_params["b"], "b");
///
/// assert!(match_by_specificity("/x/y/z", &["/{a}"]).unwrap().is_none());
/// ```
pub fn match_by_specificity<'t, S: AsRef<str>>(
    path: &str,
    templates: &'t [S],
) -> Result<Option<SpecificityMatch<'t>>, AmbiguousRoutes> {
    let request = split_request_path(path);

    let mut best: Option<Candidate<'t>> = None;
    let mut tied: Option<&'t str> = None;

    for (index, template) in templates.iter().enumerate() {
        let template = template.as_ref();
        let Some(candidate) = try_match(template, index, &request) else {
            continue;
        };

        let ordering = best
            .as_ref()
            .map_or(Ordering::Greater, |current| {
                compare_specificity(&candidate.segments, &current.segments)
            });
        match ordering {
            Ordering::Greater => {
                best = Some(candidate);
                tied = None;
            }
            Ordering::Equal => {
                tied.get_or_insert(candidate.template);
            }
            Ordering::Less => {}
        }
    }

    if let (Some(best), Some(second)) = (&best, tied) {
        return Err(AmbiguousRoutes {
            first: best.template.to_string(),
            second: second.to_string(),
        });
    }

    Ok(best.map(|c| SpecificityMatch {
        template: c.template,
        index: c.index,
        raw_params: c.raw_params,
    }))
}

fn try_match<'t>(template: &'t str, index: usize, request: &[&str]) -> Option<Candidate<'t>> {
    let ClassifiedPath {
        segments,
        param_names,
    } = ClassifiedPath::parse(template);
    if segments.len() != request.len() {
        return None;
    }

    let mut names = param_names.into_iter();
    let mut raw_params = HashMap::new();
    for (segment, value) in segments.iter().zip(request) {
        match segment {
            Segment::Literal(text) if text == value => {}
            Segment::Literal(_) => return None,
            Segment::Variable => {
                if let Some(name) = names.next() {
                    raw_params.insert(name, (*value).to_string());
                }
            }
        }
    }

    Some(Candidate {
        template,
        index,
        segments,
        raw_params,
    })
}

/// Literal outranks variable at the first position where the two differ
pub(crate) fn compare_specificity(a: &[Segment], b: &[Segment]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match (x.is_variable(), y.is_variable()) {
            (false, true) => return Ordering::Greater,
            (true, false) => return Ordering::Less,
            _ => {}
        }
    }
    Ordering::Equal
}
