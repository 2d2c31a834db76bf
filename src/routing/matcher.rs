//! Nested route matching.
//!
//! # Responsibilities
//! - Flatten the route tree into root-to-node branches
//! - Rank branches by specificity
//! - Match a concrete path against each branch, binding `:params` and `*`
//! - Return the full chain of frames, outermost first, or no-match
//!
//! # Scoring
//! ```text
//! base           number of "/"-separated segments of the branch path
//! splat          -2 if any segment is "*"
//! index route    +2
//! per segment    +3 ":param", +1 empty, +10 static ("*" not counted)
//! ```
//! Higher score is tried first; equal scores keep tree order.
//!
//! # Design Decisions
//! - Matching is per segment, never regex
//! - Static segments are case-insensitive unless the route opts in
//! - Bound `:param` and `*` values are percent-decoded
//! - Pathless, non-index routes are layouts: part of a chain, never a leaf

use std::cmp::Reverse;
use std::fmt;

use percent_encoding::percent_decode_str;

use crate::action::handler::Params;
use crate::manifest::record::RouteRecord;
use crate::routing::tree::RouteTreeNode;

const SPLAT: &str = "*";
const SPLAT_PENALTY: i32 = -2;
const INDEX_ROUTE_VALUE: i32 = 2;
const DYNAMIC_SEGMENT_VALUE: i32 = 3;
const EMPTY_SEGMENT_VALUE: i32 = 1;
const STATIC_SEGMENT_VALUE: i32 = 10;

/// One route's share of a match.
#[derive(Debug, Clone)]
pub struct MatchFrame {
    /// Parameters bound by this frame and its ancestors.
    pub params: Params,
    /// Portion of the path matched up to and including this frame.
    pub pathname: String,
    /// Like `pathname`, without any splat remainder.
    pub pathname_base: String,
    pub route: RouteRecord,
}

/// Matches a concrete path against a route tree.
pub trait PathMatcher: Send + Sync + fmt::Debug {
    /// Ordered frames from outermost to innermost, or `None` when no
    /// branch reaches the whole path.
    fn match_routes(&self, tree: &[RouteTreeNode], path: &str) -> Option<Vec<MatchFrame>>;
}

/// Default matcher for nested route trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct NestedRouteMatcher;

impl PathMatcher for NestedRouteMatcher {
    fn match_routes(&self, tree: &[RouteTreeNode], path: &str) -> Option<Vec<MatchFrame>> {
        let mut branches = Vec::new();
        flatten_routes(tree, &mut branches, &[], "");
        // Stable sort: equal scores stay in tree order.
        branches.sort_by_key(|branch| Reverse(branch.score));

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        branches
            .iter()
            .find_map(|branch| match_branch(branch, &segments))
    }
}

#[derive(Clone)]
struct RouteMeta<'a> {
    relative_path: String,
    case_sensitive: bool,
    route: &'a RouteRecord,
}

struct Branch<'a> {
    score: i32,
    routes_meta: Vec<RouteMeta<'a>>,
}

fn flatten_routes<'a>(
    nodes: &'a [RouteTreeNode],
    branches: &mut Vec<Branch<'a>>,
    parents_meta: &[RouteMeta<'a>],
    parent_path: &str,
) {
    for node in nodes {
        let route = &node.route;
        let mut relative_path = route.path.clone().unwrap_or_default();

        if relative_path.starts_with('/') {
            relative_path = match relative_path.strip_prefix(parent_path) {
                Some(rest) => rest.to_string(),
                None => {
                    tracing::warn!(
                        route_id = %route.id,
                        path = %relative_path,
                        parent_path = %parent_path,
                        "Absolute route path is not nested under its parent, skipping"
                    );
                    continue;
                }
            };
        }

        let path = join_paths(parent_path, &relative_path);
        let mut routes_meta = parents_meta.to_vec();
        routes_meta.push(RouteMeta {
            relative_path,
            case_sensitive: route.case_sensitive,
            route,
        });

        if !node.children.is_empty() {
            if route.index {
                tracing::warn!(route_id = %route.id, "Index route has child routes, ignoring them");
            } else {
                flatten_routes(&node.children, branches, &routes_meta, &path);
            }
        }

        // Layout routes only contribute to their children's branches.
        if route.path.is_none() && !route.index {
            continue;
        }

        branches.push(Branch {
            score: compute_score(&path, route.index),
            routes_meta,
        });
    }
}

fn join_paths(parent: &str, child: &str) -> String {
    let joined = format!("{parent}/{child}");
    let mut out = String::with_capacity(joined.len());
    for c in joined.chars() {
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }
    out
}

fn is_dynamic(segment: &str) -> bool {
    segment
        .strip_prefix(':')
        .is_some_and(|name| {
            !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

fn compute_score(path: &str, index: bool) -> i32 {
    let segments: Vec<&str> = path.split('/').collect();
    let mut score = segments.len() as i32;
    if segments.iter().any(|s| *s == SPLAT) {
        score += SPLAT_PENALTY;
    }
    if index {
        score += INDEX_ROUTE_VALUE;
    }

    segments
        .iter()
        .filter(|s| **s != SPLAT)
        .fold(score, |score, segment| {
            score
                + if is_dynamic(segment) {
                    DYNAMIC_SEGMENT_VALUE
                } else if segment.is_empty() {
                    EMPTY_SEGMENT_VALUE
                } else {
                    STATIC_SEGMENT_VALUE
                }
        })
}

fn match_branch(branch: &Branch<'_>, segments: &[&str]) -> Option<Vec<MatchFrame>> {
    let mut params = Params::new();
    let mut consumed = 0;
    let mut frames = Vec::with_capacity(branch.routes_meta.len());
    let last = branch.routes_meta.len().saturating_sub(1);

    for (i, meta) in branch.routes_meta.iter().enumerate() {
        let matched = match_segments(
            &meta.relative_path,
            meta.case_sensitive,
            i == last,
            &segments[consumed..],
        )?;

        params.extend(matched.params);
        frames.push(MatchFrame {
            params: params.clone(),
            pathname: to_pathname(&segments[..consumed + matched.len]),
            pathname_base: to_pathname(&segments[..consumed + matched.base_len]),
            route: meta.route.clone(),
        });
        consumed += matched.base_len;
    }

    Some(frames)
}

fn to_pathname(segments: &[&str]) -> String {
    format!("/{}", segments.join("/"))
}

struct SegmentMatch {
    params: Params,
    /// Segments consumed including any splat remainder.
    len: usize,
    /// Segments consumed by the pattern itself.
    base_len: usize,
}

/// Match `pattern` against the start of `segments`. With `end`, the
/// pattern must consume every segment.
fn match_segments(
    pattern: &str,
    case_sensitive: bool,
    end: bool,
    segments: &[&str],
) -> Option<SegmentMatch> {
    let (pattern, splat) = match pattern.strip_suffix(SPLAT) {
        Some(rest) => (rest, true),
        None => (pattern, false),
    };
    let pattern_segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    if pattern_segments.len() > segments.len() {
        return None;
    }

    let mut params = Params::new();
    for (expected, actual) in pattern_segments.iter().zip(segments) {
        if is_dynamic(expected) {
            let name = &expected[1..];
            params.insert(name.to_string(), decode_param(name, actual));
        } else if !segment_eq(expected, actual, case_sensitive) {
            return None;
        }
    }

    let base_len = pattern_segments.len();
    if splat {
        let rest = segments[base_len..].join("/");
        params.insert(SPLAT.to_string(), decode_param(SPLAT, &rest));
        return Some(SegmentMatch {
            params,
            len: segments.len(),
            base_len,
        });
    }

    if end && segments.len() != base_len {
        return None;
    }

    Some(SegmentMatch {
        params,
        len: base_len,
        base_len,
    })
}

/// Percent-decode a bound value. Values that do not decode to UTF-8 are
/// kept as sent.
fn decode_param(name: &str, value: &str) -> String {
    match percent_decode_str(value).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(e) => {
            tracing::warn!(
                param = %name,
                value = %value,
                error = %e,
                "Route param is not valid percent-encoded UTF-8, keeping it raw"
            );
            value.to_string()
        }
    }
}

fn segment_eq(expected: &str, actual: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        expected == actual
    } else {
        expected == actual || expected.to_lowercase() == actual.to_lowercase()
    }
}
