//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Action call (request URL, action name)
//!     → path.rs (synthetic path: /actions__ + URL path + action)
//!     → tree.rs (flat manifest → nested tree, per call)
//!     → matcher.rs (tree + path → ordered match frames, or no-match)
//!     → resolver.rs (frames → single actionable frame)
//! ```
//!
//! # Design Decisions
//! - The tree is rebuilt for every call; only the flat manifest is cached
//! - Most specific branch wins (ranked by segment score)
//! - Deterministic: same manifest and path always pick the same route
//! - Index routes only win when the URL explicitly asks for them

pub mod matcher;
pub mod path;
pub mod resolver;
pub mod tree;

pub use matcher::{MatchFrame, NestedRouteMatcher, PathMatcher};
pub use path::{action_path, join_posix};
pub use resolver::{is_index_request_url, resolve_action_match};
pub use tree::{build_route_tree, build_subtree, RouteTreeNode, TreeError};
