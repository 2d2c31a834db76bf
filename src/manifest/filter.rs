//! Action route selection.
//!
//! Only the root route and routes under the reserved actions namespace are
//! kept; everything else in the build belongs to page rendering.

use crate::manifest::record::{RouteManifest, ROOT_ROUTE_ID};

/// Default namespace segment for action routes.
pub const ACTIONS_NAMESPACE: &str = "actions__";

/// Id prefix of action routes under the default namespace.
pub const ACTION_ROUTE_PREFIX: &str = "routes/actions__";

/// Keep `root` and every route whose id starts with `routes/actions__`.
pub fn filter_action_routes(raw: RouteManifest) -> RouteManifest {
    filter_routes_in(raw, ACTIONS_NAMESPACE)
}

/// Same as [`filter_action_routes`] for a custom namespace segment.
pub fn filter_routes_in(raw: RouteManifest, namespace: &str) -> RouteManifest {
    let prefix = format!("routes/{namespace}");
    raw.into_iter()
        .filter(|record| is_action_route(&record.id, &prefix))
        .collect()
}

fn is_action_route(id: &str, prefix: &str) -> bool {
    id == ROOT_ROUTE_ID || id.starts_with(prefix)
}
