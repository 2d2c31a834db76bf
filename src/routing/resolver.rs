//! Picks the actionable frame out of a match chain.
//!
//! An index route registered next to its parent outranks the parent for
//! the parent's own path. Unless the request explicitly targets the index
//! route (`?index` with an empty value), the parent handles the action.

use url::Url;

use crate::routing::matcher::MatchFrame;

/// Select the frame whose handler should run.
///
/// Returns `None` only when `matches` is empty.
pub fn resolve_action_match<'m>(matches: &'m [MatchFrame], url: &Url) -> Option<&'m MatchFrame> {
    let candidate = matches.last()?;

    if candidate.route.is_index_id() && !is_index_request_url(url) && matches.len() > 1 {
        return matches.get(matches.len() - 2);
    }

    Some(candidate)
}

/// True when any `index` query parameter has an empty value.
pub fn is_index_request_url(url: &Url) -> bool {
    url.query_pairs()
        .any(|(name, value)| name == "index" && value.is_empty())
}
