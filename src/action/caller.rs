//! Action call orchestration.
//!
//! # Responsibilities
//! - Obtain the current action routes from the store
//! - Read and validate the action name from the form body
//! - Build the synthetic action path and resolve it to one route
//! - Invoke that route's handler and hand back its result
//!
//! # Design Decisions
//! - Validation failures are fatal to the call, no fallbacks
//! - The handler result is returned as is, including its errors
//! - The store, matcher and form parser are injected

use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::http::{header, Request};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::action::error::ActionError;
use crate::action::form::{FormDataParser, FormValue, HtmlFormParser};
use crate::action::handler::{ActionArgs, Params};
use crate::manifest::filter::ACTIONS_NAMESPACE;
use crate::observability::metrics;
use crate::routing::matcher::{NestedRouteMatcher, PathMatcher};
use crate::routing::path::action_path;
use crate::routing::resolver::resolve_action_match;
use crate::routing::tree::build_route_tree;
use crate::store::route_store::RouteLoader;

/// Default form field carrying the action name.
pub const DEFAULT_ACTION_FIELD: &str = "_action";

/// Caller options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ActionCallerConfig {
    /// Form field whose value names the action.
    pub action_field_name: String,
    /// Namespace segment prepended to every action path.
    pub actions_namespace: String,
}

impl Default for ActionCallerConfig {
    fn default() -> Self {
        Self {
            action_field_name: DEFAULT_ACTION_FIELD.to_string(),
            actions_namespace: ACTIONS_NAMESPACE.to_string(),
        }
    }
}

/// Input of a single action call.
#[derive(Debug)]
pub struct CallArgs {
    pub request: Request<Bytes>,
    pub params: Params,
}

impl CallArgs {
    pub fn new(request: Request<Bytes>) -> Self {
        Self {
            request,
            params: Params::new(),
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }
}

/// Dispatches form submissions to action route handlers.
pub struct ActionCaller {
    routes: Arc<dyn RouteLoader>,
    matcher: Arc<dyn PathMatcher>,
    form_parser: Arc<dyn FormDataParser>,
    config: ActionCallerConfig,
}

impl ActionCaller {
    /// Caller with the default matcher, HTML form parser and config.
    pub fn new(routes: Arc<dyn RouteLoader>) -> Self {
        Self {
            routes,
            matcher: Arc::new(NestedRouteMatcher),
            form_parser: Arc::new(HtmlFormParser),
            config: ActionCallerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ActionCallerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_matcher(mut self, matcher: Arc<dyn PathMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_form_parser(mut self, form_parser: Arc<dyn FormDataParser>) -> Self {
        self.form_parser = form_parser;
        self
    }

    pub fn config(&self) -> &ActionCallerConfig {
        &self.config
    }

    /// Resolve the submitted action and run its handler.
    pub async fn call(&self, args: CallArgs) -> Result<serde_json::Value, ActionError> {
        let start = Instant::now();
        let result = self.dispatch(args).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        metrics::record_action_call(outcome, start);

        result
    }

    async fn dispatch(&self, args: CallArgs) -> Result<serde_json::Value, ActionError> {
        // Development loads read and parse the artifact, keep that off the
        // async workers.
        let routes = self.routes.clone();
        let store = tokio::task::spawn_blocking(move || routes.load_routes()).await??;
        if !store.is_initialized() {
            return Err(ActionError::NotInitialized);
        }

        let tree = build_route_tree(&store.manifest)?;

        let form_data = self.form_parser.parse(&args.request).await?;
        let action_name = match form_data.get(&self.config.action_field_name) {
            Some(FormValue::Text(name)) => name.clone(),
            _ => return Err(ActionError::InvalidAction),
        };
        if action_name.is_empty() {
            return Err(ActionError::EmptyAction);
        }

        let url = request_url(&args.request)?;
        let path = action_path(&self.config.actions_namespace, url.path(), &action_name);

        let matches = self
            .matcher
            .match_routes(&tree, &path)
            .ok_or_else(|| ActionError::NoRouteMatch { path: path.clone() })?;
        let selected = resolve_action_match(&matches, &url)
            .ok_or_else(|| ActionError::NoRouteMatch { path: path.clone() })?;

        tracing::debug!(
            action = %action_name,
            path = %path,
            route_id = %selected.route.id,
            "Dispatching action"
        );

        let handler = selected.route.handler.clone();
        let route_params = selected.params.clone();

        handler
            .call(ActionArgs {
                request: args.request,
                params: args.params,
                route_params,
                form_data,
            })
            .await
            .map_err(ActionError::Handler)
    }
}

impl std::fmt::Debug for ActionCaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionCaller")
            .field("matcher", &self.matcher)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Absolute URL of the request. Origin-form URIs are resolved against the
/// Host header, falling back to `localhost`.
fn request_url(request: &Request<Bytes>) -> Result<Url, ActionError> {
    let uri = request.uri();
    if uri.scheme().is_some() {
        return Ok(Url::parse(&uri.to_string())?);
    }

    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    Ok(Url::parse(&format!("http://{host}{path_and_query}"))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(uri: &str, host: Option<&str>) -> Request<Bytes> {
        let mut builder = Request::builder().method("POST").uri(uri);
        if let Some(host) = host {
            builder = builder.header(header::HOST, host);
        }
        builder.body(Bytes::new()).unwrap()
    }

    #[test]
    fn test_absolute_uri() {
        let url = request_url(&request("https://example.com/item?index", None)).unwrap();

        assert_eq!(url.as_str(), "https://example.com/item?index");
        assert_eq!(url.path(), "/item");
    }

    #[test]
    fn test_origin_form_uses_host() {
        let url = request_url(&request("/item?x=1", Some("shop.test:8080"))).unwrap();

        assert_eq!(url.host_str(), Some("shop.test"));
        assert_eq!(url.path(), "/item");
        assert_eq!(url.query(), Some("x=1"));
    }

    #[test]
    fn test_origin_form_without_host() {
        let url = request_url(&request("/", None)).unwrap();

        assert_eq!(url.as_str(), "http://localhost/");
    }

    #[test]
    fn test_bad_host_is_invalid_url() {
        let err = request_url(&request("/", Some("exa mple.com"))).unwrap_err();

        assert!(matches!(err, ActionError::InvalidUrl(_)));
    }

    #[test]
    fn test_default_config() {
        let config = ActionCallerConfig::default();

        assert_eq!(config.action_field_name, "_action");
        assert_eq!(config.actions_namespace, "actions__");
    }
}
