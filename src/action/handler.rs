//! Action handler contract.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use axum::body::Bytes;
use axum::http::Request;
use futures_util::future::BoxFuture;
use serde_json::json;

use crate::action::form::FormData;

/// Path or request parameters keyed by name.
pub type Params = BTreeMap<String, String>;

/// Error returned by a handler. Surfaced to the caller unchanged.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

pub type HandlerResult = Result<serde_json::Value, HandlerError>;

/// A handler shared between manifest snapshots.
pub type SharedHandler = Arc<dyn ActionHandler>;

/// Everything a handler gets to see about the submission.
#[derive(Debug)]
pub struct ActionArgs {
    /// The original request. Its body is the raw form payload.
    pub request: Request<Bytes>,
    /// Parameters supplied by whoever invoked the caller.
    pub params: Params,
    /// Parameters bound while matching the action route.
    pub route_params: Params,
    /// The parsed form body.
    pub form_data: FormData,
}

/// A server-side action.
///
/// Implemented for any `Fn(ActionArgs) -> impl Future<Output = HandlerResult>`,
/// so plain `async fn`s and closures can be registered directly.
pub trait ActionHandler: Send + Sync {
    fn call(&self, args: ActionArgs) -> BoxFuture<'static, HandlerResult>;
}

impl<F, Fut> ActionHandler for F
where
    F: Fn(ActionArgs) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, args: ActionArgs) -> BoxFuture<'static, HandlerResult> {
        Box::pin(self(args))
    }
}

/// Built-in handler that reflects the submission back as JSON.
pub async fn echo_handler(args: ActionArgs) -> HandlerResult {
    Ok(json!({
        "path": args.request.uri().path(),
        "params": args.params,
        "route_params": args.route_params,
        "form": args.form_data.to_json(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_handler_reflects_form() {
        let mut form_data = FormData::new();
        form_data.append("_action", "create");
        form_data.append("title", "milk");

        let mut route_params = Params::new();
        route_params.insert("listId".into(), "42".into());

        let args = ActionArgs {
            request: Request::builder()
                .uri("/lists/42")
                .body(Bytes::new())
                .unwrap(),
            params: Params::new(),
            route_params,
            form_data,
        };

        let handler: SharedHandler = Arc::new(echo_handler);
        let value = handler.call(args).await.unwrap();

        assert_eq!(value["path"], "/lists/42");
        assert_eq!(value["route_params"]["listId"], "42");
        assert_eq!(value["form"]["title"], "milk");
    }
}
