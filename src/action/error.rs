//! Action dispatch errors.

use thiserror::Error;

use crate::action::form::FormError;
use crate::action::handler::HandlerError;
use crate::manifest::ManifestError;
use crate::routing::tree::TreeError;

/// Errors that abort a single action call. None of them are retried.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The route store did not reach the initialized state.
    #[error("Store must be initialized to call actions")]
    NotInitialized,

    /// The action field is missing or is not a text value.
    #[error("Action must be a string")]
    InvalidAction,

    /// The action field is present but empty.
    #[error("Action must be longer than 0")]
    EmptyAction,

    /// No route chain reaches the synthesized action path.
    #[error("No routes matched URL {path}")]
    NoRouteMatch { path: String },

    /// The request URI could not be turned into an absolute URL.
    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The blocking route load task panicked or was cancelled.
    #[error("Route load task failed: {0}")]
    LoadTask(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Form(#[from] FormError),

    /// The resolved handler failed.
    #[error(transparent)]
    Handler(HandlerError),
}

impl ActionError {
    /// Stable identifier for logs and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            ActionError::NotInitialized => "not_initialized",
            ActionError::InvalidAction => "invalid_action",
            ActionError::EmptyAction => "empty_action",
            ActionError::NoRouteMatch { .. } => "no_route_match",
            ActionError::InvalidUrl(_) => "invalid_url",
            ActionError::LoadTask(_) => "load_task",
            ActionError::Tree(_) => "tree",
            ActionError::Manifest(_) => "manifest",
            ActionError::Form(_) => "form",
            ActionError::Handler(_) => "handler",
        }
    }
}
