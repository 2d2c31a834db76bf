//! Response mapping.
//!
//! # Responsibilities
//! - Map action errors to HTTP status codes
//! - Render errors as a JSON body with a stable `kind`
//!
//! # Design Decisions
//! - Client mistakes (bad action field, bad form) are 4xx
//! - An uninitialized store is 503, the caller may retry later
//! - Handler and manifest failures are 500 with the message passed through

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::action::error::ActionError;
use crate::action::form::FormError;

impl ActionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ActionError::NotInitialized => StatusCode::SERVICE_UNAVAILABLE,
            ActionError::InvalidAction | ActionError::EmptyAction | ActionError::InvalidUrl(_) => {
                StatusCode::BAD_REQUEST
            }
            ActionError::NoRouteMatch { .. } => StatusCode::NOT_FOUND,
            ActionError::Form(FormError::UnsupportedContentType(_)) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            ActionError::Form(FormError::InvalidContentType | FormError::Multipart(_)) => {
                StatusCode::BAD_REQUEST
            }
            ActionError::LoadTask(_)
            | ActionError::Tree(_)
            | ActionError::Manifest(_)
            | ActionError::Handler(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error body with the given status.
pub fn error_response(status: StatusCode, kind: &str, message: impl std::fmt::Display) -> Response {
    (
        status,
        Json(json!({
            "error": message.to_string(),
            "kind": kind,
        })),
    )
        .into_response()
}

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        error_response(self.status_code(), self.kind(), &self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::tree::TreeError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ActionError::NotInitialized.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ActionError::InvalidAction.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ActionError::EmptyAction.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ActionError::NoRouteMatch { path: "/actions__/x".into() }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ActionError::Form(FormError::UnsupportedContentType("text/plain".into())).status_code(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            ActionError::Form(FormError::Multipart("no boundary".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ActionError::Tree(TreeError::ParentCycle { id: "a".into() }).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ActionError::Handler("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = ActionError::EmptyAction.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
