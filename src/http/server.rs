//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the action endpoint
//! - Wire up middleware (tracing, timeout, request ID)
//! - Read the form body under the configured limit
//! - Hand each submission to the action caller
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::action::caller::{ActionCaller, CallArgs};
use crate::config::AppConfig;
use crate::http::response::error_response;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub caller: Arc<ActionCaller>,
    pub max_body_bytes: usize,
}

/// HTTP server exposing the action caller.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &AppConfig, caller: Arc<ActionCaller>) -> Self {
        let state = AppState {
            caller,
            max_body_bytes: config.listener.max_body_bytes,
        };

        let router = Self::build_router(config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route("/", post(action_handler))
            .route("/{*path}", post(action_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// A clone of the fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn into_router(self) -> Router {
        self.router
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Reads the form body and dispatches it to the action caller.
async fn action_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Rejected form body");
            return error_response(StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large", e);
        }
    };

    let path = parts.uri.path().to_string();
    let request = Request::from_parts(parts, bytes);

    match state.caller.call(CallArgs::new(request)).await {
        Ok(value) => Json(value).into_response(),
        Err(e) => {
            let status = e.status_code();
            if status.is_server_error() {
                tracing::error!(
                    request_id = %request_id,
                    path = %path,
                    kind = e.kind(),
                    error = %e,
                    "Action failed"
                );
            } else {
                tracing::debug!(
                    request_id = %request_id,
                    path = %path,
                    kind = e.kind(),
                    error = %e,
                    "Action rejected"
                );
            }
            e.into_response()
        }
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
