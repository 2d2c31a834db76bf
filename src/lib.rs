//! Form action dispatch over a nested route manifest.

pub mod action;
pub mod config;
pub mod http;
pub mod manifest;
pub mod observability;
pub mod routing;
pub mod store;

pub use action::{ActionArgs, ActionCaller, ActionCallerConfig, ActionError, CallArgs};
pub use config::AppConfig;
pub use http::HttpServer;
pub use manifest::{RouteManifest, RouteRecord};
pub use store::{Environment, RouteStore};
