//! Manifest providers.
//!
//! # Responsibilities
//! - Produce `{ routes }` from the build artifact on demand
//! - Resolve each route's handler name against a registry
//! - Report unreadable or malformed artifacts as errors, never defaults
//!
//! # Artifact Format
//! ```text
//! {
//!   "routes": {
//!     "root": { "id": "root", "path": "" },
//!     "routes/actions__/item": {
//!       "id": "routes/actions__/item",
//!       "parentId": "root",
//!       "path": "actions__/item",
//!       "handler": "echo"
//!     }
//!   }
//! }
//! ```
//! `handler` defaults to the route id when omitted.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::action::handler::{echo_handler, ActionHandler, SharedHandler};
use crate::manifest::record::{RouteManifest, RouteRecord};

/// Name under which the built-in echo handler is registered.
pub const ECHO_HANDLER: &str = "echo";

/// Output of the build step.
#[derive(Debug, Clone, Default)]
pub struct BuildManifest {
    pub routes: RouteManifest,
}

/// Errors raised while obtaining a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read build manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse build manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Route {route_id} references unknown handler {handler}")]
    UnknownHandler { route_id: String, handler: String },

    #[error("Route key {key} does not match route id {id}")]
    IdMismatch { key: String, id: String },

    #[error("Manifest watch error: {0}")]
    Watch(#[from] notify::Error),
}

/// Source of the full (unfiltered) route manifest.
pub trait ManifestProvider: Send + Sync {
    fn provide(&self) -> Result<BuildManifest, ManifestError>;
}

/// Provider for a manifest compiled into the binary or built in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticManifestProvider {
    manifest: BuildManifest,
}

impl StaticManifestProvider {
    pub fn new(routes: RouteManifest) -> Self {
        Self {
            manifest: BuildManifest { routes },
        }
    }
}

impl ManifestProvider for StaticManifestProvider {
    fn provide(&self) -> Result<BuildManifest, ManifestError> {
        Ok(self.manifest.clone())
    }
}

/// Handlers available to file-based manifests, keyed by name.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, SharedHandler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the `echo` handler.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(ECHO_HANDLER, echo_handler);
        registry
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: impl ActionHandler + 'static,
    ) -> &mut Self {
        self.register_shared(name, Arc::new(handler))
    }

    pub fn register_shared(
        &mut self,
        name: impl Into<String>,
        handler: SharedHandler,
    ) -> &mut Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    pub fn get(&self, name: &str) -> Option<SharedHandler> {
        self.handlers.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("HandlerRegistry").field("handlers", &names).finish()
    }
}

#[derive(Debug, Deserialize)]
struct RawBuild {
    #[serde(default)]
    routes: BTreeMap<String, RawRoute>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRoute {
    id: String,
    #[serde(default)]
    parent_id: Option<String>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    index: Option<bool>,
    #[serde(default)]
    case_sensitive: Option<bool>,
    #[serde(default)]
    handler: Option<String>,
}

/// Reads the JSON build artifact from disk on every call.
#[derive(Debug, Clone)]
pub struct FileManifestProvider {
    path: PathBuf,
    registry: HandlerRegistry,
}

impl FileManifestProvider {
    pub fn new(path: impl Into<PathBuf>, registry: HandlerRegistry) -> Self {
        Self {
            path: path.into(),
            registry,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse artifact contents, binding handlers from the registry.
    pub fn parse(&self, contents: &str) -> Result<BuildManifest, ManifestError> {
        let raw: RawBuild = serde_json::from_str(contents).map_err(|source| ManifestError::Parse {
            path: self.path.clone(),
            source,
        })?;

        let mut routes = RouteManifest::new();
        for (key, route) in raw.routes {
            if key != route.id {
                return Err(ManifestError::IdMismatch { key, id: route.id });
            }

            let handler_name = route.handler.as_deref().unwrap_or(&route.id);
            let handler = self
                .registry
                .get(handler_name)
                .ok_or_else(|| ManifestError::UnknownHandler {
                    route_id: route.id.clone(),
                    handler: handler_name.to_string(),
                })?;

            routes.insert(RouteRecord {
                id: route.id,
                parent_id: route.parent_id,
                path: route.path,
                index: route.index.unwrap_or(false),
                case_sensitive: route.case_sensitive.unwrap_or(false),
                handler,
            });
        }

        Ok(BuildManifest { routes })
    }
}

impl ManifestProvider for FileManifestProvider {
    fn provide(&self) -> Result<BuildManifest, ManifestError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| ManifestError::Io {
            path: self.path.clone(),
            source,
        })?;
        let manifest = self.parse(&contents)?;
        tracing::debug!(
            path = %self.path.display(),
            routes = manifest.routes.len(),
            "Build manifest read"
        );
        Ok(manifest)
    }
}
