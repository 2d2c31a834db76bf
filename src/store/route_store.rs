//! Process-wide cache of action routes.
//!
//! # Responsibilities
//! - Hold the filtered manifest between requests
//! - Decide between reuse and reload on every `load()`
//! - Let operators and tests force a reload with `reset()`
//!
//! # Design Decisions
//! - Readers get an `Arc<ActionStore>` snapshot, never a partial manifest
//! - The fast path is lock-free (`ArcSwap`); only reloads take the mutex
//! - A failed reload leaves the previous snapshot published

use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;

use crate::manifest::filter::{filter_routes_in, ACTIONS_NAMESPACE};
use crate::manifest::provider::{ManifestError, ManifestProvider};
use crate::manifest::record::RouteManifest;
use crate::observability::metrics;
use crate::store::environment::Environment;

/// Lifecycle flag of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Uninitialized,
    Initialized,
}

/// An immutable snapshot of the store.
#[derive(Debug, Clone)]
pub struct ActionStore {
    pub manifest: RouteManifest,
    pub state: StoreState,
}

impl ActionStore {
    pub fn uninitialized() -> Self {
        Self {
            manifest: RouteManifest::new(),
            state: StoreState::Uninitialized,
        }
    }

    pub fn initialized(manifest: RouteManifest) -> Self {
        Self {
            manifest,
            state: StoreState::Initialized,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.state == StoreState::Initialized
    }
}

/// Something that hands out action route snapshots.
pub trait RouteLoader: Send + Sync {
    fn load_routes(&self) -> Result<Arc<ActionStore>, ManifestError>;
}

/// Caches the filtered manifest with an environment-dependent reload policy.
pub struct RouteStore {
    provider: Arc<dyn ManifestProvider>,
    environment: Environment,
    namespace: String,
    current: ArcSwap<ActionStore>,
    reload: Mutex<()>,
}

impl RouteStore {
    /// Create an uninitialized store.
    pub fn new(provider: Arc<dyn ManifestProvider>, environment: Environment) -> Self {
        Self {
            provider,
            environment,
            namespace: ACTIONS_NAMESPACE.to_string(),
            current: ArcSwap::from_pointee(ActionStore::uninitialized()),
            reload: Mutex::new(()),
        }
    }

    /// Use a different actions namespace when filtering.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Current snapshot without triggering a load.
    pub fn snapshot(&self) -> Arc<ActionStore> {
        self.current.load_full()
    }

    pub fn state(&self) -> StoreState {
        self.current.load().state
    }

    /// Return the cached snapshot, or read the artifact when the store is
    /// uninitialized or running in development.
    pub fn load(&self) -> Result<Arc<ActionStore>, ManifestError> {
        if let Some(store) = self.cached() {
            metrics::record_store_load("cache");
            return Ok(store);
        }

        let _guard = self.reload.lock().unwrap_or_else(PoisonError::into_inner);

        // Another loader may have finished while we waited.
        if let Some(store) = self.cached() {
            metrics::record_store_load("cache");
            return Ok(store);
        }

        let build = self.provider.provide()?;
        let manifest = filter_routes_in(build.routes, &self.namespace);
        let store = Arc::new(ActionStore::initialized(manifest));
        self.current.store(store.clone());

        metrics::record_store_load("provider");
        tracing::debug!(
            environment = %self.environment,
            routes = store.manifest.len(),
            "Action routes loaded"
        );

        Ok(store)
    }

    /// Drop the cached manifest. The next `load()` reads the artifact.
    pub fn reset(&self) {
        let _guard = self.reload.lock().unwrap_or_else(PoisonError::into_inner);
        self.current.store(Arc::new(ActionStore::uninitialized()));
        tracing::debug!("Action route store reset");
    }

    fn cached(&self) -> Option<Arc<ActionStore>> {
        if self.environment.is_development() {
            return None;
        }
        let store = self.current.load_full();
        store.is_initialized().then_some(store)
    }
}

impl RouteLoader for RouteStore {
    fn load_routes(&self) -> Result<Arc<ActionStore>, ManifestError> {
        self.load()
    }
}

impl std::fmt::Debug for RouteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteStore")
            .field("environment", &self.environment)
            .field("namespace", &self.namespace)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
