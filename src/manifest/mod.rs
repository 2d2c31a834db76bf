//! Route manifest subsystem.
//!
//! # Data Flow
//! ```text
//! build artifact (JSON)
//!     → provider.rs (read, bind handlers by name)
//!     → BuildManifest { routes }
//!     → filter.rs (root + routes/actions__*)
//!     → RouteManifest held by the route store
//!
//! With watching enabled:
//!     watcher.rs detects change
//!     → provider.rs re-reads the artifact
//!     → atomic swap of the cached BuildManifest
//! ```
//!
//! # Design Decisions
//! - Records are immutable once loaded; a reload replaces the whole map
//! - Handlers are resolved at load time, so a bad handler name fails the load
//! - Parent links are plain ids, the tree is rebuilt per resolution

pub mod filter;
pub mod provider;
pub mod record;
pub mod watcher;

pub use filter::{filter_action_routes, filter_routes_in, ACTIONS_NAMESPACE, ACTION_ROUTE_PREFIX};
pub use provider::{
    BuildManifest, FileManifestProvider, HandlerRegistry, ManifestError, ManifestProvider,
    StaticManifestProvider,
};
pub use record::{RouteManifest, RouteRecord, INDEX_ROUTE_SUFFIX, ROOT_ROUTE_ID};
pub use watcher::WatchedManifestProvider;
