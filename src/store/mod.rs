//! Route store subsystem.
//!
//! # States
//! - Uninitialized: no manifest loaded yet, or reset
//! - Initialized: a filtered manifest is published
//!
//! # State Transitions
//! ```text
//! Uninitialized → Initialized: load()
//! Initialized → Uninitialized: reset()
//! Initialized → Initialized: load() in development (re-reads the artifact)
//! Initialized → Initialized: load() elsewhere (cached, no read)
//! ```
//!
//! # Design Decisions
//! - Explicit store object shared via Arc, no process global
//! - Snapshots are immutable and swapped atomically
//! - Reloads are serialized so racing loaders read the artifact once

pub mod environment;
pub mod route_store;

pub use environment::Environment;
pub use route_store::{ActionStore, RouteLoader, RouteStore, StoreState};
