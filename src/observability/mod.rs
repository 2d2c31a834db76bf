//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields (route_id, action, path) instead of formatted strings
//! - Request ID is set by the HTTP layer and carried by its spans
//! - Metric updates are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
