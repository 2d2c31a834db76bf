//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::action::caller::{ActionCallerConfig, DEFAULT_ACTION_FIELD};
use crate::manifest::filter::ACTIONS_NAMESPACE;
use crate::store::environment::Environment;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Execution environment. `development` re-reads the manifest on every call.
    pub environment: Environment,

    /// Action field and namespace.
    pub actions: ActionsConfig,

    /// Build manifest location.
    pub manifest: ManifestConfig,

    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Action dispatch settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ActionsConfig {
    /// Form field naming the action.
    pub field_name: String,

    /// Route namespace reserved for actions (`routes/<namespace>...`).
    pub namespace: String,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            field_name: DEFAULT_ACTION_FIELD.to_string(),
            namespace: ACTIONS_NAMESPACE.to_string(),
        }
    }
}

impl ActionsConfig {
    pub fn caller_config(&self) -> ActionCallerConfig {
        ActionCallerConfig {
            action_field_name: self.field_name.clone(),
            actions_namespace: self.namespace.clone(),
        }
    }
}

/// Build manifest settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Path to the JSON build artifact.
    pub path: PathBuf,

    /// Watch the artifact and reload it on change.
    pub watch: bool,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("build/manifest.json"),
            watch: false,
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Largest accepted form body.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
