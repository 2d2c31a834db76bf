//! action-router
//!
//! Resolves form submissions to action route handlers.
//!
//! # Architecture Overview
//!
//! ```text
//!     POST /some/page  (_action=create)
//!     ──────────────────▶ http server ──▶ ActionCaller
//!                                             │
//!                          ┌──────────────────┼─────────────────────┐
//!                          ▼                  ▼                     ▼
//!                     RouteStore        route tree +          form parser
//!                  (manifest cache)     path matcher
//!                          │                  │
//!                          ▼                  ▼
//!                 manifest provider    index resolver ──▶ handler ──▶ JSON
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use action_router::action::ActionCaller;
use action_router::config::{load_config, validate_config, AppConfig, ConfigError};
use action_router::http::HttpServer;
use action_router::manifest::{
    FileManifestProvider, HandlerRegistry, ManifestProvider, WatchedManifestProvider,
};
use action_router::observability::{logging, metrics};
use action_router::store::{Environment, RouteStore};

#[derive(Parser, Debug)]
#[command(name = "action-router", version, about = "Form action dispatch server")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Build manifest to read routes from
    #[arg(short, long, value_name = "FILE")]
    manifest: Option<PathBuf>,

    /// Execution environment (development reloads routes on every call)
    #[arg(short, long, env = "ACTION_ROUTER_ENV")]
    env: Option<String>,

    /// Listener bind address
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(manifest) = cli.manifest {
        config.manifest.path = manifest;
    }
    if let Some(env) = cli.env {
        config.environment = Environment::from(env);
    }
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability)?;

    tracing::info!("action-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        environment = %config.environment,
        manifest = %config.manifest.path.display(),
        watch = config.manifest.watch,
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let source =
        FileManifestProvider::new(config.manifest.path.clone(), HandlerRegistry::with_builtins());
    let provider: Arc<dyn ManifestProvider> = if config.manifest.watch {
        Arc::new(WatchedManifestProvider::start(source)?)
    } else {
        Arc::new(source)
    };

    let store = Arc::new(
        RouteStore::new(provider, config.environment.clone())
            .with_namespace(config.actions.namespace.clone()),
    );

    // Outside development the first load is the only one, so fail fast.
    if !config.environment.is_development() {
        match store.load() {
            Ok(snapshot) => {
                tracing::info!(routes = snapshot.manifest.len(), "Action routes ready");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load action routes");
                return Err(e.into());
            }
        }
    }

    let caller = Arc::new(ActionCaller::new(store).with_config(config.actions.caller_config()));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(&config, caller);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
