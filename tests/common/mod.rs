//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use action_router::action::{ActionArgs, ActionCaller, HandlerResult, SharedHandler};
use action_router::manifest::{
    BuildManifest, ManifestError, ManifestProvider, RouteManifest, RouteRecord,
    StaticManifestProvider,
};
use action_router::store::{Environment, RouteStore};
use axum::body::Bytes;
use axum::http::{header, Request};
use serde_json::json;

/// Handler that answers with its own route id and counts invocations.
pub fn tagged(id: &str, calls: Arc<AtomicUsize>) -> SharedHandler {
    let id = id.to_string();
    Arc::new(move |args: ActionArgs| {
        let id = id.clone();
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            let result: HandlerResult = Ok(json!({
                "route": id,
                "route_params": args.route_params,
            }));
            result
        }
    })
}

/// Route whose handler reports its id.
pub fn route(id: &str, parent: Option<&str>, path: Option<&str>) -> RouteRecord {
    let mut record = RouteRecord::new(id, tagged(id, Arc::new(AtomicUsize::new(0))));
    record.parent_id = parent.map(str::to_string);
    record.path = path.map(str::to_string);
    record
}

pub fn index_route(id: &str, parent: &str) -> RouteRecord {
    route(id, Some(parent), None).with_index(true)
}

/// The application root as the build emits it.
pub fn root() -> RouteRecord {
    route("root", None, Some(""))
}

pub fn manifest(records: Vec<RouteRecord>) -> RouteManifest {
    records.into_iter().collect()
}

/// Caller over a production store with a compiled-in manifest.
pub fn caller_for(records: Vec<RouteRecord>) -> ActionCaller {
    let provider = Arc::new(StaticManifestProvider::new(manifest(records)));
    let store = Arc::new(RouteStore::new(provider, Environment::Production));
    ActionCaller::new(store)
}

/// Urlencoded POST to `uri` carrying `fields`.
pub fn form_request(uri: &str, fields: &[(&str, &str)]) -> Request<Bytes> {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish();

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::HOST, "localhost")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Bytes::from(body))
        .unwrap()
}

/// Multipart POST to `uri` with one text part per field.
pub fn multipart_request(uri: &str, fields: &[(&str, &str)]) -> Request<Bytes> {
    const BOUNDARY: &str = "action-router-boundary";

    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::HOST, "localhost")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Bytes::from(body))
        .unwrap()
}

/// Route id the tagged handler answered with.
pub fn route_of(value: &serde_json::Value) -> &str {
    value["route"].as_str().unwrap()
}

/// Provider whose manifest can be swapped between loads, counting reads.
#[derive(Default)]
pub struct MutableProvider {
    routes: Mutex<RouteManifest>,
    reads: AtomicUsize,
}

impl MutableProvider {
    pub fn new(routes: RouteManifest) -> Self {
        Self {
            routes: Mutex::new(routes),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn set(&self, routes: RouteManifest) {
        *self.routes.lock().unwrap() = routes;
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl ManifestProvider for MutableProvider {
    fn provide(&self) -> Result<BuildManifest, ManifestError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(BuildManifest {
            routes: self.routes.lock().unwrap().clone(),
        })
    }
}

/// Provider that always fails to read its artifact.
pub struct FailingProvider;

impl ManifestProvider for FailingProvider {
    fn provide(&self) -> Result<BuildManifest, ManifestError> {
        Err(ManifestError::Io {
            path: "build/manifest.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        })
    }
}
