//! Build artifact watcher.
//!
//! Keeps the last good manifest in memory and re-reads the artifact when the
//! file changes, so `provide()` never touches the disk on the request path.
//!
//! The watch sits on the artifact's directory, not the file. Build tools
//! that write a temp file and rename it over the artifact replace the inode,
//! which would end a watch placed on the file itself.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::manifest::provider::{
    BuildManifest, FileManifestProvider, ManifestError, ManifestProvider,
};

/// A file provider backed by a filesystem watch.
pub struct WatchedManifestProvider {
    current: Arc<ArcSwap<BuildManifest>>,
    // Dropping the watcher stops the watch.
    _watcher: RecommendedWatcher,
}

impl WatchedManifestProvider {
    /// Read the artifact once and start watching it.
    ///
    /// Fails if the initial read fails; later failed reloads keep the
    /// current manifest.
    pub fn start(source: FileManifestProvider) -> Result<Self, ManifestError> {
        let initial = source.provide()?;
        let current = Arc::new(ArcSwap::from_pointee(initial));

        let artifact = source.path().to_path_buf();
        let file_name = artifact
            .file_name()
            .map(OsStr::to_os_string)
            .ok_or_else(|| ManifestError::Io {
                path: artifact.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "build manifest path has no file name",
                ),
            })?;
        let dir = watch_dir(&artifact);

        let cell = current.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if is_artifact_change(&event, &file_name) {
                        reload(&source, &cell);
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Manifest watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::info!(
            path = %artifact.display(),
            dir = %dir.display(),
            "Build manifest watcher started"
        );

        Ok(Self {
            current,
            _watcher: watcher,
        })
    }

    /// The manifest as of the last successful read.
    pub fn current(&self) -> Arc<BuildManifest> {
        self.current.load_full()
    }
}

impl ManifestProvider for WatchedManifestProvider {
    fn provide(&self) -> Result<BuildManifest, ManifestError> {
        Ok(BuildManifest::clone(&self.current.load()))
    }
}

/// Directory holding the artifact; `.` for a bare file name.
fn watch_dir(artifact: &Path) -> PathBuf {
    match artifact.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// A create, write or rename-into event naming the artifact.
fn is_artifact_change(event: &Event, file_name: &OsString) -> bool {
    (event.kind.is_modify() || event.kind.is_create())
        && event
            .paths
            .iter()
            .any(|path| path.file_name() == Some(file_name.as_os_str()))
}

fn reload(source: &FileManifestProvider, cell: &ArcSwap<BuildManifest>) {
    tracing::info!(
        path = %source.path().display(),
        "Build manifest change detected, reloading"
    );
    match source.provide() {
        Ok(manifest) => {
            tracing::info!(routes = manifest.routes.len(), "Build manifest reloaded");
            cell.store(Arc::new(manifest));
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                "Failed to reload build manifest, keeping current routes"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Instant;

    use notify::event::{AccessKind, CreateKind, EventKind, ModifyKind, RenameMode};
    use serde_json::json;

    use crate::manifest::provider::HandlerRegistry;

    /// Artifact with `root` plus one echo route per action.
    fn routes_json(actions: &[&str]) -> String {
        let mut routes = serde_json::Map::new();
        routes.insert(
            "root".into(),
            json!({ "id": "root", "path": "", "handler": "echo" }),
        );
        for action in actions {
            let id = format!("routes/actions__/{action}");
            routes.insert(
                id.clone(),
                json!({
                    "id": id,
                    "parentId": "root",
                    "path": format!("actions__/{action}"),
                    "handler": "echo",
                }),
            );
        }
        json!({ "routes": routes }).to_string()
    }

    /// Write to a sibling temp file, then rename it over `path`.
    fn replace_by_rename(path: &Path, contents: &str) {
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, contents).unwrap();
        fs::rename(&tmp, path).unwrap();
    }

    fn wait_for_routes(provider: &WatchedManifestProvider, expected: usize) -> bool {
        let deadline = Instant::now() + Duration::from_secs(10);
        while Instant::now() < deadline {
            if provider.current().routes.len() == expected {
                return true;
            }
            std::thread::sleep(Duration::from_millis(50));
        }
        false
    }

    #[test]
    fn test_start_reads_initial_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        fs::write(&path, routes_json(&[])).unwrap();

        let provider = WatchedManifestProvider::start(FileManifestProvider::new(
            &path,
            HandlerRegistry::with_builtins(),
        ))
        .unwrap();

        assert_eq!(provider.current().routes.len(), 1);
        assert!(provider.provide().unwrap().routes.contains("root"));
    }

    #[test]
    fn test_start_fails_without_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let source =
            FileManifestProvider::new(dir.path().join("manifest.json"), HandlerRegistry::new());

        assert!(matches!(
            WatchedManifestProvider::start(source),
            Err(ManifestError::Io { .. })
        ));
    }

    #[test]
    fn test_artifact_change_filter() {
        let name = OsString::from("manifest.json");
        let artifact = PathBuf::from("/srv/build/manifest.json");

        let renamed_in = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::To)))
            .add_path(artifact.clone());
        let created = Event::new(EventKind::Create(CreateKind::File)).add_path(artifact.clone());
        let sibling = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/srv/build/manifest.json.tmp"));
        let read = Event::new(EventKind::Access(AccessKind::Read)).add_path(artifact);

        assert!(is_artifact_change(&renamed_in, &name));
        assert!(is_artifact_change(&created, &name));
        assert!(!is_artifact_change(&sibling, &name));
        assert!(!is_artifact_change(&read, &name));
    }

    #[test]
    fn test_watch_dir_of_bare_file_name() {
        assert_eq!(watch_dir(Path::new("manifest.json")), PathBuf::from("."));
        assert_eq!(watch_dir(Path::new("build/manifest.json")), PathBuf::from("build"));
    }

    #[test]
    fn test_reloads_across_rename_replacements() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        fs::write(&path, routes_json(&[])).unwrap();

        let provider = WatchedManifestProvider::start(FileManifestProvider::new(
            &path,
            HandlerRegistry::with_builtins(),
        ))
        .unwrap();
        assert_eq!(provider.current().routes.len(), 1);

        replace_by_rename(&path, &routes_json(&["create"]));
        assert!(wait_for_routes(&provider, 2), "first rename was not picked up");

        replace_by_rename(&path, &routes_json(&["create", "delete"]));
        assert!(wait_for_routes(&provider, 3), "second rename was not picked up");
    }
}
