//! Flat route records and the manifest that holds them.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::action::handler::SharedHandler;

/// Id of the top-level route.
pub const ROOT_ROUTE_ID: &str = "root";

/// Id suffix that marks an index route.
pub const INDEX_ROUTE_SUFFIX: &str = "/index";

/// One route of the flat manifest.
#[derive(Clone)]
pub struct RouteRecord {
    /// Unique route id, e.g. `routes/actions__/item/create`.
    pub id: String,
    /// Id of the parent route. `None` for root-level routes.
    pub parent_id: Option<String>,
    /// Path pattern relative to the parent. `None` for index and layout routes.
    pub path: Option<String>,
    pub index: bool,
    pub case_sensitive: bool,
    pub handler: SharedHandler,
}

impl RouteRecord {
    pub fn new(id: impl Into<String>, handler: SharedHandler) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            path: None,
            index: false,
            case_sensitive: false,
            handler,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_index(mut self, index: bool) -> Self {
        self.index = index;
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// True when the id carries the `/index` suffix.
    pub fn is_index_id(&self) -> bool {
        self.id.ends_with(INDEX_ROUTE_SUFFIX)
    }
}

impl fmt::Debug for RouteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteRecord")
            .field("id", &self.id)
            .field("parent_id", &self.parent_id)
            .field("path", &self.path)
            .field("index", &self.index)
            .field("case_sensitive", &self.case_sensitive)
            .finish_non_exhaustive()
    }
}

// Handlers compare by identity.
impl PartialEq for RouteRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.parent_id == other.parent_id
            && self.path == other.path
            && self.index == other.index
            && self.case_sensitive == other.case_sensitive
            && Arc::ptr_eq(&self.handler, &other.handler)
    }
}

/// Route records keyed by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteManifest {
    routes: BTreeMap<String, RouteRecord>,
}

impl RouteManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any record with the same id.
    pub fn insert(&mut self, record: RouteRecord) -> Option<RouteRecord> {
        self.routes.insert(record.id.clone(), record)
    }

    pub fn get(&self, id: &str) -> Option<&RouteRecord> {
        self.routes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.routes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteRecord> {
        self.routes.values()
    }
}

impl FromIterator<RouteRecord> for RouteManifest {
    fn from_iter<I: IntoIterator<Item = RouteRecord>>(iter: I) -> Self {
        let mut manifest = RouteManifest::new();
        for record in iter {
            manifest.insert(record);
        }
        manifest
    }
}

impl IntoIterator for RouteManifest {
    type Item = RouteRecord;
    type IntoIter = btree_map::IntoValues<String, RouteRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.into_values()
    }
}

impl<'a> IntoIterator for &'a RouteManifest {
    type Item = &'a RouteRecord;
    type IntoIter = btree_map::Values<'a, String, RouteRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::handler::{ActionArgs, HandlerError};

    fn noop() -> SharedHandler {
        Arc::new(|_args: ActionArgs| async { Ok::<_, HandlerError>(serde_json::Value::Null) })
    }

    #[test]
    fn test_insert_replaces_same_id() {
        let mut manifest = RouteManifest::new();
        manifest.insert(RouteRecord::new("root", noop()).with_path(""));
        let previous = manifest.insert(RouteRecord::new("root", noop()).with_path("app"));

        assert_eq!(manifest.len(), 1);
        assert_eq!(previous.and_then(|r| r.path), Some(String::new()));
        assert_eq!(manifest.get("root").and_then(|r| r.path.as_deref()), Some("app"));
    }

    #[test]
    fn test_index_suffix() {
        let index = RouteRecord::new("routes/actions__/item/index", noop()).with_index(true);
        let leaf = RouteRecord::new("routes/actions__/reindex", noop());

        assert!(index.is_index_id());
        assert!(!leaf.is_index_id());
    }

    #[test]
    fn test_equality_uses_handler_identity() {
        let handler = noop();
        let a = RouteRecord::new("root", handler.clone());
        let b = RouteRecord::new("root", handler);
        let c = RouteRecord::new("root", noop());

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
