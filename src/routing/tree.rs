//! Flat manifest to nested route tree.
//!
//! # Design Decisions
//! - One grouping pass by parent id, then recursive materialization
//! - The manifest is only read; nodes own clones of the records
//! - Parent cycles are rejected up front so materialization always ends
//! - Records with a missing parent are skipped with a warning

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::manifest::record::{RouteManifest, RouteRecord};

/// A route with its children embedded.
#[derive(Debug, Clone)]
pub struct RouteTreeNode {
    pub route: RouteRecord,
    pub children: Vec<RouteTreeNode>,
}

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Route {id} is part of a parent cycle")]
    ParentCycle { id: String },
}

/// Build the tree of root-level routes.
pub fn build_route_tree(manifest: &RouteManifest) -> Result<Vec<RouteTreeNode>, TreeError> {
    build_subtree(manifest, None)
}

/// Build the nodes whose parent is `parent_id` (root-level when `None`).
pub fn build_subtree(
    manifest: &RouteManifest,
    parent_id: Option<&str>,
) -> Result<Vec<RouteTreeNode>, TreeError> {
    ensure_acyclic(manifest)?;

    let mut children: HashMap<Option<&str>, Vec<&RouteRecord>> = HashMap::new();
    for record in manifest {
        if let Some(parent) = record.parent_id.as_deref() {
            if !manifest.contains(parent) {
                tracing::warn!(
                    route_id = %record.id,
                    parent_id = %parent,
                    "Route parent missing from manifest, skipping"
                );
            }
        }
        children
            .entry(record.parent_id.as_deref())
            .or_default()
            .push(record);
    }

    Ok(materialize(&children, parent_id))
}

fn materialize(
    children: &HashMap<Option<&str>, Vec<&RouteRecord>>,
    parent_id: Option<&str>,
) -> Vec<RouteTreeNode> {
    children
        .get(&parent_id)
        .map(|records| {
            records
                .iter()
                .map(|record| RouteTreeNode {
                    route: (*record).clone(),
                    children: materialize(children, Some(record.id.as_str())),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn ensure_acyclic(manifest: &RouteManifest) -> Result<(), TreeError> {
    for record in manifest {
        let mut seen = HashSet::from([record.id.as_str()]);
        let mut cursor = record.parent_id.as_deref();
        while let Some(parent) = cursor {
            if !seen.insert(parent) {
                return Err(TreeError::ParentCycle {
                    id: record.id.clone(),
                });
            }
            cursor = manifest.get(parent).and_then(|p| p.parent_id.as_deref());
        }
    }
    Ok(())
}
