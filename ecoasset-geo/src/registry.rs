//! Geohash prefix-tree registry.
//!
//! Every identifier indexed under a geohash `H` is also stored at each
//! non-empty prefix of `H`, so a lookup at any coarser cell returns the
//! identifiers of everything inside it without walking children. Each node
//! keeps identifiers in insertion order, backed by a hash set for O(1)
//! membership checks.
//!
//! ```text
//!   "g"        [22, 33, 44]
//!   "gc"       [22, 33, 44]
//!   ...
//!   "gc7j98"   [22, 33, 44]
//!   "gc7j98f"  [22, 33]        "gc7j98k"  [44]
//!   "gc7j98fg" [22]            "gc7j98k3" [44]
//!   "gc7j98fj" [33]
//! ```
//!
//! Nodes are created lazily and kept when they become empty; call
//! [`GeohashRegistry::prune_empty`] to drop them explicitly.

use crate::error::{GeoError, Result};
use crate::geohash::Geohash;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Identifiers stored at one geohash prefix.
#[derive(Debug, Clone, Default)]
struct Node {
    ids: Vec<u64>,
    members: FxHashSet<u64>,
}

impl Node {
    fn insert(&mut self, id: u64) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    fn remove(&mut self, id: u64) -> bool {
        if !self.members.remove(&id) {
            return false;
        }
        if let Some(pos) = self.ids.iter().position(|&x| x == id) {
            self.ids.remove(pos);
        }
        true
    }
}

/// A registry mutation, replayable against any registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RegistryEvent {
    Add { geohash: Geohash, id: u64 },
    Remove { geohash: Geohash, id: u64 },
    Update { from: Geohash, to: Geohash, id: u64 },
}

/// Serializable registry contents: prefix → identifiers in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub nodes: BTreeMap<String, Vec<u64>>,
}

/// Geohash prefix index from cells to identifiers.
#[derive(Debug, Clone, Default)]
pub struct GeohashRegistry {
    nodes: FxHashMap<String, Node>,
}

impl GeohashRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `id` under `geohash` and all of its prefixes. Adding an id that
    /// is already present is a no-op.
    pub fn add(&mut self, geohash: impl AsRef<str>, id: u64) -> Result<()> {
        let hash = Geohash::parse(geohash.as_ref())?;
        self.insert_hash(&hash, id);
        Ok(())
    }

    /// Remove `id` from `geohash` and from every prefix of it, regardless of
    /// whether the id is still indexed under a sibling cell. Returns whether
    /// the id was present at `geohash` itself; absent ids are a no-op.
    pub fn remove(&mut self, geohash: impl AsRef<str>, id: u64) -> Result<bool> {
        let hash = Geohash::parse(geohash.as_ref())?;
        Ok(self.remove_hash(&hash, id))
    }

    /// Move `id` from `from` to `to`. Both keys are validated before
    /// anything changes.
    pub fn update(&mut self, from: impl AsRef<str>, to: impl AsRef<str>, id: u64) -> Result<()> {
        let from = Geohash::parse(from.as_ref())?;
        let to = Geohash::parse(to.as_ref())?;
        self.remove_hash(&from, id);
        self.insert_hash(&to, id);
        debug!(%from, %to, id, "registry update");
        Ok(())
    }

    /// Replay a single event.
    pub fn apply(&mut self, event: &RegistryEvent) {
        match event {
            RegistryEvent::Add { geohash, id } => self.insert_hash(geohash, *id),
            RegistryEvent::Remove { geohash, id } => {
                self.remove_hash(geohash, *id);
            }
            RegistryEvent::Update { from, to, id } => {
                self.remove_hash(from, *id);
                self.insert_hash(to, *id);
            }
        }
    }

    /// Identifiers at `geohash`, in insertion order. Unknown or malformed
    /// keys yield an empty slice.
    pub fn ids(&self, geohash: &str) -> &[u64] {
        self.nodes
            .get(geohash)
            .map(|n| n.ids.as_slice())
            .unwrap_or(&[])
    }

    /// Owned copy of [`ids`](Self::ids).
    pub fn get(&self, geohash: &str) -> Vec<u64> {
        self.ids(geohash).to_vec()
    }

    /// Check whether `id` is indexed at `geohash`.
    pub fn contains(&self, geohash: &str, id: u64) -> bool {
        self.nodes
            .get(geohash)
            .is_some_and(|n| n.members.contains(&id))
    }

    /// Union of the identifiers at several cells, first occurrence wins.
    pub fn get_many<I, S>(&self, cells: I) -> Vec<u64>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        for cell in cells {
            for &id in self.ids(cell.as_ref()) {
                if seen.insert(id) {
                    out.push(id);
                }
            }
        }
        out
    }

    /// Number of prefix nodes, empty ones included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// True if no identifier is indexed anywhere.
    pub fn is_empty(&self) -> bool {
        self.nodes.values().all(|n| n.ids.is_empty())
    }

    /// Drop nodes with no identifiers. Returns how many were removed.
    pub fn prune_empty(&mut self) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|_, n| !n.ids.is_empty());
        let pruned = before - self.nodes.len();
        debug!(pruned, "pruned empty registry nodes");
        pruned
    }

    /// Capture the registry contents.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            nodes: self
                .nodes
                .iter()
                .map(|(k, n)| (k.clone(), n.ids.clone()))
                .collect(),
        }
    }

    /// Rebuild a registry from a snapshot.
    ///
    /// Every key must be a valid geohash, ids must be unique within a node,
    /// and every id stored at a key must also be stored at all of its
    /// prefixes.
    pub fn from_snapshot(snapshot: RegistrySnapshot) -> Result<Self> {
        let mut nodes = FxHashMap::default();
        for (key, ids) in &snapshot.nodes {
            Geohash::parse(key)?;
            let mut node = Node::default();
            for &id in ids {
                if !node.insert(id) {
                    return Err(GeoError::InvalidSnapshot(format!(
                        "id {id} listed twice at '{key}'"
                    )));
                }
            }
            nodes.insert(key.clone(), node);
        }

        for (key, node) in &nodes {
            for end in 1..key.len() {
                let prefix = &key[..end];
                let parent = nodes.get(prefix);
                if let Some(&id) = node
                    .ids
                    .iter()
                    .find(|&&id| !parent.is_some_and(|p| p.members.contains(&id)))
                {
                    return Err(GeoError::InvalidSnapshot(format!(
                        "id {id} at '{key}' missing from prefix '{prefix}'"
                    )));
                }
            }
        }

        Ok(Self { nodes })
    }

    fn insert_hash(&mut self, hash: &Geohash, id: u64) {
        for prefix in hash.prefixes() {
            let node = self.nodes.entry(prefix.to_string()).or_default();
            if node.insert(id) {
                trace!(prefix, id, "id indexed at prefix");
            }
        }
        debug!(geohash = %hash, id, "registry add");
    }

    fn remove_hash(&mut self, hash: &Geohash, id: u64) -> bool {
        let mut present = false;
        for prefix in hash.prefixes() {
            if let Some(node) = self.nodes.get_mut(prefix) {
                if node.remove(id) {
                    trace!(prefix, id, "id removed from prefix");
                    present = prefix.len() == hash.as_str().len();
                }
            }
        }
        debug!(geohash = %hash, id, present, "registry remove");
        present
    }
}

/// Thread-safe handle to a [`GeohashRegistry`].
///
/// Each mutation holds the write lock for all of its prefix updates, so
/// readers never observe a half-applied add, remove or update.
#[derive(Debug, Clone, Default)]
pub struct SharedGeohashRegistry {
    inner: Arc<RwLock<GeohashRegistry>>,
}

impl SharedGeohashRegistry {
    /// Create an empty shared registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing registry.
    pub fn from_registry(registry: GeohashRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    pub fn add(&self, geohash: impl AsRef<str>, id: u64) -> Result<()> {
        self.inner.write().add(geohash, id)
    }

    pub fn remove(&self, geohash: impl AsRef<str>, id: u64) -> Result<bool> {
        self.inner.write().remove(geohash, id)
    }

    pub fn update(&self, from: impl AsRef<str>, to: impl AsRef<str>, id: u64) -> Result<()> {
        self.inner.write().update(from, to, id)
    }

    pub fn apply(&self, event: &RegistryEvent) {
        self.inner.write().apply(event)
    }

    pub fn get(&self, geohash: &str) -> Vec<u64> {
        self.inner.read().get(geohash)
    }

    pub fn get_many<I, S>(&self, cells: I) -> Vec<u64>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.inner.read().get_many(cells)
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        self.inner.read().snapshot()
    }

    /// Read access for several lookups under one lock.
    pub fn read(&self) -> RwLockReadGuard<'_, GeohashRegistry> {
        self.inner.read()
    }

    /// Write access for several mutations under one lock.
    pub fn write(&self) -> RwLockWriteGuard<'_, GeohashRegistry> {
        self.inner.write()
    }
}
