//! Storage-client configuration with provenance tracking.
//!
//! `StorageConf` is the key/value mapping handed to the storage layer. Next
//! to the values it keeps a provenance map recording the [`ValueOrigin`]
//! that set each key. The provenance map is the mutable hotspot of this
//! type: it is written on every `set` and lazily on reads served from the
//! builtin defaults table, so a conf that will be shared across worker
//! threads must first go through [`super::sync::harden`], which swaps the
//! plain backing map for a lock-synchronized one.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Where a configuration value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueOrigin {
    /// Injected from process environment variables.
    Environment,
    /// Copied out of the runtime's process configuration.
    ProcessConfig,
    /// Materialized from the builtin defaults table on first read.
    BuiltinDefault,
    /// Set programmatically at runtime.
    Runtime,
}

/// Storage-client defaults served when a key was never set explicitly.
/// Reads answered from this table record `BuiltinDefault` provenance lazily,
/// which is the read-triggered mutation `harden` exists for.
pub(crate) const BUILTIN_DEFAULTS: &[(&str, &str)] = &[
    ("io.file.buffer.size", "65536"),
    ("fs.defaultFS", "file:///"),
    ("io.bytes.per.checksum", "512"),
];

/// Backing store for the provenance map.
///
/// `Plain` is the single-owner build phase: writes go through `&mut self`
/// and a shared reference cannot record anything. `Synced` is installed by
/// the hardening pass and accepts provenance records from any thread.
pub(crate) enum ProvenanceMap {
    Plain(HashMap<String, ValueOrigin>),
    Synced(RwLock<HashMap<String, ValueOrigin>>),
}

impl Clone for ProvenanceMap {
    fn clone(&self) -> Self {
        match self {
            ProvenanceMap::Plain(m) => ProvenanceMap::Plain(m.clone()),
            ProvenanceMap::Synced(l) => ProvenanceMap::Synced(RwLock::new(l.read().clone())),
        }
    }
}

impl std::fmt::Debug for ProvenanceMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProvenanceMap::Plain(m) => f.debug_tuple("Plain").field(&m.len()).finish(),
            ProvenanceMap::Synced(l) => f.debug_tuple("Synced").field(&l.read().len()).finish(),
        }
    }
}

/// Mutable configuration for the storage/cluster client.
///
/// Built single-threaded (all writes take `&mut self`), then passed through
/// [`super::sync::harden`] before being retained anywhere multiple threads
/// can see it. Cloning is a deep copy; clones never share state.
#[derive(Debug)]
pub struct StorageConf {
    entries: HashMap<String, String>,
    provenance: ProvenanceMap,
}

impl StorageConf {
    pub fn new() -> Self {
        Self { entries: HashMap::new(), provenance: ProvenanceMap::Plain(HashMap::new()) }
    }

    /// Set `key` to `value` with `Runtime` provenance.
    pub fn set(&mut self, key: &str, value: &str) {
        self.set_from(key, value, ValueOrigin::Runtime)
    }

    /// Set `key` to `value`, recording where the value came from.
    pub fn set_from(&mut self, key: &str, value: &str, origin: ValueOrigin) {
        self.entries.insert(key.to_string(), value.to_string());
        match &mut self.provenance {
            ProvenanceMap::Plain(m) => {
                m.insert(key.to_string(), origin);
            }
            ProvenanceMap::Synced(l) => {
                l.write().insert(key.to_string(), origin);
            }
        }
    }

    /// Look up `key`, falling back to the builtin defaults table.
    ///
    /// A read served from the defaults table lazily records
    /// `BuiltinDefault` provenance. On an unhardened conf the record is
    /// skipped: the plain map cannot be written through `&self`.
    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(v) = self.entries.get(key) {
            return Some(v.clone());
        }
        let default = BUILTIN_DEFAULTS.iter().find(|(k, _)| *k == key)?;
        self.record_origin(key, ValueOrigin::BuiltinDefault);
        Some(default.1.to_string())
    }

    /// Record provenance for `key` through a shared reference.
    ///
    /// Returns false when the provenance map is still the plain build-phase
    /// container, which cannot accept writes from a shared reference; on a
    /// hardened conf this always succeeds, from any thread.
    pub fn record_origin(&self, key: &str, origin: ValueOrigin) -> bool {
        match &self.provenance {
            ProvenanceMap::Plain(_) => false,
            ProvenanceMap::Synced(l) => {
                l.write().insert(key.to_string(), origin);
                true
            }
        }
    }

    /// Provenance recorded for `key`, if any.
    pub fn origin_of(&self, key: &str) -> Option<ValueOrigin> {
        match &self.provenance {
            ProvenanceMap::Plain(m) => m.get(key).copied(),
            ProvenanceMap::Synced(l) => l.read().get(key).copied(),
        }
    }

    /// Whether the provenance map has been swapped for the synchronized
    /// container.
    pub fn is_synced(&self) -> bool {
        matches!(self.provenance, ProvenanceMap::Synced(_))
    }

    /// Whether `key` was set explicitly (builtin defaults do not count).
    pub fn is_set(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of explicitly set entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of the explicitly set entries.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Number of keys with recorded provenance.
    pub fn origin_count(&self) -> usize {
        match &self.provenance {
            ProvenanceMap::Plain(m) => m.len(),
            ProvenanceMap::Synced(l) => l.read().len(),
        }
    }

    /// Fields of this type still backed by unsynchronized containers.
    /// Consulted by the hardening pass against its recipe table.
    pub(crate) fn unsynced_fields(&self) -> &'static [&'static str] {
        match self.provenance {
            ProvenanceMap::Plain(_) => &["provenance"],
            ProvenanceMap::Synced(_) => &[],
        }
    }

    /// Swap the plain provenance map for the synchronized container,
    /// preserving every recorded entry. No-op if already synchronized.
    pub(crate) fn sync_provenance(&mut self) {
        if let ProvenanceMap::Plain(m) = &mut self.provenance {
            let owned = std::mem::take(m);
            self.provenance = ProvenanceMap::Synced(RwLock::new(owned));
        }
    }
}

impl Default for StorageConf {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for StorageConf {
    fn clone(&self) -> Self {
        Self { entries: self.entries.clone(), provenance: self.provenance.clone() }
    }
}
