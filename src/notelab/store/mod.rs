//! # Storage Layer
//!
//! The whole note tree lives under a single durable key. The [`SnapshotStore`] trait is
//! the persistence port: it reads and writes that key as raw text and knows nothing
//! about the tree itself.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production storage, one JSON file in the data directory
//!   (`notelab-data.json`), written atomically via a temp file and rename.
//! - [`memory::MemoryStore`]: In-memory storage for tests. Clones share state so a
//!   test can keep a handle after giving the store away.
//!
//! ## Writes
//!
//! Writes are never issued directly by mutations. [`debounce::SaveDebouncer`] owns the
//! store and writes the latest tree once changes go quiet, so at most one write is
//! pending and writes never overlap. Every write is a full snapshot.
//!
//! ## Reads
//!
//! [`load_tree`] reads the key once at startup and normalizes it the way an import
//! does. A missing key yields the seed tree, and so does a snapshot that fails to
//! parse: that failure is logged, never surfaced.

use crate::commands::import;
use crate::error::Result;
use crate::model::{Tree, DEFAULT_LANGUAGE};
use crate::seed::seed_tree;

pub mod debounce;
pub mod fs;
pub mod memory;

/// Durable storage for the serialized tree.
pub trait SnapshotStore {
    /// Read the stored snapshot, `Ok(None)` if nothing was ever written.
    fn load(&self) -> Result<Option<String>>;

    /// Replace the stored snapshot.
    fn save(&self, snapshot: &str) -> Result<()>;
}

/// Serializes a tree into the persisted document form.
pub fn serialize_tree(tree: &Tree) -> Result<String> {
    Ok(serde_json::to_string_pretty(tree)?)
}

/// Reads the persisted tree, falling back to the seed tree when there is none or it
/// cannot be read.
///
/// The snapshot goes through the same validation and normalization as an import, so
/// anything an import would accept also loads.
pub fn load_tree<S: SnapshotStore + ?Sized>(store: &S) -> Tree {
    match store.load() {
        Ok(Some(raw)) => match import::parse(&raw, DEFAULT_LANGUAGE) {
            Ok(tree) => {
                tracing::debug!(projects = tree.projects.len(), "loaded persisted tree");
                tree
            }
            Err(e) => {
                tracing::warn!("failed to parse saved data, using starter content: {}", e);
                seed_tree()
            }
        },
        Ok(None) => {
            tracing::debug!("no saved data, using starter content");
            seed_tree()
        }
        Err(e) => {
            tracing::warn!("failed to read saved data, using starter content: {}", e);
            seed_tree()
        }
    }
}
