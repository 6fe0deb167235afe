//! Debounced snapshot writer.
//!
//! Coalesces rapid-fire tree changes (e.g. one per keystroke) into a single write
//! after a configurable quiet period.
//!
//! ## Design
//!
//! A single-slot deferred task fed by a channel:
//! 1. `schedule(tree)` sends the new tree and returns immediately
//! 2. The worker thread holds at most one pending tree; a newer one replaces it and
//!    restarts the quiet period
//! 3. After `delay` of silence the pending tree is serialized and written
//! 4. The worker is the only writer, so writes never overlap
//!
//! `flush()` writes the pending tree right away and waits for the result. Dropping
//! the debouncer writes whatever is still pending before the worker exits.

use super::{serialize_tree, SnapshotStore};
use crate::error::{NotelabError, Result};
use crate::model::Tree;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

enum SaveRequest {
    Schedule(Tree),
    Flush(mpsc::Sender<Result<()>>),
}

pub struct SaveDebouncer {
    tx: Option<mpsc::Sender<SaveRequest>>,
    worker: Option<JoinHandle<()>>,
}

impl SaveDebouncer {
    /// Spawns the save worker. It owns `store` until the debouncer is dropped.
    pub fn new<S>(store: S, delay: Duration) -> Self
    where
        S: SnapshotStore + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("notelab-save".to_string())
            .spawn(move || run_loop(store, rx, delay))
            .ok();
        if worker.is_none() {
            tracing::error!("failed to spawn save worker, changes will not be persisted");
        }
        Self {
            tx: Some(tx),
            worker,
        }
    }

    /// Schedule `tree` to be written once changes go quiet. Non-blocking.
    pub fn schedule(&self, tree: Tree) {
        if let Some(tx) = &self.tx {
            if tx.send(SaveRequest::Schedule(tree)).is_err() {
                tracing::error!("save worker is gone, change not persisted");
            }
        }
    }

    /// Write the pending tree now, if there is one, and wait for the write.
    pub fn flush(&self) -> Result<()> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| NotelabError::Store("save worker stopped".to_string()))?;
        let (reply_tx, reply_rx) = mpsc::channel();
        tx.send(SaveRequest::Flush(reply_tx))
            .map_err(|_| NotelabError::Store("save worker stopped".to_string()))?;
        reply_rx
            .recv()
            .map_err(|_| NotelabError::Store("save worker stopped".to_string()))?
    }
}

impl Drop for SaveDebouncer {
    fn drop(&mut self) {
        // Closing the channel makes the worker write what is pending and exit.
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn run_loop<S: SnapshotStore>(store: S, rx: mpsc::Receiver<SaveRequest>, delay: Duration) {
    let mut pending: Option<Tree> = None;

    loop {
        let request = if pending.is_some() {
            match rx.recv_timeout(delay) {
                Ok(request) => request,
                Err(RecvTimeoutError::Timeout) => {
                    // quiet period elapsed
                    if let Some(tree) = pending.take() {
                        let _ = write(&store, &tree);
                    }
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        } else {
            match rx.recv() {
                Ok(request) => request,
                Err(_) => break,
            }
        };

        match request {
            SaveRequest::Schedule(tree) => pending = Some(tree),
            SaveRequest::Flush(reply) => {
                let result = match pending.take() {
                    Some(tree) => write(&store, &tree),
                    None => Ok(()),
                };
                let _ = reply.send(result);
            }
        }
    }

    if let Some(tree) = pending.take() {
        let _ = write(&store, &tree);
    }
}

fn write<S: SnapshotStore>(store: &S, tree: &Tree) -> Result<()> {
    let result = serialize_tree(tree).and_then(|raw| store.save(&raw));
    match &result {
        Ok(()) => tracing::debug!(projects = tree.projects.len(), "saved tree"),
        Err(e) => tracing::error!("failed to save tree: {}", e),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Project;
    use crate::store::load_tree;
    use crate::store::memory::MemoryStore;

    fn tree_named(name: &str) -> Tree {
        Tree::new(vec![Project::new("p1".into(), name.into())])
    }

    #[test]
    fn test_debounce_coalesces_rapid_changes() {
        let store = MemoryStore::new();
        let debouncer = SaveDebouncer::new(store.clone(), Duration::from_millis(100));

        for i in 0..10 {
            debouncer.schedule(tree_named(&format!("v{}", i)));
            thread::sleep(Duration::from_millis(10));
        }

        thread::sleep(Duration::from_millis(400));

        assert_eq!(store.write_count(), 1, "10 rapid changes should produce 1 write");
        assert_eq!(load_tree(&store), tree_named("v9"));
    }

    #[test]
    fn test_debounce_separate_bursts() {
        let store = MemoryStore::new();
        let debouncer = SaveDebouncer::new(store.clone(), Duration::from_millis(50));

        debouncer.schedule(tree_named("first"));
        thread::sleep(Duration::from_millis(250));

        debouncer.schedule(tree_named("second"));
        thread::sleep(Duration::from_millis(250));

        assert_eq!(store.write_count(), 2);
        assert_eq!(load_tree(&store), tree_named("second"));
    }

    #[test]
    fn test_no_change_no_write() {
        let store = MemoryStore::new();
        let _debouncer = SaveDebouncer::new(store.clone(), Duration::from_millis(20));
        thread::sleep(Duration::from_millis(100));
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_flush_writes_immediately() {
        let store = MemoryStore::new();
        let debouncer = SaveDebouncer::new(store.clone(), Duration::from_secs(60));

        debouncer.schedule(tree_named("a"));
        debouncer.schedule(tree_named("b"));
        debouncer.flush().unwrap();

        assert_eq!(store.write_count(), 1);
        assert_eq!(load_tree(&store), tree_named("b"));

        // nothing pending any more
        debouncer.flush().unwrap();
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_flush_reports_write_error() {
        let store = MemoryStore::new();
        store.set_simulate_write_error(true);
        let debouncer = SaveDebouncer::new(store.clone(), Duration::from_secs(60));

        debouncer.schedule(tree_named("a"));
        assert!(debouncer.flush().is_err());
        assert_eq!(store.snapshot(), None);
    }

    #[test]
    fn test_drop_writes_pending_tree() {
        let store = MemoryStore::new();
        {
            let debouncer = SaveDebouncer::new(store.clone(), Duration::from_secs(60));
            debouncer.schedule(tree_named("last"));
        }
        assert_eq!(store.write_count(), 1);
        assert_eq!(load_tree(&store), tree_named("last"));
    }
}
