use super::SnapshotStore;
use crate::error::{NotelabError, Result};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct MemoryState {
    snapshot: Option<String>,
    writes: usize,
    simulate_write_error: bool,
    simulate_read_error: bool,
}

/// In-memory storage for testing and development.
/// Does NOT persist data.
///
/// Clones share the same state, so a test can hand one clone to the save worker and
/// inspect writes through another.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: &str) -> Self {
        let store = Self::new();
        store.state().snapshot = Some(snapshot.to_string());
        store
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The last snapshot written, if any.
    pub fn snapshot(&self) -> Option<String> {
        self.state().snapshot.clone()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.state().writes
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.state().simulate_write_error = simulate;
    }

    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.state().simulate_read_error = simulate;
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<String>> {
        let state = self.state();
        if state.simulate_read_error {
            return Err(NotelabError::Store("Simulated read error".to_string()));
        }
        Ok(state.snapshot.clone())
    }

    fn save(&self, snapshot: &str) -> Result<()> {
        let mut state = self.state();
        if state.simulate_write_error {
            return Err(NotelabError::Store("Simulated write error".to_string()));
        }
        state.snapshot = Some(snapshot.to_string());
        state.writes += 1;
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{Note, Project, Section, Tree, DEFAULT_LANGUAGE};
    use crate::store::serialize_tree;

    /// Builds small trees with fixed ids for tests.
    #[derive(Default)]
    pub struct TreeFixture {
        tree: Tree,
    }

    impl TreeFixture {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_project(mut self, id: &str, name: &str) -> Self {
            self.tree
                .projects
                .push(Arc::new(Project::new(id.to_string(), name.to_string())));
            self
        }

        pub fn with_section(mut self, project_id: &str, id: &str, name: &str) -> Self {
            let project = self
                .tree
                .projects
                .iter_mut()
                .find(|p| p.id == project_id)
                .expect("fixture project exists");
            Arc::make_mut(project)
                .sections
                .push(Arc::new(Section::new(id.to_string(), name.to_string())));
            self
        }

        pub fn with_note(
            mut self,
            project_id: &str,
            section_id: &str,
            id: &str,
            title: &str,
            content: &str,
        ) -> Self {
            let mut note = Note::new(
                id.to_string(),
                title.to_string(),
                DEFAULT_LANGUAGE.to_string(),
            );
            note.content = content.to_string();
            self.section_mut(project_id, section_id).notes.push(Arc::new(note));
            self
        }

        pub fn with_tags(mut self, note_id: &str, tags: &[&str]) -> Self {
            for project in self.tree.projects.iter_mut() {
                for section in Arc::make_mut(project).sections.iter_mut() {
                    for note in Arc::make_mut(section).notes.iter_mut() {
                        if note.id == note_id {
                            Arc::make_mut(note).tags = tags.iter().map(|t| t.to_string()).collect();
                        }
                    }
                }
            }
            self
        }

        fn section_mut(&mut self, project_id: &str, section_id: &str) -> &mut Section {
            let project = self
                .tree
                .projects
                .iter_mut()
                .find(|p| p.id == project_id)
                .expect("fixture project exists");
            let section = Arc::make_mut(project)
                .sections
                .iter_mut()
                .find(|s| s.id == section_id)
                .expect("fixture section exists");
            Arc::make_mut(section)
        }

        pub fn build(self) -> Tree {
            self.tree
        }

        /// A memory store already holding this tree as its snapshot.
        pub fn store(self) -> MemoryStore {
            let raw = serialize_tree(&self.tree).expect("fixture tree serializes");
            MemoryStore::with_snapshot(&raw)
        }
    }
}
