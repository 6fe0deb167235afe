//! # API Facade
//!
//! [`Workspace`] is the single entry point for UI clients. It holds the current tree
//! and the selected note, dispatches every operation to the command layer, and hands
//! each resulting tree to the save debouncer.
//!
//! ## Role and Responsibilities
//!
//! The facade:
//! - **Dispatches** to the appropriate command function
//! - **Owns session state**: the live tree and the selection
//! - **Schedules persistence** after every effective change
//! - **Returns structured types** (`CmdResult`), never strings for a terminal
//!
//! Business logic stays in `commands/*.rs`. Storage details stay behind
//! [`SnapshotStore`].
//!
//! ## Selection
//!
//! Opening a workspace selects the first note. Creating a note selects it. Any change
//! that removes the selected note clears the selection, and a successful import resets
//! it to the first note of the imported tree.

use crate::commands::{
    checkpoint, create, delete, export, import, rename, search, tagging, update,
};
use crate::config::NotelabConfig;
use crate::error::Result;
use crate::model::{ItemRef, Note, NoteRef, Tree};
use crate::store::debounce::SaveDebouncer;
use crate::store::{load_tree, SnapshotStore};
use chrono::Utc;

pub use crate::commands::export::ExportKind;
pub use crate::commands::{CmdMessage, CmdResult, ExportFile, MessageLevel};

pub struct Workspace {
    tree: Tree,
    selection: Option<NoteRef>,
    config: NotelabConfig,
    saver: SaveDebouncer,
}

impl Workspace {
    /// Loads the persisted tree (or the starter content) and takes ownership of
    /// `store` for all later writes.
    pub fn open<S>(store: S, config: NotelabConfig) -> Self
    where
        S: SnapshotStore + Send + 'static,
    {
        let tree = load_tree(&store);
        let selection = tree.first_note();
        let saver = SaveDebouncer::new(store, config.save_delay());
        Self {
            tree,
            selection,
            config,
            saver,
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn config(&self) -> &NotelabConfig {
        &self.config
    }

    pub fn selection(&self) -> Option<&NoteRef> {
        self.selection.as_ref()
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.selection
            .as_ref()
            .and_then(|s| self.tree.note(&s.note_id))
    }

    /// Selects the note with `note_id`. Returns false, leaving the selection alone, if
    /// there is no such note.
    pub fn select(&mut self, note_id: &str) -> bool {
        match self.tree.find_note(note_id) {
            Some((location, _)) => {
                self.selection = Some(location);
                true
            }
            None => false,
        }
    }

    pub fn add_project(&mut self, name: &str) -> CmdResult {
        let (next, id) = create::project(&self.tree, name, Utc::now());
        self.commit(next);
        created(id, "project", name)
    }

    pub fn add_section(&mut self, project_id: &str, name: &str) -> CmdResult {
        let (next, id) = create::section(&self.tree, project_id, name, Utc::now());
        self.commit(next);
        created(id, "section", name)
    }

    /// Adds a note with the starter template and selects it.
    pub fn add_note(&mut self, project_id: &str, section_id: &str, title: &str) -> CmdResult {
        let (next, id) = create::note(
            &self.tree,
            project_id,
            section_id,
            title,
            &self.config.default_language,
            Utc::now(),
        );
        self.commit(next);
        if let Some(id) = &id {
            self.selection = Some(NoteRef {
                project_id: project_id.to_string(),
                section_id: section_id.to_string(),
                note_id: id.clone(),
            });
        }
        created(id, "note", title)
    }

    pub fn rename(&mut self, item: &ItemRef, new_name: &str) -> CmdResult {
        let next = rename::run(&self.tree, item, new_name);
        let changed = self.commit(next);
        let mut result = CmdResult::default();
        if changed {
            result.add_message(CmdMessage::success(format!(
                "Renamed {} to \"{}\"",
                item.kind(),
                new_name.trim()
            )));
        } else {
            result.add_message(CmdMessage::info(format!("No {} renamed", item.kind())));
        }
        result
    }

    /// Deletes an entity and everything under it.
    pub fn delete(&mut self, item: &ItemRef) -> CmdResult {
        let next = delete::run(&self.tree, item);
        let changed = self.commit(next);
        let mut result = CmdResult::default();
        if changed {
            result.add_message(CmdMessage::success(format!("Deleted {}", item.kind())));
        } else {
            result.add_message(CmdMessage::info(format!("No {} deleted", item.kind())));
        }
        result
    }

    pub fn add_tag(&mut self, note_id: &str, tag: &str) -> CmdResult {
        let next = tagging::add(&self.tree, note_id, tag);
        let changed = self.commit(next);
        let mut result = CmdResult::default();
        if changed {
            result.add_message(CmdMessage::success(format!("Tagged with #{}", tag.trim())));
        }
        result
    }

    pub fn remove_tag(&mut self, note_id: &str, tag: &str) -> CmdResult {
        let next = tagging::remove(&self.tree, note_id, tag);
        let changed = self.commit(next);
        let mut result = CmdResult::default();
        if changed {
            result.add_message(CmdMessage::success(format!("Removed tag #{}", tag)));
        }
        result
    }

    /// Replaces the note's content. Called per keystroke by interactive clients; the
    /// debouncer turns a burst of these into one write.
    pub fn update_content(&mut self, note_id: &str, content: &str) -> CmdResult {
        let next = update::content(&self.tree, note_id, content);
        self.commit(next);
        CmdResult::default()
    }

    pub fn save_checkpoint(&mut self, note_id: &str) -> CmdResult {
        let (next, number) = checkpoint::save(&self.tree, note_id, Utc::now());
        self.commit(next);
        let mut result = CmdResult::default().with_checkpoint(number);
        if let Some(number) = number {
            result.add_message(CmdMessage::success(format!("Checkpoint #{} saved", number)));
        }
        result
    }

    /// The tree as it should be displayed for `query`. The live tree is untouched.
    pub fn visible_tree(&self, query: &str) -> CmdResult {
        let listed = search::filter_tree(&self.tree, query);
        let mut result = CmdResult::default();
        if listed.is_empty() && !query.is_empty() {
            result.add_message(CmdMessage::info(format!("No notes match \"{}\"", query)));
        }
        result.with_listed_tree(listed)
    }

    pub fn export(&self, kind: ExportKind) -> Result<CmdResult> {
        export::run(&self.tree, kind, Utc::now())
    }

    /// Replaces the whole tree with an imported document.
    ///
    /// All or nothing: on any error the tree and selection are left exactly as they
    /// were. On success the new tree is written out immediately instead of waiting
    /// for the quiet period.
    pub fn import(&mut self, text: &str) -> Result<CmdResult> {
        let (next, mut result) = import::run(text, &self.config.default_language)?;
        self.tree = next;
        self.selection = self.tree.first_note();
        self.saver.schedule(self.tree.clone());
        if let Err(e) = self.saver.flush() {
            result.add_message(CmdMessage::warning(format!(
                "Imported data could not be saved yet: {}",
                e
            )));
        }
        Ok(result)
    }

    /// Writes any pending change now.
    pub fn flush(&self) -> Result<()> {
        self.saver.flush()
    }

    /// Installs `next` as the live tree if it differs, drops a selection that no longer
    /// resolves, and schedules a save. Returns whether anything changed.
    fn commit(&mut self, next: Tree) -> bool {
        if next == self.tree {
            return false;
        }
        self.tree = next;
        let stale = self
            .selection
            .as_ref()
            .is_some_and(|s| !self.tree.contains(&ItemRef::from(s.clone())));
        if stale {
            self.selection = None;
        }
        self.saver.schedule(self.tree.clone());
        true
    }
}

fn created(id: Option<String>, kind: &str, name: &str) -> CmdResult {
    let mut result = CmdResult::default();
    match &id {
        Some(id) => result.add_message(CmdMessage::success(format!(
            "Created {} \"{}\" ({})",
            kind,
            name.trim(),
            id
        ))),
        None => result.add_message(CmdMessage::warning(format!("No {} created", kind))),
    }
    result.with_created_id(id)
}
