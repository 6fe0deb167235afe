use super::helpers::{clean_name, update_project, update_section};
use crate::model::{ItemRef, Tree};
use std::sync::Arc;

/// Renames a project or section, or retitles a note.
///
/// A blank name leaves the tree unchanged. The stored name is trimmed.
pub fn run(tree: &Tree, item: &ItemRef, new_name: &str) -> Tree {
    let Some(name) = clean_name(new_name) else {
        return tree.clone();
    };
    if !tree.contains(item) {
        return tree.clone();
    }

    match item {
        ItemRef::Project { project_id } => update_project(tree, project_id, |p| p.name = name),
        ItemRef::Section {
            project_id,
            section_id,
        } => update_section(tree, project_id, section_id, |s| s.name = name),
        ItemRef::Note {
            project_id,
            section_id,
            note_id,
        } => update_section(tree, project_id, section_id, |s| {
            if let Some(note) = s.notes.iter_mut().find(|n| &n.id == note_id) {
                Arc::make_mut(note).title = name;
            }
        }),
    }
}
