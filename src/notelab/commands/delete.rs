use super::helpers::{update_project, update_section, update_tree};
use crate::model::{ItemRef, Tree};

/// Removes a project, section or note together with everything it owns.
///
/// The caller is responsible for dropping any selection that pointed into the removed
/// subtree.
pub fn run(tree: &Tree, item: &ItemRef) -> Tree {
    if !tree.contains(item) {
        return tree.clone();
    }

    match item {
        ItemRef::Project { project_id } => {
            update_tree(tree, |t| t.projects.retain(|p| &p.id != project_id))
        }
        ItemRef::Section {
            project_id,
            section_id,
        } => update_project(tree, project_id, |p| {
            p.sections.retain(|s| &s.id != section_id)
        }),
        ItemRef::Note {
            project_id,
            section_id,
            note_id,
        } => update_section(tree, project_id, section_id, |s| {
            s.notes.retain(|n| &n.id != note_id)
        }),
    }
}
