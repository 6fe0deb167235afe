//! Copy-on-write navigation used by every mutation.
//!
//! Each helper returns a new [`Tree`]. Only the entities on the path to the edited one
//! are copied (`Arc::make_mut`); everything else stays shared with the input tree. An
//! unknown id yields an unchanged copy and the closure is never called.

use crate::model::{Note, Project, Section, Tree};
use std::sync::Arc;

fn project_index(tree: &Tree, project_id: &str) -> Option<usize> {
    tree.projects.iter().position(|p| p.id == project_id)
}

fn section_index(tree: &Tree, project_id: &str, section_id: &str) -> Option<(usize, usize)> {
    let pi = project_index(tree, project_id)?;
    let si = tree.projects[pi]
        .sections
        .iter()
        .position(|s| s.id == section_id)?;
    Some((pi, si))
}

fn note_index(tree: &Tree, note_id: &str) -> Option<(usize, usize, usize)> {
    for (pi, project) in tree.projects.iter().enumerate() {
        for (si, section) in project.sections.iter().enumerate() {
            if let Some(ni) = section.notes.iter().position(|n| n.id == note_id) {
                return Some((pi, si, ni));
            }
        }
    }
    None
}

pub fn update_tree<F: FnOnce(&mut Tree)>(tree: &Tree, f: F) -> Tree {
    let mut next = tree.clone();
    f(&mut next);
    next
}

pub fn update_project<F: FnOnce(&mut Project)>(tree: &Tree, project_id: &str, f: F) -> Tree {
    let Some(pi) = project_index(tree, project_id) else {
        return tree.clone();
    };
    update_tree(tree, |next| f(Arc::make_mut(&mut next.projects[pi])))
}

pub fn update_section<F: FnOnce(&mut Section)>(
    tree: &Tree,
    project_id: &str,
    section_id: &str,
    f: F,
) -> Tree {
    let Some((pi, si)) = section_index(tree, project_id, section_id) else {
        return tree.clone();
    };
    update_tree(tree, |next| {
        let project = Arc::make_mut(&mut next.projects[pi]);
        f(Arc::make_mut(&mut project.sections[si]))
    })
}

/// Edits the note with `note_id`, wherever it lives in the tree.
pub fn update_note<F: FnOnce(&mut Note)>(tree: &Tree, note_id: &str, f: F) -> Tree {
    let Some((pi, si, ni)) = note_index(tree, note_id) else {
        return tree.clone();
    };
    update_tree(tree, |next| {
        let project = Arc::make_mut(&mut next.projects[pi]);
        let section = Arc::make_mut(&mut project.sections[si]);
        f(Arc::make_mut(&mut section.notes[ni]))
    })
}

/// Trims a user-supplied name, `None` when nothing is left.
pub fn clean_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
