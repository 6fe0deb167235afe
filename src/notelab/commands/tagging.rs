//! Note tagging.
//!
//! Tags are free-form strings kept in insertion order with no duplicates (exact,
//! case-sensitive match). Adding a tag a note already has, or removing one it doesn't,
//! is a no-op.

use super::helpers::update_note;
use crate::model::Tree;

/// Adds `tag` (trimmed) to the note. Blank or already-present tags are ignored.
pub fn add(tree: &Tree, note_id: &str, tag: &str) -> Tree {
    let tag = tag.trim();
    if tag.is_empty() {
        return tree.clone();
    }
    match tree.note(note_id) {
        Some(note) if !note.has_tag(tag) => {
            update_note(tree, note_id, |n| n.tags.push(tag.to_string()))
        }
        _ => tree.clone(),
    }
}

/// Removes the exact tag from the note, if present.
pub fn remove(tree: &Tree, note_id: &str, tag: &str) -> Tree {
    match tree.note(note_id) {
        Some(note) if note.has_tag(tag) => {
            update_note(tree, note_id, |n| n.tags.retain(|t| t != tag))
        }
        _ => tree.clone(),
    }
}
