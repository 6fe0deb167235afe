use super::helpers::update_note;
use crate::model::Tree;

/// Replaces a note's content wholesale.
///
/// Called on every editor change, so it only copies the path to the note; the rest of
/// the tree, and the note's checkpoints, stay shared.
pub fn content(tree: &Tree, note_id: &str, content: &str) -> Tree {
    update_note(tree, note_id, |n| n.content = content.to_string())
}
