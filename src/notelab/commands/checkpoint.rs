//! Checkpoints: append-only content snapshots.
//!
//! A checkpoint copies the note's full content (no diffing) and is numbered one past
//! the current count, so numbers run `1, 2, 3, …` with no gaps. Identical snapshots
//! are not deduplicated and there is no cap. Nothing edits or removes a checkpoint
//! once written.

use super::helpers::update_note;
use crate::model::{Tree, Version};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Saves a checkpoint of the note's current content.
///
/// Returns the new tree and the checkpoint number, or `None` if the note is unknown.
pub fn save(tree: &Tree, note_id: &str, now: DateTime<Utc>) -> (Tree, Option<u32>) {
    let Some(note) = tree.note(note_id) else {
        return (tree.clone(), None);
    };
    let number = note.versions.len() as u32 + 1;
    let snapshot = Version {
        version: number,
        content: note.content.clone(),
        date: now,
    };
    let next = update_note(tree, note_id, |n| n.versions.push(Arc::new(snapshot)));
    tracing::debug!(note_id, number, "checkpoint saved");
    (next, Some(number))
}
