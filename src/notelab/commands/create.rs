//! Add-operations for projects, sections and notes.
//!
//! Each returns the new tree and the id it generated, or `None` (with the tree
//! unchanged) when the name is blank or the parent does not exist.

use super::helpers::{clean_name, update_project, update_section, update_tree};
use crate::model::{generate_id, ItemKind, Note, Project, Section, Tree};
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub fn project(tree: &Tree, name: &str, now: DateTime<Utc>) -> (Tree, Option<String>) {
    let Some(name) = clean_name(name) else {
        return (tree.clone(), None);
    };
    let id = generate_id(tree, ItemKind::Project, now);
    let next = update_tree(tree, |t| {
        t.projects.push(Arc::new(Project::new(id.clone(), name)));
    });
    tracing::debug!(%id, "project added");
    (next, Some(id))
}

pub fn section(
    tree: &Tree,
    project_id: &str,
    name: &str,
    now: DateTime<Utc>,
) -> (Tree, Option<String>) {
    let Some(name) = clean_name(name) else {
        return (tree.clone(), None);
    };
    if tree.project(project_id).is_none() {
        tracing::debug!(project_id, "add section: project not found");
        return (tree.clone(), None);
    }
    let id = generate_id(tree, ItemKind::Section, now);
    let next = update_project(tree, project_id, |p| {
        p.sections.push(Arc::new(Section::new(id.clone(), name)));
    });
    tracing::debug!(%id, project_id, "section added");
    (next, Some(id))
}

pub fn note(
    tree: &Tree,
    project_id: &str,
    section_id: &str,
    title: &str,
    language: &str,
    now: DateTime<Utc>,
) -> (Tree, Option<String>) {
    let Some(title) = clean_name(title) else {
        return (tree.clone(), None);
    };
    if tree.section(project_id, section_id).is_none() {
        tracing::debug!(project_id, section_id, "add note: section not found");
        return (tree.clone(), None);
    }
    let id = generate_id(tree, ItemKind::Note, now);
    let next = update_section(tree, project_id, section_id, |s| {
        s.notes
            .push(Arc::new(Note::new(id.clone(), title, language.to_string())));
    });
    tracing::debug!(%id, section_id, "note added");
    (next, Some(id))
}
