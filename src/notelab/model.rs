//! # Data Model
//!
//! The note hierarchy is a strict three-level ownership tree:
//!
//! ```text
//! Tree
//! └── Project   (id "p…")
//!     └── Section   (id "s…")
//!         └── Note      (id "n…")
//!             └── Version  (append-only checkpoints)
//! ```
//!
//! Every level is held behind an [`Arc`]. A mutation clones the [`Tree`] (which only
//! bumps reference counts) and copies-on-write the single path down to the entity it
//! edits, so untouched projects, sections and notes stay shared with the previous
//! tree. Every mutation therefore hands back a new top-level value while the old one
//! stays valid and unchanged.
//!
//! The serialized form of a [`Tree`] is the canonical backup document:
//! `{ "projects": [ ... ] }`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_LANGUAGE: &str = "html";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    pub projects: Vec<Arc<Project>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sections: Vec<Arc<Section>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub notes: Vec<Arc<Note>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub versions: Vec<Arc<Version>>,
    /// Reserved for translated renditions keyed by language code. Never populated.
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
    #[serde(default = "default_language")]
    pub language: String,
}

/// An immutable snapshot of a note's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub version: u32,
    pub content: String,
    pub date: DateTime<Utc>,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl Project {
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            sections: Vec::new(),
        }
    }
}

impl Section {
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            notes: Vec::new(),
        }
    }
}

impl Note {
    /// Creates a note whose content is the HTML starter template for `title`.
    pub fn new(id: String, title: String, language: String) -> Self {
        let content = note_template(&title);
        Self {
            id,
            title,
            content,
            tags: Vec::new(),
            versions: Vec::new(),
            translations: BTreeMap::new(),
            language,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Kind of tree entity, used by rename and delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Project,
    Section,
    Note,
}

impl ItemKind {
    pub fn id_prefix(self) -> char {
        match self {
            ItemKind::Project => 'p',
            ItemKind::Section => 's',
            ItemKind::Note => 'n',
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ItemKind::Project => "project",
            ItemKind::Section => "section",
            ItemKind::Note => "note",
        };
        f.write_str(name)
    }
}

/// Full address of an entity: the ids of every ancestor plus its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemRef {
    Project {
        project_id: String,
    },
    Section {
        project_id: String,
        section_id: String,
    },
    Note {
        project_id: String,
        section_id: String,
        note_id: String,
    },
}

impl ItemRef {
    pub fn project(project_id: impl Into<String>) -> Self {
        ItemRef::Project {
            project_id: project_id.into(),
        }
    }

    pub fn section(project_id: impl Into<String>, section_id: impl Into<String>) -> Self {
        ItemRef::Section {
            project_id: project_id.into(),
            section_id: section_id.into(),
        }
    }

    pub fn note(
        project_id: impl Into<String>,
        section_id: impl Into<String>,
        note_id: impl Into<String>,
    ) -> Self {
        ItemRef::Note {
            project_id: project_id.into(),
            section_id: section_id.into(),
            note_id: note_id.into(),
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            ItemRef::Project { .. } => ItemKind::Project,
            ItemRef::Section { .. } => ItemKind::Section,
            ItemRef::Note { .. } => ItemKind::Note,
        }
    }
}

/// Location of a note inside a tree, as handed to UI clients for selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoteRef {
    pub project_id: String,
    pub section_id: String,
    pub note_id: String,
}

impl From<NoteRef> for ItemRef {
    fn from(r: NoteRef) -> Self {
        ItemRef::Note {
            project_id: r.project_id,
            section_id: r.section_id,
            note_id: r.note_id,
        }
    }
}

/// Counts used by summaries and the AI-context overview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeCounts {
    pub projects: usize,
    pub sections: usize,
    pub notes: usize,
    pub checkpoints: usize,
}

impl Tree {
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            projects: projects.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.projects
            .iter()
            .find(|p| p.id == project_id)
            .map(Arc::as_ref)
    }

    pub fn section(&self, project_id: &str, section_id: &str) -> Option<&Section> {
        self.project(project_id)?
            .sections
            .iter()
            .find(|s| s.id == section_id)
            .map(Arc::as_ref)
    }

    /// Finds a note anywhere in the tree by id.
    pub fn find_note(&self, note_id: &str) -> Option<(NoteRef, &Note)> {
        self.notes()
            .find(|(_, _, n)| n.id == note_id)
            .map(|(p, s, n)| {
                let location = NoteRef {
                    project_id: p.id.clone(),
                    section_id: s.id.clone(),
                    note_id: n.id.clone(),
                };
                (location, n)
            })
    }

    pub fn note(&self, note_id: &str) -> Option<&Note> {
        self.find_note(note_id).map(|(_, n)| n)
    }

    /// Iterates every note with its owning project and section, in tree order.
    pub fn notes(&self) -> impl Iterator<Item = (&Project, &Section, &Note)> {
        self.projects.iter().flat_map(|p| {
            p.sections.iter().flat_map(move |s| {
                s.notes
                    .iter()
                    .map(move |n| (p.as_ref(), s.as_ref(), n.as_ref()))
            })
        })
    }

    /// First note of the first section of the first project, if that chain exists.
    pub fn first_note(&self) -> Option<NoteRef> {
        let project = self.projects.first()?;
        let section = project.sections.first()?;
        let note = section.notes.first()?;
        Some(NoteRef {
            project_id: project.id.clone(),
            section_id: section.id.clone(),
            note_id: note.id.clone(),
        })
    }

    pub fn contains(&self, item: &ItemRef) -> bool {
        match item {
            ItemRef::Project { project_id } => self.project(project_id).is_some(),
            ItemRef::Section {
                project_id,
                section_id,
            } => self.section(project_id, section_id).is_some(),
            ItemRef::Note {
                project_id,
                section_id,
                note_id,
            } => self
                .section(project_id, section_id)
                .is_some_and(|s| s.notes.iter().any(|n| &n.id == note_id)),
        }
    }

    /// True if any project, section or note in the tree uses `id`.
    pub fn contains_id(&self, id: &str) -> bool {
        self.projects.iter().any(|p| {
            p.id == id
                || p.sections
                    .iter()
                    .any(|s| s.id == id || s.notes.iter().any(|n| n.id == id))
        })
    }

    pub fn counts(&self) -> TreeCounts {
        let mut counts = TreeCounts {
            projects: self.projects.len(),
            ..TreeCounts::default()
        };
        for project in &self.projects {
            counts.sections += project.sections.len();
            for section in &project.sections {
                counts.notes += section.notes.len();
                counts.checkpoints += section.notes.iter().map(|n| n.versions.len()).sum::<usize>();
            }
        }
        counts
    }
}

/// Generates an id of the form `<prefix><unix millis>`.
///
/// Ids are time based; when two entities are created within the same millisecond the
/// numeric part is bumped until it no longer collides with anything in `tree`.
pub fn generate_id(tree: &Tree, kind: ItemKind, now: DateTime<Utc>) -> String {
    let prefix = kind.id_prefix();
    let mut stamp = now.timestamp_millis();
    loop {
        let candidate = format!("{}{}", prefix, stamp);
        if !tree.contains_id(&candidate) {
            return candidate;
        }
        stamp += 1;
    }
}

/// Starter content for a freshly created note.
pub fn note_template(title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <title>{title}</title>
  <style>
    body {{ font-family: Arial, sans-serif; padding: 20px; }}
    h1 {{ color: #6366f1; }}
  </style>
</head>
<body>
  <h1>{title}</h1>
  <p>Start editing your note here...</p>
</body>
</html>"#
    )
}

/// Guesses the editor language for a note from its content.
///
/// Markup markers win, then JSON-looking openers, then Python keywords; otherwise the
/// note's stored hint is used.
pub fn detect_language(note: &Note) -> &str {
    let content = note.content.to_lowercase();
    if content.contains("<!doctype") || content.contains("<html") {
        return "html";
    }
    if content.starts_with('{') || content.starts_with('[') {
        return "json";
    }
    if content.contains("def ") || content.contains("import ") {
        return "python";
    }
    if note.language.is_empty() {
        DEFAULT_LANGUAGE
    } else {
        &note.language
    }
}
