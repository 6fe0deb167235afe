//! Tree export.
//!
//! Two document kinds:
//!
//! - **Backup**: the tree verbatim, `{ "projects": [...] }`. This is also the persisted
//!   form, and importing it restores the exact tree.
//! - **AI context**: the same projects under `completeStructure`, wrapped with
//!   read-only statistics meant for pasting into an assistant. Import accepts it and
//!   ignores everything but `completeStructure`.

use crate::commands::{CmdMessage, CmdResult, ExportFile};
use crate::error::Result;
use crate::model::{detect_language, Project, Tree, TreeCounts};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

const APP_NAME: &str = "NoteLab";
const AI_CONTEXT_PURPOSE: &str = "AI learning context - complete study snapshot";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Backup,
    AiContext,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiContext<'a> {
    pub metadata: ExportMetadata,
    pub overview: Overview,
    pub complete_structure: &'a [Arc<Project>],
    pub derived_analytics: DerivedAnalytics,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub export_date: DateTime<Utc>,
    pub app_name: &'static str,
    pub app_version: &'static str,
    pub purpose: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_projects: usize,
    pub total_sections: usize,
    pub total_notes: usize,
    pub total_checkpoints: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedAnalytics {
    pub tag_frequency: BTreeMap<String, usize>,
    pub notes: Vec<NoteSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteSummary {
    pub id: String,
    pub title: String,
    pub project: String,
    pub section: String,
    pub content_length: usize,
    pub checkpoint_count: usize,
    pub tags: Vec<String>,
    pub language: String,
}

impl From<TreeCounts> for Overview {
    fn from(counts: TreeCounts) -> Self {
        Self {
            total_projects: counts.projects,
            total_sections: counts.sections,
            total_notes: counts.notes,
            total_checkpoints: counts.checkpoints,
        }
    }
}

pub fn run(tree: &Tree, kind: ExportKind, now: DateTime<Utc>) -> Result<CmdResult> {
    let contents = match kind {
        ExportKind::Backup => backup(tree)?,
        ExportKind::AiContext => serde_json::to_string_pretty(&ai_context(tree, now))?,
    };
    let file_name = file_name(kind, now);
    let counts = tree.counts();

    tracing::info!(%file_name, projects = counts.projects, "exported tree");

    let mut result = CmdResult::default().with_export(ExportFile {
        file_name,
        contents,
    });
    result.add_message(CmdMessage::success(format!(
        "Exported {} project(s), {} section(s), {} note(s)",
        counts.projects, counts.sections, counts.notes
    )));
    Ok(result)
}

/// The canonical backup document.
pub fn backup(tree: &Tree) -> Result<String> {
    Ok(serde_json::to_string_pretty(tree)?)
}

pub fn ai_context(tree: &Tree, now: DateTime<Utc>) -> AiContext<'_> {
    let mut tag_frequency: BTreeMap<String, usize> = BTreeMap::new();
    let mut notes = Vec::new();

    for (project, section, note) in tree.notes() {
        for tag in &note.tags {
            *tag_frequency.entry(tag.clone()).or_default() += 1;
        }
        notes.push(NoteSummary {
            id: note.id.clone(),
            title: note.title.clone(),
            project: project.name.clone(),
            section: section.name.clone(),
            content_length: note.content.chars().count(),
            checkpoint_count: note.versions.len(),
            tags: note.tags.clone(),
            language: detect_language(note).to_string(),
        });
    }

    AiContext {
        metadata: ExportMetadata {
            export_date: now,
            app_name: APP_NAME,
            app_version: env!("CARGO_PKG_VERSION"),
            purpose: AI_CONTEXT_PURPOSE,
        },
        overview: tree.counts().into(),
        complete_structure: &tree.projects,
        derived_analytics: DerivedAnalytics {
            tag_frequency,
            notes,
        },
    }
}

pub fn file_name(kind: ExportKind, now: DateTime<Utc>) -> String {
    let stem = match kind {
        ExportKind::Backup => "notelab-backup",
        ExportKind::AiContext => "notelab-ai-context",
    };
    format!("{}-{}.json", stem, now.format("%Y-%m-%d"))
}
