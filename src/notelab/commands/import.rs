//! Tree import.
//!
//! Import runs in three stages, and nothing is applied unless all three succeed:
//!
//! 1. **Parse** the text as JSON ([`NotelabError::Parse`] on failure).
//! 2. **Detect** the document shape, in this fixed order:
//!    `{ "projects": [...] }`, then `{ "completeStructure": [...] }` (an AI-context
//!    export), then a bare array of projects ([`NotelabError::InvalidFormat`] if none
//!    fits).
//! 3. **Validate and normalize** every project, section and note. Missing required
//!    fields abort the whole import with [`NotelabError::Validation`]; optional fields
//!    fall back to defaults. Ids are unique across the whole document, whatever
//!    their kind.
//!
//! The caller swaps the returned tree in wholesale.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{NotelabError, Result};
use crate::model::{Note, Project, Section, Tree, Version};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Recognized import document shapes, in detection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentShape {
    Backup,
    AiContext,
    BareArray,
}

impl DocumentShape {
    /// Finds the projects list in `doc`. The order of the checks is load-bearing: an
    /// object carrying both keys is a backup.
    pub fn detect(doc: &Value) -> Option<(DocumentShape, &[Value])> {
        if let Some(list) = doc.get("projects").and_then(Value::as_array) {
            return Some((DocumentShape::Backup, list.as_slice()));
        }
        if let Some(list) = doc.get("completeStructure").and_then(Value::as_array) {
            return Some((DocumentShape::AiContext, list.as_slice()));
        }
        if let Some(list) = doc.as_array() {
            return Some((DocumentShape::BareArray, list.as_slice()));
        }
        None
    }
}

pub fn run(text: &str, fallback_language: &str) -> Result<(Tree, CmdResult)> {
    let tree = parse(text, fallback_language)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Import successful! {} project(s) loaded.",
        tree.projects.len()
    )));
    Ok((tree, result))
}

/// Parses, validates and normalizes an import document into a tree.
pub fn parse(text: &str, fallback_language: &str) -> Result<Tree> {
    let doc: Value = serde_json::from_str(text)?;
    let (shape, projects) = DocumentShape::detect(&doc).ok_or(NotelabError::InvalidFormat)?;
    tracing::debug!(?shape, projects = projects.len(), "import document detected");

    let mut seen = HashSet::new();
    let mut list = Vec::with_capacity(projects.len());
    for (index, value) in projects.iter().enumerate() {
        list.push(project_from(value, index, fallback_language, &mut seen)?);
    }

    Ok(Tree { projects: list })
}

fn project_from(
    value: &Value,
    index: usize,
    language: &str,
    seen: &mut HashSet<String>,
) -> Result<Arc<Project>> {
    let (Some(id), Some(name)) = (required_str(value, "id"), required_str(value, "name")) else {
        return Err(NotelabError::Validation(format!(
            "Project #{} missing id/name",
            index
        )));
    };
    if !seen.insert(id.clone()) {
        return Err(NotelabError::Validation(format!(
            "Project #{} has duplicate id \"{}\"",
            index, id
        )));
    }

    let raw = list_or_empty(value, "sections");
    let mut sections = Vec::with_capacity(raw.len());
    for (si, section) in raw.iter().enumerate() {
        sections.push(section_from(section, si, &name, language, seen)?);
    }

    Ok(Arc::new(Project { id, name, sections }))
}

fn section_from(
    value: &Value,
    index: usize,
    project_name: &str,
    language: &str,
    seen: &mut HashSet<String>,
) -> Result<Arc<Section>> {
    let (Some(id), Some(name)) = (required_str(value, "id"), required_str(value, "name")) else {
        return Err(NotelabError::Validation(format!(
            "Section #{} in \"{}\" missing id/name",
            index, project_name
        )));
    };
    if !seen.insert(id.clone()) {
        return Err(NotelabError::Validation(format!(
            "Section #{} in \"{}\" has duplicate id \"{}\"",
            index, project_name, id
        )));
    }

    let raw = list_or_empty(value, "notes");
    let mut notes = Vec::with_capacity(raw.len());
    for (ni, note) in raw.iter().enumerate() {
        notes.push(note_from(note, ni, &name, language, seen)?);
    }

    Ok(Arc::new(Section { id, name, notes }))
}

fn note_from(
    value: &Value,
    index: usize,
    section_name: &str,
    language: &str,
    seen: &mut HashSet<String>,
) -> Result<Arc<Note>> {
    let id = required_str(value, "id");
    let title = required_str(value, "title");
    // Empty content is legitimate: a note can be cleared in the editor.
    let content = value.get("content").and_then(Value::as_str);
    let (Some(id), Some(title), Some(content)) = (id, title, content) else {
        return Err(NotelabError::Validation(format!(
            "Note #{} in \"{}\" missing id/title/content",
            index, section_name
        )));
    };
    if !seen.insert(id.clone()) {
        return Err(NotelabError::Validation(format!(
            "Note #{} in \"{}\" has duplicate id \"{}\"",
            index, section_name, id
        )));
    }

    Ok(Arc::new(Note {
        id,
        title,
        content: content.to_string(),
        tags: tags_from(value),
        versions: versions_from(value),
        translations: translations_from(value),
        language: required_str(value, "language").unwrap_or_else(|| language.to_string()),
    }))
}

/// A non-empty string field.
fn required_str(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn list_or_empty<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Tags as strings in first-seen order. Anything but an array of strings is treated
/// as no tags.
fn tags_from(value: &Value) -> Vec<String> {
    let Some(raw) = value.get("tags").and_then(Value::as_array) else {
        return Vec::new();
    };
    let mut tags: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw {
        let Some(tag) = tag.as_str() else {
            return Vec::new();
        };
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Checkpoints in stored order, renumbered `1..=n`. A list with any malformed entry
/// is dropped as a whole.
fn versions_from(value: &Value) -> Vec<Arc<Version>> {
    let Some(raw) = value.get("versions").filter(|v| v.is_array()) else {
        return Vec::new();
    };
    match serde_json::from_value::<Vec<Version>>(raw.clone()) {
        Ok(versions) => versions
            .into_iter()
            .enumerate()
            .map(|(i, mut v)| {
                v.version = i as u32 + 1;
                Arc::new(v)
            })
            .collect(),
        Err(e) => {
            tracing::warn!("ignoring malformed checkpoint list: {}", e);
            Vec::new()
        }
    }
}

fn translations_from(value: &Value) -> BTreeMap<String, String> {
    value
        .get("translations")
        .and_then(Value::as_object)
        .and_then(|map: &Map<String, Value>| {
            map.iter()
                .map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect::<Option<BTreeMap<_, _>>>()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{checkpoint, export, tagging};
    use crate::store::memory::fixtures::TreeFixture;
    use chrono::Utc;
    use serde_json::json;

    fn parse_value(doc: Value) -> Result<Tree> {
        parse(&doc.to_string(), "html")
    }

    fn validation_message(result: Result<Tree>) -> String {
        match result {
            Err(NotelabError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn bare_array_normalizes_to_backup_shape() {
        let tree = parse(r#"[{"id":"p9","name":"X","sections":[]}]"#, "html").unwrap();
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({"projects": [{"id": "p9", "name": "X", "sections": []}]})
        );
    }

    #[test]
    fn detects_shapes_in_priority_order() {
        let both = json!({
            "projects": [{"id": "a", "name": "A"}],
            "completeStructure": [{"id": "b", "name": "B"}]
        });
        let (shape, list) = DocumentShape::detect(&both).unwrap();
        assert_eq!(shape, DocumentShape::Backup);
        assert_eq!(list[0]["id"], "a");

        let ai = json!({"metadata": {}, "completeStructure": []});
        assert_eq!(DocumentShape::detect(&ai).unwrap().0, DocumentShape::AiContext);

        let bare = json!([]);
        assert_eq!(DocumentShape::detect(&bare).unwrap().0, DocumentShape::BareArray);

        assert!(DocumentShape::detect(&json!({"projects": "nope"})).is_none());
        assert!(DocumentShape::detect(&json!("text")).is_none());
    }

    #[test]
    fn unknown_shape_is_rejected() {
        let result = parse_value(json!({"notes": []}));
        assert!(matches!(result, Err(NotelabError::InvalidFormat)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let result = parse("{\"projects\": [", "html");
        assert!(matches!(result, Err(NotelabError::Parse(_))));
    }

    #[test]
    fn project_without_name_names_its_index() {
        let msg = validation_message(parse_value(json!({
            "projects": [{"id": "p1", "name": "ok"}, {"id": "p2"}]
        })));
        assert_eq!(msg, "Project #1 missing id/name");
    }

    #[test]
    fn section_without_id_names_its_project() {
        let msg = validation_message(parse_value(json!([
            {"id": "p1", "name": "Rust", "sections": [{"name": "no id"}]}
        ])));
        assert_eq!(msg, "Section #0 in \"Rust\" missing id/name");
    }

    #[test]
    fn note_without_title_names_its_section() {
        let msg = validation_message(parse_value(json!([
            {"id": "p1", "name": "Rust", "sections": [
                {"id": "s1", "name": "Basics", "notes": [
                    {"id": "n1", "title": "ok", "content": "x"},
                    {"id": "n2", "content": "x"}
                ]}
            ]}
        ])));
        assert_eq!(msg, "Note #1 in \"Basics\" missing id/title/content");
    }

    #[test]
    fn repeated_note_id_names_its_section() {
        let msg = validation_message(parse_value(json!([
            {"id": "p1", "name": "Rust", "sections": [
                {"id": "s1", "name": "Basics", "notes": [
                    {"id": "n1", "title": "first", "content": "x"},
                    {"id": "n1", "title": "second", "content": "y"}
                ]}
            ]},
            {"id": "p1", "name": "B"}
        ])));
        assert_eq!(msg, "Note #1 in \"Basics\" has duplicate id \"n1\"");
    }

    #[test]
    fn repeated_ids_are_rejected_across_kinds() {
        let project = validation_message(parse_value(json!([
            {"id": "p1", "name": "A"},
            {"id": "p1", "name": "B"}
        ])));
        assert_eq!(project, "Project #1 has duplicate id \"p1\"");

        let section = validation_message(parse_value(json!([
            {"id": "p1", "name": "A", "sections": [{"id": "s1", "name": "S"}]},
            {"id": "p2", "name": "B", "sections": [{"id": "s1", "name": "S"}]}
        ])));
        assert_eq!(section, "Section #0 in \"B\" has duplicate id \"s1\"");

        let mixed = validation_message(parse_value(json!([
            {"id": "x", "name": "A", "sections": [{"id": "x", "name": "S"}]}
        ])));
        assert_eq!(mixed, "Section #0 in \"A\" has duplicate id \"x\"");
    }

    #[test]
    fn note_without_content_is_rejected_but_empty_content_is_not() {
        let missing = parse_value(json!([{"id": "p", "name": "P", "sections": [
            {"id": "s", "name": "S", "notes": [{"id": "n", "title": "T"}]}
        ]}]));
        assert!(matches!(missing, Err(NotelabError::Validation(_))));

        let empty = parse_value(json!([{"id": "p", "name": "P", "sections": [
            {"id": "s", "name": "S", "notes": [{"id": "n", "title": "T", "content": ""}]}
        ]}]))
        .unwrap();
        assert_eq!(empty.note("n").unwrap().content, "");
    }

    #[test]
    fn optional_fields_get_defaults() {
        let tree = parse_value(json!({"projects": [
            {"id": "p", "name": "P", "sections": "oops"},
            {"id": "q", "name": "Q", "sections": [
                {"id": "s", "name": "S", "notes": [
                    {"id": "n", "title": "T", "content": "c",
                     "tags": "x", "versions": {"bad": true}, "translations": 3}
                ]},
                {"id": "s2", "name": "S2"}
            ]}
        ]}))
        .unwrap();

        assert!(tree.project("p").unwrap().sections.is_empty());
        assert!(tree.section("q", "s2").unwrap().notes.is_empty());
        let note = tree.note("n").unwrap();
        assert!(note.tags.is_empty());
        assert!(note.versions.is_empty());
        assert!(note.translations.is_empty());
        assert_eq!(note.language, "html");
    }

    #[test]
    fn tags_are_deduplicated_and_versions_renumbered() {
        let tree = parse_value(json!([{"id": "p", "name": "P", "sections": [
            {"id": "s", "name": "S", "notes": [
                {"id": "n", "title": "T", "content": "c", "language": "python",
                 "tags": ["a", "b", "a"],
                 "versions": [
                    {"version": 4, "content": "v1", "date": "2025-01-01T00:00:00.000Z", "timestamp": 1},
                    {"version": 9, "content": "v2", "date": "2025-01-02T00:00:00Z"}
                 ]}
            ]}
        ]}]))
        .unwrap();

        let note = tree.note("n").unwrap();
        assert_eq!(note.tags, vec!["a", "b"]);
        let numbers: Vec<u32> = note.versions.iter().map(|v| v.version).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(note.versions[1].content, "v2");
        assert_eq!(note.language, "python");
    }

    #[test]
    fn backup_export_round_trips() {
        let tree = TreeFixture::new()
            .with_project("p1", "P")
            .with_section("p1", "s1", "S")
            .with_note("p1", "s1", "n1", "N", "hello")
            .with_project("p2", "Empty")
            .build();
        let tree = tagging::add(&tree, "n1", "x");
        let (tree, _) = checkpoint::save(&tree, "n1", Utc::now());

        let raw = export::backup(&tree).unwrap();
        assert_eq!(parse(&raw, "html").unwrap(), tree);
    }

    #[test]
    fn ai_context_export_is_accepted() {
        let tree = TreeFixture::new()
            .with_project("p1", "P")
            .with_section("p1", "s1", "S")
            .with_note("p1", "s1", "n1", "N", "hello")
            .build();
        let raw = serde_json::to_string(&export::ai_context(&tree, Utc::now())).unwrap();
        assert_eq!(parse(&raw, "html").unwrap(), tree);
    }

    #[test]
    fn run_reports_project_count() {
        let (tree, result) = run(r#"[{"id":"p9","name":"X"}]"#, "html").unwrap();
        assert_eq!(tree.projects.len(), 1);
        assert_eq!(result.messages[0].content, "Import successful! 1 project(s) loaded.");
    }
}
