use notelab::api::{ExportKind, Workspace};
use notelab::config::NotelabConfig;
use notelab::model::{ItemRef, Tree};
use notelab::store::fs::FileStore;
use notelab::store::memory::MemoryStore;
use notelab::store::{load_tree, serialize_tree};
use std::collections::HashSet;

fn quick_config() -> NotelabConfig {
    NotelabConfig {
        save_delay_ms: 10,
        ..NotelabConfig::default()
    }
}

fn export_backup(ws: &Workspace) -> String {
    ws.export(ExportKind::Backup)
        .unwrap()
        .export
        .unwrap()
        .contents
}

fn all_ids(tree: &Tree) -> Vec<String> {
    let mut ids = Vec::new();
    for project in &tree.projects {
        ids.push(project.id.clone());
        for section in &project.sections {
            ids.push(section.id.clone());
            ids.extend(section.notes.iter().map(|n| n.id.clone()));
        }
    }
    ids
}

#[test]
fn tags_checkpoints_and_content_survive_export_import() {
    let mut ws = Workspace::open(MemoryStore::new(), quick_config());
    let p = ws.add_project("Rust").created_id.unwrap();
    let s = ws.add_section(&p, "Basics").created_id.unwrap();
    let n = ws.add_note(&p, &s, "Closures").created_id.unwrap();

    ws.add_tag(&n, "x");
    ws.add_tag(&n, "x");
    assert_eq!(ws.tree().note(&n).unwrap().tags, vec!["x"]);

    ws.save_checkpoint(&n);
    ws.save_checkpoint(&n);
    let numbers: Vec<u32> = ws
        .tree()
        .note(&n)
        .unwrap()
        .versions
        .iter()
        .map(|v| v.version)
        .collect();
    assert_eq!(numbers, vec![1, 2]);

    ws.update_content(&n, "bye");
    let exported = export_backup(&ws);

    let mut other = Workspace::open(MemoryStore::new(), quick_config());
    other.import(&exported).unwrap();
    let note = other.tree().note(&n).unwrap();
    assert_eq!(note.content, "bye");
    assert_eq!(note.versions.len(), 2);
    assert_eq!(other.tree(), ws.tree());
}

#[test]
fn bare_array_import_normalizes() {
    let store = MemoryStore::new();
    let mut ws = Workspace::open(store.clone(), quick_config());
    ws.import(r#"[{"id":"p9","name":"X","sections":[]}]"#).unwrap();

    let exported: serde_json::Value = serde_json::from_str(&export_backup(&ws)).unwrap();
    assert_eq!(
        exported,
        serde_json::json!({"projects": [{"id": "p9", "name": "X", "sections": []}]})
    );
    assert_eq!(load_tree(&store), *ws.tree());
    assert!(ws.selection().is_none());
}

#[test]
fn adding_to_missing_project_is_a_noop() {
    let store = MemoryStore::new();
    let mut ws = Workspace::open(store.clone(), quick_config());
    let before = ws.tree().clone();

    let result = ws.add_section("nonexistent-project-id", "S");

    assert_eq!(result.created_id, None);
    assert_eq!(ws.tree(), &before);
    ws.flush().unwrap();
    assert_eq!(store.snapshot(), None);
}

#[test]
fn rejected_import_keeps_persisted_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let data_file = dir.path().join("notelab-data.json");
    {
        let mut ws = Workspace::open(FileStore::new(dir.path().to_path_buf()), quick_config());
        ws.add_project("Keep me");
        ws.flush().unwrap();
    }
    let before = std::fs::read(&data_file).unwrap();

    let mut ws = Workspace::open(FileStore::new(dir.path().to_path_buf()), quick_config());
    let tree_before = ws.tree().clone();
    let bad = r#"{"projects":[{"id":"p","name":"P","sections":[{"id":"s","name":"S","notes":[{"id":"n","content":"no title"}]}]}]}"#;

    let err = ws.import(bad).unwrap_err();
    assert!(err.to_string().contains("Note #0 in \"S\" missing id/title/content"));
    assert_eq!(ws.tree(), &tree_before);

    ws.flush().unwrap();
    drop(ws);
    assert_eq!(std::fs::read(&data_file).unwrap(), before);
}

#[test]
fn import_with_repeated_ids_is_rejected_whole() {
    let store = MemoryStore::new();
    let mut ws = Workspace::open(store.clone(), quick_config());
    let tree_before = ws.tree().clone();
    let doubled = r#"[
        {"id":"p1","name":"A","sections":[{"id":"s1","name":"S","notes":[
            {"id":"n1","title":"x","content":"x"},
            {"id":"n1","title":"y","content":"y"}]}]},
        {"id":"p1","name":"B"}
    ]"#;

    let err = ws.import(doubled).unwrap_err();
    assert!(err.to_string().contains("Note #1 in \"S\" has duplicate id \"n1\""));
    assert_eq!(ws.tree(), &tree_before);
    ws.flush().unwrap();
    assert_eq!(store.snapshot(), None);
}

#[test]
fn ids_stay_unique_through_adds_and_deletes() {
    let mut ws = Workspace::open(MemoryStore::new(), quick_config());
    let mut projects = Vec::new();

    for round in 0..5 {
        let p = ws.add_project(&format!("P{}", round)).created_id.unwrap();
        for _ in 0..3 {
            let s = ws.add_section(&p, "S").created_id.unwrap();
            for _ in 0..3 {
                ws.add_note(&p, &s, "N");
            }
        }
        projects.push(p);
        if round % 2 == 1 {
            let victim = projects.remove(0);
            ws.delete(&ItemRef::project(victim.clone()));
            assert!(!ws.tree().contains_id(&victim));
        }
    }

    let ids = all_ids(ws.tree());
    let unique: HashSet<&String> = ids.iter().collect();
    assert_eq!(ids.len(), unique.len());
}

#[test]
fn deleting_project_removes_descendants() {
    let mut ws = Workspace::open(MemoryStore::new(), quick_config());
    let note_ids: Vec<String> = ws
        .tree()
        .notes()
        .filter(|(p, _, _)| p.id == "p0")
        .map(|(_, _, n)| n.id.clone())
        .collect();
    assert!(!note_ids.is_empty());

    ws.delete(&ItemRef::project("p0"));

    for id in note_ids {
        assert!(ws.tree().note(&id).is_none());
    }
    assert!(ws.tree().project("p1").is_some());
}

#[test]
fn corrupt_snapshot_falls_back_to_seed() {
    let ws = Workspace::open(MemoryStore::with_snapshot("{not json"), quick_config());
    assert_eq!(ws.tree(), &notelab::seed::seed_tree());
    assert_eq!(ws.selection().unwrap().note_id, "n0");
}

#[test]
fn ai_context_export_reimports() {
    let ws = Workspace::open(MemoryStore::new(), quick_config());
    let ai = ws
        .export(ExportKind::AiContext)
        .unwrap()
        .export
        .unwrap()
        .contents;

    let empty = serialize_tree(&Tree::default()).unwrap();
    let mut other = Workspace::open(MemoryStore::with_snapshot(&empty), quick_config());
    assert!(other.tree().is_empty());
    other.import(&ai).unwrap();
    assert_eq!(other.tree(), ws.tree());
}
