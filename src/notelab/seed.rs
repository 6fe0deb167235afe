//! Built-in starter content.
//!
//! Loaded on first run and whenever the persisted snapshot cannot be read back.

use crate::model::{Note, Project, Section, Tree, DEFAULT_LANGUAGE};
use std::sync::Arc;

const WELCOME: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>Welcome to NoteLab</title>
  <style>
    body { font-family: 'Segoe UI', Arial, sans-serif; padding: 40px; background: #f5f3ff; }
    .card { background: white; padding: 40px; border-radius: 12px; max-width: 800px; margin: 0 auto; }
    h1 { color: #6366f1; }
  </style>
</head>
<body>
  <div class="card">
    <h1>Welcome to NoteLab</h1>
    <p>Organize what you learn as <strong>Projects</strong>, <strong>Sections</strong> and <strong>Notes</strong>.</p>
    <h2>Getting around</h2>
    <ul>
      <li>Every note is an HTML page with a live preview.</li>
      <li>Tag notes to find them again with search.</li>
      <li>Save checkpoints to keep snapshots of your progress.</li>
    </ul>
    <h2>Pro tips</h2>
    <p>Search matches titles, content and tags across all projects.</p>
    <p>Export an AI context file to share your whole study tree with an assistant.</p>
  </div>
</body>
</html>"#;

const FEATURES: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>Key Features Overview</title>
  <style>
    body { font-family: Arial, sans-serif; padding: 30px; }
    .feature { border-left: 4px solid #6366f1; padding: 10px 20px; margin: 16px 0; }
  </style>
</head>
<body>
  <h1>Key Features</h1>
  <div class="feature"><h3>Split view editor</h3><p>Edit code and see the rendered page side by side.</p></div>
  <div class="feature"><h3>Projects, Sections, Notes</h3><p>A simple three-level hierarchy for any subject.</p></div>
  <div class="feature"><h3>Auto-save and checkpoints</h3><p>Every change is saved locally. Checkpoints keep snapshots you can go back to.</p></div>
  <div class="feature"><h3>Privacy first</h3><p>No backend. Your data stays on your device. Export and import JSON at will.</p></div>
</body>
</html>"#;

const WORKFLOW: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>The Copy-Paste Workflow</title>
  <style>
    body { font-family: Arial, sans-serif; padding: 30px; }
    .step { background: #eef2ff; border-radius: 8px; padding: 12px 20px; margin: 12px 0; }
  </style>
</head>
<body>
  <h1>The Copy-Paste Workflow</h1>
  <div class="step"><strong>1.</strong> Ask an assistant to write a styled HTML note on a topic.</div>
  <div class="step"><strong>2.</strong> Create a note and paste the HTML into the editor.</div>
  <div class="step"><strong>3.</strong> Tweak it, tag it, and save a checkpoint.</div>
</body>
</html>"#;

const FIRST_COMPONENT: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>First React Component</title>
  <style>
    body { font-family: Arial, sans-serif; padding: 20px; }
    .button { background: #6366f1; color: white; border: none; padding: 10px 20px; border-radius: 6px; }
  </style>
</head>
<body>
  <h1>My First Component</h1>
  <p>A button is the smallest interactive component.</p>
  <button class="button" onclick="alert('Button clicked!')">Click Me!</button>
</body>
</html>"#;

fn note(id: &str, title: &str, content: &str, tags: &[&str]) -> Arc<Note> {
    let mut note = Note::new(id.to_string(), title.to_string(), DEFAULT_LANGUAGE.to_string());
    note.content = content.to_string();
    note.tags = tags.iter().map(|t| t.to_string()).collect();
    Arc::new(note)
}

fn section(id: &str, name: &str, notes: Vec<Arc<Note>>) -> Arc<Section> {
    Arc::new(Section {
        id: id.to_string(),
        name: name.to_string(),
        notes,
    })
}

/// The tree shown to a first-time user.
pub fn seed_tree() -> Tree {
    let home = Project {
        id: "p0".to_string(),
        name: "🏠 Home - Getting Started".to_string(),
        sections: vec![
            section(
                "s0",
                "Welcome Guide",
                vec![note(
                    "n0",
                    "Welcome to NoteLab",
                    WELCOME,
                    &["guide", "welcome", "tutorial"],
                )],
            ),
            section(
                "s0b",
                "Features",
                vec![note(
                    "n0b",
                    "Key Features Overview",
                    FEATURES,
                    &["features", "guide"],
                )],
            ),
            section(
                "s0c",
                "How to Use",
                vec![note(
                    "n0c",
                    "The Copy-Paste Workflow",
                    WORKFLOW,
                    &["tutorial", "workflow", "guide"],
                )],
            ),
        ],
    };

    let react = Project {
        id: "p1".to_string(),
        name: "React Learning Path".to_string(),
        sections: vec![section(
            "s1",
            "HTML & CSS Basics",
            vec![note(
                "n1",
                "First React Component",
                FIRST_COMPONENT,
                &["react", "basics", "html"],
            )],
        )],
    };

    let exam = Project {
        id: "p2".to_string(),
        name: "TSSR Exam 2026".to_string(),
        sections: vec![
            section("s2", "Network Labs", Vec::new()),
            section("s3", "Windows Server", Vec::new()),
        ],
    };

    Tree::new(vec![home, react, exam])
}
