//! # Rendering Module
//!
//! Turns library values into terminal text. Every `render_*` function returns a
//! `String` so tests can check output without capturing stdout; `print_*` wrappers do
//! the actual writing.
//!
//! Layout (indentation, truncation, the age column) is computed here with Unicode
//! aware widths. Styling comes from `colored`, which drops escape codes on its own
//! when output is not a terminal.

use chrono::{DateTime, Utc};
use colored::*;
use notelab::api::{CmdMessage, MessageLevel};
use notelab::model::{detect_language, Note, NoteRef, Tree, Version};
use unicode_width::UnicodeWidthStr;

pub const LINE_WIDTH: usize = 100;
pub const TIME_WIDTH: usize = 14;
pub const SELECTED_MARKER: &str = "▸";
pub const SCRIPT_PLACEHOLDER: &str = "[script removed]";

const PROJECT_INDENT: usize = 0;
const SECTION_INDENT: usize = 2;
const NOTE_INDENT: usize = 4;

pub fn render_tree(tree: &Tree, selected: Option<&NoteRef>) -> String {
    if tree.is_empty() {
        return "No projects found.\n".to_string();
    }

    let mut out = String::new();
    for project in &tree.projects {
        out.push_str(&item_line(PROJECT_INDENT, &project.name, &project.id, true));
        if project.sections.is_empty() {
            out.push_str(&format!("{}{}\n", " ".repeat(SECTION_INDENT), "(no sections)".dimmed()));
        }
        for section in &project.sections {
            out.push_str(&item_line(SECTION_INDENT, &section.name, &section.id, false));
            for note in &section.notes {
                let is_selected = selected.is_some_and(|s| s.note_id == note.id);
                out.push_str(&note_line(note, is_selected));
            }
        }
    }
    out
}

fn item_line(indent: usize, name: &str, id: &str, bold: bool) -> String {
    let id_text = format!("({})", id);
    let available = LINE_WIDTH.saturating_sub(indent + id_text.width() + 2);
    let name = truncate_to_width(name, available);
    let name = if bold {
        name.bold().to_string()
    } else {
        name.cyan().to_string()
    };
    format!("{}{}  {}\n", " ".repeat(indent), name, id_text.dimmed())
}

fn note_line(note: &Note, is_selected: bool) -> String {
    let marker = if is_selected { SELECTED_MARKER } else { " " };
    let id_text = format!("({})", note.id);

    let mut suffix = String::new();
    for tag in &note.tags {
        suffix.push_str(&format!(" #{}", tag));
    }
    if !note.versions.is_empty() {
        suffix.push_str(&format!(" [{}]", plural(note.versions.len(), "checkpoint")));
    }

    let fixed = NOTE_INDENT + 2 + id_text.width() + 2 + suffix.width();
    let title = truncate_to_width(&note.title, LINE_WIDTH.saturating_sub(fixed).max(8));

    format!(
        "{}{} {}  {}{}\n",
        " ".repeat(NOTE_INDENT - 2),
        marker.yellow(),
        title,
        id_text.dimmed(),
        suffix.blue()
    )
}

/// Renders a note for `show`. With `allow_scripts` off, `<script>` blocks in the
/// content are replaced by [`SCRIPT_PLACEHOLDER`].
pub fn render_note(note: &Note, allow_scripts: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} {}\n", note.title.bold(), format!("({})", note.id).dimmed()));

    let mut meta = vec![format!("language: {}", detect_language(note))];
    if !note.tags.is_empty() {
        meta.push(format!("tags: {}", note.tags.join(", ")));
    }
    meta.push(plural(note.versions.len(), "checkpoint"));
    out.push_str(&format!("{}\n", meta.join("  |  ").dimmed()));

    out.push_str(&format!("{}\n", "-".repeat(32)));
    let content = if allow_scripts {
        note.content.clone()
    } else {
        without_scripts(&note.content)
    };
    out.push_str(&content);
    if !content.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Drops every `<script ...>...</script>` block, matching tags case-insensitively. An
/// unclosed block runs to the end of the content.
fn without_scripts(content: &str) -> String {
    const CLOSE: &str = "</script>";
    // ASCII lowercasing keeps byte offsets valid for `content`.
    let lower = content.to_ascii_lowercase();
    let mut out = String::with_capacity(content.len());
    let mut pos = 0;
    while let Some(start) = lower[pos..].find("<script").map(|i| pos + i) {
        out.push_str(&content[pos..start]);
        out.push_str(SCRIPT_PLACEHOLDER);
        pos = match lower[start..].find(CLOSE) {
            Some(end) => start + end + CLOSE.len(),
            None => content.len(),
        };
    }
    out.push_str(&content[pos..]);
    out
}

pub fn render_versions(note: &Note, now: DateTime<Utc>) -> String {
    if note.versions.is_empty() {
        return format!("No checkpoints for \"{}\".\n", note.title);
    }
    let mut out = String::new();
    for version in note.versions.iter().rev() {
        out.push_str(&version_line(version, now));
    }
    out
}

fn version_line(version: &Version, now: DateTime<Utc>) -> String {
    format!(
        "  {}  {}  {}\n",
        format!("#{:<4}", version.version).yellow(),
        format_time_ago(version.date, now).dimmed(),
        format!("{} chars", version.content.chars().count())
    )
}

pub fn render_messages(messages: &[CmdMessage]) -> String {
    let mut out = String::new();
    for message in messages {
        let line = match message.level {
            MessageLevel::Info => message.content.dimmed(),
            MessageLevel::Success => message.content.green(),
            MessageLevel::Warning => message.content.yellow(),
            MessageLevel::Error => message.content.red(),
        };
        out.push_str(&format!("{}\n", line));
    }
    out
}

pub fn print_messages(messages: &[CmdMessage]) {
    let output = render_messages(messages);
    if !output.is_empty() {
        print!("{}", output);
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
