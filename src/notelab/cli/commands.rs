//! # CLI Layer
//!
//! This module is **one possible UI client** for notelab, not the application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr, stdin)
//! - Handles argument parsing
//! - Reads and writes files named on the command line
//! - Formats output for human consumption
//!
//! Each invocation opens a [`Workspace`] on the data directory, runs one command and
//! flushes before exiting, so a pending save is never lost to process exit.
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Resolves the data directory, loads config, opens the workspace
//! - `handle_*()`: Per-command handlers that call the workspace and print results

use super::render::{print_messages, render_note, render_tree, render_versions};
use super::setup::{Cli, Commands, ItemTarget, RenameTarget, TagAction};
use chrono::Utc;
use clap::Parser;
use directories::ProjectDirs;
use notelab::api::{ExportKind, Workspace};
use notelab::config::NotelabConfig;
use notelab::error::{NotelabError, Result};
use notelab::model::{ItemRef, Note};
use notelab::store::fs::FileStore;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

const HOME_ENV: &str = "NOTELAB_HOME";

struct AppContext {
    workspace: Workspace,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut ctx = init_context(&cli)?;

    let outcome = match cli.command {
        Some(Commands::Tree { search }) => handle_tree(&ctx, search),
        Some(Commands::AddProject { name }) => handle_add_project(&mut ctx, &name),
        Some(Commands::AddSection { project, name }) => {
            handle_add_section(&mut ctx, &project, &name)
        }
        Some(Commands::AddNote {
            project,
            section,
            title,
        }) => handle_add_note(&mut ctx, &project, &section, &title),
        Some(Commands::Rename { target }) => handle_rename(&mut ctx, target),
        Some(Commands::Delete { yes, target }) => handle_delete(&mut ctx, target, yes),
        Some(Commands::Show { note }) => handle_show(&ctx, &note),
        Some(Commands::Edit {
            note,
            content,
            file,
        }) => handle_edit(&mut ctx, &note, content, file),
        Some(Commands::Tag { action }) => handle_tag(&mut ctx, action),
        Some(Commands::Checkpoint { note }) => handle_checkpoint(&mut ctx, &note),
        Some(Commands::Versions { note }) => handle_versions(&ctx, &note),
        Some(Commands::Export { ai, output }) => handle_export(&ctx, ai, output),
        Some(Commands::Import { path }) => handle_import(&mut ctx, &path),
        None => handle_tree(&ctx, None),
    };

    let flushed = ctx.workspace.flush();
    outcome.and(flushed)
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = resolve_data_dir(cli.data_dir.clone())?;
    tracing::debug!(data_dir = %data_dir.display(), "opening workspace");

    let config = NotelabConfig::load(&data_dir).unwrap_or_else(|e| {
        tracing::warn!("ignoring unreadable config: {}", e);
        NotelabConfig::default()
    });
    let store = FileStore::new(data_dir);

    Ok(AppContext {
        workspace: Workspace::open(store, config),
    })
}

/// `--data-dir`, then `NOTELAB_HOME`, then the platform data directory.
fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "notelab", "notelab")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| NotelabError::Api("Could not determine data directory".to_string()))
}

fn find_note<'a>(ctx: &'a AppContext, note_id: &str) -> Result<&'a Note> {
    ctx.workspace
        .tree()
        .note(note_id)
        .ok_or_else(|| NotelabError::Api(format!("Note not found: {}", note_id)))
}

fn note_ref(ctx: &AppContext, note_id: &str) -> Result<ItemRef> {
    ctx.workspace
        .tree()
        .find_note(note_id)
        .map(|(location, _)| location.into())
        .ok_or_else(|| NotelabError::Api(format!("Note not found: {}", note_id)))
}

fn handle_tree(ctx: &AppContext, search: Option<String>) -> Result<()> {
    let query = search.unwrap_or_default();
    let result = ctx.workspace.visible_tree(&query);
    if let Some(tree) = &result.listed_tree {
        if !tree.is_empty() || query.is_empty() {
            print!("{}", render_tree(tree, ctx.workspace.selection()));
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_add_project(ctx: &mut AppContext, name: &str) -> Result<()> {
    let result = ctx.workspace.add_project(name);
    print_messages(&result.messages);
    Ok(())
}

fn handle_add_section(ctx: &mut AppContext, project: &str, name: &str) -> Result<()> {
    let result = ctx.workspace.add_section(project, name);
    print_messages(&result.messages);
    Ok(())
}

fn handle_add_note(ctx: &mut AppContext, project: &str, section: &str, title: &str) -> Result<()> {
    let result = ctx.workspace.add_note(project, section, title);
    print_messages(&result.messages);
    Ok(())
}

fn handle_rename(ctx: &mut AppContext, target: RenameTarget) -> Result<()> {
    let (item, name) = match target {
        RenameTarget::Project { project, name } => (ItemRef::project(project), name),
        RenameTarget::Section {
            project,
            section,
            name,
        } => (ItemRef::section(project, section), name),
        RenameTarget::Note { note, name } => (note_ref(ctx, &note)?, name),
    };
    let result = ctx.workspace.rename(&item, &name);
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, target: ItemTarget, yes: bool) -> Result<()> {
    let item = match target {
        ItemTarget::Project { project } => ItemRef::project(project),
        ItemTarget::Section { project, section } => ItemRef::section(project, section),
        ItemTarget::Note { note } => note_ref(ctx, &note)?,
    };

    if !ctx.workspace.tree().contains(&item) {
        return Err(NotelabError::Api(format!("{} not found", item.kind())));
    }

    if !yes && !confirm_delete(ctx, &item)? {
        println!("Operation cancelled.");
        return Ok(());
    }

    let result = ctx.workspace.delete(&item);
    print_messages(&result.messages);
    Ok(())
}

/// Lists what is about to go and waits for an explicit `Y`.
fn confirm_delete(ctx: &AppContext, item: &ItemRef) -> Result<bool> {
    let tree = ctx.workspace.tree();
    let summary = match item {
        ItemRef::Project { project_id } => tree.project(project_id).map(|p| {
            let notes: usize = p.sections.iter().map(|s| s.notes.len()).sum();
            format!(
                "project \"{}\" with {} section(s) and {} note(s)",
                p.name,
                p.sections.len(),
                notes
            )
        }),
        ItemRef::Section {
            project_id,
            section_id,
        } => tree
            .section(project_id, section_id)
            .map(|s| format!("section \"{}\" with {} note(s)", s.name, s.notes.len())),
        ItemRef::Note { note_id, .. } => tree
            .note(note_id)
            .map(|n| format!("note \"{}\"", n.title)),
    };
    let Some(summary) = summary else {
        return Ok(false);
    };

    println!("This will permanently delete the {}.", summary);
    print!("[Y] To delete: ");
    io::stdout().flush().map_err(NotelabError::Io)?;

    let mut input = String::new();
    io::stdin().read_line(&mut input).map_err(NotelabError::Io)?;
    Ok(input.trim() == "Y")
}

fn handle_show(ctx: &AppContext, note_id: &str) -> Result<()> {
    let note = find_note(ctx, note_id)?;
    let allow_scripts = ctx.workspace.config().allow_scripts;
    print!("{}", render_note(note, allow_scripts));
    Ok(())
}

fn handle_edit(
    ctx: &mut AppContext,
    note_id: &str,
    content: Option<String>,
    file: Option<PathBuf>,
) -> Result<()> {
    find_note(ctx, note_id)?;

    let content = match (content, file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path).map_err(NotelabError::Io)?,
        (None, None) => {
            if io::stdin().is_terminal() {
                return Err(NotelabError::Api(
                    "No content given: use --content, --file or pipe it on stdin".to_string(),
                ));
            }
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(NotelabError::Io)?;
            buffer
        }
    };

    ctx.workspace.update_content(note_id, &content);
    println!("Updated {}", note_id);
    Ok(())
}

fn handle_tag(ctx: &mut AppContext, action: TagAction) -> Result<()> {
    let result = match action {
        TagAction::Add { note, tag } => {
            find_note(ctx, &note)?;
            ctx.workspace.add_tag(&note, &tag)
        }
        TagAction::Remove { note, tag } => {
            find_note(ctx, &note)?;
            ctx.workspace.remove_tag(&note, &tag)
        }
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_checkpoint(ctx: &mut AppContext, note_id: &str) -> Result<()> {
    find_note(ctx, note_id)?;
    let result = ctx.workspace.save_checkpoint(note_id);
    print_messages(&result.messages);
    Ok(())
}

fn handle_versions(ctx: &AppContext, note_id: &str) -> Result<()> {
    let note = find_note(ctx, note_id)?;
    print!("{}", render_versions(note, Utc::now()));
    Ok(())
}

fn handle_export(ctx: &AppContext, ai: bool, output: Option<PathBuf>) -> Result<()> {
    let kind = if ai {
        ExportKind::AiContext
    } else {
        ExportKind::Backup
    };
    let result = ctx.workspace.export(kind)?;
    let Some(export) = &result.export else {
        return Ok(());
    };

    let path = output.unwrap_or_else(|| PathBuf::from(&export.file_name));
    if path.as_os_str() == "-" {
        println!("{}", export.contents);
        return Ok(());
    }
    std::fs::write(&path, &export.contents).map_err(NotelabError::Io)?;

    print_messages(&result.messages);
    println!("Wrote {}", path.display());
    Ok(())
}

fn handle_import(ctx: &mut AppContext, path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path).map_err(NotelabError::Io)?;
    let result = ctx.workspace.import(&text)?;
    print_messages(&result.messages);
    Ok(())
}
