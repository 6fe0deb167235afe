use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "notelab", bin_name = "notelab", version)]
#[command(about = "Organize study notes into projects and sections", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the note data and config (overrides NOTELAB_HOME)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the project tree, optionally filtered by a search query
    Tree {
        /// Only show notes whose title, content or tags contain this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Create a project
    #[command(alias = "ap")]
    AddProject { name: String },

    /// Create a section inside a project
    #[command(alias = "as")]
    AddSection { project: String, name: String },

    /// Create a note from the starter template
    #[command(alias = "an")]
    AddNote {
        project: String,
        section: String,
        title: String,
    },

    /// Rename a project, section or note
    Rename {
        #[command(subcommand)]
        target: RenameTarget,
    },

    /// Delete a project, section or note and everything under it
    #[command(alias = "rm")]
    Delete {
        /// Skip the confirmation prompt
        #[arg(short, long, global = true)]
        yes: bool,

        #[command(subcommand)]
        target: ItemTarget,
    },

    /// Print a note's content
    Show { note: String },

    /// Replace a note's content (reads stdin when neither option is given)
    Edit {
        note: String,

        /// New content
        #[arg(long, conflicts_with = "file")]
        content: Option<String>,

        /// Read new content from a file
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Add or remove a tag
    Tag {
        #[command(subcommand)]
        action: TagAction,
    },

    /// Save a checkpoint of a note's current content
    #[command(alias = "cp")]
    Checkpoint { note: String },

    /// List a note's checkpoints
    Versions { note: String },

    /// Export the whole tree as JSON
    Export {
        /// Export the AI context document instead of a plain backup
        #[arg(long)]
        ai: bool,

        /// Output file (defaults to a dated file name in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace the whole tree with an exported JSON document
    Import { path: PathBuf },
}

#[derive(Subcommand, Debug)]
pub enum ItemTarget {
    Project {
        project: String,
    },
    Section {
        project: String,
        section: String,
    },
    Note {
        note: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum RenameTarget {
    Project {
        project: String,
        name: String,
    },
    Section {
        project: String,
        section: String,
        name: String,
    },
    Note {
        note: String,
        name: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum TagAction {
    Add { note: String, tag: String },
    Remove { note: String, tag: String },
}
