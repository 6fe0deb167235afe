//! # Command Layer
//!
//! Business logic for every tree operation. Commands are pure functions over a
//! [`Tree`](crate::model::Tree): they take the current tree by reference and return a
//! new one, never touching the input. They know nothing about selection, persistence
//! or terminals; the [`api`](crate::api) facade wires those in.
//!
//! Mutations aimed at ids that are not in the tree are silent no-ops: the returned
//! tree equals the input.

use crate::model::Tree;

pub mod checkpoint;
pub mod create;
pub mod delete;
pub mod export;
pub mod helpers;
pub mod import;
pub mod rename;
pub mod search;
pub mod tagging;
pub mod update;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// An exported document ready to be written out.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub file_name: String,
    pub contents: String,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Id of the entity an add-operation created.
    pub created_id: Option<String>,
    /// Number of the checkpoint just saved.
    pub checkpoint: Option<u32>,
    /// Tree derived for display (e.g. a search result).
    pub listed_tree: Option<Tree>,
    pub export: Option<ExportFile>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_created_id(mut self, id: Option<String>) -> Self {
        self.created_id = id;
        self
    }

    pub fn with_checkpoint(mut self, version: Option<u32>) -> Self {
        self.checkpoint = version;
        self
    }

    pub fn with_listed_tree(mut self, tree: Tree) -> Self {
        self.listed_tree = Some(tree);
        self
    }

    pub fn with_export(mut self, export: ExportFile) -> Self {
        self.export = Some(export);
        self
    }
}
