//! # NoteLab Architecture
//!
//! NoteLab keeps a personal learning workspace: **projects** hold **sections**, sections
//! hold **notes**, and each note carries HTML content, tags and an append-only list of
//! **checkpoints**. The whole tree is one value, persisted as a single JSON document.
//!
//! This is a library that happens to ship a CLI client. Any UI (terminal, web view,
//! desktop shell) drives the same [`api::Workspace`].
//!
//! ## The Three-Layer Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Workspace: live tree + selection + save scheduling       │
//! │  - Returns structured CmdResult values                      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Pure functions: &Tree in, new Tree out                   │
//! │  - No I/O assumptions whatsoever                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - SnapshotStore trait, one key holding the whole tree      │
//! │  - FileStore (production), MemoryStore (testing)            │
//! │  - SaveDebouncer: coalesced background writes               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Immutable Trees
//!
//! Every mutation returns a new [`model::Tree`] and leaves its input untouched. Levels
//! are shared behind `Arc`, so an edit copies only the path from the root to the note
//! it changes. Holding on to an old tree is cheap and always safe.
//!
//! ## Testing Strategy
//!
//! 1. **Commands** (`commands/*.rs`): thorough unit tests of tree logic, built with
//!    `store::memory::fixtures::TreeFixture`.
//! 2. **API** (`api.rs`): selection and persistence wiring against a `MemoryStore`.
//! 3. **Integration** (`tests/`): end-to-end scenarios through the library and the
//!    binary.
//!
//! ## Module Overview
//!
//! - [`api`]: The Workspace facade, entry point for all operations
//! - [`commands`]: Tree operations, search, import and export
//! - [`store`]: Snapshot persistence and the save debouncer
//! - [`model`]: Tree types, ids and language detection
//! - [`seed`]: Starter content for a first run
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod seed;
pub mod store;
