//! # Storage Layer
//!
//! Persistence for flashdeck: one JSON document per project.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Decks, cards, tag registry | JSON document | `.flashdeck/db.json` |
//! | Config | TOML | `.flashdeck/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - [`LibraryStore`] uses file locking (`fs2`) for concurrent access
//! - All writes are atomic (temp file + rename)
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point for accessing a flashdeck project
//! - [`LibraryStore`] - Read/write the library document
//! - [`DeckService`] - Deck, card and tag operations
//! - [`Config`] - Project and global configuration

mod document;
mod service;
mod config;
mod project;

pub use document::{Library, LibraryStore};
pub use service::{DeckService, StoreError};
pub use config::{Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig, StudyConfig};
pub use project::{Project, ProjectError};
