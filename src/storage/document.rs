//! Single-document JSON storage
//!
//! Every deck, card and the global tag registry live in one JSON document
//! (`.flashdeck/db.json` by default) that is read and written wholesale:
//!
//! ```json
//! { "decks": [ { "id": "d-7f2b4c1", "name": "Spanish", "cards": [] } ], "tags": [] }
//! ```
//!
//! Reads take a shared lock on the document; writes go to a temp file under
//! an exclusive lock and are renamed into place. Read-modify-write cycles
//! ([`LibraryStore::update`]) additionally hold an exclusive lock on a
//! sidecar `.lock` file so concurrent updates do not lose each other's work.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::domain::{Deck, DeckId};

/// The whole stored library
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    #[serde(default)]
    pub decks: Vec<Deck>,

    /// Every tag ever used on a created card, in first-use order
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Library {
    pub fn deck(&self, id: &DeckId) -> Option<&Deck> {
        self.decks.iter().find(|d| &d.id == id)
    }

    pub fn deck_mut(&mut self, id: &DeckId) -> Option<&mut Deck> {
        self.decks.iter_mut().find(|d| &d.id == id)
    }

    /// Appends tags not yet in the registry
    pub fn register_tags(&mut self, tags: &[String]) {
        for tag in tags {
            if !self.tags.contains(tag) {
                self.tags.push(tag.clone());
            }
        }
    }
}

/// Store for the library document
pub struct LibraryStore {
    path: PathBuf,
}

impl LibraryStore {
    /// Creates a new store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the document
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("json.lock")
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    /// Reads the library. A missing or blank document is an empty library.
    pub fn read(&self) -> Result<Library> {
        if !self.path.exists() {
            return Ok(Library::default());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open library: {}", self.path.display()))?;

        // Acquire shared lock for reading
        file.lock_shared()
            .context("Failed to acquire read lock on library")?;

        let mut content = String::new();
        BufReader::new(&file)
            .read_to_string(&mut content)
            .with_context(|| format!("Failed to read library: {}", self.path.display()))?;

        if content.trim().is_empty() {
            return Ok(Library::default());
        }

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse library: {}", self.path.display()))
    }

    /// Writes the whole library (full rewrite)
    pub fn write(&self, library: &Library) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let temp_path = self.temp_path();

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            file.lock_exclusive()
                .context("Failed to acquire write lock on library")?;

            let mut writer = BufWriter::new(&file);
            serde_json::to_writer_pretty(&mut writer, library)
                .context("Failed to serialize library")?;
            writeln!(writer).context("Failed to write library")?;
            writer.flush().context("Failed to flush library")?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }

    /// Applies `change` to the stored library and writes the result.
    ///
    /// Nothing is written when `change` fails.
    pub fn update<T>(&self, change: impl FnOnce(&mut Library) -> Result<T>) -> Result<T> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let lock_path = self.lock_path();
        let lock = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file: {}", lock_path.display()))?;
        lock.lock_exclusive()
            .context("Failed to acquire update lock on library")?;

        let mut library = self.read()?;
        let value = change(&mut library)?;
        self.write(&library)?;

        // Lock is released when `lock` is dropped
        Ok(value)
    }
}
