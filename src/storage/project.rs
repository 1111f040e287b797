//! Project management
//!
//! Handles project initialization and provides access to the library store.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::config::PROJECT_DIR;
use super::{Config, Library, LibraryStore};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a flashdeck project. Run 'flashdeck init' first.")]
    NotInProject,
}

/// A flashdeck project
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(PROJECT_DIR).is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let flash_dir = root.join(PROJECT_DIR);

        fs::create_dir_all(&flash_dir).with_context(|| {
            format!("Failed to create {} directory: {}", PROJECT_DIR, flash_dir.display())
        })?;

        // Create default config
        let config_path = flash_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# flashdeck configuration

# Library document, relative to this directory
database = "db.json"

[study]
# Study screen input poll interval (milliseconds)
tick_rate_ms = 250

# Maximum tag suggestions shown by 'flashdeck tags --suggest'
suggestion_limit = 4
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        // Create .gitignore for lock and temp files
        let gitignore_path = flash_dir.join(".gitignore");
        if !gitignore_path.exists() {
            let gitignore = r#"# Lock and temp files written next to the library
*.lock
*.tmp
"#;
            fs::write(&gitignore_path, gitignore).with_context(|| {
                format!("Failed to write .gitignore: {}", gitignore_path.display())
            })?;
        }

        let project = Self::open(root)?;

        // Seed an empty library
        let store = project.library_store();
        if !store.path().exists() {
            store.write(&Library::default())?;
        }

        Ok(project)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .flashdeck directory path
    pub fn flash_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the library store
    pub fn library_store(&self) -> LibraryStore {
        LibraryStore::new(self.flash_dir().join(&self.config.project.database))
    }
}
