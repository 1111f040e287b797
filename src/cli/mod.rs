//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project management | `init` |
//! | Deck | Deck management | `deck new`, `deck list`, `deck show` |
//! | Card | Card management | `card add`, `card list`, `card edit` |
//! | Tags | Tag registry and suggestions | `tags`, `tags --suggest verb` |
//! | Study | Filtered, shuffled sessions | `study <deck>`, `study <deck> --list` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! The default can be changed with `default_format` in the global config.
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output:
//! ```bash
//! flashdeck --verbose study Spanish --list
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod card;
mod deck;
mod output;
mod study;
mod tags;
mod tui;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
