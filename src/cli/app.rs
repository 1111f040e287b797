//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{card, deck, study, tags};
use crate::storage::{Config, Project};

#[derive(Parser)]
#[command(name = "flashdeck")]
#[command(author, version, about = "Tag-filtered flashcard decks in your terminal")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new flashdeck project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Manage decks
    #[command(subcommand)]
    Deck(deck::DeckCommands),

    /// Manage cards
    #[command(subcommand)]
    Card(card::CardCommands),

    /// List known tags
    Tags {
        /// Only tags used by cards in this deck (ID or name)
        #[arg(long)]
        deck: Option<String>,

        /// Suggest tags containing this text
        #[arg(long)]
        suggest: Option<String>,

        /// Tags to leave out of suggestions (repeat for several)
        #[arg(long)]
        exclude: Vec<String>,
    },

    /// Study a deck, optionally filtered by tags
    ///
    /// Filters combine tags left to right with AND/OR, without precedence:
    ///   flashdeck study Spanish --filter "verbs OR nouns AND irregular"
    Study {
        /// Deck ID or name
        deck: String,

        /// Initial tag filter
        #[arg(long)]
        filter: Option<String>,

        /// Print the shuffled session instead of opening the study screen
        #[arg(long)]
        list: bool,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = match cli.format {
        Some(format) => format,
        None => Config::load_global()?.default_format.into(),
    };
    let output = Output::new(format, cli.verbose);

    output.verbose("flashdeck starting");

    match cli.command {
        Commands::Init { path } => {
            output.verbose_ctx("init", &format!("Initializing project at: {}", path));
            let project = Project::init(&path)?;
            output.verbose_ctx(
                "init",
                &format!("Library at: {}", project.library_store().path().display()),
            );
            output.success(&format!(
                "Initialized flashdeck project at {}",
                project.root().display()
            ));
        }

        Commands::Deck(cmd) => deck::run(cmd, &output)?,
        Commands::Card(cmd) => card::run(cmd, &output)?,

        Commands::Tags {
            deck,
            suggest,
            exclude,
        } => {
            output.verbose_ctx(
                "tags",
                &format!("Listing tags, deck: {:?}, suggest: {:?}", deck, suggest),
            );
            tags::run(&output, deck.as_deref(), suggest.as_deref(), &exclude)?
        }

        Commands::Study { deck, filter, list } => {
            output.verbose_ctx(
                "study",
                &format!("Studying {}, filter: {:?}, list: {}", deck, filter, list),
            );
            study::run(&output, &deck, filter.as_deref(), list)?
        }
    }

    output.verbose("Command completed successfully");
    Ok(())
}
