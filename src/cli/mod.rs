//! CLI Module
//!
//! Command-line host for editing a form workspace.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Formkit - edit form definitions from the command line
#[derive(Parser, Debug)]
#[command(name = "formkit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Workspace directory
    #[arg(short, long, global = true, default_value = ".")]
    pub workspace: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new workspace
    #[command(name = "init")]
    Init {
        /// Form name
        #[arg(short, long)]
        name: Option<String>,

        /// Form description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List the field kinds that can be added
    #[command(name = "palette")]
    Palette,

    /// Add a field of the given kind at the end
    #[command(name = "add")]
    Add {
        /// Field kind, e.g. textbox, email, dropdown
        kind: String,
    },

    /// Remove an element
    #[command(name = "remove")]
    Remove {
        /// Element id
        id: String,
    },

    /// Move the element at one position to another
    #[command(name = "move")]
    Move {
        /// Current position (0-based)
        from: usize,

        /// Target position (0-based)
        to: usize,
    },

    /// Update element settings
    #[command(name = "set")]
    Set {
        /// Element id
        id: String,

        /// Settings as key=value; values are parsed as JSON when possible
        #[arg(required = true)]
        settings: Vec<String>,
    },

    /// Duplicate an element
    #[command(name = "duplicate")]
    Duplicate {
        /// Element id
        id: String,
    },

    /// Select an element, or clear the selection
    #[command(name = "select")]
    Select {
        /// Element id
        id: Option<String>,

        /// Clear the selection
        #[arg(long, conflicts_with = "id")]
        clear: bool,
    },

    /// Rename the form
    #[command(name = "rename")]
    Rename {
        /// New form name
        name: String,

        /// New form description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Undo the last edit
    #[command(name = "undo")]
    Undo,

    /// Redo the last undone edit
    #[command(name = "redo")]
    Redo,

    /// Show edit history
    #[command(name = "history")]
    History,

    /// Print the current form definition
    #[command(name = "print")]
    Print {
        /// Print input descriptors instead of the raw definition
        #[arg(long)]
        inputs: bool,
    },

    /// Validate values against the form and print the submission
    #[command(name = "submit")]
    Submit {
        /// JSON object mapping field names to values
        values: String,
    },

    /// Save the form to the configured store
    #[command(name = "save")]
    Save,

    /// List forms in the file store
    #[command(name = "forms")]
    Forms,
}
