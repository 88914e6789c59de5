//! CLI definitions for the override command

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum OverrideCommand {
    /// Create the override store from a missing-rank report
    Init {
        /// Missing-rank report written by convert
        missing: PathBuf,

        /// Override store to create
        store: PathBuf,

        /// Overwrite an existing store
        #[arg(short, long)]
        force: bool,
    },

    /// Write the items still lacking a rank to a todo file for editing
    Todo {
        /// Missing-rank report written by convert
        missing: PathBuf,

        /// Override store (read only)
        store: PathBuf,

        /// Todo file to write
        output: PathBuf,
    },

    /// Merge an edited todo file back into the override store
    Merge {
        /// Override store to update
        store: PathBuf,

        /// Edited todo file
        todo: PathBuf,
    },
}
