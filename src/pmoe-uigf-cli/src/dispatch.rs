//! Command dispatch functions
//!
//! Breaks up the main match statement into focused dispatch functions.

use anyhow::Result;

use crate::cli::OverrideCommand;
use crate::commands;

/// Dispatch override subcommands
pub fn dispatch_override(command: OverrideCommand) -> Result<()> {
    match command {
        OverrideCommand::Init {
            missing,
            store,
            force,
        } => commands::overrides::init(&missing, &store, force),

        OverrideCommand::Todo {
            missing,
            store,
            output,
        } => commands::overrides::todo(&missing, &store, &output),

        OverrideCommand::Merge { store, todo } => commands::overrides::merge(&store, &todo),
    }
}
