//! CLI argument definitions for pmoe-uigf
//!
//! This module contains all clap-derived structs and enums for CLI parsing.

mod convert;
mod core;
mod overrides;

pub use convert::ConvertArgs;
pub use core::{Cli, Commands, ConfigureUpdate};
pub use overrides::OverrideCommand;
