//! Command handlers for pmoe-uigf CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod configure;
pub mod convert;
pub mod overrides;
pub mod validate;
