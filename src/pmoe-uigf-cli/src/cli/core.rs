//! Core CLI definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::convert::ConvertArgs;
use super::overrides::OverrideCommand;

#[derive(Parser)]
#[command(name = "pmoe-uigf")]
#[command(about = "Convert Paimon.moe wish history to UIGF v4.1", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a Paimon.moe export or UIGF v3 document to UIGF v4.1
    #[command(visible_alias = "c")]
    Convert(ConvertArgs),

    /// Manage the rank-override store (init, todo, merge)
    #[command(visible_alias = "o")]
    Override {
        #[command(subcommand)]
        command: OverrideCommand,
    },

    /// Check an existing UIGF v4.1 document
    #[command(visible_alias = "v")]
    Validate {
        /// Path to the UIGF v4.1 JSON file
        file: PathBuf,

        /// JSON Schema to check against instead of the bundled v4.1 schema
        #[arg(long)]
        schema: Option<PathBuf>,
    },

    /// Configure default settings
    Configure {
        /// Default export_app written to produced documents
        #[arg(long)]
        export_app: Option<String>,

        /// Default export_app_version written to produced documents
        #[arg(long)]
        export_app_version: Option<String>,

        /// Default rank-override store location
        #[arg(long)]
        override_file: Option<PathBuf>,

        /// Genshin Dictionary word list URL
        #[arg(long)]
        dictionary_url: Option<String>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

/// Values passed to `configure`; `None` leaves the setting untouched
#[derive(Debug, Default)]
pub struct ConfigureUpdate {
    pub export_app: Option<String>,
    pub export_app_version: Option<String>,
    pub override_file: Option<PathBuf>,
    pub dictionary_url: Option<String>,
}

impl ConfigureUpdate {
    pub fn is_empty(&self) -> bool {
        self.export_app.is_none()
            && self.export_app_version.is_none()
            && self.override_file.is_none()
            && self.dictionary_url.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_validate() {
        let cli = Cli::try_parse_from(["pmoe-uigf", "-v", "validate", "out.json"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Validate { ref file, schema: None } if file == &PathBuf::from("out.json")
        ));

        let cli = Cli::try_parse_from(["pmoe-uigf", "validate", "out.json", "--schema", "uigf.schema.json"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Validate { schema: Some(ref s), .. } if s == &PathBuf::from("uigf.schema.json")
        ));
    }

    #[test]
    fn test_configure_update_is_empty() {
        assert!(ConfigureUpdate::default().is_empty());
        let update = ConfigureUpdate {
            export_app: Some("Tool".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
