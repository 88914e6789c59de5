//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up pmoe-uigf defaults.

use crate::cli::ConfigureUpdate;
use crate::config::Config;
use anyhow::Result;

/// Handle the configure command
///
/// # Arguments
/// * `update` - Settings to change; unset fields are left alone
/// * `show` - If true, show current configuration
pub fn handle(update: ConfigureUpdate, show: bool) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        show_config(&config);
        return Ok(());
    }

    if update.is_empty() {
        show_usage();
        return Ok(());
    }

    apply(&mut config, update);
    config.save()?;

    println!("Configuration updated");
    if let Ok(path) = Config::config_path() {
        println!("Config saved to: {}", path.display());
    }

    Ok(())
}

fn apply(config: &mut Config, update: ConfigureUpdate) {
    if let Some(app) = update.export_app {
        config.export_app = Some(app);
    }
    if let Some(version) = update.export_app_version {
        config.export_app_version = Some(version);
    }
    if let Some(path) = update.override_file {
        config.override_file = Some(path);
    }
    if let Some(url) = update.dictionary_url {
        config.dictionary_url = Some(url);
    }
}

/// Display current configuration
fn show_config(config: &Config) {
    println!("export_app:         {}", config.export_app());
    println!("export_app_version: {}", config.export_app_version());
    println!("override_file:      {}", config.override_file().display());
    println!("dictionary_url:     {}", config.dictionary_url());
    println!("cache TTL:          {}h", config.cache_ttl().as_secs() / 3600);
    println!("timeout:            {}s", config.timeout().as_secs());

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }
    if let Ok(path) = Config::cache_path() {
        println!("Word list cache: {}", path.display());
    }
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: pmoe-uigf configure --export-app NAME --export-app-version VERSION");
    println!("       pmoe-uigf configure --override-file PATH");
    println!("   or: pmoe-uigf configure --show");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_show_usage_does_not_panic() {
        show_usage();
    }

    #[test]
    fn test_apply_only_touches_given_fields() {
        let mut config = Config {
            export_app: Some("Old".to_string()),
            dictionary_url: Some("http://mirror/words.json".to_string()),
            ..Default::default()
        };

        apply(
            &mut config,
            ConfigureUpdate {
                export_app: Some("New".to_string()),
                override_file: Some(PathBuf::from("/data/rank-override.json")),
                ..Default::default()
            },
        );

        assert_eq!(config.export_app(), "New");
        assert_eq!(config.override_file(), PathBuf::from("/data/rank-override.json"));
        assert_eq!(config.dictionary_url(), "http://mirror/words.json");
        assert_eq!(config.export_app_version, None);
    }

    #[test]
    fn test_config_path_exists() {
        let result = Config::config_path();
        assert!(result.is_ok());
    }
}
