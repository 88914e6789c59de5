//! Convert command handler
//!
//! Every input is checked and parsed before the first file is written.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use pmoe_uigf::json::write_json;
use pmoe_uigf::uigf::check_target_version;
use pmoe_uigf::{
    assemble, Conversion, ConvertOptions, DictionaryClient, Error, ExportMeta, OverrideStore,
    SourceMode,
};

use crate::cli::ConvertArgs;
use crate::config::Config;

/// Settings for one run after merging flags, config and defaults
#[derive(Debug)]
struct Plan {
    mode: SourceMode,
    override_file: PathBuf,
    options: ConvertOptions,
}

fn plan(args: &ConvertArgs, config: &Config) -> Result<Plan> {
    let mode = SourceMode::from_paths(args.paimon.clone(), args.from_v3.clone())?;

    if mode.requires_missing_report() && args.missing_rank_out.is_none() {
        return Err(Error::Input(
            "--missing-rank-out is required when converting a Paimon.moe export".to_string(),
        )
        .into());
    }
    check_target_version(&args.target_version)?;

    let meta = ExportMeta::new(
        args.export_app.as_deref().unwrap_or(config.export_app()),
        args.export_app_version
            .as_deref()
            .unwrap_or(config.export_app_version()),
    );

    Ok(Plan {
        mode,
        override_file: args
            .override_file
            .clone()
            .unwrap_or_else(|| config.override_file()),
        options: ConvertOptions {
            target_version: args.target_version.clone(),
            meta,
        },
    })
}

fn dictionary_client(args: &ConvertArgs, config: &Config) -> DictionaryClient {
    let url = args
        .dictionary_url
        .as_deref()
        .unwrap_or(config.dictionary_url());
    let client = DictionaryClient::new(url)
        .with_timeout(config.timeout())
        .offline(args.offline);

    match Config::cache_path() {
        Ok(path) => client.with_cache(path, config.cache_ttl()),
        Err(e) => {
            warn!("Word list will not be cached: {}", e);
            client
        }
    }
}

/// Handle the convert command
pub fn handle(args: ConvertArgs) -> Result<()> {
    let config = Config::load()?;
    run(&args, &config, dictionary_client(&args, &config))
}

fn run(args: &ConvertArgs, config: &Config, client: DictionaryClient) -> Result<()> {
    let plan = plan(args, config)?;

    info!(source = plan.mode.name(), path = %plan.mode.path().display(), "Reading source");
    let source = plan.mode.load()?;

    let overrides = OverrideStore::load_or_default(&plan.override_file)
        .with_context(|| format!("Failed to load override store {}", plan.override_file.display()))?
        .snapshot();
    info!(path = %plan.override_file.display(), entries = overrides.len(), "Loaded override store");

    let (dictionary, status) = client.load();
    if status.is_degraded() {
        warn!("Dictionary {}", status);
    } else {
        info!("Dictionary {}", status);
    }

    let conversion = assemble(source, &overrides, &dictionary, &plan.options)?;

    if let Err(e) = conversion.validate() {
        if let Some(path) = &args.write_invalid {
            write_json(path, &conversion.document)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            warn!(path = %path.display(), "Invalid document written for inspection");
        }
        return Err(e).context("Converted document failed UIGF v4.1 validation");
    }

    write_outputs(args, &conversion)?;
    print_summary(args, &conversion);

    Ok(())
}

fn write_outputs(args: &ConvertArgs, conversion: &Conversion) -> Result<()> {
    if let Some(path) = &args.v3_out {
        write_file(path, &conversion.intermediate)?;
    }
    if let Some(path) = &args.missing_rank_out {
        conversion
            .missing
            .save(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    write_file(&args.output, &conversion.document)
}

fn write_file<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    write_json(path, value).with_context(|| format!("Failed to write {}", path.display()))
}

fn print_summary(args: &ConvertArgs, conversion: &Conversion) {
    let stats = &conversion.stats;
    println!(
        "Converted {} records for UID {} to {}",
        conversion.document.record_count(),
        conversion.account.uid,
        args.output.display()
    );
    println!(
        "  rank from overrides: {}, Japanese names from overrides: {}, from dictionary: {}",
        stats.rank_from_override, stats.name_from_override, stats.name_from_dictionary
    );
    if let Some(path) = &args.v3_out {
        println!("  UIGF v3: {}", path.display());
    }
    if conversion.missing.is_empty() {
        println!("  Every item has a rank");
    } else {
        println!(
            "  {} items without a rank ({} records)",
            conversion.missing.len(),
            stats.unresolved_rank
        );
        if let Some(path) = &args.missing_rank_out {
            println!("  Missing-rank report: {}", path.display());
            println!("  Next: pmoe-uigf override init {} <OVERRIDE>", path.display());
        }
    }
}
