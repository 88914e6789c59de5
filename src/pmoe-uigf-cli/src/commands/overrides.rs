//! Override store command handlers
//!
//! Each handler reads its inputs completely, then writes exactly one file.

use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::{debug, info};

use pmoe_uigf::overrides;
use pmoe_uigf::{MissingRankReport, OverrideStore, TodoSet};

fn load_missing(path: &Path) -> Result<MissingRankReport> {
    let report = MissingRankReport::load(path)
        .with_context(|| format!("Failed to load missing-rank report {}", path.display()))?;
    debug!(path = %path.display(), items = report.len(), "Loaded missing-rank report");
    Ok(report)
}

fn load_store(path: &Path) -> Result<OverrideStore> {
    OverrideStore::load_or_default(path)
        .with_context(|| format!("Failed to load override store {}", path.display()))
}

/// Create the override store from a missing-rank report
pub fn init(missing: &Path, store_path: &Path, force: bool) -> Result<()> {
    if store_path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite, or `override todo` to extend it)",
            store_path.display()
        );
    }

    let report = load_missing(missing)?;
    let store = overrides::init(&report.items, &OverrideStore::new());

    store
        .save(store_path)
        .with_context(|| format!("Failed to write {}", store_path.display()))?;

    info!(path = %store_path.display(), entries = store.len(), "Override store created");
    println!("Created {} with {} entries", store_path.display(), store.len());
    println!("Fill in rank_type for each entry, then run convert again.");

    Ok(())
}

/// Write the entries still lacking a rank to a todo file
pub fn todo(missing: &Path, store_path: &Path, output: &Path) -> Result<()> {
    let report = load_missing(missing)?;
    let store = load_store(store_path)?;

    let mut todo = overrides::todo(&report.items, &store);
    todo.base_missing_file = missing.display().to_string();

    todo.save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(path = %output.display(), items = todo.len(), "Todo file written");
    if todo.is_empty() {
        println!("Nothing to do: every missing item already has a rank in {}", store_path.display());
    } else {
        println!("Wrote {} items to {}", todo.len(), output.display());
        println!("Fill in rank_type, then run: pmoe-uigf override merge {} {}",
            store_path.display(), output.display());
    }

    Ok(())
}

/// Merge an edited todo file back into the store
pub fn merge(store_path: &Path, todo_path: &Path) -> Result<()> {
    let store = load_store(store_path)?;
    let todo = TodoSet::load(todo_path)
        .with_context(|| format!("Failed to load todo file {}", todo_path.display()))?;

    let (merged, summary) = overrides::merge(&store, &todo);

    merged
        .save(store_path)
        .with_context(|| format!("Failed to write {}", store_path.display()))?;

    info!(
        path = %store_path.display(),
        added = summary.added,
        updated = summary.updated,
        unchanged = summary.unchanged,
        "Override store merged"
    );
    println!(
        "Merged {} into {}: {} added, {} updated, {} unchanged",
        todo_path.display(),
        store_path.display(),
        summary.added,
        summary.updated,
        summary.unchanged
    );
    println!(
        "{} of {} entries have a rank",
        merged.resolved_count(),
        merged.len()
    );

    Ok(())
}
