//! Validate command handler

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use pmoe_uigf::SchemaValidator;

/// Check an existing document, printing every violation found
pub fn handle(file: &Path, schema: Option<&Path>) -> Result<()> {
    let validator = match schema {
        Some(path) => SchemaValidator::from_file(path)
            .with_context(|| format!("Failed to load schema {}", path.display()))?,
        None => SchemaValidator::bundled()?,
    };

    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let document: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {} as JSON", file.display()))?;

    let found = validator.violations(&document);
    if found.is_empty() {
        println!("{}: valid UIGF v4.1", file.display());
        return Ok(());
    }

    println!("{}: {} schema violations", file.display(), found.len());
    for v in &found {
        println!("  {:<30} {:<12} {}", v.path, v.rule, v.message);
    }
    bail!("{} does not conform to UIGF v4.1", file.display())
}
