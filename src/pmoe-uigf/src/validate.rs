//! UIGF v4.1 JSON Schema validation.
//!
//! The published v4.1 schema ships inside the crate. A different copy can be
//! loaded from disk with [`SchemaValidator::from_file`]. Each failure is
//! reported with the JSON path of the offending value and the schema
//! keyword that rejected it.

use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Published UIGF v4.1 schema
pub const BUNDLED_SCHEMA: &str = include_str!("../schema/uigf-v4.1.schema.json");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// Slash-separated JSON path, `root` for the document itself
    pub path: String,
    /// Schema keyword that failed (`required`, `type`, `enum`, ...)
    pub rule: String,
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {} ({})", self.message, self.path, self.rule)
    }
}

impl SchemaViolation {
    fn from_error(error: jsonschema::ValidationError<'_>) -> Self {
        let path = error.instance_path.to_string();
        let path = match path.trim_start_matches('/') {
            "" => "root".to_string(),
            p => p.to_string(),
        };
        let rule = error
            .schema_path
            .to_string()
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();

        Self {
            path,
            rule,
            message: error.to_string(),
        }
    }
}

/// A compiled destination schema
pub struct SchemaValidator {
    validator: jsonschema::Validator,
}

impl SchemaValidator {
    /// The schema bundled with this crate
    pub fn bundled() -> Result<Self> {
        let schema: Value = serde_json::from_str(BUNDLED_SCHEMA)?;
        Self::from_value(&schema)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let schema: Value = serde_json::from_str(&text)
            .map_err(|e| Error::input(format!("{}: {}", path.display(), e)))?;
        Self::from_value(&schema)
            .map_err(|e| Error::input(format!("{}: {}", path.display(), e)))
    }

    pub fn from_value(schema: &Value) -> Result<Self> {
        let validator = jsonschema::validator_for(schema)
            .map_err(|e| Error::input(format!("unusable JSON Schema: {}", e)))?;
        Ok(Self { validator })
    }

    /// Every violation in the document
    pub fn violations(&self, document: &Value) -> Vec<SchemaViolation> {
        self.validator
            .iter_errors(document)
            .map(SchemaViolation::from_error)
            .collect()
    }

    /// Fail with the first violation, if any
    pub fn validate(&self, document: &Value) -> Result<()> {
        match self.violations(document).into_iter().next() {
            Some(violation) => Err(Error::Schema(violation)),
            None => Ok(()),
        }
    }
}

/// Every violation against the bundled schema
pub fn violations(document: &Value) -> Result<Vec<SchemaViolation>> {
    Ok(SchemaValidator::bundled()?.violations(document))
}

pub fn validate_v41(document: &Value) -> Result<()> {
    SchemaValidator::bundled()?.validate(document)
}
