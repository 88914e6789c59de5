//! Source formats and how they become canonical records.
//!
//! Two formats are accepted, each with its own parser. The caller declares
//! which one it is handing over through [`SourceMode`]; nothing here sniffs
//! the content to guess.

pub mod paimon;
pub mod uigf_v3;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::record::WishRecord;

/// Account-level facts carried alongside the records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub uid: String,
    /// UIGF language tag, e.g. `ja-jp`
    pub lang: String,
    /// Hours from UTC
    pub timezone: i32,
}

/// Parsed source, ready for enrichment
#[derive(Debug, Clone)]
pub struct SourceData {
    pub account: Account,
    /// Chronological order
    pub records: Vec<WishRecord>,
}

/// Which kind of file the caller is handing over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceMode {
    /// Paimon.moe local data export
    Paimon(PathBuf),
    /// Previously produced UIGF v3 document
    UigfV3(PathBuf),
}

impl SourceMode {
    /// Pick the mode from the two mutually exclusive path options
    pub fn from_paths(paimon: Option<PathBuf>, from_v3: Option<PathBuf>) -> Result<Self> {
        match (paimon, from_v3) {
            (Some(path), None) => Ok(Self::Paimon(path)),
            (None, Some(path)) => Ok(Self::UigfV3(path)),
            (Some(_), Some(_)) => Err(Error::input(
                "--paimon and --from-v3 cannot be used together",
            )),
            (None, None) => Err(Error::input(
                "one of --paimon or --from-v3 is required",
            )),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Paimon(path) | Self::UigfV3(path) => path,
        }
    }

    /// Native exports must always produce a missing-rank report
    pub fn requires_missing_report(&self) -> bool {
        matches!(self, Self::Paimon(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Paimon(_) => "Paimon.moe export",
            Self::UigfV3(_) => "UIGF v3",
        }
    }

    /// Read and parse the source file
    pub fn load(&self) -> Result<SourceData> {
        let path = self.path();
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let value: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| Error::input(format!("{}: invalid JSON: {}", path.display(), e)))?;

        match self {
            Self::Paimon(_) => paimon::parse(&value),
            Self::UigfV3(_) => uigf_v3::parse(value),
        }
        .map_err(|e| match e {
            Error::Input(message) => Error::input(format!("{}: {}", path.display(), message)),
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_one_mode() {
        let p = || Some(PathBuf::from("paimon.json"));
        let v = || Some(PathBuf::from("v3.json"));

        assert_eq!(
            SourceMode::from_paths(p(), None).unwrap(),
            SourceMode::Paimon(PathBuf::from("paimon.json"))
        );
        assert_eq!(
            SourceMode::from_paths(None, v()).unwrap(),
            SourceMode::UigfV3(PathBuf::from("v3.json"))
        );
        assert!(matches!(SourceMode::from_paths(p(), v()), Err(Error::Input(_))));
        assert!(matches!(SourceMode::from_paths(None, None), Err(Error::Input(_))));
    }

    #[test]
    fn test_missing_report_requirement() {
        assert!(SourceMode::Paimon(PathBuf::new()).requires_missing_report());
        assert!(!SourceMode::UigfV3(PathBuf::new()).requires_missing_report());
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("paimon.json");
        fs::write(&path, "{not json").unwrap();

        let err = SourceMode::Paimon(path).load().unwrap_err();
        assert!(matches!(err, Error::Input(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = SourceMode::UigfV3(PathBuf::from("/nonexistent/v3.json"))
            .load()
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
