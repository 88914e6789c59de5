//! JSON file helpers shared by the persisted formats.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Read and parse a JSON file
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(serde_json::from_str(&data)?)
}

/// Pretty-print `value` to `path`, replacing any previous content.
///
/// Writes a sibling temp file first and renames it over the target so a
/// crash mid-write never leaves a truncated file behind.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, json).map_err(|e| Error::io(&tmp_path, e))?;
    fs::rename(&tmp_path, path).map_err(|e| Error::io(path, e))?;
    Ok(())
}

/// Accept a string, a number or null where a string is expected.
///
/// Hand-edited files routinely contain `"rank_type": 5` or `null`.
pub fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::Bool(b)) => b.to_string(),
        Some(other) => {
            return Err(serde::de::Error::custom(format!(
                "expected a string, got {}",
                other
            )))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Sample {
        #[serde(default, deserialize_with = "lenient_string")]
        value: String,
    }

    #[test]
    fn test_lenient_string() {
        let s: Sample = serde_json::from_str(r#"{"value": 5}"#).unwrap();
        assert_eq!(s.value, "5");
        let s: Sample = serde_json::from_str(r#"{"value": null}"#).unwrap();
        assert_eq!(s.value, "");
        let s: Sample = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(s.value, "");
        assert!(serde_json::from_str::<Sample>(r#"{"value": [1]}"#).is_err());
    }

    #[test]
    fn test_write_json_keeps_unicode_and_leaves_no_temp_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("out.json");

        write_json(&path, &Sample { value: "魔導緒論".to_string() }).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("魔導緒論"));
        assert!(!temp_dir.path().join("nested").join("out.json.tmp").exists());

        let back: Sample = read_json(&path).unwrap();
        assert_eq!(back.value, "魔導緒論");
    }
}
