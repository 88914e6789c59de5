//! UIGF document types and projection from canonical records.

pub mod v3;
pub mod v4;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::json::lenient_string;
use crate::record::{WishRecord, TIME_FORMAT};

/// The only destination version this converter emits
pub const SUPPORTED_VERSION: &str = "v4.1";

pub const DEFAULT_EXPORT_APP: &str = "PMOE-Local-Converter";
pub const DEFAULT_EXPORT_APP_VERSION: &str = "1.0.0";

/// Reject any destination version other than the supported one
pub fn check_target_version(version: &str) -> Result<()> {
    if version == SUPPORTED_VERSION {
        Ok(())
    } else {
        Err(Error::input(format!(
            "Unsupported UIGF version {:?} (only {} is supported)",
            version, SUPPORTED_VERSION
        )))
    }
}

/// Export metadata stamped into every produced document
#[derive(Debug, Clone, PartialEq)]
pub struct ExportMeta {
    pub app: String,
    pub app_version: String,
    pub exported_at: DateTime<Local>,
}

impl ExportMeta {
    pub fn new(app: impl Into<String>, app_version: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            app_version: app_version.into(),
            exported_at: Local::now(),
        }
    }

    pub fn timestamp(&self) -> i64 {
        self.exported_at.timestamp()
    }

    pub fn time_string(&self) -> String {
        self.exported_at.format(TIME_FORMAT).to_string()
    }
}

impl Default for ExportMeta {
    fn default() -> Self {
        Self::new(DEFAULT_EXPORT_APP, DEFAULT_EXPORT_APP_VERSION)
    }
}

/// One pull as written to a UIGF list. The layout is the same in v3 and v4.1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UigfRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub uigf_gacha_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub gacha_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub item_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub count: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub time: String,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "String::is_empty")]
    pub item_type: String,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "String::is_empty")]
    pub rank_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
}

impl UigfRecord {
    /// Project a record, localizing name and item type for `lang`
    pub fn from_wish(record: &WishRecord, lang: &str) -> Self {
        Self {
            uigf_gacha_type: record.gacha_type.uigf_code().to_string(),
            gacha_type: record.gacha_type.code().to_string(),
            item_id: record.item_id.clone(),
            count: "1".to_string(),
            time: record.time_string(),
            name: record.display_name(lang).to_string(),
            item_type: record
                .item_type
                .map(|t| t.label(lang).to_string())
                .unwrap_or_default(),
            rank_type: record.rank_type.clone().unwrap_or_default(),
            id: record.id.clone(),
        }
    }
}
