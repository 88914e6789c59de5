//! UIGF v4.1 destination document

use serde::{Deserialize, Serialize};

use super::{check_target_version, ExportMeta, UigfRecord};
use crate::error::Result;
use crate::record::{chronological, WishRecord};
use crate::source::Account;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UigfV4 {
    pub info: V4Info,
    pub hk4e: Vec<Hk4eAccount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct V4Info {
    pub export_timestamp: i64,
    pub export_app: String,
    pub export_app_version: String,
    pub version: String,
}

/// One account group in `hk4e`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hk4eAccount {
    pub uid: String,
    pub timezone: i32,
    pub lang: String,
    pub list: Vec<UigfRecord>,
}

impl UigfV4 {
    pub fn record_count(&self) -> usize {
        self.hk4e.iter().map(|a| a.list.len()).sum()
    }

    /// Serialize for validation and writing
    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Build the destination document for one account
pub fn project(
    account: &Account,
    records: &[WishRecord],
    meta: &ExportMeta,
    version: &str,
) -> Result<UigfV4> {
    check_target_version(version)?;

    let mut ordered: Vec<&WishRecord> = records.iter().collect();
    ordered.sort_by(|a, b| chronological(a, b));

    Ok(UigfV4 {
        info: V4Info {
            export_timestamp: meta.timestamp(),
            export_app: meta.app.clone(),
            export_app_version: meta.app_version.clone(),
            version: version.to_string(),
        },
        hk4e: vec![Hk4eAccount {
            uid: account.uid.clone(),
            timezone: account.timezone,
            lang: account.lang.clone(),
            list: ordered
                .into_iter()
                .map(|r| UigfRecord::from_wish(r, &account.lang))
                .collect(),
        }],
    })
}
