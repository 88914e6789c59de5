//! UIGF v3.0 intermediate document

use serde::{Deserialize, Deserializer, Serialize};

use super::{ExportMeta, UigfRecord};
use crate::json::lenient_string;
use crate::record::{chronological, WishRecord};
use crate::source::Account;

pub const UIGF_V3_VERSION: &str = "v3.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UigfV3 {
    pub info: V3Info,
    pub list: Vec<UigfRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct V3Info {
    #[serde(default, deserialize_with = "lenient_string")]
    pub uid: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lang: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub export_timestamp: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub export_time: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub export_app: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub export_app_version: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub uigf_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_time_zone: Option<i32>,
}

/// Older tools write the timestamp as a string
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = lenient_string(deserializer)?;
    if raw.trim().is_empty() {
        return Ok(0);
    }
    raw.trim()
        .parse()
        .map_err(|_| serde::de::Error::custom(format!("invalid export_timestamp {:?}", raw)))
}

impl UigfV3 {
    /// Flat v3 list of every record, in chronological order
    pub fn from_records(account: &Account, records: &[WishRecord], meta: &ExportMeta) -> Self {
        let mut ordered: Vec<&WishRecord> = records.iter().collect();
        ordered.sort_by(|a, b| chronological(a, b));

        Self {
            info: V3Info {
                uid: account.uid.clone(),
                lang: account.lang.clone(),
                export_timestamp: meta.timestamp(),
                export_time: meta.time_string(),
                export_app: meta.app.clone(),
                export_app_version: meta.app_version.clone(),
                uigf_version: UIGF_V3_VERSION.to_string(),
                region_time_zone: Some(account.timezone),
            },
            list: ordered
                .into_iter()
                .map(|r| UigfRecord::from_wish(r, &account.lang))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tests::record;

    fn account() -> Account {
        Account {
            uid: "812345678".to_string(),
            lang: "en-us".to_string(),
            timezone: 8,
        }
    }

    #[test]
    fn test_from_records_info() {
        let meta = ExportMeta::new("Tool", "2.0");
        let doc = UigfV3::from_records(&account(), &[], &meta);

        assert_eq!(doc.info.uigf_version, "v3.0");
        assert_eq!(doc.info.region_time_zone, Some(8));
        assert_eq!(doc.info.export_app, "Tool");
        assert_eq!(doc.info.export_timestamp, meta.timestamp());
        assert!(doc.list.is_empty());
    }

    #[test]
    fn test_from_records_orders_list() {
        let records = vec![
            record("b", "2023-01-02 00:00:00", "2"),
            record("a", "2023-01-01 00:00:00", "1"),
        ];
        let doc = UigfV3::from_records(&account(), &records, &ExportMeta::default());
        let ids: Vec<&str> = doc.list.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_string_timestamp_accepted() {
        let doc: UigfV3 = serde_json::from_str(
            r#"{"info": {"uid": "1", "export_timestamp": "1672531200"}, "list": []}"#,
        )
        .unwrap();
        assert_eq!(doc.info.export_timestamp, 1672531200);
    }
}
