//! Missing-rank report: items whose rarity no lookup source could supply.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{Error, Result};
use crate::json::{lenient_string, read_json, write_json};
use crate::record::{WishRecord, TIME_FORMAT};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingRankItem {
    pub pmoe_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name_en: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name_jp: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub gacha_type: String,
}

impl MissingRankItem {
    pub fn from_record(record: &WishRecord) -> Self {
        Self {
            pmoe_id: record.item_key.clone(),
            name_en: record.name_en.clone(),
            name_jp: record.name_jp.clone(),
            gacha_type: record.gacha_type.code().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingRankReport {
    #[serde(default)]
    pub generated_at: String,
    pub items: Vec<MissingRankItem>,
}

impl MissingRankReport {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, pmoe_id: &str) -> bool {
        self.items.iter().any(|i| i.pmoe_id == pmoe_id)
    }

    /// Load a report written by a previous conversion run
    pub fn load(path: &Path) -> Result<Self> {
        let report: Self = read_json(path).map_err(|e| match e {
            Error::Json(e) => Error::override_file(path, e.to_string()),
            other => other,
        })?;
        if let Some(pos) = report.items.iter().position(|i| i.pmoe_id.trim().is_empty()) {
            return Err(Error::override_file(
                path,
                format!("items[{}] has an empty pmoe_id", pos),
            ));
        }
        Ok(report)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }
}

/// Collect unresolved records, stamped with the current local time
pub fn collect(records: &[WishRecord]) -> MissingRankReport {
    collect_at(records, Local::now().naive_local())
}

/// Collect every record still lacking a rarity.
///
/// Deduplicated by item identifier, first occurrence wins, first-seen order kept.
pub fn collect_at(records: &[WishRecord], generated_at: NaiveDateTime) -> MissingRankReport {
    let mut seen = HashSet::new();
    let items = records
        .iter()
        .filter(|r| !r.is_resolved())
        .filter(|r| seen.insert(r.item_key.as_str()))
        .map(MissingRankItem::from_record)
        .collect();

    MissingRankReport {
        generated_at: generated_at.format(TIME_FORMAT).to_string(),
        items,
    }
}

/// Missing items deduplicated by identifier, first occurrence wins
pub fn unique_items(items: &[MissingRankItem]) -> Vec<&MissingRankItem> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|i| !i.pmoe_id.is_empty() && seen.insert(i.pmoe_id.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tests::record;
    use crate::record::{parse_time, GachaType};

    #[test]
    fn test_collect_dedupes_and_skips_resolved() {
        let mut resolved = record("magic_guide", "2023-01-01 10:00:00", "1");
        resolved.rank_type = Some("3".to_string());
        let first = record("the_stringless", "2023-01-01 10:00:01", "2");
        let mut duplicate = record("the_stringless", "2023-01-02 10:00:00", "3");
        duplicate.name_jp = "絶弦".to_string();
        let other = record("favonius_lance", "2023-01-03 10:00:00", "4");

        let report = collect_at(
            &[resolved, first, duplicate, other],
            parse_time("2023-02-01 00:00:00").unwrap(),
        );

        assert_eq!(report.generated_at, "2023-02-01 00:00:00");
        let ids: Vec<&str> = report.items.iter().map(|i| i.pmoe_id.as_str()).collect();
        assert_eq!(ids, vec!["the_stringless", "favonius_lance"]);
        // First occurrence wins
        assert_eq!(report.items[0].name_jp, "");
        assert!(!report.contains("magic_guide"));
    }

    #[test]
    fn test_stringless_example() {
        let mut r = record("the_stringless", "2023-01-01 10:00:00", "1");
        r.gacha_type = GachaType::CharacterEvent;

        let report = collect(&[r]);
        assert_eq!(
            report.items,
            vec![MissingRankItem {
                pmoe_id: "the_stringless".to_string(),
                name_en: "The Stringless".to_string(),
                name_jp: String::new(),
                gacha_type: "301".to_string(),
            }]
        );
    }

    #[test]
    fn test_load_tolerates_null_names() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing-rank.json");
        std::fs::write(
            &path,
            r#"{"generated_at": "2023-01-01 00:00:00",
                "items": [{"pmoe_id": "a", "name_en": "A", "name_jp": null, "gacha_type": 301}]}"#,
        )
        .unwrap();

        let report = MissingRankReport::load(&path).unwrap();
        assert_eq!(report.items[0].name_jp, "");
        assert_eq!(report.items[0].gacha_type, "301");
    }

    #[test]
    fn test_load_rejects_bad_structure() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing-rank.json");

        std::fs::write(&path, r#"{"items": "nope"}"#).unwrap();
        assert!(MissingRankReport::load(&path).unwrap_err().is_override_file());

        std::fs::write(&path, r#"{"items": [{"pmoe_id": ""}]}"#).unwrap();
        assert!(MissingRankReport::load(&path).unwrap_err().is_override_file());
    }

    #[test]
    fn test_unique_items() {
        let item = |id: &str, name: &str| MissingRankItem {
            pmoe_id: id.to_string(),
            name_en: name.to_string(),
            name_jp: String::new(),
            gacha_type: "200".to_string(),
        };
        let items = vec![item("a", "first"), item("b", "B"), item("a", "second"), item("", "")];
        let unique = unique_items(&items);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].name_en, "first");
    }
}
