//! End-to-end conversion: parsed source to validated v4.1 document.

use tracing::{debug, info};

use crate::dictionary::NameLookup;
use crate::enrich::{self, EnrichStats};
use crate::error::Result;
use crate::missing::{self, MissingRankReport};
use crate::overrides::OverrideSnapshot;
use crate::source::{Account, SourceData};
use crate::uigf::v3::UigfV3;
use crate::uigf::v4::{self, UigfV4};
use crate::uigf::{check_target_version, ExportMeta, SUPPORTED_VERSION};
use crate::validate::validate_v41;

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub target_version: String,
    pub meta: ExportMeta,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            target_version: SUPPORTED_VERSION.to_string(),
            meta: ExportMeta::default(),
        }
    }
}

/// Everything one run produces. Nothing is written here.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub account: Account,
    pub document: UigfV4,
    pub intermediate: UigfV3,
    pub missing: MissingRankReport,
    pub stats: EnrichStats,
}

impl Conversion {
    /// Check the destination document against the v4.1 rules
    pub fn validate(&self) -> Result<()> {
        validate_v41(&self.document.to_value()?)
    }
}

/// Enrich and project without validating.
///
/// Used directly when the caller wants to keep an invalid document for
/// inspection; otherwise call [`convert`].
pub fn assemble(
    source: SourceData,
    overrides: &OverrideSnapshot,
    dictionary: &impl NameLookup,
    options: &ConvertOptions,
) -> Result<Conversion> {
    check_target_version(&options.target_version)?;

    let SourceData { account, records } = source;
    debug!(
        uid = %account.uid,
        lang = %account.lang,
        records = records.len(),
        overrides = overrides.len(),
        "Enriching records"
    );

    let (records, stats) = enrich::resolve_all(records, overrides, dictionary);
    info!(
        records = stats.records,
        rank_from_override = stats.rank_from_override,
        name_from_override = stats.name_from_override,
        name_from_dictionary = stats.name_from_dictionary,
        unresolved_rank = stats.unresolved_rank,
        unresolved_name = stats.unresolved_name,
        "Enrichment complete"
    );

    let missing = missing::collect(&records);
    let intermediate = UigfV3::from_records(&account, &records, &options.meta);
    let document = v4::project(&account, &records, &options.meta, &options.target_version)?;

    Ok(Conversion {
        account,
        document,
        intermediate,
        missing,
        stats,
    })
}

/// Enrich, project and validate
pub fn convert(
    source: SourceData,
    overrides: &OverrideSnapshot,
    dictionary: &impl NameLookup,
    options: &ConvertOptions,
) -> Result<Conversion> {
    let conversion = assemble(source, overrides, dictionary, options)?;
    conversion.validate()?;
    Ok(conversion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Dictionary;
    use crate::error::Error;
    use crate::overrides::{OverrideEntry, OverrideStore};
    use crate::source::paimon;
    use serde_json::json;
    use std::collections::HashSet;

    fn source() -> SourceData {
        paimon::parse(&json!({
            "wish-uid": "812345678",
            "locale": "ja",
            "wish-counter-character-event": {"pulls": [
                {"type": "weapon", "id": "the_stringless", "time": "2023-01-01 10:00:00"},
                {"type": "character", "id": "hu_tao", "time": "2023-01-01 10:00:05", "rarity": 5}
            ]},
            "wish-counter-standard": {"pulls": [
                {"type": "weapon", "id": "magic_guide", "time": "2023-01-01 09:00:00"},
                {"type": "weapon", "id": "magic_guide", "time": "2023-01-02 09:00:00"}
            ]}
        }))
        .unwrap()
    }

    fn overrides() -> OverrideSnapshot {
        let mut store = OverrideStore::new();
        store.insert(OverrideEntry {
            pmoe_id: "magic_guide".to_string(),
            name_jp: "魔導緒論".to_string(),
            rank_type: "3".to_string(),
            ..Default::default()
        });
        store.snapshot()
    }

    fn dictionary() -> Dictionary {
        Dictionary::from_words_json(r#"[{"en": "Hu Tao", "ja": "胡桃"}]"#).unwrap()
    }

    #[test]
    fn test_every_pull_exactly_once() {
        let src = source();
        let source_ids: Vec<String> = src.records.iter().map(|r| r.id.clone()).collect();

        let conversion = convert(src, &overrides(), &dictionary(), &ConvertOptions::default()).unwrap();
        let list = &conversion.document.hk4e[0].list;
        let out_ids: Vec<String> = list.iter().map(|r| r.id.clone()).collect();

        assert_eq!(out_ids, source_ids);
        assert_eq!(out_ids.iter().collect::<HashSet<_>>().len(), 4);
        assert_eq!(conversion.intermediate.list.len(), 4);
    }

    #[test]
    fn test_missing_report_matches_unranked_records() {
        let conversion = convert(source(), &overrides(), &dictionary(), &ConvertOptions::default()).unwrap();

        let unranked: Vec<&str> = conversion.document.hk4e[0]
            .list
            .iter()
            .filter(|r| r.rank_type.is_empty())
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(unranked, vec!["The Stringless"]);

        assert_eq!(conversion.missing.len(), 1);
        assert!(conversion.missing.contains("the_stringless"));
        assert!(!conversion.missing.contains("magic_guide"));
    }

    #[test]
    fn test_localized_output() {
        let conversion = convert(source(), &overrides(), &dictionary(), &ConvertOptions::default()).unwrap();
        let group = &conversion.document.hk4e[0];
        assert_eq!(group.lang, "ja-jp");
        assert_eq!(group.list[0].name, "魔導緒論");
        assert_eq!(group.list[0].item_type, "武器");
        assert_eq!(group.list[2].name, "胡桃");
        assert_eq!(group.list[2].rank_type, "5");
        assert_eq!(conversion.stats.rank_from_override, 2);
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let options = ConvertOptions {
            target_version: "v4.0".to_string(),
            ..Default::default()
        };
        let err = convert(source(), &overrides(), &dictionary(), &options).unwrap_err();
        assert!(matches!(err, Error::Input(_)));
    }

    #[test]
    fn test_metadata_carried() {
        let options = ConvertOptions {
            meta: ExportMeta::new("MyTool", "9.9"),
            ..Default::default()
        };
        let conversion = convert(source(), &OverrideSnapshot::default(), &Dictionary::empty(), &options).unwrap();
        assert_eq!(conversion.document.info.export_app, "MyTool");
        assert_eq!(conversion.document.info.export_app_version, "9.9");
        assert_eq!(conversion.intermediate.info.export_app, "MyTool");
        assert_eq!(conversion.missing.len(), 2);
    }
}
