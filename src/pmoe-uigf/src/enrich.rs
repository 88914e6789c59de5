//! Fill in missing rarities and Japanese names.
//!
//! Lookup precedence for each missing field:
//!
//! 1. the override store, by exact item identifier
//! 2. the dictionary, by English name (names only, never a rarity)
//!
//! Whatever is still missing afterwards stays empty and the record is
//! reported as unresolved.

use crate::dictionary::NameLookup;
use crate::overrides::OverrideSnapshot;
use crate::record::{english_from_key, normalize_rank, WishRecord};

/// Where a field's final value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// Already present in the source export
    Source,
    Override,
    Dictionary,
    Unresolved,
}

/// Per-record outcome of enrichment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub rank: FieldSource,
    pub name_jp: FieldSource,
}

impl Resolution {
    /// A record is resolved once it has a rarity, whatever happened to its name
    pub fn is_resolved(&self) -> bool {
        self.rank != FieldSource::Unresolved
    }
}

/// Resolve one record. The snapshot and dictionary are only read.
pub fn resolve(
    mut record: WishRecord,
    overrides: &OverrideSnapshot,
    dictionary: &impl NameLookup,
) -> (WishRecord, Resolution) {
    let mut resolution = Resolution {
        rank: if record.rank_type.is_some() {
            FieldSource::Source
        } else {
            FieldSource::Unresolved
        },
        name_jp: if record.name_jp.is_empty() {
            FieldSource::Unresolved
        } else {
            FieldSource::Source
        },
    };

    if resolution.rank != FieldSource::Unresolved && resolution.name_jp != FieldSource::Unresolved {
        return (record, resolution);
    }

    if let Some(entry) = overrides.get(&record.item_key) {
        if record.rank_type.is_none() {
            if let Some(rank) = entry.rank().and_then(normalize_rank) {
                record.rank_type = Some(rank);
                resolution.rank = FieldSource::Override;
            }
        }
        if record.name_jp.is_empty() {
            if let Some(name) = entry.japanese_name() {
                record.name_jp = name.to_string();
                resolution.name_jp = FieldSource::Override;
            }
        }
        if record.name_en.is_empty() {
            if let Some(name) = entry.english_name() {
                record.name_en = name.to_string();
            }
        }
    }

    if record.name_jp.is_empty() {
        if let Some(name) = lookup_japanese(&record, dictionary) {
            record.name_jp = name.to_string();
            resolution.name_jp = FieldSource::Dictionary;
        }
    }

    (record, resolution)
}

fn lookup_japanese<'a>(record: &WishRecord, dictionary: &'a impl NameLookup) -> Option<&'a str> {
    let derived = english_from_key(&record.item_key);
    let found = [record.name_en.as_str(), derived.as_str()]
        .into_iter()
        .find_map(|name| dictionary.lookup(name));
    found.or_else(|| dictionary.lookup_raw(&record.name_en))
}

/// Coverage counters across a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichStats {
    pub records: usize,
    pub rank_from_override: usize,
    pub name_from_override: usize,
    pub name_from_dictionary: usize,
    pub unresolved_rank: usize,
    pub unresolved_name: usize,
}

impl EnrichStats {
    fn record(&mut self, resolution: &Resolution) {
        self.records += 1;
        match resolution.rank {
            FieldSource::Override => self.rank_from_override += 1,
            FieldSource::Unresolved => self.unresolved_rank += 1,
            _ => {}
        }
        match resolution.name_jp {
            FieldSource::Override => self.name_from_override += 1,
            FieldSource::Dictionary => self.name_from_dictionary += 1,
            FieldSource::Unresolved => self.unresolved_name += 1,
            FieldSource::Source => {}
        }
    }
}

/// Resolve every record, keeping order
pub fn resolve_all(
    records: Vec<WishRecord>,
    overrides: &OverrideSnapshot,
    dictionary: &impl NameLookup,
) -> (Vec<WishRecord>, EnrichStats) {
    let mut stats = EnrichStats::default();
    let resolved = records
        .into_iter()
        .map(|record| {
            let (record, resolution) = resolve(record, overrides, dictionary);
            stats.record(&resolution);
            record
        })
        .collect();
    (resolved, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Dictionary;
    use crate::missing;
    use crate::overrides::{OverrideEntry, OverrideStore};
    use crate::record::tests::record;

    fn snapshot(entries: Vec<OverrideEntry>) -> OverrideSnapshot {
        let mut store = OverrideStore::new();
        for e in entries {
            store.insert(e);
        }
        store.snapshot()
    }

    fn override_entry(id: &str, name_jp: &str, rank: &str) -> OverrideEntry {
        OverrideEntry {
            pmoe_id: id.to_string(),
            name_jp: name_jp.to_string(),
            rank_type: rank.to_string(),
            ..Default::default()
        }
    }

    fn dictionary() -> Dictionary {
        Dictionary::from_words_json(
            r#"[{"en": "Favonius Lance", "ja": "西風長槍", "zhCN": "西风长枪"},
                {"en": "Magic Guide", "ja": "魔導書"}]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_magic_guide_resolved_by_override() {
        let overrides = snapshot(vec![override_entry("magic_guide", "魔導緒論", "3")]);
        let (r, resolution) = resolve(
            record("magic_guide", "2023-01-01 10:00:00", "1"),
            &overrides,
            &dictionary(),
        );

        assert_eq!(r.rank_type.as_deref(), Some("3"));
        // Override outranks the dictionary
        assert_eq!(r.name_jp, "魔導緒論");
        assert_eq!(resolution.rank, FieldSource::Override);
        assert_eq!(resolution.name_jp, FieldSource::Override);
        assert!(!missing::collect(&[r]).contains("magic_guide"));
    }

    #[test]
    fn test_stringless_stays_unresolved() {
        let (r, resolution) = resolve(
            record("the_stringless", "2023-01-01 10:00:00", "1"),
            &OverrideSnapshot::default(),
            &dictionary(),
        );

        assert_eq!(r.rank_type, None);
        assert_eq!(r.name_jp, "");
        assert!(!resolution.is_resolved());
        assert_eq!(resolution.name_jp, FieldSource::Unresolved);
    }

    #[test]
    fn test_dictionary_fills_name_but_not_rank() {
        let (r, resolution) = resolve(
            record("favonius_lance", "2023-01-01 10:00:00", "1"),
            &OverrideSnapshot::default(),
            &dictionary(),
        );

        assert_eq!(r.name_jp, "西風長槍");
        assert_eq!(resolution.name_jp, FieldSource::Dictionary);
        assert!(!resolution.is_resolved());
    }

    #[test]
    fn test_empty_override_fields_fall_through() {
        let overrides = snapshot(vec![override_entry("favonius_lance", "", "")]);
        let (r, resolution) = resolve(
            record("favonius_lance", "2023-01-01 10:00:00", "1"),
            &overrides,
            &dictionary(),
        );

        assert_eq!(r.name_jp, "西風長槍");
        assert_eq!(resolution.rank, FieldSource::Unresolved);
    }

    #[test]
    fn test_malformed_override_rank_is_unresolved() {
        for rank in ["9", "★4", "four"] {
            let overrides = snapshot(vec![override_entry("the_stringless", "絶弦", rank)]);
            let (r, resolution) = resolve(
                record("the_stringless", "2023-01-01 10:00:00", "1"),
                &overrides,
                &dictionary(),
            );

            assert_eq!(r.rank_type, None, "{}", rank);
            assert_eq!(resolution.rank, FieldSource::Unresolved);
            assert_eq!(r.name_jp, "絶弦");
            assert!(missing::collect(&[r]).contains("the_stringless"));
        }

        let overrides = snapshot(vec![override_entry("the_stringless", "", " 4 ")]);
        let (r, _) = resolve(
            record("the_stringless", "2023-01-01 10:00:00", "1"),
            &overrides,
            &dictionary(),
        );
        assert_eq!(r.rank_type.as_deref(), Some("4"));
    }

    #[test]
    fn test_derived_english_name_is_tried() {
        let mut rec = record("favonius_lance", "2023-01-01 10:00:00", "1");
        rec.name_en = "西风长枪".to_string();

        let (r, _) = resolve(rec, &OverrideSnapshot::default(), &dictionary());
        assert_eq!(r.name_jp, "西風長槍");
    }

    #[test]
    fn test_present_fields_are_kept() {
        let overrides = snapshot(vec![override_entry("magic_guide", "別名", "4")]);
        let mut rec = record("magic_guide", "2023-01-01 10:00:00", "1");
        rec.rank_type = Some("3".to_string());
        rec.name_jp = "魔導緒論".to_string();

        let (r, resolution) = resolve(rec, &overrides, &dictionary());
        assert_eq!(r.rank_type.as_deref(), Some("3"));
        assert_eq!(r.name_jp, "魔導緒論");
        assert_eq!(resolution.rank, FieldSource::Source);
    }

    #[test]
    fn test_resolve_all_stats_and_order() {
        let overrides = snapshot(vec![override_entry("magic_guide", "", "3")]);
        let records = vec![
            record("magic_guide", "2023-01-01 10:00:00", "1"),
            record("favonius_lance", "2023-01-01 10:00:01", "2"),
            record("the_stringless", "2023-01-01 10:00:02", "3"),
        ];

        let (resolved, stats) = resolve_all(records, &overrides, &dictionary());
        let keys: Vec<&str> = resolved.iter().map(|r| r.item_key.as_str()).collect();
        assert_eq!(keys, vec!["magic_guide", "favonius_lance", "the_stringless"]);
        assert_eq!(stats.records, 3);
        assert_eq!(stats.rank_from_override, 1);
        assert_eq!(stats.name_from_dictionary, 2);
        assert_eq!(stats.unresolved_rank, 2);
        assert_eq!(stats.unresolved_name, 1);
        assert_eq!(overrides.len(), 1);
    }
}
