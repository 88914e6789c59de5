//! Paimon.moe local data export parser
//!
//! The export is one JSON object holding a `wish-counter-*` object per
//! banner, each with a `pulls` list in pull order. Pulls carry the
//! Paimon.moe item id and a timestamp but usually no rarity or Japanese
//! name; those are left empty for the enrichment stage.

use chrono::Local;
use serde::Deserialize;
use serde_json::Value;

use super::{Account, SourceData};
use crate::error::{Error, Result};
use crate::json::lenient_string;
use crate::record::{chronological, english_from_key, normalize_rank, parse_time, GachaType, ItemType, WishRecord};

/// Banner counters in the order they are read
pub const BANNER_COUNTERS: &[(&str, GachaType)] = &[
    ("wish-counter-beginners", GachaType::Beginners),
    ("wish-counter-character-event", GachaType::CharacterEvent),
    ("wish-counter-weapon-event", GachaType::WeaponEvent),
    ("wish-counter-standard", GachaType::Standard),
    ("wish-counter-chronicled", GachaType::Chronicled),
];

#[derive(Debug, Deserialize)]
struct Pull {
    #[serde(default, deserialize_with = "lenient_string")]
    id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    time: String,
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    kind: String,
    #[serde(default, deserialize_with = "lenient_string")]
    name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    rarity: String,
}

/// UIGF language tag for a Paimon.moe locale. Only English and Japanese are mapped.
pub fn lang_from_locale(locale: &str) -> &'static str {
    match locale.trim().to_lowercase().as_str() {
        "ja" | "ja-jp" => "ja-jp",
        _ => "en-us",
    }
}

/// Server timezone guessed from the first digit of the UID
pub fn timezone_from_uid(uid: &str) -> i32 {
    match uid.chars().next() {
        Some('6') => -5,
        Some('7') => 1,
        _ => 8,
    }
}

fn scalar_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First synthetic record id minus one: `<uid>000000`, or the current time
fn id_base(uid: &str) -> u64 {
    uid.parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(1_000_000))
        .unwrap_or_else(|| Local::now().timestamp().unsigned_abs())
}

pub fn parse(value: &Value) -> Result<SourceData> {
    let root = value
        .as_object()
        .ok_or_else(|| Error::input("Paimon.moe export must be a JSON object"))?;

    let uid = scalar_string(root.get("wish-uid"))
        .or_else(|| scalar_string(root.get("uid")))
        .unwrap_or_else(|| "0".to_string());
    let locale = root.get("locale").and_then(Value::as_str).unwrap_or("en");

    let account = Account {
        lang: lang_from_locale(locale).to_string(),
        timezone: timezone_from_uid(&uid),
        uid,
    };

    let mut next_id = id_base(&account.uid);
    let mut records = Vec::new();

    for (counter_key, gacha_type) in BANNER_COUNTERS {
        let Some(counter) = root.get(*counter_key) else {
            continue;
        };
        let counter = counter
            .as_object()
            .ok_or_else(|| Error::input(format!("{} is not an object", counter_key)))?;

        let pulls = match counter.get("pulls") {
            None | Some(Value::Null) => continue,
            Some(Value::Array(pulls)) => pulls,
            Some(_) => return Err(Error::input(format!("{}.pulls is not a list", counter_key))),
        };

        for (index, raw) in pulls.iter().enumerate() {
            let at = || format!("{}.pulls[{}]", counter_key, index);
            let pull: Pull = serde_json::from_value(raw.clone())
                .map_err(|e| Error::input(format!("{}: {}", at(), e)))?;

            let item_key = pull.id.trim().to_string();
            if item_key.is_empty() {
                return Err(Error::input(format!("{}: missing item id", at())));
            }
            let time = parse_time(&pull.time).ok_or_else(|| {
                Error::input(format!("{}: invalid time {:?}", at(), pull.time))
            })?;

            next_id += 1;
            let name_en = match pull.name.trim() {
                "" => english_from_key(&item_key),
                name => name.to_string(),
            };

            records.push(WishRecord {
                id: next_id.to_string(),
                name_en,
                name_jp: String::new(),
                gacha_type: *gacha_type,
                rank_type: normalize_rank(&pull.rarity),
                time,
                sequence: records.len(),
                item_type: ItemType::parse(&pull.kind),
                item_id: String::new(),
                item_key,
            });
        }
    }

    records.sort_by(chronological);
    Ok(SourceData { account, records })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "wish-uid": "812345678",
            "locale": "ja",
            "wish-counter-character-event": {
                "total": 2,
                "pulls": [
                    {"type": "weapon", "id": "the_stringless", "time": "2023-01-01 10:00:00", "pity": 1},
                    {"type": "character", "id": "hu_tao", "time": "2023-01-01 10:00:00", "pity": 2, "rarity": 5}
                ]
            },
            "wish-counter-standard": {
                "pulls": [
                    {"type": "weapon", "id": "magic_guide", "time": "2022-12-31 09:00:00", "rarity": "9"}
                ]
            },
            "wish-counter-weapon-event": {"pulls": []},
            "settings": {"theme": "dark"}
        })
    }

    #[test]
    fn test_account_inference() {
        let data = parse(&sample()).unwrap();
        assert_eq!(data.account.uid, "812345678");
        assert_eq!(data.account.lang, "ja-jp");
        assert_eq!(data.account.timezone, 8);

        assert_eq!(timezone_from_uid("612345678"), -5);
        assert_eq!(timezone_from_uid("712345678"), 1);
        assert_eq!(lang_from_locale("fr"), "en-us");
    }

    #[test]
    fn test_every_pull_once_in_chronological_order() {
        let data = parse(&sample()).unwrap();
        let keys: Vec<&str> = data.records.iter().map(|r| r.item_key.as_str()).collect();
        assert_eq!(keys, vec!["magic_guide", "the_stringless", "hu_tao"]);

        // Ids follow read order, banners read character-event before standard
        assert_eq!(data.records[1].id, "812345678000001");
        assert_eq!(data.records[2].id, "812345678000002");
        assert_eq!(data.records[0].id, "812345678000003");
    }

    #[test]
    fn test_fields_and_rarity_handling() {
        let data = parse(&sample()).unwrap();
        let hu_tao = &data.records[2];
        assert_eq!(hu_tao.rank_type.as_deref(), Some("5"));
        assert_eq!(hu_tao.name_en, "Hu Tao");
        assert_eq!(hu_tao.item_type, Some(ItemType::Character));
        assert_eq!(hu_tao.gacha_type, GachaType::CharacterEvent);

        // Out-of-range rarity is kept as unresolved, not dropped
        let magic_guide = &data.records[0];
        assert_eq!(magic_guide.rank_type, None);
        assert_eq!(magic_guide.gacha_type, GachaType::Standard);
    }

    #[test]
    fn test_numeric_uid_and_defaults() {
        let data = parse(&json!({"uid": 712345678, "wish-counter-standard": {"pulls": []}})).unwrap();
        assert_eq!(data.account.uid, "712345678");
        assert_eq!(data.account.lang, "en-us");
        assert!(data.records.is_empty());
    }

    #[test]
    fn test_rejects_bad_time() {
        let value = json!({
            "wish-counter-standard": {"pulls": [{"id": "magic_guide", "time": "yesterday"}]}
        });
        let err = parse(&value).unwrap_err();
        assert!(matches!(err, Error::Input(ref m) if m.contains("wish-counter-standard.pulls[0]")));
    }

    #[test]
    fn test_rejects_missing_id_and_bad_shapes() {
        let no_id = json!({"wish-counter-standard": {"pulls": [{"time": "2023-01-01 00:00:00"}]}});
        assert!(matches!(parse(&no_id), Err(Error::Input(_))));

        let bad_pulls = json!({"wish-counter-standard": {"pulls": "none"}});
        assert!(matches!(parse(&bad_pulls), Err(Error::Input(_))));

        let bad_counter = json!({"wish-counter-standard": []});
        assert!(matches!(parse(&bad_counter), Err(Error::Input(_))));

        assert!(matches!(parse(&json!([])), Err(Error::Input(_))));
    }
}
