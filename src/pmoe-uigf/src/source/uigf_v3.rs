//! UIGF v3 document parser
//!
//! A v3 document carries no Paimon.moe id, so the item identifier is
//! slugified from the record name. That keeps the override store and the
//! missing-rank report in one key space with the native export.

use serde_json::Value;

use super::paimon::timezone_from_uid;
use super::{Account, SourceData};
use crate::error::{Error, Result};
use crate::record::{
    chronological, key_from_name, normalize_rank, parse_time, GachaType, ItemType, WishRecord,
};
use crate::uigf::v3::{UigfV3, V3Info};
use crate::uigf::UigfRecord;

fn account_from_info(info: &V3Info) -> Account {
    let uid = match info.uid.trim() {
        "" => "0".to_string(),
        uid => uid.to_string(),
    };
    let lang = match info.lang.trim() {
        "" => "en-us".to_string(),
        lang => lang.to_lowercase(),
    };
    Account {
        timezone: info.region_time_zone.unwrap_or_else(|| timezone_from_uid(&uid)),
        uid,
        lang,
    }
}

fn record_from_v3(raw: UigfRecord, sequence: usize, lang: &str) -> Result<WishRecord> {
    let at = |field: &str| format!("list[{}]: missing {}", sequence, field);

    if raw.gacha_type.trim().is_empty() {
        return Err(Error::input(at("gacha_type")));
    }
    if raw.id.trim().is_empty() {
        return Err(Error::input(at("id")));
    }
    if raw.time.trim().is_empty() {
        return Err(Error::input(at("time")));
    }

    let gacha_type: GachaType = raw
        .gacha_type
        .parse()
        .map_err(|e| Error::input(format!("list[{}]: {}", sequence, e)))?;
    let time = parse_time(&raw.time).ok_or_else(|| {
        Error::input(format!("list[{}]: invalid time {:?}", sequence, raw.time))
    })?;

    let name = raw.name.trim().to_string();
    let item_key = [key_from_name(&name), raw.item_id.trim().to_string()]
        .into_iter()
        .find(|k| !k.is_empty())
        .unwrap_or_else(|| raw.id.trim().to_string());

    let (name_en, name_jp) = if lang == "ja-jp" {
        (String::new(), name)
    } else {
        (name, String::new())
    };

    Ok(WishRecord {
        item_key,
        id: raw.id.trim().to_string(),
        name_en,
        name_jp,
        gacha_type,
        rank_type: normalize_rank(&raw.rank_type),
        time,
        sequence,
        item_type: ItemType::parse(&raw.item_type),
        item_id: raw.item_id.trim().to_string(),
    })
}

pub fn parse(value: Value) -> Result<SourceData> {
    let document: UigfV3 = serde_json::from_value(value)
        .map_err(|e| Error::input(format!("not a UIGF v3 document: {}", e)))?;

    let account = account_from_info(&document.info);
    let mut records = document
        .list
        .into_iter()
        .enumerate()
        .map(|(sequence, raw)| record_from_v3(raw, sequence, &account.lang))
        .collect::<Result<Vec<_>>>()?;

    records.sort_by(chronological);
    Ok(SourceData { account, records })
}
