//! Canonical wish record shared by both source formats.
//!
//! Every parser produces [`WishRecord`]s, the enrichment stage fills in the
//! missing names and rarities, and the UIGF writers project them back out.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Timestamp layout used by Paimon.moe and every UIGF version.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Banner category of a pull
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GachaType {
    Beginners,
    Standard,
    CharacterEvent,
    WeaponEvent,
    /// Second character-event banner
    CharacterEvent2,
    Chronicled,
}

impl GachaType {
    pub const ALL: [GachaType; 6] = [
        GachaType::Beginners,
        GachaType::Standard,
        GachaType::CharacterEvent,
        GachaType::WeaponEvent,
        GachaType::CharacterEvent2,
        GachaType::Chronicled,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            GachaType::Beginners => "100",
            GachaType::Standard => "200",
            GachaType::CharacterEvent => "301",
            GachaType::WeaponEvent => "302",
            GachaType::CharacterEvent2 => "400",
            GachaType::Chronicled => "500",
        }
    }

    /// Code written to `uigf_gacha_type`. Both character banners share 301.
    pub fn uigf_code(&self) -> &'static str {
        match self {
            GachaType::CharacterEvent2 => GachaType::CharacterEvent.code(),
            other => other.code(),
        }
    }
}

impl fmt::Display for GachaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for GachaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GachaType::ALL
            .into_iter()
            .find(|g| g.code() == s.trim())
            .ok_or_else(|| Error::input(format!("Unknown gacha type: {:?}", s)))
    }
}

impl TryFrom<String> for GachaType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GachaType> for String {
    fn from(value: GachaType) -> Self {
        value.code().to_string()
    }
}

/// Kind of item pulled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemType {
    Weapon,
    Character,
}

impl ItemType {
    /// Parse the loose spellings found in exports ("weapon", "Weapon", "武器", ...)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "weapon" | "武器" => Some(ItemType::Weapon),
            "character" | "キャラクター" | "角色" => Some(ItemType::Character),
            _ => None,
        }
    }

    /// Display label in the account language
    pub fn label(&self, lang: &str) -> &'static str {
        let japanese = lang.eq_ignore_ascii_case("ja-jp");
        match (self, japanese) {
            (ItemType::Weapon, true) => "武器",
            (ItemType::Character, true) => "キャラクター",
            (ItemType::Weapon, false) => "Weapon",
            (ItemType::Character, false) => "Character",
        }
    }
}

/// A single gacha pull
#[derive(Debug, Clone, PartialEq)]
pub struct WishRecord {
    /// Stable item identifier (Paimon.moe id), join key for overrides
    pub item_key: String,
    /// Interchange record id
    pub id: String,
    pub name_en: String,
    /// Empty until resolved
    pub name_jp: String,
    pub gacha_type: GachaType,
    /// `None` until resolved
    pub rank_type: Option<String>,
    pub time: NaiveDateTime,
    /// Position in the source export, 0-based
    pub sequence: usize,
    pub item_type: Option<ItemType>,
    /// Interchange item id, empty when unknown
    pub item_id: String,
}

impl WishRecord {
    pub fn is_resolved(&self) -> bool {
        self.rank_type.is_some()
    }

    pub fn time_string(&self) -> String {
        self.time.format(TIME_FORMAT).to_string()
    }

    /// Name shown for the given account language, falling back to whichever is set
    pub fn display_name(&self, lang: &str) -> &str {
        let (preferred, fallback) = if lang.eq_ignore_ascii_case("ja-jp") {
            (&self.name_jp, &self.name_en)
        } else {
            (&self.name_en, &self.name_jp)
        };
        if preferred.is_empty() {
            fallback
        } else {
            preferred
        }
    }
}

/// Order by pull time, then record id, then source position
pub fn chronological(a: &WishRecord, b: &WishRecord) -> Ordering {
    a.time
        .cmp(&b.time)
        .then_with(|| compare_ids(&a.id, &b.id))
        .then(a.sequence.cmp(&b.sequence))
}

fn compare_ids(a: &str, b: &str) -> Ordering {
    let numeric = |s: &str| !s.is_empty() && s.bytes().all(|c| c.is_ascii_digit());
    if numeric(a) && numeric(b) {
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    } else {
        a.cmp(b)
    }
}

pub fn parse_time(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), TIME_FORMAT).ok()
}

/// Accept only the tiers a wish can actually produce
pub fn normalize_rank(raw: &str) -> Option<String> {
    match raw.trim() {
        r @ ("3" | "4" | "5") => Some(r.to_string()),
        _ => None,
    }
}

/// `the_stringless` -> `The Stringless`
pub fn english_from_key(key: &str) -> String {
    key.replace('_', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// `The Stringless` -> `the_stringless`, `"Amos' Bow"` -> `amos_bow`
pub fn key_from_name(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric() || *c == '-')
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<String>>()
        .join("_")
}
