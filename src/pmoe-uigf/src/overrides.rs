//! Rank override store: the human-curated table of item facts.
//!
//! The store is a small key-value table keyed by item identifier and
//! persisted as `rank-override.json`. It has three lifecycle operations,
//! all pure with respect to their inputs:
//!
//! - [`init`] seeds a store from a missing-rank report
//! - [`todo`] lists what still needs a human to fill in
//! - [`merge`] folds an edited todo file back into the store
//!
//! # Merge conflicts
//!
//! When the store and the todo file both carry a non-empty value for the
//! same field and the values differ, the todo value wins: it is the most
//! recent human edit. An empty todo field never erases a store value.
//!
//! # Concurrency
//!
//! The store file assumes a single writer. Saving replaces the previous
//! content wholesale; two runs saving the same file race and the last one wins.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::json::{lenient_string, read_json, write_json};
use crate::missing::{unique_items, MissingRankItem};

pub const STORE_FORMAT_VERSION: &str = "1.0";

/// Default store location, relative to the working directory
pub const DEFAULT_OVERRIDE_FILE: &str = "rank-override.json";

/// One human-authored correction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideEntry {
    pub pmoe_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name_en: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name_jp: String,
    /// Informational, copied from the missing-rank report
    #[serde(default, deserialize_with = "lenient_string")]
    pub gacha_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rank_type: String,
}

impl OverrideEntry {
    /// Fresh entry awaiting a rank, names carried over from the report
    pub fn from_missing(item: &MissingRankItem) -> Self {
        Self {
            pmoe_id: item.pmoe_id.clone(),
            name_en: item.name_en.clone(),
            name_jp: item.name_jp.clone(),
            gacha_type: item.gacha_type.clone(),
            rank_type: String::new(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        !self.rank_type.trim().is_empty()
    }

    fn non_empty(value: &str) -> Option<&str> {
        let value = value.trim();
        (!value.is_empty()).then_some(value)
    }

    pub fn rank(&self) -> Option<&str> {
        Self::non_empty(&self.rank_type)
    }

    pub fn japanese_name(&self) -> Option<&str> {
        Self::non_empty(&self.name_jp)
    }

    pub fn english_name(&self) -> Option<&str> {
        Self::non_empty(&self.name_en)
    }
}

/// On-disk shape of `rank-override.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideFile {
    #[serde(default = "default_version")]
    pub version: String,
    pub items: Vec<OverrideEntry>,
}

fn default_version() -> String {
    STORE_FORMAT_VERSION.to_string()
}

/// Entries still waiting for a human, written as the todo file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoSet {
    #[serde(default)]
    pub base_missing_file: String,
    pub items: Vec<OverrideEntry>,
}

impl TodoSet {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let todo: Self = read_json(path).map_err(|e| as_override_error(path, e))?;
        if let Some(pos) = todo.items.iter().position(|e| e.pmoe_id.trim().is_empty()) {
            return Err(Error::override_file(
                path,
                format!("items[{}] has an empty pmoe_id", pos),
            ));
        }
        Ok(todo)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }
}

fn as_override_error(path: &Path, e: Error) -> Error {
    match e {
        Error::Json(e) => Error::override_file(path, e.to_string()),
        other => other,
    }
}

/// The override table, keyed by item identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideStore {
    version: String,
    entries: BTreeMap<String, OverrideEntry>,
}

impl Default for OverrideStore {
    fn default() -> Self {
        Self {
            version: default_version(),
            entries: BTreeMap::new(),
        }
    }
}

impl OverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pmoe_id: &str) -> Option<&OverrideEntry> {
        self.entries.get(pmoe_id)
    }

    pub fn contains(&self, pmoe_id: &str) -> bool {
        self.entries.contains_key(pmoe_id)
    }

    /// Insert or replace, returning the previous entry
    pub fn insert(&mut self, entry: OverrideEntry) -> Option<OverrideEntry> {
        self.entries.insert(entry.pmoe_id.clone(), entry)
    }

    /// Entries in identifier order
    pub fn entries(&self) -> impl Iterator<Item = &OverrideEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn resolved_count(&self) -> usize {
        self.entries().filter(|e| e.is_resolved()).count()
    }

    /// Build from the file shape, rejecting empty or duplicate identifiers
    pub fn from_file(file: OverrideFile, path: &Path) -> Result<Self> {
        let mut store = Self {
            version: file.version,
            entries: BTreeMap::new(),
        };
        for (pos, entry) in file.items.into_iter().enumerate() {
            if entry.pmoe_id.trim().is_empty() {
                return Err(Error::override_file(
                    path,
                    format!("items[{}] has an empty pmoe_id", pos),
                ));
            }
            let id = entry.pmoe_id.clone();
            if store.insert(entry).is_some() {
                return Err(Error::override_file(
                    path,
                    format!("duplicate pmoe_id {:?} at items[{}]", id, pos),
                ));
            }
        }
        Ok(store)
    }

    pub fn to_file(&self) -> OverrideFile {
        OverrideFile {
            version: self.version.clone(),
            items: self.entries.values().cloned().collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file: OverrideFile = read_json(path).map_err(|e| as_override_error(path, e))?;
        let store = Self::from_file(file, path)?;
        debug!(path = %path.display(), entries = store.len(), "loaded override store");
        Ok(store)
    }

    /// Like [`load`](Self::load), but a missing file is an empty store
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "no override store found, starting empty");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Overwrite `path` with this store, entries sorted by identifier
    pub fn save(&self, path: &Path) -> Result<()> {
        write_json(path, &self.to_file())
    }

    /// Freeze into the read-only view the resolver uses
    pub fn snapshot(self) -> OverrideSnapshot {
        OverrideSnapshot(self)
    }
}

/// Immutable view of the store, taken once at the start of a run
#[derive(Debug, Clone, Default)]
pub struct OverrideSnapshot(OverrideStore);

impl OverrideSnapshot {
    pub fn get(&self, pmoe_id: &str) -> Option<&OverrideEntry> {
        self.0.get(pmoe_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Seed `store` with an entry for every missing item not already present.
///
/// Called with an empty store this yields exactly the missing items.
pub fn init(missing: &[MissingRankItem], store: &OverrideStore) -> OverrideStore {
    let mut out = store.clone();
    for item in unique_items(missing) {
        if !out.contains(&item.pmoe_id) {
            out.insert(OverrideEntry::from_missing(item));
        }
    }
    out
}

/// Missing items that the store cannot resolve yet.
///
/// An item is listed when it is absent from the store or its store entry
/// has no rank. Names the store already knows fill gaps in the report's.
pub fn todo(missing: &[MissingRankItem], store: &OverrideStore) -> TodoSet {
    let items = unique_items(missing)
        .into_iter()
        .filter_map(|item| {
            let existing = store.get(&item.pmoe_id);
            if existing.is_some_and(OverrideEntry::is_resolved) {
                return None;
            }
            let mut entry = OverrideEntry::from_missing(item);
            if let Some(existing) = existing {
                fill_blank(&mut entry.name_en, &existing.name_en);
                fill_blank(&mut entry.name_jp, &existing.name_jp);
                fill_blank(&mut entry.gacha_type, &existing.gacha_type);
            }
            Some(entry)
        })
        .collect();

    TodoSet {
        base_missing_file: String::new(),
        items,
    }
}

fn fill_blank(target: &mut String, source: &str) {
    if target.trim().is_empty() && !source.trim().is_empty() {
        *target = source.to_string();
    }
}

/// Counts reported by [`merge`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub added: usize,
    pub updated: usize,
    pub unchanged: usize,
}

/// Union `todo` into `store` by identifier.
///
/// Each field comes from the todo entry when it is non-empty there and
/// from the store otherwise.
pub fn merge(store: &OverrideStore, todo: &TodoSet) -> (OverrideStore, MergeSummary) {
    let mut out = store.clone();
    let mut summary = MergeSummary::default();

    for incoming in &todo.items {
        match out.get(incoming.pmoe_id.trim()) {
            Some(existing) => {
                let merged = merge_entry(existing, incoming);
                if &merged == existing {
                    summary.unchanged += 1;
                } else {
                    summary.updated += 1;
                    out.insert(merged);
                }
            }
            None => {
                summary.added += 1;
                out.insert(merge_entry(&OverrideEntry::default(), incoming));
            }
        }
    }

    (out, summary)
}

fn merge_entry(existing: &OverrideEntry, incoming: &OverrideEntry) -> OverrideEntry {
    let pick = |old: &str, new: &str| -> String {
        match new.trim() {
            "" => old.to_string(),
            new => new.to_string(),
        }
    };

    OverrideEntry {
        pmoe_id: incoming.pmoe_id.trim().to_string(),
        name_en: pick(&existing.name_en, &incoming.name_en),
        name_jp: pick(&existing.name_jp, &incoming.name_jp),
        gacha_type: pick(&existing.gacha_type, &incoming.gacha_type),
        rank_type: pick(&existing.rank_type, &incoming.rank_type),
    }
}
