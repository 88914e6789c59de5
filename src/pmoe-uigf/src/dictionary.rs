//! English to Japanese name lookup backed by the Genshin Dictionary word list.
//!
//! The word list is downloaded once per run (or reused from a cache file)
//! and indexed in memory. A failed download is never fatal: the client
//! degrades to a stale cache or an empty dictionary and reports how it got
//! there through [`DictionaryStatus`].

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

pub const DEFAULT_WORDS_URL: &str = "https://dataset.genshin-dictionary.com/words.json";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Anything that can turn an item name into its Japanese name
pub trait NameLookup {
    /// Look up by English name
    fn lookup(&self, english: &str) -> Option<&str>;

    /// Look up by the untranslated name found in the export (simplified Chinese)
    fn lookup_raw(&self, _raw: &str) -> Option<&str> {
        None
    }
}

/// Lowercase, underscores as spaces, whitespace collapsed
pub fn normalize_en_key(s: &str) -> String {
    s.replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[derive(Debug, Deserialize)]
struct Word {
    #[serde(default)]
    en: Option<String>,
    #[serde(default)]
    ja: Option<String>,
    #[serde(default, rename = "zhCN")]
    zh_cn: Option<String>,
}

/// In-memory word index
#[derive(Debug, Default, Clone)]
pub struct Dictionary {
    en_to_ja: HashMap<String, String>,
    en_norm_to_ja: HashMap<String, String>,
    zh_to_ja: HashMap<String, String>,
}

impl Dictionary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from the raw `words.json` body.
    ///
    /// The top level must be a list; individual entries that are not
    /// objects or carry no `ja` term are skipped.
    pub fn from_words_json(body: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(body)?;
        let serde_json::Value::Array(items) = value else {
            return Err(Error::Network(
                "word list is not a JSON array".to_string(),
            ));
        };

        let mut dict = Self::default();
        for item in items {
            let Ok(word) = serde_json::from_value::<Word>(item) else {
                continue;
            };
            dict.insert(word);
        }
        Ok(dict)
    }

    fn insert(&mut self, word: Word) {
        let Some(ja) = word.ja.filter(|ja| !ja.is_empty()) else {
            return;
        };

        if let Some(en) = word.en.filter(|en| !en.is_empty()) {
            let norm = normalize_en_key(&en);
            if !norm.is_empty() {
                self.en_norm_to_ja.insert(norm, ja.clone());
            }
            self.en_to_ja.insert(en, ja.clone());
        }
        if let Some(zh) = word.zh_cn.filter(|zh| !zh.is_empty()) {
            self.zh_to_ja.insert(zh, ja);
        }
    }

    pub fn len(&self) -> usize {
        self.en_to_ja.len()
    }

    pub fn is_empty(&self) -> bool {
        self.en_to_ja.is_empty() && self.zh_to_ja.is_empty()
    }
}

impl NameLookup for Dictionary {
    fn lookup(&self, english: &str) -> Option<&str> {
        if english.is_empty() {
            return None;
        }
        self.en_to_ja
            .get(english)
            .or_else(|| self.en_norm_to_ja.get(&normalize_en_key(english)))
            .map(String::as_str)
    }

    fn lookup_raw(&self, raw: &str) -> Option<&str> {
        self.zh_to_ja.get(raw).map(String::as_str)
    }
}

/// How the dictionary for this run was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionaryStatus {
    /// Downloaded this run
    Fetched { entries: usize },
    /// Reused a cache file younger than the TTL
    Cached { entries: usize },
    /// Download failed, fell back to an expired cache file
    StaleCache { entries: usize, reason: String },
    /// Network disabled and no cache available
    Offline,
    /// Download failed and no cache available
    Unavailable(String),
}

impl DictionaryStatus {
    /// True when enrichment coverage is reduced
    pub fn is_degraded(&self) -> bool {
        !matches!(self, Self::Fetched { .. } | Self::Cached { .. })
    }
}

impl std::fmt::Display for DictionaryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetched { entries } => write!(f, "downloaded ({} words)", entries),
            Self::Cached { entries } => write!(f, "from cache ({} words)", entries),
            Self::StaleCache { entries, reason } => {
                write!(f, "from expired cache ({} words): {}", entries, reason)
            }
            Self::Offline => write!(f, "offline, no cache available"),
            Self::Unavailable(reason) => write!(f, "unavailable: {}", reason),
        }
    }
}

/// Downloads and caches the word list
#[derive(Debug, Clone)]
pub struct DictionaryClient {
    url: String,
    cache_path: Option<PathBuf>,
    cache_ttl: Duration,
    timeout: Duration,
    offline: bool,
}

impl Default for DictionaryClient {
    fn default() -> Self {
        Self::new(DEFAULT_WORDS_URL)
    }
}

impl DictionaryClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            cache_path: None,
            cache_ttl: DEFAULT_CACHE_TTL,
            timeout: DEFAULT_TIMEOUT,
            offline: false,
        }
    }

    pub fn with_cache(mut self, path: impl Into<PathBuf>, ttl: Duration) -> Self {
        self.cache_path = Some(path.into());
        self.cache_ttl = ttl;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Produce this run's dictionary. Never fails.
    pub fn load(&self) -> (Dictionary, DictionaryStatus) {
        if let Some(dict) = self.fresh_cache() {
            let entries = dict.len();
            debug!(entries, "using cached word list");
            return (dict, DictionaryStatus::Cached { entries });
        }

        if self.offline {
            if let Some(dict) = self.read_cache() {
                let entries = dict.len();
                warn!(entries, "offline: using expired cached word list");
                let reason = "offline".to_string();
                return (dict, DictionaryStatus::StaleCache { entries, reason });
            }
            warn!("offline and no cached word list, Japanese names will not be looked up");
            return (Dictionary::empty(), DictionaryStatus::Offline);
        }

        match self.fetch() {
            Ok(body) => match Dictionary::from_words_json(&body) {
                Ok(dict) => {
                    self.write_cache(&body);
                    let entries = dict.len();
                    info!(entries, url = %self.url, "downloaded word list");
                    (dict, DictionaryStatus::Fetched { entries })
                }
                Err(e) => self.degrade(e.to_string()),
            },
            Err(e) => self.degrade(e.to_string()),
        }
    }

    fn degrade(&self, reason: String) -> (Dictionary, DictionaryStatus) {
        warn!(url = %self.url, %reason, "word list download failed");
        match self.read_cache() {
            Some(dict) => {
                let entries = dict.len();
                warn!(entries, "falling back to expired cached word list");
                (dict, DictionaryStatus::StaleCache { entries, reason })
            }
            None => {
                warn!("continuing with an empty dictionary");
                (Dictionary::empty(), DictionaryStatus::Unavailable(reason))
            }
        }
    }

    fn fetch(&self) -> Result<String> {
        let agent = ureq::AgentBuilder::new().timeout(self.timeout).build();
        let response = agent
            .get(&self.url)
            .call()
            .map_err(|e| Error::Network(format!("{}: {}", self.url, e)))?;

        // into_string() caps bodies at 10 MB, the word list can grow past that
        let mut body = String::new();
        response
            .into_reader()
            .read_to_string(&mut body)
            .map_err(|e| Error::Network(format!("{}: {}", self.url, e)))?;
        Ok(body)
    }

    fn fresh_cache(&self) -> Option<Dictionary> {
        let path = self.cache_path.as_deref()?;
        if !is_fresh(path, self.cache_ttl) {
            return None;
        }
        self.read_cache()
    }

    fn read_cache(&self) -> Option<Dictionary> {
        let path = self.cache_path.as_deref()?;
        let body = fs::read_to_string(path).ok()?;
        match Dictionary::from_words_json(&body) {
            Ok(dict) => Some(dict),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable word list cache");
                None
            }
        }
    }

    fn write_cache(&self, body: &str) {
        let Some(path) = self.cache_path.as_deref() else {
            return;
        };
        let result = path
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|_| fs::write(path, body));
        if let Err(e) = result {
            warn!(path = %path.display(), error = %e, "could not write word list cache");
        }
    }
}

fn is_fresh(path: &Path, ttl: Duration) -> bool {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|modified| SystemTime::now().duration_since(modified).ok())
        .is_some_and(|age| age < ttl)
}
