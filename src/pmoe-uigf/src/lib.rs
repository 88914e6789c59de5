//! # pmoe-uigf
//!
//! Convert Genshin Impact wish history exported from Paimon.moe (or an
//! existing UIGF v3 document) into UIGF v4.1.
//!
//! The conversion runs in three stages:
//! - parse the source into canonical [`WishRecord`]s
//! - fill in missing rarities and Japanese names from the rank-override
//!   store and the Genshin Dictionary word list
//! - project the records into a validated v4.1 document
//!
//! Items whose rarity nobody could supply end up in a missing-rank report,
//! which feeds the override store lifecycle (`init`, `todo`, `merge`).
//!
//! ## Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use pmoe_uigf::{convert, ConvertOptions, DictionaryClient, OverrideStore, SourceMode};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = SourceMode::Paimon(PathBuf::from("paimon-moe-local-data.json")).load()?;
//! let overrides = OverrideStore::load_or_default("rank-override.json".as_ref())?.snapshot();
//! let (dictionary, _status) = DictionaryClient::default().load();
//!
//! let conversion = convert(source, &overrides, &dictionary, &ConvertOptions::default())?;
//! println!("{} records, {} missing ranks",
//!     conversion.document.record_count(), conversion.missing.len());
//! # Ok(())
//! # }
//! ```

pub mod dictionary;
pub mod enrich;
pub mod error;
pub mod json;
pub mod missing;
pub mod overrides;
pub mod pipeline;
pub mod record;
pub mod source;
pub mod uigf;
pub mod validate;

#[doc(inline)]
pub use dictionary::{Dictionary, DictionaryClient, DictionaryStatus, NameLookup};
#[doc(inline)]
pub use enrich::{EnrichStats, FieldSource, Resolution};
#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use missing::{MissingRankItem, MissingRankReport};
#[doc(inline)]
pub use overrides::{MergeSummary, OverrideEntry, OverrideSnapshot, OverrideStore, TodoSet};
#[doc(inline)]
pub use pipeline::{assemble, convert, ConvertOptions, Conversion};
#[doc(inline)]
pub use record::{GachaType, ItemType, WishRecord};
#[doc(inline)]
pub use source::{Account, SourceData, SourceMode};
#[doc(inline)]
pub use uigf::v3::UigfV3;
#[doc(inline)]
pub use uigf::v4::UigfV4;
#[doc(inline)]
pub use uigf::{ExportMeta, SUPPORTED_VERSION};
#[doc(inline)]
pub use validate::{validate_v41, SchemaValidator, SchemaViolation};
