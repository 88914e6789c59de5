//! CLI definitions for the convert command

use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Output path for the UIGF v4.1 document
    pub output: PathBuf,

    /// Paimon.moe local data export (JSON)
    #[arg(long)]
    pub paimon: Option<PathBuf>,

    /// Existing UIGF v3 document
    #[arg(long = "from-v3")]
    pub from_v3: Option<PathBuf>,

    /// Also write the intermediate UIGF v3 document
    #[arg(long = "v3-out")]
    pub v3_out: Option<PathBuf>,

    /// Missing-rank report path (required with --paimon)
    #[arg(long = "missing-rank-out")]
    pub missing_rank_out: Option<PathBuf>,

    /// export_app written to the documents (defaults to config, then PMOE-Local-Converter)
    #[arg(long)]
    pub export_app: Option<String>,

    /// export_app_version written to the documents
    #[arg(long)]
    pub export_app_version: Option<String>,

    /// Destination UIGF version
    #[arg(long, default_value = pmoe_uigf::SUPPORTED_VERSION)]
    pub target_version: String,

    /// Rank-override store
    #[arg(long, env = "PMOE_UIGF_OVERRIDE_FILE")]
    pub override_file: Option<PathBuf>,

    /// Genshin Dictionary word list URL
    #[arg(long)]
    pub dictionary_url: Option<String>,

    /// Never download the word list, use the cache if present
    #[arg(long)]
    pub offline: bool,

    /// Where to write the document if it fails validation (debugging only)
    #[arg(long)]
    pub write_invalid: Option<PathBuf>,
}
