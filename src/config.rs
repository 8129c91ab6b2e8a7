//! Optional `mintkit.toml` run defaults.
//!
//! Everything the generate flow needs can be typed at the prompts or passed
//! as flags; the config file just pre-fills those answers for collections
//! that get regenerated often. Missing file means stock defaults — never an
//! error.
//!
//! ```toml
//! base_uri = "ipfs://Qm…"
//! token_dir = "tokens"
//! media_dir = "media"
//! output_root = "output"
//!
//! [[links]]
//! title = "Project site"
//! url = "https://example.com"
//! ```

use crate::assemble::Link;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Filename looked up in the working directory.
pub const CONFIG_FILE: &str = "mintkit.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Pre-filled answers for the generate flow. Every field is optional;
/// prompts and flags override.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    pub base_uri: Option<String>,
    pub token_dir: Option<PathBuf>,
    pub media_dir: Option<PathBuf>,
    pub output_root: Option<PathBuf>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Defaults {
    pub fn token_dir_or(&self, fallback: &str) -> PathBuf {
        self.token_dir.clone().unwrap_or_else(|| fallback.into())
    }

    pub fn media_dir_or(&self, fallback: &str) -> PathBuf {
        self.media_dir.clone().unwrap_or_else(|| fallback.into())
    }

    pub fn output_root_or(&self, fallback: &str) -> PathBuf {
        self.output_root.clone().unwrap_or_else(|| fallback.into())
    }
}

/// Load `mintkit.toml` from `dir`, or stock defaults if absent.
pub fn load(dir: &Path) -> Result<Defaults, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(Defaults::default());
    }
    let content = std::fs::read_to_string(&path)?;
    Ok(toml::from_str(&content)?)
}

/// A documented stock config, printed by `mintkit gen-config`.
pub fn stock_config_toml() -> &'static str {
    r#"# mintkit.toml — run defaults for the generate flow.
# Every key is optional. Prompts and command-line flags override these.

# Remote prefix where media is (or will be) pinned. Must be ipfs://<CID>.
# base_uri = "ipfs://QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG"

# Directory of per-token descriptions, one <index>.json each.
token_dir = "tokens"

# Directory of media files: [image-|asset-|icon-]<index>.<ext>
media_dir = "media"

# Parent directory for per-run output. Each run creates a fresh
# timestamped directory underneath — nothing is ever overwritten.
output_root = "output"

# Links written into every generated metadata file, in order.
# [[links]]
# title = "Project site"
# url = "https://example.com"
"#
}
