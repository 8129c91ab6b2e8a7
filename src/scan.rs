//! Directory scanning for token descriptions and media files.
//!
//! Two scanners, one per input directory:
//!
//! - [`scan_token_dir`] — `<index>.json` files holding per-token
//!   descriptions. Each matching file is parsed and validated; the result is
//!   a [`TokenRecord`] per usable file.
//! - [`scan_media_dir`] — `[<category>-]<index>.<ext>` media files. Each
//!   matching file becomes a [`MediaRecord`] with its category resolved.
//!
//! Both scans list direct children only (non-recursive) and sort entries by
//! filename, so a given directory always yields the same record order.
//! Records are *not* sorted by index — `10.json` sorts before `2.json` —
//! and downstream joins must not assume otherwise.
//!
//! ## Failure policy
//!
//! The two failure tiers are deliberate and asymmetric:
//!
//! - **Fatal** (the whole scan aborts): the directory cannot be read, a file
//!   cannot be read, or a file matching the token pattern contains invalid
//!   JSON. A broken description file means the collection definition itself
//!   is broken — producing output for the other tokens would hide it.
//! - **Skip with warning** (scan continues): a token file parses but lacks a
//!   usable `name` or `image`, its `attributes` are malformed, or an
//!   unprefixed media file has an extension outside the supported-image set.
//! - **Silent skip**: filenames matching neither pattern. Input directories
//!   routinely hold `.DS_Store`, notes, and editor droppings.
//!
//! Warnings are collected on the scan result as plain strings; rendering is
//! the caller's concern.

use crate::naming::{
    self, MediaCategory, parse_media_name, parse_token_metadata_name,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("cannot read directory {0}: {1}")]
    DirectoryRead(PathBuf, std::io::Error),
    #[error("cannot read {0}: {1}")]
    FileRead(PathBuf, std::io::Error),
    #[error("invalid JSON in {0}: {1}")]
    MetadataParse(PathBuf, serde_json::Error),
}

/// One usable entry from the token metadata directory.
#[derive(Debug, Clone)]
pub struct TokenRecord {
    /// Numeric index from the filename — the join key against media records.
    pub index: u32,
    pub source_path: PathBuf,
    pub name: String,
    pub description: Option<String>,
    /// Ordered trait list, `None` when the source file has no `attributes`
    /// key. Absence is preserved through to the output.
    pub attributes: Option<Vec<TokenAttribute>>,
}

/// One `{trait_type, value}` entry from a token description.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenAttribute {
    pub trait_type: String,
    pub value: AttributeValue,
}

/// Attribute values are either numbers or strings in the source schema.
/// Numbers are kept as [`serde_json::Number`] so `3` round-trips as `3`,
/// not `3.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(serde_json::Number),
    Text(String),
}

/// One entry from the media directory, category resolved.
#[derive(Debug, Clone)]
pub struct MediaRecord {
    pub source_path: PathBuf,
    pub category: MediaCategory,
    /// Join key against [`TokenRecord::index`].
    pub index: u32,
    /// Lowercase extension, reused verbatim in the descriptor URL.
    pub extension: String,
}

/// Result of a token directory scan: records plus non-fatal warnings.
#[derive(Debug, Default)]
pub struct TokenScan {
    pub tokens: Vec<TokenRecord>,
    pub warnings: Vec<String>,
}

/// Result of a media directory scan: records plus non-fatal warnings.
#[derive(Debug, Default)]
pub struct MediaScan {
    pub media: Vec<MediaRecord>,
    pub warnings: Vec<String>,
}

/// Scan a directory of `<index>.json` token descriptions.
pub fn scan_token_dir(dir: &Path) -> Result<TokenScan, ScanError> {
    let mut scan = TokenScan::default();
    let mut seen = HashSet::new();

    for path in list_files(dir)? {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };
        let Some(index) = parse_token_metadata_name(&name) else {
            continue;
        };

        let content = fs::read_to_string(&path)
            .map_err(|e| ScanError::FileRead(path.clone(), e))?;
        let value: serde_json::Value = serde_json::from_str(&content)
            .map_err(|e| ScanError::MetadataParse(path.clone(), e))?;

        match build_token_record(index, &path, &value) {
            Ok(record) => {
                if !seen.insert(index) {
                    scan.warnings.push(format!(
                        "duplicate token index {index}: {name} overwrites an earlier entry's output"
                    ));
                }
                scan.tokens.push(record);
            }
            Err(reason) => scan.warnings.push(format!("skipping {name}: {reason}")),
        }
    }

    Ok(scan)
}

/// Scan a directory of `[<category>-]<index>.<ext>` media files.
pub fn scan_media_dir(dir: &Path) -> Result<MediaScan, ScanError> {
    let mut scan = MediaScan::default();

    for path in list_files(dir)? {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };
        let Some(parsed) = parse_media_name(&name) else {
            continue;
        };

        let category = match parsed.category {
            Some(category) => category,
            // Unprefixed files are images iff their extension says so
            None if naming::is_supported_image_extension(&parsed.extension) => {
                MediaCategory::Image
            }
            None => {
                scan.warnings.push(format!(
                    "skipping {name}: unsupported media extension \"{}\"",
                    parsed.extension
                ));
                continue;
            }
        };

        scan.media.push(MediaRecord {
            source_path: path,
            category,
            index: parsed.index,
            extension: parsed.extension,
        });
    }

    Ok(scan)
}

/// List direct file children of `dir`, sorted by path.
fn list_files(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| ScanError::DirectoryRead(dir.to_path_buf(), e))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();

    files.sort();
    Ok(files)
}

/// Validate a parsed token description and build its record.
///
/// `name` and `image` must both be non-empty strings. `image` only gates
/// inclusion — the output references media by index join, not by this field.
/// Returns the reason string on rejection; the caller turns it into a
/// warning.
fn build_token_record(
    index: u32,
    path: &Path,
    value: &serde_json::Value,
) -> Result<TokenRecord, String> {
    let name = match value.get("name").and_then(serde_json::Value::as_str) {
        Some(s) if !s.is_empty() => s.to_string(),
        Some(_) => return Err("required field \"name\" is empty".to_string()),
        None => return Err("missing required field \"name\"".to_string()),
    };

    match value.get("image").and_then(serde_json::Value::as_str) {
        Some(s) if !s.is_empty() => {}
        Some(_) => return Err("required field \"image\" is empty".to_string()),
        None => return Err("missing required field \"image\"".to_string()),
    }

    let description = value
        .get("description")
        .and_then(serde_json::Value::as_str)
        .map(String::from);

    let attributes = match value.get("attributes") {
        None => None,
        Some(raw) => match serde_json::from_value::<Vec<TokenAttribute>>(raw.clone()) {
            Ok(attrs) => Some(attrs),
            Err(e) => return Err(format!("malformed \"attributes\": {e}")),
        },
    };

    Ok(TokenRecord {
        index,
        source_path: path.to_path_buf(),
        name,
        description,
        attributes,
    })
}
