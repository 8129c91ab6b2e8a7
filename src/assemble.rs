//! Joining token records with media and writing output metadata.
//!
//! The assembler is the pipeline's only writer. For every token record, in
//! token-scan order, it:
//!
//! 1. Maps the token's attributes to the output `{key, value}` shape
//!    (absent stays absent — no empty array is invented).
//! 2. Resolves the token's icon: the first icon-category media record with a
//!    matching index, in media-scan order.
//! 3. Resolves the token's images: every image-category record with a
//!    matching index, descriptors built in scan order.
//! 4. Serializes the assembled record to compact JSON and writes
//!    `<out_dir>/<index>.json` atomically (temp file + rename), so an
//!    interrupted run never leaves a truncated record behind.
//!
//! ## Schema quirk: double-nested `images`
//!
//! The output `images` field is an array containing exactly one array of
//! descriptors — `[[d1, d2]]`, not `[d1, d2]`. This is the established
//! output schema and is preserved deliberately; do not flatten it.
//!
//! ## Failure model
//!
//! Fail-fast: the first descriptor or write failure aborts the whole run.
//! Records already written stay on disk, but the output directory is not
//! reported on failure. One [`AssembleEvent`] per token is sent on the
//! optional channel whether the token succeeded or not, so a progress
//! consumer always sees every attempt before the error surfaces.
//!
//! `asset`-category media is never consulted here — assets are discovered
//! and classified by the scanner but have no slot in the output schema.

use crate::descriptor::{self, DescriptorError, MediaDescriptor};
use crate::naming::MediaCategory;
use crate::scan::{AttributeValue, MediaRecord, TokenRecord};
use crate::uri::BaseUri;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssembleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}

/// A title/url pair shared identically across every output record of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub title: String,
    pub url: String,
}

/// One attribute in the output shape: `trait_type` renamed to `key`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputAttribute {
    pub key: String,
    pub value: AttributeValue,
}

/// One output metadata document, written as `<index>.json`.
#[derive(Debug, Serialize)]
pub struct OutputRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<OutputAttribute>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<MediaDescriptor>,
    /// Always one inner array — see the module docs.
    pub images: Vec<Vec<MediaDescriptor>>,
    pub links: Vec<Link>,
}

/// Progress event: one per token attempt, success or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssembleEvent {
    pub index: u32,
}

/// What a completed assembly produced.
#[derive(Debug)]
pub struct AssembleSummary {
    pub written: usize,
}

/// Join tokens with media and write one metadata file per token.
///
/// `out_dir` is created (with parents) before the first write; creating it
/// redundantly is safe. Media lookups for a token all complete before that
/// token's file is written.
pub fn assemble(
    out_dir: &Path,
    base_uri: &BaseUri,
    links: &[Link],
    tokens: &[TokenRecord],
    media: &[MediaRecord],
    events: Option<&mpsc::Sender<AssembleEvent>>,
) -> Result<AssembleSummary, AssembleError> {
    fs::create_dir_all(out_dir)?;

    let mut written = 0;
    for token in tokens {
        let result = assemble_token(out_dir, base_uri, links, token, media);
        if let Some(tx) = events {
            // Receiver may already be gone on teardown; progress is advisory
            let _ = tx.send(AssembleEvent { index: token.index });
        }
        result?;
        written += 1;
    }

    Ok(AssembleSummary { written })
}

fn assemble_token(
    out_dir: &Path,
    base_uri: &BaseUri,
    links: &[Link],
    token: &TokenRecord,
    media: &[MediaRecord],
) -> Result<(), AssembleError> {
    let icon = media
        .iter()
        .find(|m| m.index == token.index && m.category == MediaCategory::Icon)
        .map(|m| descriptor::build_descriptor(m, base_uri))
        .transpose()?;

    let image_descriptors = media
        .iter()
        .filter(|m| m.index == token.index && m.category == MediaCategory::Image)
        .map(|m| descriptor::build_descriptor(m, base_uri))
        .collect::<Result<Vec<_>, _>>()?;

    let attributes = token.attributes.as_ref().map(|attrs| {
        attrs
            .iter()
            .map(|a| OutputAttribute {
                key: a.trait_type.clone(),
                value: a.value.clone(),
            })
            .collect()
    });

    let record = OutputRecord {
        name: token.name.clone(),
        description: token.description.clone(),
        attributes,
        icon,
        images: vec![image_descriptors],
        links: links.to_vec(),
    };

    let json = serde_json::to_string(&record)?;
    write_atomic(&out_dir.join(format!("{}.json", token.index)), json.as_bytes())?;
    Ok(())
}

/// Write via a temp sibling + rename so readers never observe a partial file.
fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = tmp_sibling(path);
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}
