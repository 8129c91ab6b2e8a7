//! Centralized filename parsing for both input directories.
//!
//! Token descriptions and media files follow two fixed naming patterns:
//!
//! - Token metadata: `<index>.json` — `7.json`, `007.json`
//! - Media: `[<category>-]<index>.<ext>` — `icon-3.png`, `image-12.jpg`, `5.gif`
//!
//! Both patterns are anchored: nothing before, nothing after. Parsing is
//! pure string inspection with no I/O; the scanners in [`crate::scan`] apply
//! these functions to directory listings and decide what to do with entries
//! that don't match.
//!
//! ## Category resolution
//!
//! A media filename may carry an explicit category prefix (`image-`, `asset-`,
//! `icon-`). When the prefix is absent the parser returns `category: None`
//! and the caller resolves it: files whose extension is in
//! [`IMAGE_EXTENSIONS`] default to [`MediaCategory::Image`], anything else is
//! rejected. `007.json` parses to index 7 — leading zeros in source filenames
//! are normalized away everywhere downstream (output filenames, remote URLs).

use std::fmt;

/// Extensions that resolve an unprefixed media filename to the image category.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "svg"];

/// Media classification, governing how a file is processed and where it
/// lands in the output schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaCategory {
    /// Gallery image — joined into the output `images` field.
    Image,
    /// Auxiliary asset — discovered and classified, not joined into output.
    Asset,
    /// Token icon — at most one per token in the output `icon` field.
    Icon,
}

impl MediaCategory {
    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "image" => Some(Self::Image),
            "asset" => Some(Self::Asset),
            "icon" => Some(Self::Icon),
            _ => None,
        }
    }
}

impl fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => f.write_str("image"),
            Self::Asset => f.write_str("asset"),
            Self::Icon => f.write_str("icon"),
        }
    }
}

/// Result of parsing a media filename like `icon-3.png`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMediaName {
    /// Explicit category from the filename prefix, `None` if unprefixed.
    pub category: Option<MediaCategory>,
    /// Token index the file belongs to.
    pub index: u32,
    /// Extension as captured — the pattern only admits lowercase `[a-z0-9]+`.
    pub extension: String,
}

/// Parse a token metadata filename: `<digits>.json`, anchored at both ends.
///
/// Returns the parsed index, with leading zeros collapsed (`"007.json"` → 7).
/// Anything else — wrong extension, uppercase, extra characters, an index
/// too large for `u32` — is a non-match.
pub fn parse_token_metadata_name(name: &str) -> Option<u32> {
    let digits = name.strip_suffix(".json")?;
    parse_index(digits)
}

/// Parse a media filename: `[(image|asset|icon)-]<digits>.<ext>`, anchored.
///
/// The extension class is `[a-z0-9]+` — a single dot, lowercase only, so
/// `3.PNG` and `3.tar.gz` are non-matches. An unrecognized prefix makes the
/// digits check fail (`thumb-3.png` → `None`).
pub fn parse_media_name(name: &str) -> Option<ParsedMediaName> {
    let (category, rest) = match name.split_once('-') {
        Some((prefix, rest)) => match MediaCategory::from_prefix(prefix) {
            Some(cat) => (Some(cat), rest),
            None => (None, name),
        },
        None => (None, name),
    };

    let (digits, extension) = rest.split_once('.')?;
    let index = parse_index(digits)?;
    if extension.is_empty()
        || !extension
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
    {
        return None;
    }

    Some(ParsedMediaName {
        category,
        index,
        extension: extension.to_string(),
    })
}

/// Whether an extension is in the supported-image set used for category
/// fallback on unprefixed media filenames.
pub fn is_supported_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext)
}

fn parse_index(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
