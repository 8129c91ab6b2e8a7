//! Media descriptor construction: dimensions, content hash, remote URL.
//!
//! A [`MediaDescriptor`] is the per-file artifact embedded in the output
//! schema for every image and icon. It is computed on demand during
//! assembly and never persisted on its own.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Raster dimensions (JPEG, PNG, WebP, GIF) | `image::ImageReader::into_dimensions` (header read, no decode) |
//! | SVG dimensions | `usvg::Tree::from_data` |
//! | Content hash | `sha2::Sha256` over the full file bytes |
//!
//! The remote URL is plain concatenation: `<base>/<index>.<ext>`. The index
//! is the parsed numeric value, not the original filename, so leading zeros
//! and prefixes in source filenames never leak into output URLs.

use crate::scan::MediaRecord;
use crate::uri::BaseUri;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Identifier written into every descriptor's `hashFunction` field.
pub const HASH_FUNCTION: &str = "sha256(bytes)";

#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("cannot read {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("cannot determine dimensions of {0}: {1}")]
    Dimensions(PathBuf, String),
}

/// Computed width/height/hash/URL record for one image or icon file,
/// serialized with the LSP-style key names of the output schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaDescriptor {
    pub width: u32,
    pub height: u32,
    #[serde(rename = "hashFunction")]
    pub hash_function: &'static str,
    pub hash: String,
    pub url: String,
}

/// Build the descriptor for one image or icon record.
///
/// Reads the full file into memory once; the same bytes feed both the
/// dimension probe and the hash. Undeterminable dimensions are fatal for
/// this descriptor, and the caller propagates — a corrupt image aborts the
/// run rather than emitting metadata with holes.
pub fn build_descriptor(
    record: &MediaRecord,
    base_uri: &BaseUri,
) -> Result<MediaDescriptor, DescriptorError> {
    let bytes = std::fs::read(&record.source_path)
        .map_err(|e| DescriptorError::Read(record.source_path.clone(), e))?;

    let (width, height) = measure(&record.source_path, &bytes, &record.extension)?;

    Ok(MediaDescriptor {
        width,
        height,
        hash_function: HASH_FUNCTION,
        hash: content_hash(&bytes),
        url: remote_url(base_uri, record.index, &record.extension),
    })
}

/// SHA-256 of the raw bytes as a `0x`-prefixed lowercase hex string.
pub fn content_hash(bytes: &[u8]) -> String {
    format!("0x{:x}", Sha256::digest(bytes))
}

/// Remote address for a media file: `<base>/<index>.<ext>`.
pub fn remote_url(base_uri: &BaseUri, index: u32, extension: &str) -> String {
    format!("{}/{}.{}", base_uri.as_str(), index, extension)
}

/// Probe width and height without a full decode.
fn measure(path: &Path, bytes: &[u8], extension: &str) -> Result<(u32, u32), DescriptorError> {
    let (width, height) = if extension == "svg" {
        svg_dimensions(path, bytes)?
    } else {
        raster_dimensions(path, bytes)?
    };

    if width == 0 || height == 0 {
        return Err(DescriptorError::Dimensions(
            path.to_path_buf(),
            format!("degenerate size {width}x{height}"),
        ));
    }
    Ok((width, height))
}

fn raster_dimensions(path: &Path, bytes: &[u8]) -> Result<(u32, u32), DescriptorError> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DescriptorError::Dimensions(path.to_path_buf(), e.to_string()))?
        .into_dimensions()
        .map_err(|e| DescriptorError::Dimensions(path.to_path_buf(), e.to_string()))
}

fn svg_dimensions(path: &Path, bytes: &[u8]) -> Result<(u32, u32), DescriptorError> {
    let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())
        .map_err(|e| DescriptorError::Dimensions(path.to_path_buf(), e.to_string()))?;
    let size = tree.size();
    Ok((size.width().round() as u32, size.height().round() as u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::MediaCategory;
    use std::fs;
    use tempfile::TempDir;

    fn base() -> BaseUri {
        BaseUri::parse("ipfs://QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG").unwrap()
    }

    fn record(path: PathBuf, index: u32, extension: &str) -> MediaRecord {
        MediaRecord {
            source_path: path,
            category: MediaCategory::Image,
            index,
            extension: extension.to_string(),
        }
    }

    fn write_png(path: &Path, width: u32, height: u32) {
        image::RgbImage::from_pixel(width, height, image::Rgb([40, 90, 200]))
            .save(path)
            .unwrap();
    }

    // =========================================================================
    // Hashing
    // =========================================================================

    #[test]
    fn content_hash_matches_known_vector() {
        // SHA-256("abc")
        assert_eq!(
            content_hash(b"abc"),
            "0xba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn content_hash_is_deterministic_and_byte_sensitive() {
        let a = content_hash(b"token media bytes");
        let b = content_hash(b"token media bytes");
        let c = content_hash(b"token media byteS");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("0x"));
        assert_eq!(a.len(), 2 + 64);
    }

    // =========================================================================
    // URL construction
    // =========================================================================

    #[test]
    fn remote_url_uses_numeric_index_and_extension() {
        assert_eq!(
            remote_url(&base(), 3, "png"),
            format!("{}/3.png", base().as_str())
        );
    }

    #[test]
    fn descriptor_url_normalizes_padded_source_names() {
        let tmp = TempDir::new().unwrap();
        // Source file is zero-padded; the URL must use the parsed index
        let path = tmp.path().join("image-007.png");
        write_png(&path, 4, 4);

        let d = build_descriptor(&record(path, 7, "png"), &base()).unwrap();
        assert!(d.url.ends_with("/7.png"));
    }

    // =========================================================================
    // Dimensions
    // =========================================================================

    #[test]
    fn descriptor_reads_png_dimensions() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("image-1.png");
        write_png(&path, 12, 8);

        let d = build_descriptor(&record(path, 1, "png"), &base()).unwrap();
        assert_eq!((d.width, d.height), (12, 8));
        assert_eq!(d.hash_function, "sha256(bytes)");
    }

    #[test]
    fn descriptor_reads_jpeg_dimensions() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("image-1.jpg");
        write_png(&path, 6, 10);

        let d = build_descriptor(&record(path, 1, "jpg"), &base()).unwrap();
        assert_eq!((d.width, d.height), (6, 10));
    }

    #[test]
    fn descriptor_reads_svg_dimensions() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("icon-1.svg");
        fs::write(
            &path,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="30"></svg>"#,
        )
        .unwrap();

        let d = build_descriptor(&record(path, 1, "svg"), &base()).unwrap();
        assert_eq!((d.width, d.height), (40, 30));
    }

    #[test]
    fn descriptor_hash_covers_exact_file_bytes() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("image-2.png");
        write_png(&path, 3, 3);

        let bytes = fs::read(&path).unwrap();
        let d = build_descriptor(&record(path, 2, "png"), &base()).unwrap();
        assert_eq!(d.hash, content_hash(&bytes));
    }

    #[test]
    fn corrupt_image_fails_with_dimensions_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("image-1.png");
        fs::write(&path, b"definitely not a png").unwrap();

        let err = build_descriptor(&record(path, 1, "png"), &base()).unwrap_err();
        assert!(matches!(err, DescriptorError::Dimensions(_, _)));
    }

    #[test]
    fn missing_file_fails_with_read_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("image-9.png");

        let err = build_descriptor(&record(path, 9, "png"), &base()).unwrap_err();
        assert!(matches!(err, DescriptorError::Read(_, _)));
    }
}
