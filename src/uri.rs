//! Base URI validation for remote media addresses.
//!
//! Every descriptor URL in the output is `<base>/<index>.<ext>`, so a bad
//! base poisons the whole run. [`BaseUri::parse`] is the single gate: it
//! accepts `ipfs://` followed by a CIDv0 (`Qm…`, base58btc) or a base32
//! CIDv1 (`b…`), and nothing else. Validation is a plain parse returning a
//! tagged result — callers decide whether a rejection re-prompts (the shell)
//! or aborts (the flag-driven CLI).

use std::fmt;
use thiserror::Error;

/// Literal shown to the operator when their input is rejected.
pub const EXAMPLE: &str = "ipfs://QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG";

const SCHEME: &str = "ipfs://";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum UriError {
    #[error("base URI must start with \"ipfs://\"")]
    MissingScheme,
    #[error("\"{0}\" is not a recognized IPFS content identifier")]
    InvalidCid(String),
}

/// A validated `ipfs://<cid>` base address, stored without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUri(String);

impl BaseUri {
    /// Parse and validate operator input.
    ///
    /// Surrounding whitespace and a trailing `/` are tolerated and stripped;
    /// the CID itself must match exactly one of the two accepted forms.
    pub fn parse(input: &str) -> Result<Self, UriError> {
        let trimmed = input.trim().trim_end_matches('/');
        let cid = trimmed
            .strip_prefix(SCHEME)
            .ok_or(UriError::MissingScheme)?;

        if is_cid_v0(cid) || is_cid_v1(cid) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(UriError::InvalidCid(cid.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BaseUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// CIDv0: `Qm` + 44 base58btc characters (sha2-256 multihash).
fn is_cid_v0(cid: &str) -> bool {
    cid.len() == 46 && cid.starts_with("Qm") && cid.bytes().all(is_base58)
}

/// CIDv1, base32 multibase: `b` prefix, lowercase base32, canonical length
/// 59 for the common sha2-256 encodings.
fn is_cid_v1(cid: &str) -> bool {
    cid.len() == 59
        && cid.starts_with('b')
        && cid
            .bytes()
            .all(|b| b.is_ascii_lowercase() || (b'2'..=b'7').contains(&b))
}

/// Base58btc alphabet: no `0`, `O`, `I`, `l`.
fn is_base58(b: u8) -> bool {
    match b {
        b'1'..=b'9' => true,
        b'A'..=b'H' | b'J'..=b'N' | b'P'..=b'Z' => true,
        b'a'..=b'k' | b'm'..=b'z' => true,
        _ => false,
    }
}
