//! # mintkit
//!
//! A command-line assistant for NFT creators. Your filesystem is the data
//! source: one directory of per-token JSON descriptions, one directory of
//! media files, cross-referenced by numeric index, out comes one validated
//! LSP4-style metadata file per token.
//!
//! # Architecture: Scan → Join → Write
//!
//! ```text
//! tokens/   1.json, 2.json, …                 ┐
//!                                             ├─ scan (both fully
//! media/    icon-1.png, image-1.png, 1.gif …  ┘   materialized)
//!                       │
//!                       ▼  join by index + category
//!           descriptors: dimensions + sha256 + remote URL
//!                       │
//!                       ▼
//! output/metadata-<timestamp>/  1.json, 2.json, …
//! ```
//!
//! Both scans run to completion before any join work starts — there is no
//! streaming join. Every run writes into a fresh timestamp-named directory;
//! nothing is ever reused or overwritten.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | Anchored filename patterns: `<index>.json` and `[<category>-]<index>.<ext>` |
//! | [`scan`] | Directory scanners producing token and media records, with the skip/warn/fatal policy |
//! | [`descriptor`] | Per-file width/height/hash/URL computation |
//! | [`assemble`] | The index-and-category join and atomic per-token writes |
//! | [`pipeline`] | Run sequencing and the fresh output directory |
//! | [`uri`] | Typed `ipfs://<CID>` base-URI validation |
//! | [`config`] | Optional `mintkit.toml` run defaults |
//! | [`shell`] | The guided prompt shell and its `Flow::Stop` run loop |
//! | [`output`] | Terminal rendering: banner, warnings, summaries, progress |
//!
//! # Design Decisions
//!
//! ## Fail-Fast Assembly
//!
//! A single unreadable or undecodable media file aborts the whole run. A
//! half-generated collection uploaded by accident is far more expensive
//! than a re-run after fixing the one bad file. Warnings (skippable
//! records, unsupported extensions) are the non-fatal tier and never stop
//! a scan.
//!
//! ## The Double-Nested `images` Field
//!
//! The output `images` field is `[[d1, d2]]` — an array holding one array
//! of descriptors. This mirrors the established metadata schema consumed
//! downstream; flattening it would break consumers. It is preserved on
//! purpose, quirk and all.
//!
//! ## Indices Come From Filenames
//!
//! The numeric index in a filename is the only join key. `007.json`,
//! `image-7.png` and `icon-7.svg` all belong to token 7, and the output
//! URL for that image is `<base>/7.png` — zero-padding and prefixes never
//! leak into output. Content is never inspected to guess ownership.
//!
//! ## No Process Exit Below `main`
//!
//! The shell's `quit` command returns a [`shell::Flow::Stop`] signal that
//! the run loop consumes; the process exit itself happens in `main`. Leaf
//! commands staying out of process control keeps every handler testable
//! against in-memory readers and writers.

pub mod assemble;
pub mod config;
pub mod descriptor;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod scan;
pub mod shell;
pub mod uri;
