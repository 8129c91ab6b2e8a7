//! Run orchestration: scan both inputs, then join and write.
//!
//! The pipeline owns run-level configuration and sequencing, nothing else —
//! no prompting, no rendering. Callers (the shell, the flag-driven CLI)
//! drive it in two steps so they can show scan warnings and size a progress
//! bar before assembly starts:
//!
//! ```text
//! scan_inputs(config)            → ScannedRun   (both dirs, materialized)
//! assemble_outputs(config, run)  → RunReport    (fresh dir, files written)
//! ```
//!
//! The two scans are independent; both complete before any join work. Every
//! run writes into a fresh timestamp-derived directory under
//! `output_root` — an existing output directory is never reused or
//! overwritten.

use crate::assemble::{self, AssembleError, AssembleEvent, Link};
use crate::scan::{self, MediaRecord, ScanError, TokenRecord};
use crate::uri::BaseUri;
use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Assemble(#[from] AssembleError),
}

/// Everything one generation run needs, collected up front.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub token_dir: PathBuf,
    pub media_dir: PathBuf,
    pub base_uri: BaseUri,
    pub links: Vec<Link>,
    /// Parent under which the fresh per-run directory is created.
    pub output_root: PathBuf,
}

/// Fully materialized scan results for one run.
#[derive(Debug)]
pub struct ScannedRun {
    pub tokens: Vec<TokenRecord>,
    pub media: Vec<MediaRecord>,
    /// Non-fatal scan warnings from both directories, in scan order.
    pub warnings: Vec<String>,
}

/// What a completed run produced.
#[derive(Debug)]
pub struct RunReport {
    pub output_dir: PathBuf,
    pub written: usize,
}

/// Scan both input directories to completion.
pub fn scan_inputs(config: &RunConfig) -> Result<ScannedRun, PipelineError> {
    let token_scan = scan::scan_token_dir(&config.token_dir)?;
    let media_scan = scan::scan_media_dir(&config.media_dir)?;

    let mut warnings = token_scan.warnings;
    warnings.extend(media_scan.warnings);

    Ok(ScannedRun {
        tokens: token_scan.tokens,
        media: media_scan.media,
        warnings,
    })
}

/// Join and write into a fresh output directory.
pub fn assemble_outputs(
    config: &RunConfig,
    scanned: &ScannedRun,
    events: Option<&mpsc::Sender<AssembleEvent>>,
) -> Result<RunReport, PipelineError> {
    let output_dir = fresh_output_dir(&config.output_root);
    let summary = assemble::assemble(
        &output_dir,
        &config.base_uri,
        &config.links,
        &scanned.tokens,
        &scanned.media,
        events,
    )?;

    Ok(RunReport {
        output_dir,
        written: summary.written,
    })
}

/// Full run: scan, then assemble. No rendering between phases.
pub fn run(
    config: &RunConfig,
    events: Option<&mpsc::Sender<AssembleEvent>>,
) -> Result<(RunReport, Vec<String>), PipelineError> {
    let scanned = scan_inputs(config)?;
    let report = assemble_outputs(config, &scanned, events)?;
    Ok((report, scanned.warnings))
}

/// Timestamp-derived directory name: `metadata-YYYYmmdd-HHMMSS-mmm`.
///
/// Millisecond precision keeps consecutive runs distinct.
pub fn fresh_output_dir(root: &Path) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d-%H%M%S-%3f");
    root.join(format!("metadata-{stamp}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn base() -> BaseUri {
        BaseUri::parse("ipfs://QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG").unwrap()
    }

    fn config(tmp: &TempDir) -> RunConfig {
        let token_dir = tmp.path().join("tokens");
        let media_dir = tmp.path().join("media");
        fs::create_dir_all(&token_dir).unwrap();
        fs::create_dir_all(&media_dir).unwrap();
        RunConfig {
            token_dir,
            media_dir,
            base_uri: base(),
            links: vec![],
            output_root: tmp.path().join("output"),
        }
    }

    #[test]
    fn fresh_output_dirs_are_distinct_across_runs() {
        let root = Path::new("output");
        let a = fresh_output_dir(root);
        // Spin until the millisecond ticks over; two runs never share a name
        let b = loop {
            let candidate = fresh_output_dir(root);
            if candidate != a {
                break candidate;
            }
        };
        assert_ne!(a, b);
        assert!(a.starts_with("output"));
        assert!(a.file_name().unwrap().to_string_lossy().starts_with("metadata-"));
        assert!(b > a, "later run sorts after earlier run");
    }

    #[test]
    fn run_produces_report_and_merged_warnings() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);

        fs::write(
            config.token_dir.join("1.json"),
            r#"{"name": "One", "image": "x"}"#,
        )
        .unwrap();
        fs::write(config.token_dir.join("2.json"), r#"{"nope": true}"#).unwrap();
        fs::write(config.media_dir.join("3.zzz"), "").unwrap();

        let (report, warnings) = run(&config, None).unwrap();
        assert_eq!(report.written, 1);
        assert!(report.output_dir.starts_with(&config.output_root));
        assert!(report.output_dir.join("1.json").exists());

        // One warning per directory, token warnings first
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("2.json"));
        assert!(warnings[1].contains("3.zzz"));
    }

    #[test]
    fn scan_failure_propagates_before_any_write() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        fs::write(config.token_dir.join("1.json"), "{broken").unwrap();

        let err = run(&config, None).unwrap_err();
        assert!(matches!(err, PipelineError::Scan(ScanError::MetadataParse(_, _))));
        assert!(!config.output_root.exists());
    }
}
