//! Terminal rendering: banner, warnings, errors, scan summaries, progress.
//!
//! Each display has a `format_*` function (returns plain `String`s, pure, no
//! I/O) and a `print_*`/`warn`/`error` wrapper that applies color and writes
//! to the terminal. Format functions carry no ANSI codes so tests can assert
//! on them directly; color is applied only at the printing edge. The
//! `colored` crate degrades to plain text on non-tty output by itself.
//!
//! The assembly progress bar is the single piece of stateful rendering: an
//! unlabeled indicatif bar spanning the token count, fed by one
//! [`AssembleEvent`](crate::assemble::AssembleEvent) per token attempt.

use crate::pipeline::{RunReport, ScannedRun};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

const BANNER: &str = r#"
             _         _    _     _  _
  _ __ ___  (_) _ __  | |_ | | __(_)| |_
 | '_ ` _ \ | || '_ \ | __|| |/ /| || __|
 | | | | | || || | | || |_ |   < | || |_
 |_| |_| |_||_||_| |_| \__||_|\_\|_| \__|
"#;

/// Print the shell banner and a one-line orientation.
pub fn print_banner() {
    println!("{}", BANNER.cyan());
    println!("  Metadata assistant for NFT creators. Type \"help\" for commands.");
    println!();
}

/// Non-fatal notice: highlighted, scanning continues.
pub fn warn(message: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), message);
}

/// Fatal notice: attention style, run is over.
pub fn error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message);
}

/// Success notice for run completion.
pub fn success(message: &str) {
    println!("{} {}", "done:".green().bold(), message);
}

/// One line per input kind: what the scans found.
pub fn format_scan_summary(scanned: &ScannedRun) -> Vec<String> {
    let icons = scanned
        .media
        .iter()
        .filter(|m| m.category == crate::naming::MediaCategory::Icon)
        .count();
    let images = scanned
        .media
        .iter()
        .filter(|m| m.category == crate::naming::MediaCategory::Image)
        .count();
    let assets = scanned
        .media
        .iter()
        .filter(|m| m.category == crate::naming::MediaCategory::Asset)
        .count();

    vec![
        format!("{} token description(s)", scanned.tokens.len()),
        format!("{images} image(s), {icons} icon(s), {assets} asset(s)"),
    ]
}

pub fn print_scan_summary(scanned: &ScannedRun) {
    for line in format_scan_summary(scanned) {
        println!("  {line}");
    }
    for warning in &scanned.warnings {
        warn(warning);
    }
}

/// Final line of a successful run: where the output landed.
pub fn format_run_report(report: &RunReport) -> String {
    format!(
        "{} metadata file(s) written to {}",
        report.written,
        report.output_dir.display()
    )
}

pub fn print_run_report(report: &RunReport) {
    success(&format_run_report(report));
}

/// Unlabeled progress bar spanning the token count.
///
/// Callers must finish the bar on every exit path, error included —
/// [`finish_progress`] is the one way out.
pub fn progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("[{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-");
    bar.set_style(style);
    bar
}

/// Tear the bar down without leaving a stale line behind.
pub fn finish_progress(bar: &ProgressBar) {
    bar.finish_and_clear();
}
