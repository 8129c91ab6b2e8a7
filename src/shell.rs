//! Guided prompt shell: command dispatch and the generate flow.
//!
//! The shell reads one line at a time, looks the command up, and runs its
//! handler. Handlers return a [`Flow`] signal — [`Flow::Stop`] asks the
//! outer loop to end; no command touches process-level control itself. The
//! actual process exit happens in `main`, after [`Shell::run`] returns.
//!
//! All prompting is generic over `BufRead`/`Write` so the whole interaction
//! surface is testable against in-memory readers and writers. Pipeline
//! errors never escape a command handler: they are rendered through
//! [`crate::output`] and the shell returns to the idle prompt.
//!
//! ## The generate flow
//!
//! 1. Confirm media is already uploaded (the base URI must exist first).
//! 2. Base URI, re-prompting until [`BaseUri::parse`] accepts, with a
//!    literal corrected example on each rejection.
//! 3. Token and media directory paths (defaults from `mintkit.toml`).
//! 4. Zero or more links, collected until the operator declines.
//! 5. Scan, show warnings, then assemble under an unlabeled progress bar —
//!    one tick per token attempt, bar torn down on every exit path.

use crate::assemble::Link;
use crate::config::Defaults;
use crate::output;
use crate::pipeline::{self, RunConfig};
use crate::uri::{self, BaseUri};
use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

/// What the outer run loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

pub struct Shell<R, W> {
    reader: R,
    writer: W,
    defaults: Defaults,
}

/// Start the shell on stdin/stdout with the given run defaults.
pub fn run_interactive(defaults: Defaults) -> io::Result<()> {
    output::print_banner();
    let stdin = io::stdin();
    let mut shell = Shell::new(stdin.lock(), io::stdout(), defaults);
    shell.run()
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(reader: R, writer: W, defaults: Defaults) -> Self {
        Self {
            reader,
            writer,
            defaults,
        }
    }

    /// The run loop: prompt, read, dispatch, until `Stop` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            write!(self.writer, "> ")?;
            self.writer.flush()?;
            let Some(line) = self.read_line()? else {
                break;
            };
            match self.dispatch(line.trim())? {
                Flow::Continue => {}
                Flow::Stop => break,
            }
        }
        writeln!(self.writer, "bye")?;
        Ok(())
    }

    /// Look up and run one command.
    pub fn dispatch(&mut self, command: &str) -> io::Result<Flow> {
        match command {
            "" => Ok(Flow::Continue),
            "help" | "h" | "?" => self.cmd_help(),
            "generate" | "g" => self.cmd_generate(),
            "check" => self.cmd_check(),
            "version" => {
                writeln!(self.writer, "mintkit {}", env!("CARGO_PKG_VERSION"))?;
                Ok(Flow::Continue)
            }
            "quit" | "exit" | "q" => Ok(Flow::Stop),
            other => {
                writeln!(
                    self.writer,
                    "unknown command \"{other}\" — type \"help\" for the list"
                )?;
                Ok(Flow::Continue)
            }
        }
    }

    fn cmd_help(&mut self) -> io::Result<Flow> {
        writeln!(self.writer, "Commands:")?;
        writeln!(self.writer, "  generate   scan inputs and write metadata files")?;
        writeln!(self.writer, "  check      validate input directories, write nothing")?;
        writeln!(self.writer, "  version    print the mintkit version")?;
        writeln!(self.writer, "  help       this list")?;
        writeln!(self.writer, "  quit       leave the shell")?;
        Ok(Flow::Continue)
    }

    fn cmd_generate(&mut self) -> io::Result<Flow> {
        let uploaded = self.prompt_yes_no(
            "Are the media files already uploaded to IPFS? [y/N]: ",
        )?;
        if !uploaded {
            writeln!(
                self.writer,
                "Upload the media first — metadata references it by base URI."
            )?;
            return Ok(Flow::Continue);
        }

        let Some(base_uri) = self.prompt_base_uri()? else {
            return Ok(Flow::Continue);
        };
        let token_default = self.defaults.token_dir_or("tokens");
        let Some(token_dir) = self.prompt_path("Token descriptions directory", &token_default)?
        else {
            return Ok(Flow::Continue);
        };
        let media_default = self.defaults.media_dir_or("media");
        let Some(media_dir) = self.prompt_path("Media directory", &media_default)? else {
            return Ok(Flow::Continue);
        };
        let links = self.prompt_links()?;

        let config = RunConfig {
            token_dir,
            media_dir,
            base_uri,
            links,
            output_root: self.defaults.output_root_or("output"),
        };
        self.execute(&config)?;
        Ok(Flow::Continue)
    }

    fn cmd_check(&mut self) -> io::Result<Flow> {
        let token_default = self.defaults.token_dir_or("tokens");
        let Some(token_dir) = self.prompt_path("Token descriptions directory", &token_default)?
        else {
            return Ok(Flow::Continue);
        };
        let media_default = self.defaults.media_dir_or("media");
        let Some(media_dir) = self.prompt_path("Media directory", &media_default)? else {
            return Ok(Flow::Continue);
        };

        let result = crate::scan::scan_token_dir(&token_dir)
            .and_then(|tokens| crate::scan::scan_media_dir(&media_dir).map(|media| (tokens, media)));
        match result {
            Ok((token_scan, media_scan)) => {
                let mut warnings = token_scan.warnings;
                warnings.extend(media_scan.warnings);
                let scanned = crate::pipeline::ScannedRun {
                    tokens: token_scan.tokens,
                    media: media_scan.media,
                    warnings,
                };
                output::print_scan_summary(&scanned);
                let orphans = scanned
                    .tokens
                    .iter()
                    .filter(|t| !scanned.media.iter().any(|m| m.index == t.index))
                    .count();
                if orphans > 0 {
                    output::warn(&format!("{orphans} token(s) have no media at all"));
                }
                writeln!(self.writer, "inputs look usable")?;
            }
            Err(e) => output::error(&e.to_string()),
        }
        Ok(Flow::Continue)
    }

    /// Scan, render warnings, then assemble under a progress bar.
    fn execute(&mut self, config: &RunConfig) -> io::Result<()> {
        let scanned = match pipeline::scan_inputs(config) {
            Ok(scanned) => scanned,
            Err(e) => {
                output::error(&e.to_string());
                return Ok(());
            }
        };
        output::print_scan_summary(&scanned);
        if scanned.tokens.is_empty() {
            output::warn("no token descriptions found — nothing to generate");
            return Ok(());
        }

        let bar = output::progress_bar(scanned.tokens.len() as u64);
        let (tx, rx) = mpsc::channel();
        let ticker_bar = bar.clone();
        let ticker = thread::spawn(move || {
            for _event in rx {
                ticker_bar.inc(1);
            }
        });

        let result = pipeline::assemble_outputs(config, &scanned, Some(&tx));

        // Close the channel so the ticker drains and exits, then clear the
        // bar before any result line — error path included
        drop(tx);
        let _ = ticker.join();
        output::finish_progress(&bar);

        match result {
            Ok(report) => output::print_run_report(&report),
            Err(e) => output::error(&e.to_string()),
        }
        Ok(())
    }

    // =========================================================================
    // Prompt primitives
    // =========================================================================

    /// Read one line; `None` on end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_yes_no(&mut self, question: &str) -> io::Result<bool> {
        write!(self.writer, "{question}")?;
        self.writer.flush()?;
        Ok(self
            .read_line()?
            .is_some_and(|input| input.eq_ignore_ascii_case("y")))
    }

    /// Re-prompt until the input parses as a base URI. `None` on end of
    /// input (the command is cancelled, not the shell).
    fn prompt_base_uri(&mut self) -> io::Result<Option<BaseUri>> {
        let default = self.defaults.base_uri.clone().unwrap_or_default();
        loop {
            if default.is_empty() {
                write!(self.writer, "Base URI: ")?;
            } else {
                write!(self.writer, "Base URI [{default}]: ")?;
            }
            self.writer.flush()?;

            let Some(input) = self.read_line()? else {
                return Ok(None);
            };
            let candidate = if input.is_empty() { &default } else { &input };
            match BaseUri::parse(candidate) {
                Ok(uri) => return Ok(Some(uri)),
                Err(e) => {
                    writeln!(self.writer, "{e}")?;
                    writeln!(self.writer, "expected something like: {}", uri::EXAMPLE)?;
                }
            }
        }
    }

    /// Path prompt with a default; empty input takes the default.
    fn prompt_path(
        &mut self,
        label: &str,
        default: &std::path::Path,
    ) -> io::Result<Option<std::path::PathBuf>> {
        write!(self.writer, "{label} [{}]: ", default.display())?;
        self.writer.flush()?;
        let Some(input) = self.read_line()? else {
            return Ok(None);
        };
        if input.is_empty() {
            Ok(Some(default.to_path_buf()))
        } else {
            Ok(Some(input.into()))
        }
    }

    /// Collect zero or more links until the operator declines to add more.
    fn prompt_links(&mut self) -> io::Result<Vec<Link>> {
        let mut links = self.defaults.links.clone();
        loop {
            let more = self.prompt_yes_no("Add a link? [y/N]: ")?;
            if !more {
                return Ok(links);
            }
            let Some(title) = self.prompt_nonempty("Link title: ")? else {
                return Ok(links);
            };
            let Some(url) = self.prompt_nonempty("Link URL: ")? else {
                return Ok(links);
            };
            links.push(Link { title, url });
        }
    }

    /// Re-prompt until the operator types something non-empty.
    fn prompt_nonempty(&mut self, label: &str) -> io::Result<Option<String>> {
        loop {
            write!(self.writer, "{label}")?;
            self.writer.flush()?;
            let Some(input) = self.read_line()? else {
                return Ok(None);
            };
            if !input.is_empty() {
                return Ok(Some(input));
            }
            writeln!(self.writer, "a value is required")?;
        }
    }
}
