use clap::{Parser, Subcommand};
use mintkit::assemble::Link;
use mintkit::pipeline::{self, RunConfig};
use mintkit::uri::BaseUri;
use mintkit::{config, output, scan, shell};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

#[derive(Parser)]
#[command(name = "mintkit")]
#[command(about = "Metadata assistant for NFT creators")]
#[command(long_about = "\
Metadata assistant for NFT creators

Your filesystem is the data source. One directory holds per-token JSON
descriptions, one holds media files; mintkit joins them by numeric index
and writes one normalized metadata file per token.

Input structure:

  tokens/
  ├── 1.json                # {\"name\": …, \"image\": …, \"attributes\": […]}
  ├── 2.json
  └── 007.json              # leading zeros fine — this is token 7
  media/
  ├── icon-1.png            # token 1's icon
  ├── image-1.png           # one of token 1's images
  ├── 1.gif                 # bare names with image extensions are images too
  └── asset-2.glb           # discovered, classified, not placed in output

Each run writes to a fresh output/metadata-<timestamp>/ directory.
Run 'mintkit gen-config' to generate a documented mintkit.toml.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Guided assistant shell (the default when no command is given)
    Shell,
    /// Generate metadata without prompts
    Generate(GenerateArgs),
    /// Validate input directories without writing anything
    Check(CheckArgs),
    /// Print a stock mintkit.toml with all options documented
    GenConfig,
    /// Import an existing collection's descriptions (not yet implemented)
    Import(ImportArgs),
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Directory of per-token descriptions (<index>.json)
    #[arg(long)]
    tokens: Option<PathBuf>,

    /// Directory of media files ([image-|asset-|icon-]<index>.<ext>)
    #[arg(long)]
    media: Option<PathBuf>,

    /// Remote prefix the media is pinned under (ipfs://<CID>)
    #[arg(long)]
    base_uri: Option<String>,

    /// Parent directory for the fresh per-run output directory
    #[arg(long)]
    output: Option<PathBuf>,

    /// Link written into every record, as TITLE=URL (repeatable)
    #[arg(long = "link", value_name = "TITLE=URL")]
    links: Vec<String>,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Directory of per-token descriptions
    #[arg(long)]
    tokens: Option<PathBuf>,

    /// Directory of media files
    #[arg(long)]
    media: Option<PathBuf>,
}

#[derive(clap::Args)]
struct ImportArgs {
    /// Contract address of the deployed collection
    #[arg(long)]
    contract: String,

    /// Network the collection lives on
    #[arg(long, default_value = "mainnet")]
    network: String,

    /// Directory to write imported descriptions into
    #[arg(long, default_value = "tokens")]
    into: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let defaults = config::load(Path::new("."))?;

    match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => shell::run_interactive(defaults)?,
        Command::Generate(args) => {
            let base_uri = match args
                .base_uri
                .as_deref()
                .or(defaults.base_uri.as_deref())
            {
                Some(raw) => match BaseUri::parse(raw) {
                    Ok(uri) => uri,
                    Err(e) => {
                        output::error(&e.to_string());
                        std::process::exit(1);
                    }
                },
                None => {
                    output::error("no base URI — pass --base-uri or set it in mintkit.toml");
                    std::process::exit(1);
                }
            };

            let mut links = defaults.links.clone();
            for raw in &args.links {
                match parse_link(raw) {
                    Some(link) => links.push(link),
                    None => {
                        output::error(&format!("invalid --link \"{raw}\", expected TITLE=URL"));
                        std::process::exit(1);
                    }
                }
            }

            let config = RunConfig {
                token_dir: args.tokens.unwrap_or_else(|| defaults.token_dir_or("tokens")),
                media_dir: args.media.unwrap_or_else(|| defaults.media_dir_or("media")),
                base_uri,
                links,
                output_root: args
                    .output
                    .unwrap_or_else(|| defaults.output_root_or("output")),
            };

            if let Err(message) = generate(&config) {
                output::error(&message);
                std::process::exit(1);
            }
        }
        Command::Check(args) => {
            let token_dir = args.tokens.unwrap_or_else(|| defaults.token_dir_or("tokens"));
            let media_dir = args.media.unwrap_or_else(|| defaults.media_dir_or("media"));
            if let Err(message) = check(&token_dir, &media_dir) {
                output::error(&message);
                std::process::exit(1);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Import(args) => {
            output::error(&format!(
                "import is not implemented yet — cannot fetch {} from {} into {}",
                args.contract,
                args.network,
                args.into.display()
            ));
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Non-interactive generate: scan, render warnings, assemble under a
/// progress bar. Returns the rendered failure message on any fatal error.
fn generate(config: &RunConfig) -> Result<(), String> {
    let scanned = pipeline::scan_inputs(config).map_err(|e| e.to_string())?;
    output::print_scan_summary(&scanned);
    if scanned.tokens.is_empty() {
        output::warn("no token descriptions found — nothing to generate");
        return Ok(());
    }

    let bar = output::progress_bar(scanned.tokens.len() as u64);
    let (tx, rx) = mpsc::channel();
    let ticker_bar = bar.clone();
    let ticker = std::thread::spawn(move || {
        for _event in rx {
            ticker_bar.inc(1);
        }
    });

    let result = pipeline::assemble_outputs(config, &scanned, Some(&tx));

    drop(tx);
    let _ = ticker.join();
    output::finish_progress(&bar);

    let report = result.map_err(|e| e.to_string())?;
    output::print_run_report(&report);
    Ok(())
}

/// Scan both directories and report, writing nothing.
fn check(token_dir: &Path, media_dir: &Path) -> Result<(), String> {
    let token_scan = scan::scan_token_dir(token_dir).map_err(|e| e.to_string())?;
    let media_scan = scan::scan_media_dir(media_dir).map_err(|e| e.to_string())?;

    let mut warnings = token_scan.warnings;
    warnings.extend(media_scan.warnings);
    let scanned = pipeline::ScannedRun {
        tokens: token_scan.tokens,
        media: media_scan.media,
        warnings,
    };
    output::print_scan_summary(&scanned);
    println!("inputs look usable");
    Ok(())
}

/// Parse a `TITLE=URL` flag value.
fn parse_link(raw: &str) -> Option<Link> {
    let (title, url) = raw.split_once('=')?;
    if title.is_empty() || url.is_empty() {
        return None;
    }
    Some(Link {
        title: title.to_string(),
        url: url.to_string(),
    })
}
