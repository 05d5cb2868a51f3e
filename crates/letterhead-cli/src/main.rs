// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Letterhead — stamp a logo, a footer, and a verification QR code onto every
// page of a PDF.
//
// Entry point. Initialises logging, loads the input and assets concurrently,
// runs the branding engine once, and writes the result.

mod assets;
mod import;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use letterhead_core::EngineConfig;
use letterhead_core::error::{LetterheadError, Result};
use letterhead_core::human_errors::{Severity, humanize_error};
use letterhead_document::{BrandAssets, BrandingEngine};
use tracing::{error, info};

use assets::InputSource;
use import::ImportFailure;

#[derive(Debug, Parser)]
#[command(name = "letterhead")]
#[command(version)]
#[command(about = "Stamp a logo, footer, and QR code onto every page of a PDF", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(short, long, value_name = "FILE", required_unless_present = "url", conflicts_with = "url")]
    input: Option<PathBuf>,

    /// Import the input PDF from a URL (Google Drive share links are rewritten)
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Logo image (PNG or JPEG), drawn top-right
    #[arg(long, value_name = "FILE")]
    logo: Option<PathBuf>,

    /// Footer image (PNG or JPEG), drawn bottom-centre
    #[arg(long, value_name = "FILE")]
    footer: Option<PathBuf>,

    /// Directory holding default Logo.png and Footer.png; missing files are skipped
    #[arg(long, value_name = "DIR", env = "LETTERHEAD_ASSETS_DIR")]
    assets_dir: Option<PathBuf>,

    /// Text to encode as a QR code in the header band
    #[arg(long, value_name = "TEXT")]
    qr: Option<String>,

    /// Engine configuration (JSON)
    #[arg(long, value_name = "FILE", env = "LETTERHEAD_CONFIG")]
    config: Option<PathBuf>,

    /// Print a JSON report of what was drawn to stdout
    #[arg(long)]
    report: bool,

    /// Output PDF file [default: <input>_processed.pdf]
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl Cli {
    fn source(&self) -> Result<InputSource> {
        match (&self.input, &self.url) {
            (Some(path), _) => Ok(InputSource::File(path.clone())),
            (None, Some(url)) => Ok(InputSource::Url(url.clone())),
            (None, None) => Err(LetterheadError::Import("URL is required".into())),
        }
    }

    /// Explicit `--output`, or `<stem>_processed.pdf` beside a file input.
    /// URL imports land in the working directory.
    fn output_path(&self) -> PathBuf {
        if let Some(path) = &self.output {
            return path.clone();
        }
        match &self.input {
            Some(input) => {
                let stem = input
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_else(|| DEFAULT_STEM.to_string());
                input.with_file_name(format!("{stem}{OUTPUT_SUFFIX}"))
            }
            None => PathBuf::from(format!("{DEFAULT_STEM}{OUTPUT_SUFFIX}")),
        }
    }
}

const OUTPUT_SUFFIX: &str = "_processed.pdf";
const DEFAULT_STEM: &str = "imported-document";

/// `EX_TEMPFAIL` from sysexits.h.
const EXIT_TRANSIENT: u8 = 75;
const EXIT_ACTION_REQUIRED: u8 = 2;
const EXIT_PERMANENT: u8 = 1;

fn exit_code(severity: Severity) -> u8 {
    match severity {
        Severity::Transient => EXIT_TRANSIENT,
        Severity::ActionRequired => EXIT_ACTION_REQUIRED,
        Severity::Permanent => EXIT_PERMANENT,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => ExitCode::from(report_failure(&err)),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let engine = BrandingEngine::new(config)?;

    let source = cli.source()?;
    let assets_dir = cli.assets_dir.as_deref();
    let (input, logo, footer) = tokio::try_join!(
        assets::load_input(&source),
        assets::read_asset(cli.logo.as_deref(), assets_dir, assets::DEFAULT_LOGO),
        assets::read_asset(cli.footer.as_deref(), assets_dir, assets::DEFAULT_FOOTER),
    )?;

    let assets = BrandAssets {
        logo: logo.as_deref(),
        footer: footer.as_deref(),
        qr_payload: cli.qr.as_deref(),
    };
    if assets.is_empty() {
        info!("No logo, footer, or QR payload to draw");
    }

    let branded = engine.brand(&input, &assets)?;
    let output = cli.output_path();
    tokio::fs::write(&output, &branded.bytes).await?;
    info!(
        output = %output.display(),
        bytes = branded.bytes.len(),
        "Branded PDF written"
    );

    if cli.report {
        println!("{}", serde_json::to_string_pretty(&branded.report)?);
    }
    Ok(())
}

/// Print the failure for a person (and for scripts, on import errors) and
/// pick the exit code from its severity.
fn report_failure(err: &LetterheadError) -> u8 {
    let human = humanize_error(err);
    error!(error = %err, severity = ?human.severity, "letterhead failed");

    if let LetterheadError::Import(detail) = err {
        eprintln!("{}", ImportFailure::new(detail.as_str()).to_json());
    }
    eprintln!("{}\n{}", human.message, human.suggestion);
    if human.retriable {
        eprintln!("This looks temporary. Running the same command again may work.");
    }
    exit_code(human.severity)
}
