// ABOUTME: CLI for generating a podcast RSS feed from a YAML configuration file.
// ABOUTME: Reads the config, validates (optionally checking assets), and writes the feed XML.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use podgen_assets::Inspector;
use podgen_feed::{
    generate_feed, parse_document, validate, AssetVerification, FeedError, GenerateOptions,
    ValidationReport,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Generate a podcast RSS feed from a YAML configuration.
#[derive(Parser, Debug)]
#[command(name = "podgen", version)]
#[command(about = "Generate a podcast RSS feed from a YAML configuration", long_about = None)]
struct Args {
    /// Configuration file to read.
    #[arg(long, default_value = "podcast_config.yaml")]
    input_file: PathBuf,

    /// Where to write the feed.
    #[arg(long, default_value = "podcast_feed.xml")]
    output_file: PathBuf,

    /// Do not contact asset URLs at all; enclosure types come from file extensions.
    #[arg(long)]
    skip_asset_verification: bool,

    /// Skip the HEAD request for each asset.
    #[arg(long)]
    skip_existence_check: bool,

    /// Skip running ffprobe on each asset.
    #[arg(long)]
    skip_media_probe: bool,

    /// Validate the configuration and exit without writing a feed.
    #[arg(long)]
    validate_only: bool,

    /// Print the validation report as JSON on stdout instead of text on stderr.
    #[arg(long)]
    json_report: bool,

    /// Maximum asset checks in flight.
    #[arg(long, default_value_t = 4)]
    concurrency: usize,

    /// Per-request timeout for asset checks, in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// ffprobe binary to run.
    #[arg(long, default_value = "ffprobe")]
    ffprobe: String,

    /// Log debug detail to stderr.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Why a run stopped.
enum Failure {
    Malformed(FeedError),
    Invalid(ValidationReport),
    Other(anyhow::Error),
}

impl Failure {
    fn exit_code(&self) -> ExitCode {
        match self {
            Failure::Malformed(_) => ExitCode::from(2),
            Failure::Invalid(_) | Failure::Other(_) => ExitCode::from(1),
        }
    }

    fn print(&self, json: bool) {
        match self {
            Failure::Malformed(err) => eprintln!("error: {}", err),
            Failure::Invalid(report) if json => print_json_report(report),
            Failure::Invalid(report) => {
                eprintln!("Validation failed with {} error(s):", report.len());
                for e in report.iter() {
                    eprintln!("  {}", e);
                }
            }
            Failure::Other(err) => eprintln!("error: {:#}", err),
        }
    }
}

impl From<FeedError> for Failure {
    fn from(err: FeedError) -> Self {
        match err {
            FeedError::Malformed { .. } => Failure::Malformed(err),
            FeedError::Validation(report) => Failure::Invalid(report),
            other => Failure::Other(other.into()),
        }
    }
}

impl From<anyhow::Error> for Failure {
    fn from(err: anyhow::Error) -> Self {
        Failure::Other(err)
    }
}

fn print_json_report(report: &ValidationReport) {
    match serde_json::to_string_pretty(report) {
        Ok(text) => println!("{}", text),
        Err(err) => eprintln!("error: failed to encode report: {}", err),
    }
}

fn init_logging(args: &Args) {
    let default_level = if args.verbose {
        "debug"
    } else if args.quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "podgen={lvl},podgen_feed={lvl},podgen_assets={lvl}",
            lvl = default_level
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_inspector(args: &Args) -> Result<Inspector> {
    Inspector::builder()
        .check_existence(!args.skip_existence_check)
        .probe_media(!args.skip_media_probe)
        .timeout(Duration::from_secs(args.timeout_secs))
        .ffprobe_path(args.ffprobe.clone())
        .build()
        .context("failed to set up asset inspection")
}

async fn run(args: &Args) -> Result<(), Failure> {
    let text = tokio::fs::read_to_string(&args.input_file)
        .await
        .with_context(|| format!("failed to read {}", args.input_file.display()))?;
    let doc = parse_document(&text)?;

    let opts = GenerateOptions::new().concurrency(args.concurrency);
    let inspector = if args.skip_asset_verification {
        info!("Skipping asset verification");
        None
    } else {
        Some(build_inspector(args)?)
    };
    let verification = match &inspector {
        Some(i) => AssetVerification::Verify(i),
        None => AssetVerification::Skip,
    };

    if args.validate_only {
        let model = validate(&doc, &opts, verification)
            .await
            .map_err(Failure::Invalid)?;
        debug!("Validated {} episode(s)", model.episodes.len());
        if args.json_report {
            print_json_report(&ValidationReport::new());
        } else {
            println!("Configuration is valid: {}", args.input_file.display());
        }
        return Ok(());
    }

    let bytes = generate_feed(&doc, &opts, verification).await?;
    tokio::fs::write(&args.output_file, &bytes)
        .await
        .with_context(|| format!("failed to write {}", args.output_file.display()))?;
    println!("Feed written to {}", args.output_file.display());
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            failure.print(args.json_report);
            failure.exit_code()
        }
    }
}
