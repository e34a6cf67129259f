//! DP Release CLI Tool
//!
//! Publish a differentially private mean or histogram of a column of values.
//!
//! Usage:
//!   dp-release mean --lower <l> --upper <u> --epsilon <e> [--mechanism laplace|gaussian] [--delta <d>] [--input <file>]
//!   dp-release histogram --epsilon <e> --categories a,b,c [--input <file>]
//!
//! Input is one value per line, from `--input` or stdin. Output is the JSON
//! release with its mechanism metadata. Set `RUST_LOG=debug` to see the
//! calibrated scale on stderr.

use clap::{Parser, Subcommand};
use dp_mechanisms::rng::{secure_rng, seeded_rng, NoiseRng};
use dp_mechanisms::{
    release_dp_histogram, release_dp_mean, Bounds, DpRelease, MechanismKind, ReleaseConfig, Seed,
};
use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dp-release")]
#[command(version = "0.1.0")]
#[command(about = "Differentially private release of means and histograms", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON release configuration; flags override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Label for a deterministic generator (testing only, the noise becomes predictable)
    #[arg(long, global = true)]
    seed: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Release a DP bounded mean
    Mean {
        /// Lower clamping bound
        #[arg(long, allow_hyphen_values = true)]
        lower: Option<f64>,

        /// Upper clamping bound
        #[arg(long, allow_hyphen_values = true)]
        upper: Option<f64>,

        /// Privacy parameter epsilon
        #[arg(short, long)]
        epsilon: Option<f64>,

        /// Privacy parameter delta (gaussian only, default 1e-6)
        #[arg(short, long)]
        delta: Option<f64>,

        /// Mechanism: laplace or gaussian
        #[arg(short, long)]
        mechanism: Option<String>,

        /// Input file with one number per line (stdin if not specified)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Release DP counts for a fixed category set
    Histogram {
        /// Privacy parameter epsilon
        #[arg(short, long)]
        epsilon: Option<f64>,

        /// Comma-separated categories, in output order
        #[arg(long, value_delimiter = ',')]
        categories: Option<Vec<String>>,

        /// Input file with one category per line (stdin if not specified)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => ReleaseConfig::load(path)?,
        None => ReleaseConfig::default(),
    };

    let result: serde_json::Value = match cli.command {
        Commands::Mean { lower, upper, epsilon, delta, mechanism, input } => {
            let bounds = match (lower, upper) {
                (Some(l), Some(u)) => Some(Bounds::new(l, u)?),
                (None, None) => None,
                _ => return Err("--lower and --upper must be given together".into()),
            };
            let config = file_config.merge(ReleaseConfig {
                epsilon,
                delta,
                mechanism,
                bounds,
                seed: cli.seed,
                ..Default::default()
            });

            // Resolve everything before the data is read
            let mechanism = config.mechanism()?;
            let params = config.privacy_parameters(mechanism)?;
            let bounds = config.bounds()?;
            let mut rng = make_rng(config.seed.as_deref());

            let data = parse_numbers(read_lines(input.as_deref())?)?;
            info!(records = data.len(), %mechanism, "releasing mean");

            let release = release_dp_mean(&mut rng, &data, &bounds, &params, mechanism)?;
            serde_json::to_value(release)?
        }

        Commands::Histogram { epsilon, categories, input } => {
            let config = file_config.merge(ReleaseConfig {
                epsilon,
                categories,
                seed: cli.seed,
                ..Default::default()
            });

            let params = config.privacy_parameters(MechanismKind::Laplace)?;
            let categories = config.categories()?.to_vec();
            let mut rng = make_rng(config.seed.as_deref());

            let data = read_lines(input.as_deref())?;
            info!(records = data.len(), categories = categories.len(), "releasing histogram");

            let release = release_dp_histogram(&mut rng, &data, params.epsilon, &categories)?;
            serde_json::to_value(HistogramOutput::new(&categories, release))?
        }
    };

    let json = serde_json::to_string_pretty(&result)?;
    match cli.output {
        Some(path) => fs::write(&path, json)?,
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", json)?;
        }
    }

    Ok(())
}

/// Histogram release with the category labels alongside the counts
#[derive(serde::Serialize)]
struct HistogramOutput {
    categories: Vec<String>,
    #[serde(flatten)]
    release: DpRelease<Vec<f64>>,
}

impl HistogramOutput {
    fn new(categories: &[String], release: DpRelease<Vec<f64>>) -> Self {
        HistogramOutput {
            categories: categories.to_vec(),
            release,
        }
    }
}

fn make_rng(seed: Option<&str>) -> NoiseRng {
    match seed {
        Some(label) => {
            warn!(seed = label, "deterministic seed in use; released noise is predictable");
            seeded_rng(&Seed::from_label(label))
        }
        None => secure_rng(),
    }
}

/// Non-empty, trimmed lines from a file or stdin
fn read_lines(path: Option<&Path>) -> io::Result<Vec<String>> {
    let reader: Box<dyn BufRead> = match path {
        Some(p) => Box::new(BufReader::new(fs::File::open(p)?)),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }
    Ok(lines)
}

fn parse_numbers(lines: Vec<String>) -> Result<Vec<f64>, Box<dyn std::error::Error>> {
    let mut values = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        let value = line
            .parse::<f64>()
            .map_err(|e| format!("line {}: {:?} is not a number: {}", i + 1, line, e))?;
        values.push(value);
    }
    Ok(values)
}
