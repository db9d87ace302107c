//! ohlcv-features CLI - compute technical-analysis features from price files
//!
//! ## Example Usage
//!
//! ```bash
//! # Compute features into a CSV file
//! ohlcv-features compute prices.csv --output features.csv
//!
//! # JSON records, only rows where every feature is defined
//! ohlcv-features compute prices.csv --format json --drop-incomplete
//!
//! # Inspect a price file
//! ohlcv-features info prices.csv
//!
//! # List output columns for the active configuration
//! ohlcv-features columns --config features.toml
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use ohlcv_features::config::FeatureConfig;
use ohlcv_features::data::{read_prices, write_features, write_json};
use ohlcv_features::pipeline::FeaturePipeline;
use ohlcv_features::table::FeatureTable;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

/// ohlcv-features: technical-analysis feature engine
#[derive(Parser)]
#[command(name = "ohlcv-features")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compute technical-analysis features from daily OHLCV data", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the feature table for a price file
    Compute {
        /// Price CSV with date,open,high,low,close,volume columns
        #[arg(value_name = "PRICES")]
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "csv")]
        format: OutputFormat,

        /// Keep only rows where every feature is finite
        #[arg(long)]
        drop_incomplete: bool,

        /// Run every stage on the calling thread
        #[arg(long)]
        sequential: bool,
    },

    /// Show row count and date range of a price file
    Info {
        #[arg(value_name = "PRICES")]
        input: PathBuf,
    },

    /// List the columns the pipeline appends
    Columns,

    /// Print the effective configuration as TOML
    Config,
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ohlcv-features").join("config.toml"))
}

/// Explicit path must load; the default location is optional
fn load_config(path: Option<&Path>) -> Result<FeatureConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(FeatureConfig::default()),
        },
    };

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: FeatureConfig = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    config.validate()?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Compute {
            input,
            output,
            format,
            drop_incomplete,
            sequential,
        } => compute(ComputeArgs {
            input,
            output,
            format,
            drop_incomplete,
            sequential,
            verbose: cli.verbose,
            config,
        }),
        Commands::Info { input } => show_info(&input),
        Commands::Columns => list_columns(&config),
        Commands::Config => print_config(&config),
    });

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

struct ComputeArgs {
    input: PathBuf,
    output: Option<PathBuf>,
    format: OutputFormat,
    drop_incomplete: bool,
    sequential: bool,
    verbose: bool,
    config: FeatureConfig,
}

fn compute(args: ComputeArgs) -> Result<()> {
    let started = Instant::now();

    let prices = read_prices(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;

    let pipeline = FeaturePipeline::standard(&args.config)?.with_parallel(!args.sequential);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Computing features for {} rows", prices.len()));

    let features = pipeline.run(&prices);
    spinner.finish_and_clear();
    let mut features = features?;

    if args.drop_incomplete {
        let before = features.len();
        features = features.complete_rows();
        log::info!("Dropped {} incomplete rows", before - features.len());
    }

    match &args.output {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_output(&features, args.format, std::io::BufWriter::new(file))?;
        }
        None => write_output(&features, args.format, std::io::stdout().lock())?,
    }

    if args.verbose || args.output.is_some() {
        eprintln!(
            "{} {} rows x {} columns in {:.2?}",
            "Done:".green().bold(),
            features.len(),
            features.column_names().len(),
            started.elapsed()
        );
    }

    Ok(())
}

fn write_output<W: Write>(table: &FeatureTable, format: OutputFormat, sink: W) -> Result<()> {
    match format {
        OutputFormat::Csv => write_features(table, sink)?,
        OutputFormat::Json => write_json(table, sink)?,
    }
    Ok(())
}

fn show_info(input: &Path) -> Result<()> {
    let prices = read_prices(input).with_context(|| format!("failed to load {}", input.display()))?;

    println!("{}", "Price file".cyan().bold());
    println!("  {} {}", "Path:".bold(), input.display());
    println!("  {} {}", "Rows:".bold(), prices.len());
    match prices.date_range() {
        Some((start, end)) => println!("  {} {} to {}", "Dates:".bold(), start, end),
        None => println!("  {} {}", "Dates:".bold(), "empty".dimmed()),
    }
    Ok(())
}

fn list_columns(config: &FeatureConfig) -> Result<()> {
    let pipeline = FeaturePipeline::standard(config)?;
    for name in pipeline.output_columns() {
        println!("{}", name);
    }
    Ok(())
}

fn print_config(config: &FeatureConfig) -> Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
