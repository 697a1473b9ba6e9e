use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use epicenter::{
    growth_factors, ComplexityAnalysis, ConfigurationManager, CsvFormatter, EstimateReport, GeoRegion,
    JsonFormatter, Locator, LocatorConfig, Point, StationReport, SyntheticScenario, TextFormatter,
};

#[derive(Parser, Debug)]
#[command(name = "epicenter")]
#[command(about = "Seismic epicenter location by divide-and-conquer triangulation")]
struct Args {
    /// JSON locator configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the base-case station threshold
    #[arg(long, global = true)]
    threshold: Option<usize>,

    /// Override the wave propagation velocity
    #[arg(long, global = true)]
    velocity: Option<f64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Locate a synthetic event over a small station network
    Demo {
        #[arg(long, default_value = "12")]
        stations: usize,
        /// Seed for reproducible station layouts
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Time the locator over growing station counts
    Analyze {
        /// CSV output path
        #[arg(long, default_value = "earthquake_results.csv")]
        output: PathBuf,
        #[arg(long, default_value = "5")]
        trials: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Locate an event from a JSON array of station reports
    Locate {
        /// Station report file
        #[arg(long)]
        input: PathBuf,
        /// Search region as MIN_LAT,MAX_LAT,MIN_LON,MAX_LON
        #[arg(long, value_parser = parse_region, allow_hyphen_values = true)]
        region: GeoRegion,
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
    Csv,
}

fn parse_region(value: &str) -> Result<GeoRegion, String> {
    let bounds = value
        .split(',')
        .map(|part| part.trim().parse::<f64>().map_err(|e| format!("invalid bound '{}': {}", part, e)))
        .collect::<Result<Vec<f64>, String>>()?;
    match bounds.as_slice() {
        [min_lat, max_lat, min_lon, max_lon] => Ok(GeoRegion::new(*min_lat, *max_lat, *min_lon, *max_lon)),
        _ => Err(format!("expected 4 comma-separated bounds, got {}", bounds.len())),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn load_config(args: &Args) -> Result<LocatorConfig> {
    let mut manager = match &args.config {
        Some(path) => ConfigurationManager::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ConfigurationManager::new(),
    };
    if let Some(threshold) = args.threshold {
        manager.set_base_case_threshold(threshold)?;
    }
    if let Some(velocity) = args.velocity {
        manager.set_wave_velocity(velocity)?;
    }
    for warning in manager.config().warnings() {
        tracing::warn!("{}", warning);
    }
    Ok(*manager.config())
}

fn run_demo(locator: &Locator, station_count: usize, seed: Option<u64>) {
    println!("Earthquake Epicenter Location - Divide & Conquer");
    println!("================================================\n");

    let true_epicenter = Point::new(35.5, -119.5);
    let region = GeoRegion::new(34.0, 37.0, -121.0, -118.0);

    let mut scenario = SyntheticScenario::new(true_epicenter, region, station_count)
        .with_wave_velocity(locator.config().wave_velocity);
    if let Some(seed) = seed {
        scenario = scenario.with_seed(seed);
    }
    let stations = scenario.generate();

    let text = TextFormatter::new();
    println!("True epicenter: ({}, {})", true_epicenter.x, true_epicenter.y);
    print!("{}", text.format_stations(&stations));

    let start = Instant::now();
    let estimate = locator.locate(&stations, &region);
    let elapsed = start.elapsed();

    let report = EstimateReport::new(&estimate, stations.len())
        .with_truth(&true_epicenter)
        .with_timing(elapsed);
    println!();
    print!("{}", text.format_estimate(&report));
}

fn run_analysis(locator: &Locator, output: &Path, trials: usize, seed: Option<u64>) -> Result<()> {
    println!("=== DIVIDE & CONQUER COMPLEXITY ANALYSIS ===");

    let mut analysis = ComplexityAnalysis::new().with_trials(trials);
    if let Some(seed) = seed {
        analysis = analysis.with_seed(seed);
    }
    let samples = analysis.run(locator);

    print!("{}", TextFormatter::new().format_analysis(&samples));
    CsvFormatter::new()
        .write_analysis_file(output, &samples)
        .with_context(|| format!("writing {}", output.display()))?;
    info!(path = %output.display(), "results saved");

    let factors = growth_factors(&samples);
    if !factors.is_empty() {
        let mean = factors.iter().sum::<f64>() / factors.len() as f64;
        println!("\nAverage growth factor: {:.3}", mean);
    }
    println!(
        "True epicenter: ({}, {})",
        analysis.true_epicenter.x, analysis.true_epicenter.y
    );
    Ok(())
}

fn run_locate(locator: &Locator, input: &Path, region: &GeoRegion, format: Format) -> Result<()> {
    let content = fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let stations: Vec<StationReport> =
        serde_json::from_str(&content).with_context(|| format!("parsing {}", input.display()))?;

    let start = Instant::now();
    let estimate = locator
        .locate_validated(&stations, region)
        .context("invalid station input")?;
    let report = EstimateReport::new(&estimate, stations.len()).with_timing(start.elapsed());

    match format {
        Format::Text => print!("{}", TextFormatter::new().format_estimate(&report)),
        Format::Json => println!("{}", JsonFormatter::pretty().format(&report)?),
        Format::Csv => {
            let csv = CsvFormatter::new();
            println!("{}", csv.estimate_header());
            println!("{}", csv.format_estimate(&report));
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(&args)?;
    let locator = Locator::with_config(config);

    match &args.command {
        Command::Demo { stations, seed } => run_demo(&locator, *stations, *seed),
        Command::Analyze { output, trials, seed } => run_analysis(&locator, output, *trials, *seed)?,
        Command::Locate { input, region, format } => run_locate(&locator, input, region, *format)?,
    }
    Ok(())
}
