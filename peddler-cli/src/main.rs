mod data;
mod reports;
mod store;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};

use data::FileDataLoader;
use peddler_game::{DataLoader, MarketConfig, MarketGenerator, MarketMode, MarketSnapshot};
use store::JsonFileStore;

#[derive(Debug, Parser)]
#[command(name = "peddler", version = "0.1.0")]
#[command(about = "Generate the buy and sell market for a Peddler trading location")]
struct Args {
    /// Location to visit (defaults to the configured fallback location)
    #[arg(long)]
    place: Option<String>,

    /// Visit the black market instead of the regular market
    #[arg(long)]
    black: bool,

    /// Number of consecutive visits to generate
    #[arg(long, default_value_t = 1)]
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    visits: u32,

    /// Re-render the current visit without counting a new one
    #[arg(long)]
    refresh: bool,

    /// Seed for price jitter and sampling (defaults to the clock)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file holding visit counts and active categories between runs
    #[arg(long)]
    state: Option<PathBuf>,

    /// Item catalog JSON overriding the built-in data
    #[arg(long)]
    items: Option<PathBuf>,

    /// Location directory JSON overriding the built-in data
    #[arg(long)]
    locations: Option<PathBuf>,

    /// Market configuration JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json", "markdown"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// List known locations and exit
    #[arg(long)]
    list_places: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let loader = FileDataLoader::new(args.items.clone(), args.locations.clone());
    if maybe_list_places(&args, &loader)? {
        return Ok(());
    }

    let config = load_config(args.config.as_deref())?;
    let store = args
        .state
        .as_ref()
        .map_or_else(JsonFileStore::ephemeral, |path| JsonFileStore::open(path.clone()));
    let seed = args.seed.unwrap_or_else(clock_seed);
    log::info!("generating market with seed {seed}");

    let mut market = MarketGenerator::from_loader(&loader, store, config, seed)?;
    let snapshots = run_visits(&args, &mut market)?;
    write_reports(&args, &snapshots, &market)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn clock_seed() -> u64 {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    u64::try_from(nanos & u128::from(u64::MAX)).unwrap_or_default()
}

fn load_config(path: Option<&Path>) -> Result<MarketConfig> {
    let Some(path) = path else {
        return Ok(MarketConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    MarketConfig::from_json(&raw).with_context(|| format!("invalid config {}", path.display()))
}

fn maybe_list_places(args: &Args, loader: &FileDataLoader) -> Result<bool> {
    if !args.list_places {
        return Ok(false);
    }
    let directory = loader.load_locations()?;
    let mut sink = ReportSink::open(args.output.as_deref())?;
    writeln!(sink, "Available places:")?;
    for location in &directory {
        let specialty = location.specialty_buy_item.as_deref().unwrap_or("-");
        let rarity = location.rarity_sell_item.as_deref().unwrap_or("-");
        writeln!(
            sink,
            "  {:12} {:12} buy: {specialty:12} sell: {rarity}",
            location.name,
            location.tier.key()
        )?;
    }
    sink.flush()?;
    Ok(true)
}

fn run_visits(
    args: &Args,
    market: &mut MarketGenerator<JsonFileStore>,
) -> Result<Vec<MarketSnapshot>> {
    let place = args.place.clone().unwrap_or_default();
    let mode = MarketMode::from_black_market_flag(args.black);
    let mut snapshots = Vec::new();
    for _ in 0..args.visits {
        let snapshot = if args.refresh {
            market.refresh(&place, mode)
        } else {
            market.generate(&place, mode)
        }
        .context("failed to persist market state")?;
        snapshots.push(snapshot);
    }
    Ok(snapshots)
}

fn write_reports(
    args: &Args,
    snapshots: &[MarketSnapshot],
    market: &MarketGenerator<JsonFileStore>,
) -> Result<()> {
    let mut sink = ReportSink::open(args.output.as_deref())?;
    let adjuster = market.adjuster();

    match args.report.as_str() {
        "json" => reports::generate_json_report(&mut sink, snapshots)?,
        "markdown" => reports::generate_markdown_report(&mut sink, snapshots, adjuster)?,
        _ => {
            writeln!(
                &mut sink,
                "{}",
                "🐪 Peddler Market".bright_cyan().bold()
            )?;
            writeln!(&mut sink, "{}", "=================".cyan())?;
            reports::generate_console_report(&mut sink, snapshots, adjuster)?;
        }
    }

    sink.flush()?;
    Ok(())
}

/// Buffered report destination: stdout, or a file created up front.
struct ReportSink {
    out: BufWriter<Box<dyn Write>>,
}

impl ReportSink {
    fn open(path: Option<&Path>) -> Result<Self> {
        let out: Box<dyn Write> = match path {
            Some(path) => Box::new(
                File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?,
            ),
            None => Box::new(stdout()),
        };
        Ok(Self {
            out: BufWriter::new(out),
        })
    }
}

impl Write for ReportSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.out.flush()
    }
}
