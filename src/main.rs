use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use rebase_rs::config::Settings;
use rebase_rs::{telemetry, AssetId, Market, RebaseOrchestrator};

/// Rebase every pair of a market snapshot into one reference asset.
#[derive(Debug, Parser)]
#[command(name = "rebase", version)]
struct Cli {
    /// Market snapshot as JSON (pair id -> pair)
    #[arg(short, long)]
    input: PathBuf,

    /// Asset every rate is re-expressed in
    #[arg(short, long)]
    reference: Option<String>,

    /// Longest conversion path, in pairs
    #[arg(short = 'd', long)]
    max_depth: Option<u8>,

    /// Worker threads (0 = all cores)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Settings file (defaults to ./rebase.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok(); // load .env

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("loading settings")?;

    telemetry::init_tracing(&settings.log_filter)?;
    telemetry::init_metrics()?;

    let reference = cli
        .reference
        .or(settings.reference_asset)
        .map(AssetId::from)
        .context("no reference asset: pass --reference or set reference_asset")?;
    let max_depth = cli.max_depth.unwrap_or(settings.max_depth);
    let workers = cli.workers.unwrap_or(settings.workers);

    let raw = fs::read_to_string(&cli.input).with_context(|| format!("reading {}", cli.input.display()))?;
    let market: Market = serde_json::from_str(&raw).with_context(|| format!("parsing {}", cli.input.display()))?;
    info!(pairs = market.len(), exchanges = ?market.exchange_ids(), "Loaded market");

    let outcome = RebaseOrchestrator::new(workers).rebase(&reference, max_depth, &market)?;
    for id in outcome.unreachable() {
        if let Some(pair) = market.get(id) {
            warn!(pair = %id, base = %pair.base_id, quote = %pair.quote_id, "Pair not rebased");
        }
    }

    let mut stdout = io::stdout().lock();
    if cli.pretty {
        serde_json::to_writer_pretty(&mut stdout, &outcome)?;
    } else {
        serde_json::to_writer(&mut stdout, &outcome)?;
    }
    writeln!(stdout)?;
    Ok(())
}
