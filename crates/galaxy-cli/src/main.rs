mod config;
mod script;
mod server;
mod simulate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use galaxy_core::{PositionStore, SeededSequence, export_json, hash_id};

use crate::config::GalaxyConfig;
use crate::simulate::SimulationParams;

#[derive(Parser)]
#[command(name = "galaxy", about = "Deterministic star placement for the diary galaxy")]
struct Cli {
    /// TOML config file (falls back to $GALAXY_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place a set of ids on an empty sky and print the layout as JSON
    Place {
        /// Entity ids, in live order
        ids: Vec<String>,

        /// Read additional ids from a file (whitespace, comma or newline separated)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Replay a script of live sets, one reconcile per line
    Replay {
        /// Script path
        script: PathBuf,

        /// Print the final layout as JSON instead of per-step summaries
        #[arg(long)]
        json: bool,
    },

    /// Show the seed hash and first draws for an id
    Draws {
        id: String,

        /// Number of draws to print
        #[arg(long, default_value_t = 4)]
        count: usize,
    },

    /// Run a seeded add/remove churn simulation and check invariants
    Simulate {
        #[arg(long, default_value_t = 50)]
        steps: usize,

        /// Records present before the first step
        #[arg(long, default_value_t = 20)]
        initial: usize,

        /// Per-step deletion probability for each live record
        #[arg(long, default_value_t = 0.1)]
        churn: f64,

        /// Maximum new records per step
        #[arg(long, default_value_t = 3)]
        arrivals: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve the layout over HTTP
    Serve {
        /// Listen address (overrides [server].addr)
        #[arg(long)]
        addr: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn open_store(config: &GalaxyConfig) -> Result<PositionStore> {
    PositionStore::with_config(config.placement).context("failed to build position store")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = config::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Place { ids, file } => cmd_place(&config, ids, file.as_deref()),
        Commands::Replay { script, json } => cmd_replay(&config, script, *json),
        Commands::Draws { id, count } => cmd_draws(id, *count),
        Commands::Simulate {
            steps,
            initial,
            churn,
            arrivals,
            seed,
            json,
        } => cmd_simulate(
            &config,
            &SimulationParams {
                steps: *steps,
                initial: *initial,
                churn: *churn,
                arrivals: *arrivals,
                seed: *seed,
            },
            *json,
        ),
        Commands::Serve { addr } => cmd_serve(&config, addr.as_deref()).await,
    }
}

fn cmd_place(config: &GalaxyConfig, ids: &[String], file: Option<&Path>) -> Result<()> {
    let mut live = ids.to_vec();
    if let Some(path) = file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        live.extend(script::parse_id_list(&content));
    }
    if live.is_empty() {
        bail!("no ids given; pass ids as arguments or with --file");
    }

    let mut store = open_store(config)?;
    let layout = store.reconcile(&live).layout;
    let json = export_json(&layout, config.placement.min_distance)
        .context("failed to serialize layout")?;
    println!("{json}");
    Ok(())
}

fn cmd_replay(config: &GalaxyConfig, path: &Path, json: bool) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let steps = script::parse_script(&content);

    let mut store = open_store(config)?;
    for (n, live) in steps.iter().enumerate() {
        let out = store.reconcile(live);
        if !json {
            println!(
                "step {}: gen={} live={} +{} -{} degraded={}",
                n + 1,
                out.layout.generation(),
                out.layout.len(),
                out.diff.added.len(),
                out.diff.removed.len(),
                out.layout.degraded_count()
            );
        }
    }

    if json {
        let json = export_json(&store.snapshot(), config.placement.min_distance)
            .context("failed to serialize layout")?;
        println!("{json}");
    }
    Ok(())
}

fn cmd_draws(id: &str, count: usize) -> Result<()> {
    println!("hash: {}", hash_id(id));
    for (i, draw) in SeededSequence::from_id(id).take(count).enumerate() {
        println!("draw[{i}]: {draw}");
    }
    Ok(())
}

fn cmd_simulate(config: &GalaxyConfig, params: &SimulationParams, json: bool) -> Result<()> {
    if !params.churn.is_finite() {
        bail!("--churn must be a finite probability, got {}", params.churn);
    }
    let mut store = open_store(config)?;
    let report = simulate::run(&mut store, params);

    if json {
        let out = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        println!("{out}");
    } else {
        println!("steps:      {}", report.steps);
        println!("live:       {} (peak {})", report.live, report.peak);
        println!("added:      {}", report.added);
        println!("removed:    {}", report.removed);
        println!("degraded:   {}", report.degraded);
        println!("moved:      {}", report.moved);
        println!("violations: {}", report.violations);
        println!(
            "stability:  {}",
            if report.is_stable() { "ok" } else { "BROKEN" }
        );
    }

    if !report.is_stable() {
        bail!(
            "invariant broken: {} moved, {} violations",
            report.moved,
            report.violations
        );
    }
    Ok(())
}

async fn cmd_serve(config: &GalaxyConfig, addr: Option<&str>) -> Result<()> {
    let addr = addr.unwrap_or(&config.server.addr);
    let store = open_store(config)?;
    server::serve(addr, store).await
}
