//! Skirmish console host
//!
//! Replays NDJSON entity event logs through the replay scheduler, or
//! generates new logs with the deterministic skirmish simulation.

mod view;

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use skirmish_core::{Registry, ReplayConfig, Scheduler};
use skirmish_gen::{GeneratorConfig, Skirmish};
use skirmish_log::LogLoader;

use view::ConsolePresenter;

/// Used when `RUST_LOG` is unset; one directive per workspace crate
const DEFAULT_LOG_FILTER: &str =
    "replay_cli=info,skirmish_core=info,skirmish_log=info,skirmish_gen=info";

/// Replay and generate skirmish event logs
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(about = "Replay and generate skirmish event logs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Replay an NDJSON event log
    Run {
        /// Path to the event log
        log: PathBuf,

        /// RON replay configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Keep ticking after the queue drains
        #[arg(long)]
        keep_running: bool,

        /// Stop after this many wall-clock seconds
        #[arg(long)]
        max_seconds: Option<f64>,
    },

    /// Generate a two-team skirmish event log
    Generate {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Simulated duration in seconds
        #[arg(long, default_value_t = 25)]
        duration: u64,

        /// Milliseconds between movement steps
        #[arg(long, default_value_t = 200, value_parser = clap::value_parser!(u64).range(1..))]
        tick: u64,

        /// RNG seed
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Pace output to wall-clock time
        #[arg(long)]
        stream: bool,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so generated NDJSON can be piped from stdout
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.action {
        Action::Run {
            log,
            config,
            keep_running,
            max_seconds,
        } => run(&log, config.as_deref(), keep_running, max_seconds),
        Action::Generate {
            out,
            duration,
            tick,
            seed,
            stream,
        } => generate(
            out.as_deref(),
            GeneratorConfig {
                seed,
                duration_s: duration,
                tick_ms: tick,
                realtime: stream,
                ..GeneratorConfig::default()
            },
        ),
    }
}

fn run(
    log: &Path,
    config_path: Option<&Path>,
    keep_running: bool,
    max_seconds: Option<f64>,
) -> Result<()> {
    let config = match config_path {
        Some(path) => ReplayConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ReplayConfig::default(),
    };

    let presenter = ConsolePresenter::new(config.presentation.preload_views);
    let pool = presenter.pool();
    let registry = Registry::with_presenter(presenter);
    let mut scheduler = Scheduler::with_registry(registry, &config.scheduler);

    info!("Loading event log from: {}", log.display());
    let report = match LogLoader::from_config(&config.ingest).load_file_into(log, &mut scheduler) {
        Ok(report) => report,
        Err(skirmish_log::Error::EmptyLog) => {
            error!("No replayable events in {}", log.display());
            bail!("event log {} has no replayable events", log.display());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to load {}", log.display()));
        }
    };
    if !report.skipped.is_empty() {
        warn!(skipped = report.skipped.len(), "some records were skipped");
    }
    info!(
        queued = report.queued,
        views = pool.borrow().allocated(),
        "replay ready"
    );

    scheduler.start()?;

    let frame = Duration::from_millis(config.presentation.frame_interval_ms);
    let started = Instant::now();
    let mut last_frame = started;
    let mut frames = 0u64;

    loop {
        thread::sleep(frame);
        let now = Instant::now();
        scheduler.tick(now.duration_since(last_frame).as_secs_f64());
        last_frame = now;
        frames += 1;

        if let Some(limit) = max_seconds {
            if started.elapsed().as_secs_f64() >= limit {
                info!("Wall-clock limit of {}s reached", limit);
                break;
            }
        }
        if scheduler.is_drained() && !keep_running {
            break;
        }
    }

    println!("=== Replay summary ===");
    println!("Frames:          {}", frames);
    println!("Virtual time:    {:.0}", scheduler.now());
    println!("Commands run:    {}", scheduler.executed_total());
    println!("Commands left:   {}", scheduler.pending());
    println!("Skipped records: {}", report.skipped.len());
    println!("Survivors:       {}", scheduler.registry().len());
    for view in pool.borrow().active() {
        let state = view.state();
        println!(
            "  {:<6} team {:<4} at {} ({} moves)",
            state.id.as_str(),
            state.team,
            state.position,
            state.moves
        );
    }

    scheduler.stop();
    Ok(())
}

fn generate(out: Option<&Path>, config: GeneratorConfig) -> Result<()> {
    let skirmish = Skirmish::new(config)?;
    let written = match out {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            skirmish.run(&mut writer)?
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            skirmish.run(&mut lock)?
        }
    };

    if let Some(path) = out {
        info!("Wrote {} records to {}", written, path.display());
    }
    Ok(())
}
