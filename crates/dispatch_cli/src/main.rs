use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dispatch_core::runner::{run_until_empty, Simulation};
use dispatch_core::scenario::{
    build_scenario, scripted_demo, DispatchConfig, ScenarioParams, SelectionPolicy,
};
use dispatch_core::validate::validate_dispatch_state;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "dispatch",
    about = "Ride dispatch mediator simulation",
    long_about = "Runs the narrated dispatch demo or a seeded random scenario through\n\
                  the dispatch mediator and reports the resulting assignments."
)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info", env = "DISPATCH_LOG_LEVEL")]
    log_level: String,
    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay the scripted demo (four drivers, four passengers, one driver break)
    Demo {
        /// Write dispatch telemetry as JSON to this path
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Run a random scenario
    Simulate {
        /// Scenario parameters as JSON; missing fields use defaults
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override the scenario seed
        #[arg(long)]
        seed: Option<u64>,
        /// Override the number of random actions
        #[arg(long)]
        actions: Option<usize>,
        /// Override the driver selection policy
        #[arg(long, value_enum)]
        selection: Option<SelectionArg>,
        /// Write dispatch telemetry as JSON to this path
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
    Compact,
}

#[derive(Clone, Copy, ValueEnum)]
enum SelectionArg {
    /// First eligible driver in sign-in order
    First,
    /// Eligible driver with the smallest distance
    Nearest,
}

impl From<SelectionArg> for SelectionPolicy {
    fn from(arg: SelectionArg) -> Self {
        match arg {
            SelectionArg::First => SelectionPolicy::FirstEligible,
            SelectionArg::Nearest => SelectionPolicy::NearestEligible,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format)?;

    match cli.command {
        Commands::Demo { export } => run_demo(export),
        Commands::Simulate {
            config,
            seed,
            actions,
            selection,
            export,
        } => {
            let mut params = match config {
                Some(path) => ScenarioParams::from_json_path(&path)
                    .with_context(|| format!("loading scenario from {}", path.display()))?,
                None => ScenarioParams::default(),
            };
            if let Some(seed) = seed {
                params = params.with_seed(seed);
            }
            if let Some(actions) = actions {
                params = params.with_num_actions(actions);
            }
            if let Some(selection) = selection {
                params = params.with_selection(selection.into());
            }
            run_simulation(&params, export)
        }
    }
}

fn init_logging(log_level: &str, log_format: LogFormat) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let registry = tracing_subscriber::registry().with(env_filter);

    match log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .context("initializing JSON log output")?,
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()
            .context("initializing pretty log output")?,
        LogFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init()
            .context("initializing compact log output")?,
    }
    Ok(())
}

fn run_demo(export: Option<PathBuf>) -> Result<()> {
    let simulation = scripted_demo(DispatchConfig::default());

    while let Some((event, result)) = simulation.step() {
        let mediator = simulation.mediator().borrow();
        let subject = mediator
            .name_of(event.action.subject())
            .unwrap_or("unknown");
        let minutes = event.timestamp / dispatch_core::clock::ONE_MIN_MS;
        match result {
            Ok(outcome) => println!("[{minutes:>3} min] {subject}: {outcome}"),
            Err(error) => println!("[{minutes:>3} min] {subject}: {error}"),
        }
    }

    finish(&simulation, export)
}

fn run_simulation(params: &ScenarioParams, export: Option<PathBuf>) -> Result<()> {
    info!(
        seed = params.dispatch.seed,
        drivers = params.drivers.total(),
        passengers = params.passengers.total(),
        actions = params.num_actions,
        selection = ?params.dispatch.selection,
        "building scenario"
    );
    let simulation = build_scenario(params).context("building scenario")?;
    run_until_empty(&simulation, usize::MAX);
    finish(&simulation, export)
}

fn finish(simulation: &Simulation, export: Option<PathBuf>) -> Result<()> {
    let mediator = simulation.mediator().borrow();

    let violations = validate_dispatch_state(&mediator);
    for violation in &violations {
        warn!(%violation, "dispatch state violation");
    }

    let counts = mediator.counts();
    let telemetry = mediator.telemetry();
    println!();
    println!("--- Dispatch summary ---");
    println!("Simulated time:      {} ms", mediator.clock().now());
    println!("Registry entries:    {}", counts.registry_entries);
    println!(
        "Drivers:             {} free, {} busy",
        counts.drivers_free, counts.drivers_busy
    );
    println!(
        "Passengers:          {} idle, {} assigned",
        counts.passengers_idle, counts.passengers_assigned
    );
    println!("Rides assigned:      {}", telemetry.rides_assigned);
    println!("Rides cancelled:     {}", telemetry.rides_cancelled);
    println!("Pickups changed:     {}", telemetry.pickups_changed);
    println!("Trips completed:     {}", telemetry.trips_completed);
    println!("No match found:      {}", telemetry.no_match_found);
    println!("Duplicate requests:  {}", telemetry.duplicate_requests);
    println!("No active request:   {}", telemetry.no_active_request);
    println!("Busy sign-offs:      {}", telemetry.sign_offs_rejected);

    if let Some(path) = export {
        let json = telemetry.to_json().context("serializing telemetry")?;
        fs::write(&path, json)
            .with_context(|| format!("writing telemetry to {}", path.display()))?;
        info!(path = %path.display(), records = telemetry.records.len(), "telemetry exported");
    }

    if !violations.is_empty() {
        bail!("{} dispatch state violation(s)", violations.len());
    }
    Ok(())
}
