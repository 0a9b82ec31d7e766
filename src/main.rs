//! `lease-sim` command line.
//!
//! Loads a JSON configuration, runs one simulation and prints the lease chart,
//! an event summary, the warnings and optionally a detailed timeline.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use lease_sim::builders::{SimulationBuilder, SimulationReport};
use lease_sim::config::SimulationConfig;
use lease_sim::core::AppResult;
use lease_sim::report::{event_summary, lease_chart, timeline, warning_list};
use lease_sim::util::init_tracing;

/// Exit status when `--strict` is set and the run produced warnings.
const STRICT_FAILURE: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "lease-sim")]
#[command(about = "Simulate lease capacity for scheduled and release-triggered jobs", long_about = None)]
struct Args {
    /// Path to the JSON configuration
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Print the detailed event timeline
    #[arg(short, long)]
    timeline: bool,

    /// Maximum timeline lines (0 prints every event)
    #[arg(short = 'l', long, default_value_t = 50)]
    timeline_limit: usize,

    /// Skip the event summary
    #[arg(long)]
    no_summary: bool,

    /// Seed for release trains, overriding the configuration
    #[arg(long)]
    seed: Option<u64>,

    /// Write events, samples and warnings as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Exit with status 2 when any warning was produced
    #[arg(long)]
    strict: bool,
}

fn print_config(config: &SimulationConfig) {
    println!("Configuration:");
    println!("  Max active leases: {}", config.max_active_leases);
    println!("  Job timeout: {} minutes", config.job_timeout_mins);
    println!("  Lease wait timeout: {} minutes", config.lease_wait_timeout_mins);
    println!("  Simulation duration: {} hours", config.simulation_duration_hours);
    println!("  Jobs defined: {}", config.jobs.len());
    println!();
}

fn print_report(args: &Args, report: &SimulationReport) {
    println!(
        "Simulated {} to {} in {} ticks",
        report.window.start.format("%Y-%m-%d %H:%M"),
        report.window.end.format("%Y-%m-%d %H:%M"),
        report.ticks
    );
    println!(
        "{}",
        lease_chart(&report.samples, &report.events, report.max_active_leases)
    );
    if !args.no_summary {
        print!("{}", event_summary(&report.events));
    }
    print!("{}", warning_list(&report.events));
    if args.timeline {
        print!("{}", timeline(&report.events, args.timeline_limit));
    }
    for diagnostic in &report.diagnostics {
        eprintln!("skipped job `{}`: {}", diagnostic.job, diagnostic.message);
    }
}

fn main() -> AppResult<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();

    let config = SimulationConfig::from_path(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    print_config(&config);

    let mut builder = SimulationBuilder::new(config);
    if let Some(seed) = args.seed {
        builder = builder.with_seed(seed);
    }
    let report = builder.build()?.run()?;

    print_report(&args, &report);

    if let Some(path) = &args.output {
        let json = report.to_json_pretty()?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        println!("Report written to {}", path.display());
    }

    if args.strict && report.has_warnings() {
        tracing::warn!(warnings = report.warnings().len(), "run produced warnings");
        std::process::exit(STRICT_FAILURE);
    }
    Ok(())
}
