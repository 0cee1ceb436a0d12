use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use propellant_ullage::config::{
    UllageSettings, load_label_catalog, load_profile, load_settings,
};
use propellant_ullage::export::snapshot::{read_snapshot, write_snapshot};
use propellant_ullage::export::trace::{Record, TraceWriter, writer_for_path};
use propellant_ullage::replay::{SegmentSummary, replay_profile};
use propellant_ullage::sim::{ManualClock, UNSET_TIME, UllageSimulator};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Replay a tick profile through the propellant ullage simulator"
)]
struct Cli {
    /// Tick profile (TOML or YAML) describing the segments to replay
    #[arg(long)]
    profile: PathBuf,

    /// Simulator settings file (defaults to built-in coefficients)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Label catalog for localized status text
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Resume from a JSON snapshot written by a previous run
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Write the final snapshot here
    #[arg(long)]
    save: Option<PathBuf>,

    /// Write a per-tick CSV trace ("-" for stdout)
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Use each tick's delta instead of a replay clock
    #[arg(long, default_value_t = false)]
    no_clock: bool,

    /// Tank name shown in logs
    #[arg(long, default_value = "tank")]
    name: String,

    /// Replay start time in seconds (defaults to the resumed UT, or 0)
    #[arg(long)]
    start_time: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => load_settings(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => UllageSettings::default(),
    };
    let profile = load_profile(&cli.profile)
        .with_context(|| format!("loading profile from {}", cli.profile.display()))?;

    let mut sim = UllageSimulator::new(Arc::new(settings)).named(cli.name.clone());
    if let Some(path) = &cli.labels {
        let catalog = load_label_catalog(path)
            .with_context(|| format!("loading labels from {}", path.display()))?;
        sim = sim.with_labels(Arc::new(catalog));
    }

    if let Some(path) = &cli.resume {
        let snapshot = read_snapshot(path)
            .with_context(|| format!("reading snapshot {}", path.display()))?;
        sim.load(Some(&snapshot));
    }

    let start_time = cli.start_time.unwrap_or_else(|| {
        let saved = sim.last_update_time();
        if saved == UNSET_TIME { 0.0 } else { saved }
    });

    let clock = (!cli.no_clock).then(|| Arc::new(ManualClock::new(start_time)));
    if let Some(clock) = &clock {
        sim = sim.with_clock(clock.clone());
    }

    let mut trace = match &cli.trace {
        Some(path) => Some(TraceWriter::new(
            writer_for_path(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => None,
    };

    let summaries = replay_profile(
        &mut sim,
        &profile,
        clock.as_deref(),
        start_time,
        |time, segment, sim| match trace.as_mut() {
            Some(trace) => trace.write(&Record::capture(time, &segment.label, sim)),
            None => Ok(()),
        },
    )?;

    let trace_to_stdout = cli.trace.as_deref().is_some_and(|p| p.as_os_str() == "-");
    if let Some(trace) = trace {
        trace.finish().context("flushing trace")?;
    }

    let mut out: Box<dyn Write> = if trace_to_stdout {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    };
    print_report(&mut out, &cli, profile.name.as_deref(), &summaries, &mut sim)?;

    if let Some(path) = &cli.save {
        write_snapshot(path, &sim.save())
            .with_context(|| format!("writing snapshot {}", path.display()))?;
        writeln!(out, "Snapshot saved to {}", path.display())?;
    }

    Ok(())
}

fn print_report(
    out: &mut dyn Write,
    cli: &Cli,
    profile_name: Option<&str>,
    summaries: &[SegmentSummary],
    sim: &mut UllageSimulator,
) -> io::Result<()> {
    writeln!(out, "=== Replay: {} ===", profile_name.unwrap_or("unnamed profile"))?;
    writeln!(out, "Tank            : {}", cli.name)?;
    for summary in summaries {
        writeln!(
            out,
            "{:<16}: {:>6} ticks over {:>8.2} s, min stability {:.4}, final {:.4} ({})",
            summary.label,
            summary.ticks,
            summary.duration_s,
            summary.min_stability,
            summary.final_stability,
            summary.final_tier.english()
        )?;
    }

    let bounds = sim.bounds();
    let probability = sim.probability();
    writeln!(out, "=== Final State ===")?;
    writeln!(
        out,
        "Height          : {:.4} .. {:.4}",
        bounds.height_min, bounds.height_max
    )?;
    writeln!(
        out,
        "Radial          : {:.4} .. {:.4}",
        bounds.radial_min, bounds.radial_max
    )?;
    writeln!(out, "Universal time  : {:.3} s", sim.last_update_time())?;
    writeln!(out, "Ignition chance : {:.2}%", probability * 100.0)?;
    let (label, color) = sim.status();
    writeln!(out, "Status          : {} [{}]", label, color.hex())?;
    Ok(())
}
