//! silt: run a pollutant diffusion simulation headlessly and report on it.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use silt::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "silt")]
#[command(about = "Simulate 2-D pollutant diffusion with a finite-difference, flux-Euler or spectral stepper")]
#[command(version)]
struct Args {
    /// Numerical scheme (finite-difference, flux-euler, spectral)
    #[arg(short, long, default_value = "finite-difference")]
    scheme: Scheme,

    /// Number of ticks to run
    #[arg(short, long, default_value = "100")]
    ticks: u64,

    /// Source to deposit before the first tick, as row,col,radius,intensity.
    /// Repeatable. Defaults to one radius-5, intensity-10 source at the centre.
    #[arg(long = "source", value_parser = parse_source)]
    sources: Vec<SourceSpec>,

    /// Cell to sample after the run, as row,col. Repeatable.
    #[arg(long = "probe", value_parser = parse_cell)]
    probes: Vec<(usize, usize)>,

    /// Print statistics every N ticks
    #[arg(long, default_value = "10")]
    report_every: u64,

    /// Override the diffusion coefficient
    #[arg(long)]
    diffusion: Option<f64>,

    /// Override the timestep
    #[arg(long)]
    dt: Option<f64>,

    /// Override the scheme's deposit mode
    #[arg(long, value_enum)]
    deposit: Option<DepositArg>,

    /// Minimum milliseconds between ticks
    #[arg(long)]
    pace_ms: Option<u64>,

    /// Run even if the parameters violate the stability bound
    #[arg(long)]
    no_stability_check: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DepositArg {
    Absolute,
    Additive,
}

impl From<DepositArg> for DepositMode {
    fn from(d: DepositArg) -> Self {
        match d {
            DepositArg::Absolute => DepositMode::Absolute,
            DepositArg::Additive => DepositMode::Additive,
        }
    }
}

fn parse_fields<const N: usize>(s: &str, what: &str) -> Result<[f64; N], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {what}, got '{s}'"));
    }
    let mut out = [0.0; N];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("'{part}' is not a number in '{s}'"))?;
    }
    Ok(out)
}

fn to_index(v: f64, s: &str) -> Result<usize, String> {
    if v < 0.0 || v.fract() != 0.0 {
        return Err(format!("'{v}' is not a cell index in '{s}'"));
    }
    Ok(v as usize)
}

fn parse_source(s: &str) -> Result<SourceSpec, String> {
    let [row, col, radius, intensity] = parse_fields::<4>(s, "row,col,radius,intensity")?;
    let radius = u32::try_from(to_index(radius, s)?).map_err(|e| e.to_string())?;
    SourceSpec::new((to_index(row, s)?, to_index(col, s)?), radius, intensity)
        .map_err(|e| e.to_string())
}

fn parse_cell(s: &str) -> Result<(usize, usize), String> {
    let [row, col] = parse_fields::<2>(s, "row,col")?;
    Ok((to_index(row, s)?, to_index(col, s)?))
}

fn build_config(args: &Args) -> SimConfig {
    let mut config = SimConfig::reference(args.scheme);
    if let Some(d) = args.diffusion {
        config.diffusion = d;
    }
    if let Some(dt) = args.dt {
        config.dt = dt;
    }
    config.deposit = args.deposit.map(DepositMode::from);
    config.check_stability = !args.no_stability_check;
    config
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut sim = Simulation::new(build_config(&args)).context("Invalid configuration")?;

    let shape = sim.shape();
    let sources = if args.sources.is_empty() {
        vec![SourceSpec::new((shape.rows() / 2, shape.cols() / 2), 5, 10.0)?]
    } else {
        args.sources.clone()
    };
    for source in sources {
        let touched = sim
            .inject_source(source)
            .with_context(|| format!("Failed to deposit {source:?}"))?;
        info!(center = ?source.center(), touched, "source deposited");
    }

    let every = args.report_every.max(1);
    let loop_config = LoopConfig {
        pace: args.pace_ms.map(Duration::from_millis),
        max_ticks: Some(args.ticks),
    };
    let mut driver = SimulationLoop::new(sim, loop_config);
    println!("{:>6}  {:>12}  {:>14}  {:>8}", "tick", "peak", "mass", "step_us");
    let summary = driver
        .run(&mut |frame: &Frame<'_>| {
            let m = frame.metrics;
            if m.tick.0 % every == 0 {
                println!(
                    "{:>6}  {:>12.6}  {:>14.6}  {:>8}",
                    m.tick.0, m.peak, m.total_mass, m.step_us
                );
            }
            Flow::Continue
        })
        .context("Simulation failed")?;

    let sim = driver.into_simulation();
    println!(
        "ran {} ticks of {} on a {}x{} grid",
        summary.ticks,
        sim.scheme(),
        shape.rows(),
        shape.cols()
    );
    for (row, col) in args.probes {
        let value = sim
            .sample(row, col)
            .with_context(|| format!("Cannot sample ({row}, {col})"))?;
        println!("({row}, {col}) = {value:.6}");
    }

    Ok(())
}
