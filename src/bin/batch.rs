//! Headless run of the cycle-metric pipeline.
//!
//! Usage:
//!   tribo-batch --input runs/2024-05-01 --output reports/
//!   tribo-batch --input runs/2024-05-01 --load 19.6 --policy simple

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use tribo_cycles::prefs::{JsonPreferences, PreferencesStore};
use tribo_cycles::{build_series_with_progress, report, AnalysisError, ExtremaPolicy, RunContext};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Mean of the 20 highest minus mean of the 20 lowest samples
    Trimmed,
    /// Maximum minus minimum
    Simple,
}

impl From<PolicyArg> for ExtremaPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Trimmed => ExtremaPolicy::TrimmedMean,
            PolicyArg::Simple => ExtremaPolicy::Simple,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "tribo-batch")]
#[command(about = "Reduce a folder of auto$<n>.csv cycle captures to a friction trend", long_about = None)]
struct Args {
    /// Run folder with the cycle captures
    #[arg(short, long)]
    input: PathBuf,

    /// Folder for result.csv (default: print to stdout only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Normal load in N (empty: 9.8)
    #[arg(long, default_value = "")]
    load: String,

    /// Peak-to-peak estimator
    #[arg(long, value_enum, default_value_t = PolicyArg::Trimmed)]
    policy: PolicyArg,

    /// Override the stored friction calibration
    #[arg(long)]
    friction_scale: Option<f64>,

    /// Override the stored amplitude calibration
    #[arg(long)]
    amp_scale: Option<f64>,

    /// Motor frequency in Hz, for exports without a motor-speed column
    #[arg(long)]
    motor_frequency: Option<f64>,

    /// Preferences file
    #[arg(long, env = "TRIBO_PREFS", default_value = tribo_cycles::prefs::DEFAULT_PREFS_FILE)]
    prefs: PathBuf,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        match e.downcast_ref::<AnalysisError>() {
            Some(kind) => eprintln!("{}: {e:#}", kind.kind()),
            None => eprintln!("Error: {e:#}"),
        }
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let mut prefs = JsonPreferences::new(&args.prefs)
        .load()
        .context("loading preferences")?;
    if let Some(f) = args.friction_scale {
        prefs.friction_scale = f;
    }
    if let Some(a) = args.amp_scale {
        prefs.amp_scale = a;
    }

    let load = RunContext::parse_load(&args.load)?;
    let mut ctx = RunContext::new(&args.input, &prefs, load).with_policy(args.policy.into());
    if let Some(hz) = args.motor_frequency {
        ctx = ctx.with_motor_frequency(hz);
    }

    let series = build_series_with_progress(&ctx, |p| eprintln!("{p}"))?;

    println!("cycles,friction_coefficient,amplitude,humidity");
    for (cycles, m) in series.iter() {
        println!(
            "{cycles},{:.6},{:.4},{:.2}",
            m.friction_coefficient, m.amplitude, m.humidity
        );
    }

    if let Some(out) = &args.output {
        let path = report::write_csv(&series, out)?;
        eprintln!("Wrote {}", path.display());
    }
    Ok(())
}
