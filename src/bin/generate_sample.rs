//! Writes a synthetic run of `auto$<n>.csv` captures for trying the viewer.
//!
//! Usage:
//!   generate-sample --output sample_run --cycles 200

use std::f64::consts::PI;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use tribo_cycles::data::loader::write_capture;
use tribo_cycles::data::model::{Capture, ChannelMap};

#[derive(Parser, Debug)]
#[command(name = "generate-sample")]
#[command(about = "Generate a synthetic reciprocating-wear run", long_about = None)]
struct Args {
    /// Output folder (created if missing)
    #[arg(short, long, default_value = "sample_run")]
    output: PathBuf,

    /// Number of capture files
    #[arg(short, long, default_value_t = 100)]
    cycles: usize,

    /// Drive frequency in Hz
    #[arg(long, default_value_t = 20.0)]
    motor_frequency: f64,

    /// Sampling interval in microseconds
    #[arg(long, default_value_t = 250)]
    interval_us: u64,

    /// Samples per capture
    #[arg(long, default_value_t = 4000)]
    samples: usize,

    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

/// One cycle block. Friction rises through running-in then settles while
/// the slip amplitude shrinks as the contact wears.
fn generate_cycle(args: &Args, index: usize, rng: &mut SimpleRng) -> Capture {
    let progress = index as f64 / args.cycles.max(1) as f64;
    let force_amp = 0.4 + 0.6 * (1.0 - (-6.0 * progress).exp()) - 0.1 * progress;
    let disp_amp = 0.8 - 0.3 * progress;
    let humidity_v = 4.5 + 0.5 * (2.0 * PI * progress).sin();
    let dt = args.interval_us as f64 * 1e-6;
    let w = 2.0 * PI * args.motor_frequency;

    let mut capture = Capture {
        motor: Some(Vec::with_capacity(args.samples)),
        ..Default::default()
    };
    for i in 0..args.samples {
        let t = i as f64 * dt;
        capture.timestamps_us.push((i as u64 * args.interval_us) as f64);
        capture.force.push(force_amp * (w * t).sin() + rng.gauss(0.0, 0.02));
        capture.displacement.push(disp_amp * (w * t).cos() + rng.gauss(0.0, 0.01));
        if let Some(motor) = capture.motor.as_mut() {
            motor.push(args.motor_frequency / 10.0 + rng.gauss(0.0, 0.005));
        }
        capture.humidity.push(humidity_v + rng.gauss(0.0, 0.01));
    }
    capture
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);
    let channels = ChannelMap::default();

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    for index in 0..args.cycles {
        let capture = generate_cycle(&args, index, &mut rng);
        let path = args.output.join(format!("auto${index}.csv"));
        write_capture(&path, &channels, &capture)?;
    }

    println!(
        "Wrote {} captures ({} samples each) to {}",
        args.cycles,
        args.samples,
        args.output.display()
    );
    Ok(())
}
