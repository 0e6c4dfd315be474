//! generate_sample - write a labelled demo CSI capture
//!
//! Rows follow the training layout: 30 subcarrier amplitudes, then `presence` and `pose`.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use pose_guardian::csi_sample::CsiSampleGenerator;

#[derive(Parser, Debug)]
#[command(name = "generate_sample", about = "Write a demo CSI CSV file")]
struct Args {
    /// Output CSV path
    #[arg(long, default_value = "sample_csi_all.csv", value_name = "PATH")]
    out: PathBuf,

    /// Rows per label (four poses plus an empty room)
    #[arg(long, default_value_t = 10, value_name = "N")]
    per_pose: usize,

    /// Standard deviation of the noise added to each amplitude
    #[arg(long, default_value_t = 0.1, value_name = "STD")]
    noise: f64,

    /// RNG seed for reproducible output
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut generator = CsiSampleGenerator::new(args.seed, args.noise)?;
    let file = File::create(&args.out)
        .with_context(|| format!("failed to create {}", args.out.display()))?;
    let rows = generator.write_csv(BufWriter::new(file), args.per_pose)?;
    log::info!("wrote {} rows to {}", rows, args.out.display());
    Ok(())
}
