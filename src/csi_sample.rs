//! Demo CSI files.
//!
//! Writes CSV files shaped like the training data (30 subcarrier amplitudes, then `presence`
//! and `pose` label columns) so the viewer and a real backend have something to ingest. The
//! amplitudes are a per-pose waveform plus Gaussian noise; they carry no physical meaning.

use std::f64::consts::PI;
use std::io::Write;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::error::{PoseError, Result};
use crate::pose::PoseClass;

pub const SUBCARRIERS: usize = 30;
const BACKGROUND_STD: f64 = 0.1;

/// Ground-truth label of one generated row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleLabel {
    Pose(PoseClass),
    /// Empty room.
    NoHuman,
}

impl SampleLabel {
    pub const ALL: [SampleLabel; 5] = [
        SampleLabel::Pose(PoseClass::Stand),
        SampleLabel::Pose(PoseClass::Sit),
        SampleLabel::Pose(PoseClass::Kneel),
        SampleLabel::Pose(PoseClass::Sleep),
        SampleLabel::NoHuman,
    ];

    /// `(presence, pose)` columns. An empty room is labelled pose 0.
    pub fn columns(self) -> (u8, usize) {
        match self {
            SampleLabel::Pose(pose) => (1, pose.index()),
            SampleLabel::NoHuman => (0, 0),
        }
    }
}

pub struct CsiSampleGenerator {
    rng: StdRng,
    noise: Normal<f64>,
    background: Normal<f64>,
}

impl CsiSampleGenerator {
    pub fn new(seed: Option<u64>, noise_level: f64) -> Result<Self> {
        let noise = Normal::new(0.0, noise_level)
            .map_err(|e| PoseError::Config(format!("invalid noise level {noise_level}: {e}")))?;
        let background = Normal::new(0.0, BACKGROUND_STD)
            .map_err(|e| PoseError::Config(format!("invalid background noise: {e}")))?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            rng,
            noise,
            background,
        })
    }

    /// One row of subcarrier amplitudes.
    pub fn row(&mut self, label: SampleLabel) -> [f64; SUBCARRIERS] {
        let mut row = [0.0; SUBCARRIERS];
        for (i, value) in row.iter_mut().enumerate() {
            let x = 2.0 * PI * i as f64 / (SUBCARRIERS - 1) as f64;
            *value = match label {
                SampleLabel::NoHuman => self.background.sample(&mut self.rng),
                SampleLabel::Pose(pose) => waveform(pose, x) + self.noise.sample(&mut self.rng),
            };
        }
        row
    }

    /// Writes `per_label` rows for every label, shuffled, with a header. Returns the row count.
    pub fn write_csv<W: Write>(&mut self, mut out: W, per_label: usize) -> Result<usize> {
        let mut labels: Vec<SampleLabel> = SampleLabel::ALL
            .iter()
            .flat_map(|&label| std::iter::repeat(label).take(per_label))
            .collect();
        labels.shuffle(&mut self.rng);

        let header: Vec<String> = (0..SUBCARRIERS).map(|i| format!("subcarrier_{i}")).collect();
        writeln!(out, "{},presence,pose", header.join(","))?;
        for &label in &labels {
            let values: Vec<String> = self.row(label).iter().map(|v| format!("{v:.6}")).collect();
            let (presence, pose) = label.columns();
            writeln!(out, "{},{presence},{pose}", values.join(","))?;
        }
        out.flush()?;
        Ok(labels.len())
    }
}

fn waveform(pose: PoseClass, x: f64) -> f64 {
    match pose {
        PoseClass::Stand => 2.0 * x.sin() + 0.5 * (2.0 * x).cos(),
        PoseClass::Sit => 1.5 * (x + PI / 4.0).sin() + 0.8 * (3.0 * x).cos(),
        PoseClass::Kneel => 1.2 * (2.0 * x).sin() + 0.6 * (x + PI / 3.0).cos(),
        PoseClass::Sleep => 0.8 * (3.0 * x).sin() + (x + PI / 6.0).cos(),
    }
}
