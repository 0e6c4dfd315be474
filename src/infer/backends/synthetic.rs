use std::cell::RefCell;
use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::archetype::ArchetypeLibrary;
use crate::error::{PoseError, Result};
use crate::infer::backend::{InferenceBackend, PredictionFuture};
use crate::pose::{ConfidenceVector, PoseClass, PredictionResult};
use crate::upload::Upload;

/// Configuration for the synthetic backend.
#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    /// Simulated request latency, awaited without blocking the event loop.
    pub latency: Duration,
    /// Probability that `predict` reports a human present.
    pub presence_probability: f64,
    /// Range for the selected class's confidence.
    pub winning_range: Range<f32>,
    /// Range for every other class. Must lie entirely below `winning_range`.
    pub losing_range: Range<f32>,
    /// Fixed seed for reproducible output.
    pub seed: Option<u64>,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(1500),
            presence_probability: 0.9,
            winning_range: 0.70..0.95,
            losing_range: 0.05..0.30,
            seed: None,
        }
    }
}

impl SyntheticConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.presence_probability) {
            return Err(PoseError::Config(format!(
                "presence probability must be within [0, 1], got {}",
                self.presence_probability
            )));
        }
        for (label, range) in [("winning", &self.winning_range), ("losing", &self.losing_range)] {
            if range.is_empty() || range.start < 0.0 || range.end > 1.0 {
                return Err(PoseError::Config(format!(
                    "{label} confidence range {range:?} must be non-empty and within [0, 1]"
                )));
            }
        }
        if self.losing_range.end > self.winning_range.start {
            return Err(PoseError::Config(format!(
                "losing range {:?} overlaps winning range {:?}",
                self.losing_range, self.winning_range
            )));
        }
        if self.losing_range.start <= 0.0 {
            return Err(PoseError::Config(
                "losing confidence must stay above zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Stand-in for a real inference service.
///
/// The pose class is drawn uniformly; keypoints are that class's archetype; the chosen class
/// always scores above every other class, and the others stay non-zero.
pub struct SyntheticBackend {
    config: SyntheticConfig,
    archetypes: Arc<ArchetypeLibrary>,
    rng: RefCell<StdRng>,
}

impl SyntheticBackend {
    pub fn new(config: SyntheticConfig, archetypes: Arc<ArchetypeLibrary>) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            config,
            archetypes,
            rng: RefCell::new(rng),
        })
    }

    pub fn config(&self) -> &SyntheticConfig {
        &self.config
    }

    fn generate(&self, human_present: bool) -> Result<PredictionResult> {
        let mut rng = self.rng.borrow_mut();
        let pose = PoseClass::ALL[rng.gen_range(0..PoseClass::ALL.len())];
        let confidence = ConfidenceVector::from_fn(|class| {
            if class == pose {
                rng.gen_range(self.config.winning_range.clone())
            } else {
                rng.gen_range(self.config.losing_range.clone())
            }
        })?;
        Ok(PredictionResult::new(
            human_present,
            pose,
            self.archetypes.archetype(pose),
            Some(confidence),
        ))
    }
}

impl InferenceBackend for SyntheticBackend {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn predict<'a>(&'a self, upload: &'a Upload) -> PredictionFuture<'a> {
        Box::pin(async move {
            log::debug!(
                "synthesizing prediction for {} ({:.2} KB)",
                upload.name(),
                upload.size_kb()
            );
            tokio::time::sleep(self.config.latency).await;
            let present = self
                .rng
                .borrow_mut()
                .gen_bool(self.config.presence_probability);
            self.generate(present)
        })
    }

    fn sample(&self) -> PredictionFuture<'_> {
        Box::pin(async move {
            tokio::time::sleep(self.config.latency).await;
            self.generate(true)
        })
    }
}
