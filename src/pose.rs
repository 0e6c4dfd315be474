//! Pose classes, confidence vectors and prediction results.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PoseError, Result};
use crate::skeleton::Skeleton;

/// Closed set of body postures the classifier distinguishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoseClass {
    Stand,
    Sit,
    Kneel,
    Sleep,
}

impl PoseClass {
    pub const ALL: [PoseClass; 4] = [
        PoseClass::Stand,
        PoseClass::Sit,
        PoseClass::Kneel,
        PoseClass::Sleep,
    ];

    /// Training label index (Stand=0, Sit=1, Kneel=2, Sleep=3).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PoseClass::Stand => "Stand",
            PoseClass::Sit => "Sit",
            PoseClass::Kneel => "Kneel",
            PoseClass::Sleep => "Sleep",
        }
    }
}

impl fmt::Display for PoseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PoseClass {
    type Err = PoseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|pose| pose.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PoseError::MalformedResult(format!("unknown pose class '{s}'")))
    }
}

/// Independent per-class scores in [0, 1]. Not a probability distribution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConfidenceVector {
    scores: [f32; 4],
}

impl ConfidenceVector {
    /// Builds a vector, rejecting scores that are non-finite or outside [0, 1].
    pub fn new(scores: [f32; 4]) -> Result<Self> {
        for (pose, score) in PoseClass::ALL.iter().zip(scores) {
            if !score.is_finite() || !(0.0..=1.0).contains(&score) {
                return Err(PoseError::MalformedResult(format!(
                    "confidence for {pose} out of range: {score}"
                )));
            }
        }
        Ok(Self { scores })
    }

    pub fn from_fn(score: impl FnMut(PoseClass) -> f32) -> Result<Self> {
        Self::new(PoseClass::ALL.map(score))
    }

    pub fn get(&self, pose: PoseClass) -> f32 {
        self.scores[pose.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (PoseClass, f32)> + '_ {
        PoseClass::ALL.into_iter().zip(self.scores.iter().copied())
    }

    /// Highest-scoring class. Ties resolve to the earlier class.
    pub fn leader(&self) -> PoseClass {
        let mut best = PoseClass::Stand;
        for (pose, score) in self.iter() {
            if score > self.get(best) {
                best = pose;
            }
        }
        best
    }

    /// True when `pose` scores strictly above every other class.
    pub fn strictly_favors(&self, pose: PoseClass) -> bool {
        let winner = self.get(pose);
        self.iter()
            .filter(|(other, _)| *other != pose)
            .all(|(_, score)| winner > score)
    }
}

/// Outcome of one completed inference request. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct PredictionResult {
    human_present: bool,
    pose_class: PoseClass,
    keypoints: Skeleton,
    confidence: Option<ConfidenceVector>,
}

impl PredictionResult {
    pub fn new(
        human_present: bool,
        pose_class: PoseClass,
        keypoints: Skeleton,
        confidence: Option<ConfidenceVector>,
    ) -> Self {
        Self {
            human_present,
            pose_class,
            keypoints,
            confidence,
        }
    }

    pub fn human_present(&self) -> bool {
        self.human_present
    }

    pub fn pose_class(&self) -> PoseClass {
        self.pose_class
    }

    pub fn keypoints(&self) -> &Skeleton {
        &self.keypoints
    }

    pub fn confidence(&self) -> Option<&ConfidenceVector> {
        self.confidence.as_ref()
    }
}
