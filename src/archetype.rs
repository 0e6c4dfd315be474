//! Canonical skeleton layouts per pose class.
//!
//! The library serves two roles: the example skeleton shown when a pose class is known but no
//! keypoints are, and the keypoint seed for the synthetic backend.

use std::collections::HashMap;

use crate::error::{PoseError, Result};
use crate::pose::PoseClass;
use crate::render::color::{color_of, Color};
use crate::skeleton::{Point, Skeleton, JOINT_COUNT};

const STAND: [(f32, f32); JOINT_COUNT] = [
    (0.5, 0.1),   // head
    (0.5, 0.2),   // neck
    (0.5, 0.3),   // spine
    (0.5, 0.45),  // pelvis
    (0.5, 0.5),   // tailbone
    (0.6, 0.2),   // right shoulder
    (0.65, 0.35), // right elbow
    (0.4, 0.2),   // left shoulder
    (0.35, 0.35), // left elbow
    (0.7, 0.5),   // right hand
    (0.7, 0.5),   // right fingers
    (0.3, 0.5),   // left hand
    (0.3, 0.5),   // left fingers
    (0.55, 0.6),  // right hip
    (0.55, 0.75), // right knee
    (0.55, 0.9),  // right ankle
    (0.45, 0.6),  // left hip
    (0.45, 0.75), // left knee
    (0.45, 0.9),  // left ankle
];

const SIT: [(f32, f32); JOINT_COUNT] = [
    (0.5, 0.2),
    (0.5, 0.3),
    (0.5, 0.4),
    (0.5, 0.5),
    (0.5, 0.5),
    (0.6, 0.3),
    (0.65, 0.4),
    (0.4, 0.3),
    (0.35, 0.4),
    (0.7, 0.5),
    (0.7, 0.5),
    (0.3, 0.5),
    (0.3, 0.5),
    (0.55, 0.5),
    (0.6, 0.7),
    (0.5, 0.9),
    (0.45, 0.5),
    (0.4, 0.7),
    (0.5, 0.9),
];

const KNEEL: [(f32, f32); JOINT_COUNT] = [
    (0.5, 0.2),
    (0.5, 0.3),
    (0.5, 0.4),
    (0.5, 0.5),
    (0.5, 0.55),
    (0.6, 0.3),
    (0.7, 0.4),
    (0.4, 0.3),
    (0.3, 0.4),
    (0.75, 0.5),
    (0.8, 0.5),
    (0.25, 0.5),
    (0.2, 0.5),
    (0.55, 0.55),
    (0.55, 0.75),
    (0.7, 0.9),
    (0.45, 0.55),
    (0.45, 0.75),
    (0.3, 0.9),
];

// Lying on the side: the spine runs along x.
const SLEEP: [(f32, f32); JOINT_COUNT] = [
    (0.1, 0.5),
    (0.2, 0.5),
    (0.4, 0.5),
    (0.6, 0.5),
    (0.7, 0.5),
    (0.2, 0.4),
    (0.3, 0.35),
    (0.2, 0.6),
    (0.3, 0.65),
    (0.4, 0.3),
    (0.45, 0.25),
    (0.4, 0.7),
    (0.45, 0.75),
    (0.6, 0.45),
    (0.75, 0.4),
    (0.9, 0.4),
    (0.6, 0.55),
    (0.75, 0.6),
    (0.9, 0.6),
];

/// Validated mapping from every [`PoseClass`] to a 19-point layout.
#[derive(Clone, Debug)]
pub struct ArchetypeLibrary {
    layouts: [Skeleton; 4],
}

impl ArchetypeLibrary {
    /// The built-in layouts.
    pub fn builtin() -> Result<Self> {
        let tables = [
            (PoseClass::Stand, &STAND),
            (PoseClass::Sit, &SIT),
            (PoseClass::Kneel, &KNEEL),
            (PoseClass::Sleep, &SLEEP),
        ];
        Self::from_layouts(
            tables
                .into_iter()
                .map(|(pose, coords)| {
                    let points = coords.iter().map(|&(x, y)| Point::new(x, y)).collect();
                    (pose, points)
                })
                .collect(),
        )
    }

    /// Builds a library from raw layouts.
    ///
    /// Fails unless every class is present with exactly [`JOINT_COUNT`] normalized points.
    pub fn from_layouts(mut layouts: HashMap<PoseClass, Vec<Point>>) -> Result<Self> {
        let mut take = |pose: PoseClass| -> Result<Skeleton> {
            let points = layouts.remove(&pose).ok_or_else(|| {
                PoseError::Config(format!("archetype for {pose} is missing"))
            })?;
            let skeleton = Skeleton::try_from(points)
                .map_err(|e| PoseError::Config(format!("archetype for {pose}: {e}")))?;
            if !skeleton.is_normalized() {
                return Err(PoseError::Config(format!(
                    "archetype for {pose} has coordinates outside [0, 1]"
                )));
            }
            Ok(skeleton)
        };
        let layouts = [
            take(PoseClass::Stand)?,
            take(PoseClass::Sit)?,
            take(PoseClass::Kneel)?,
            take(PoseClass::Sleep)?,
        ];
        Ok(Self { layouts })
    }

    pub fn archetype(&self, pose: PoseClass) -> Skeleton {
        self.layouts[pose.index()].clone()
    }

    /// Neutral layout for when neither keypoints nor a pose class exist.
    pub fn placeholder(&self) -> Skeleton {
        Skeleton::new([Point::new(0.5, 0.5); JOINT_COUNT])
    }

    pub fn color_of(&self, pose: Option<PoseClass>) -> Color {
        color_of(pose)
    }
}
