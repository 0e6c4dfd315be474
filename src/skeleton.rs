//! Fixed 19-joint skeleton topology.
//!
//! Joint indices are part of the wire contract: backends report keypoints in this order and the
//! renderer and archetype tables address joints by these positions.

use serde::{Deserialize, Serialize};

use crate::error::{PoseError, Result};

/// Number of joints in every skeleton.
pub const JOINT_COUNT: usize = 19;

/// Bone connections as pairs of joint indices.
pub const CONNECTIONS: [[usize; 2]; 18] = [
    [0, 1],   // head to neck
    [1, 2],   // neck to spine
    [2, 3],   // spine to pelvis
    [3, 4],   // pelvis to tailbone
    [1, 5],   // neck to right shoulder
    [5, 6],   // right shoulder to right elbow
    [1, 7],   // neck to left shoulder
    [7, 8],   // left shoulder to left elbow
    [6, 9],   // right elbow to right hand
    [9, 10],  // right hand to right fingers
    [8, 11],  // left elbow to left hand
    [11, 12], // left hand to left fingers
    [3, 13],  // pelvis to right hip
    [13, 14], // right hip to right knee
    [14, 15], // right knee to right ankle
    [3, 16],  // pelvis to left hip
    [16, 17], // left hip to left knee
    [17, 18], // left knee to left ankle
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Joint {
    Head,
    Neck,
    Spine,
    Pelvis,
    Tailbone,
    RightShoulder,
    RightElbow,
    LeftShoulder,
    LeftElbow,
    RightHand,
    RightFingers,
    LeftHand,
    LeftFingers,
    RightHip,
    RightKnee,
    RightAnkle,
    LeftHip,
    LeftKnee,
    LeftAnkle,
}

impl Joint {
    pub const ALL: [Joint; JOINT_COUNT] = [
        Joint::Head,
        Joint::Neck,
        Joint::Spine,
        Joint::Pelvis,
        Joint::Tailbone,
        Joint::RightShoulder,
        Joint::RightElbow,
        Joint::LeftShoulder,
        Joint::LeftElbow,
        Joint::RightHand,
        Joint::RightFingers,
        Joint::LeftHand,
        Joint::LeftFingers,
        Joint::RightHip,
        Joint::RightKnee,
        Joint::RightAnkle,
        Joint::LeftHip,
        Joint::LeftKnee,
        Joint::LeftAnkle,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Joint::Head => "head",
            Joint::Neck => "neck",
            Joint::Spine => "spine",
            Joint::Pelvis => "pelvis",
            Joint::Tailbone => "tailbone",
            Joint::RightShoulder => "right_shoulder",
            Joint::RightElbow => "right_elbow",
            Joint::LeftShoulder => "left_shoulder",
            Joint::LeftElbow => "left_elbow",
            Joint::RightHand => "right_hand",
            Joint::RightFingers => "right_fingers",
            Joint::LeftHand => "left_hand",
            Joint::LeftFingers => "left_fingers",
            Joint::RightHip => "right_hip",
            Joint::RightKnee => "right_knee",
            Joint::RightAnkle => "right_ankle",
            Joint::LeftHip => "left_hip",
            Joint::LeftKnee => "left_knee",
            Joint::LeftAnkle => "left_ankle",
        }
    }
}

/// A joint position normalized to the logical canvas (origin top-left, y downward).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Scale to pixel space on a `width` x `height` surface.
    pub fn to_pixels(self, width: f32, height: f32) -> (f32, f32) {
        (self.x * width, self.y * height)
    }

    pub fn is_normalized(self) -> bool {
        self.is_within(0.0)
    }

    /// Finite and inside `[-margin, 1 + margin]` on both axes.
    pub fn is_within(self, margin: f32) -> bool {
        let range = -margin..=1.0 + margin;
        self.x.is_finite()
            && self.y.is_finite()
            && range.contains(&self.x)
            && range.contains(&self.y)
    }
}

/// Exactly [`JOINT_COUNT`] points, addressed by [`Joint`] index.
#[derive(Clone, Debug, PartialEq)]
pub struct Skeleton {
    points: [Point; JOINT_COUNT],
}

impl Skeleton {
    pub const fn new(points: [Point; JOINT_COUNT]) -> Self {
        Self { points }
    }

    pub fn from_coords(coords: &[(f32, f32); JOINT_COUNT]) -> Self {
        let mut points = [Point::default(); JOINT_COUNT];
        for (point, &(x, y)) in points.iter_mut().zip(coords.iter()) {
            *point = Point::new(x, y);
        }
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn get(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    pub fn joint(&self, joint: Joint) -> Point {
        self.points[joint.index()]
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    /// Returns true when every point lies in the normalized unit square.
    pub fn is_normalized(&self) -> bool {
        self.points.iter().all(|p| p.is_normalized())
    }
}

impl TryFrom<Vec<Point>> for Skeleton {
    type Error = PoseError;

    fn try_from(points: Vec<Point>) -> Result<Self> {
        let len = points.len();
        let points: [Point; JOINT_COUNT] = points.try_into().map_err(|_| {
            PoseError::MalformedResult(format!(
                "expected {JOINT_COUNT} keypoints, got {len}"
            ))
        })?;
        Ok(Self { points })
    }
}

impl From<&Skeleton> for Vec<Point> {
    fn from(skeleton: &Skeleton) -> Self {
        skeleton.points.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connections_address_valid_distinct_joints() {
        for [i, j] in CONNECTIONS {
            assert_ne!(i, j);
            assert!(i < JOINT_COUNT && j < JOINT_COUNT);
        }
    }

    #[test]
    fn every_joint_is_connected() {
        for joint in Joint::ALL {
            let idx = joint.index();
            assert!(
                CONNECTIONS.iter().any(|[i, j]| *i == idx || *j == idx),
                "{} has no bone",
                joint.name()
            );
        }
    }

    #[test]
    fn joint_indices_round_trip() {
        for (idx, joint) in Joint::ALL.iter().enumerate() {
            assert_eq!(joint.index(), idx);
            assert_eq!(Joint::from_index(idx), Some(*joint));
        }
        assert_eq!(Joint::from_index(JOINT_COUNT), None);
        assert_eq!(Joint::Pelvis.index(), 3);
    }

    #[test]
    fn skeleton_rejects_wrong_length() {
        let err = Skeleton::try_from(vec![Point::new(0.5, 0.1); 2]).unwrap_err();
        assert!(err.to_string().contains("expected 19 keypoints, got 2"));

        let skeleton = Skeleton::try_from(vec![Point::new(0.5, 0.5); JOINT_COUNT]).unwrap();
        assert_eq!(skeleton.len(), JOINT_COUNT);
    }

    #[test]
    fn point_scales_to_pixels() {
        assert_eq!(Point::new(0.5, 0.25).to_pixels(300.0, 400.0), (150.0, 100.0));
        assert!(!Point::new(1.2, 0.5).is_normalized());
        assert!(!Point::new(f32::NAN, 0.5).is_normalized());
    }
}
