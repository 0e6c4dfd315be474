//! JSON shape exchanged with the `/infer` endpoint.
//!
//! The backend publishes:
//! `{ "human_present": bool, "pose_class": "Stand"|"Sit"|"Kneel"|"Sleep",
//!    "keypoints": [{"x": .., "y": ..}, ...19], "confidence": {"Stand": .., ...}? }`

use serde::{Deserialize, Serialize};

use crate::error::{PoseError, Result};
use crate::pose::{ConfidenceVector, PoseClass, PredictionResult};
use crate::skeleton::{Point, Skeleton};

/// Slack allowed around [0, 1] for keypoints a model places just past the canvas edge.
pub const KEYPOINT_MARGIN: f32 = 0.05;

#[derive(Debug, Serialize, Deserialize)]
pub struct WirePrediction {
    pub human_present: bool,
    pub pose_class: PoseClass,
    pub keypoints: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<WireConfidence>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireConfidence {
    pub stand: f32,
    pub sit: f32,
    pub kneel: f32,
    pub sleep: f32,
}

/// Error body returned with non-success statuses, e.g. `{"error": "No file provided"}`.
#[derive(Debug, Deserialize)]
pub struct WireError {
    pub error: String,
}

impl From<&ConfidenceVector> for WireConfidence {
    fn from(conf: &ConfidenceVector) -> Self {
        Self {
            stand: conf.get(PoseClass::Stand),
            sit: conf.get(PoseClass::Sit),
            kneel: conf.get(PoseClass::Kneel),
            sleep: conf.get(PoseClass::Sleep),
        }
    }
}

impl TryFrom<WireConfidence> for ConfidenceVector {
    type Error = PoseError;

    fn try_from(wire: WireConfidence) -> Result<Self> {
        ConfidenceVector::new([wire.stand, wire.sit, wire.kneel, wire.sleep])
    }
}

impl From<&PredictionResult> for WirePrediction {
    fn from(result: &PredictionResult) -> Self {
        Self {
            human_present: result.human_present(),
            pose_class: result.pose_class(),
            keypoints: result.keypoints().into(),
            confidence: result.confidence().map(WireConfidence::from),
        }
    }
}

impl TryFrom<WirePrediction> for PredictionResult {
    type Error = PoseError;

    fn try_from(wire: WirePrediction) -> Result<Self> {
        if let Some((index, bad)) = wire
            .keypoints
            .iter()
            .enumerate()
            .find(|(_, p)| !p.is_within(KEYPOINT_MARGIN))
        {
            return Err(PoseError::MalformedResult(format!(
                "keypoint {index} ({}, {}) is outside the canvas",
                bad.x, bad.y
            )));
        }
        let keypoints = Skeleton::try_from(wire.keypoints)?;
        let confidence = wire.confidence.map(ConfidenceVector::try_from).transpose()?;
        Ok(PredictionResult::new(
            wire.human_present,
            wire.pose_class,
            keypoints,
            confidence,
        ))
    }
}

pub fn encode(result: &PredictionResult) -> Result<String> {
    Ok(serde_json::to_string(&WirePrediction::from(result))?)
}

/// Parses a backend body. Any shape mismatch is a [`PoseError::MalformedResult`].
pub fn decode(body: &str) -> Result<PredictionResult> {
    let wire: WirePrediction = serde_json::from_str(body)?;
    PredictionResult::try_from(wire)
}

/// Best-effort extraction of the `error` field from a failure body.
pub fn decode_error(body: &str) -> Option<String> {
    serde_json::from_str::<WireError>(body)
        .ok()
        .map(|wire| wire.error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn keypoints_json(count: usize) -> String {
        let points: Vec<String> = (0..count)
            .map(|i| format!(r#"{{"x": 0.5, "y": {}}}"#, i as f32 / 20.0))
            .collect();
        format!("[{}]", points.join(","))
    }

    #[test]
    fn decodes_backend_body_without_confidence() {
        let body = format!(
            r#"{{"human_present": true, "pose_class": "Kneel", "keypoints": {}}}"#,
            keypoints_json(19)
        );
        let result = decode(&body).unwrap();
        assert!(result.human_present());
        assert_eq!(result.pose_class(), PoseClass::Kneel);
        assert!(result.confidence().is_none());
        assert_eq!(result.keypoints().get(2).unwrap().y, 0.1);
    }

    #[test]
    fn decodes_confidence_block() {
        let body = format!(
            r#"{{"human_present": false, "pose_class": "Sit", "keypoints": {},
                "confidence": {{"Stand": 0.1, "Sit": 0.8, "Kneel": 0.2, "Sleep": 0.05}}}}"#,
            keypoints_json(19)
        );
        let result = decode(&body).unwrap();
        let conf = result.confidence().unwrap();
        assert_eq!(conf.get(PoseClass::Sit), 0.8);
        assert_eq!(conf.leader(), PoseClass::Sit);
    }

    #[test]
    fn short_keypoint_lists_are_malformed() {
        let body = format!(
            r#"{{"human_present": true, "pose_class": "Stand", "keypoints": {}}}"#,
            keypoints_json(2)
        );
        assert_eq!(decode(&body).unwrap_err().kind(), ErrorKind::MalformedResult);
    }

    #[test]
    fn unknown_pose_is_malformed() {
        let body = format!(
            r#"{{"human_present": true, "pose_class": "Crouch", "keypoints": {}}}"#,
            keypoints_json(19)
        );
        assert_eq!(decode(&body).unwrap_err().kind(), ErrorKind::MalformedResult);
    }

    #[test]
    fn out_of_range_confidence_is_malformed() {
        let body = format!(
            r#"{{"human_present": true, "pose_class": "Sit", "keypoints": {},
                "confidence": {{"Stand": 0.1, "Sit": 3.0, "Kneel": 0.2, "Sleep": 0.05}}}}"#,
            keypoints_json(19)
        );
        assert_eq!(decode(&body).unwrap_err().kind(), ErrorKind::MalformedResult);
    }

    fn body_with_head_x(x: &str) -> String {
        let mut points: Vec<String> = (1..19)
            .map(|i| format!(r#"{{"x": 0.5, "y": {}}}"#, i as f32 / 20.0))
            .collect();
        points.insert(0, format!(r#"{{"x": {x}, "y": 0.0}}"#));
        format!(
            r#"{{"human_present": true, "pose_class": "Stand", "keypoints": [{}]}}"#,
            points.join(",")
        )
    }

    #[test]
    fn off_canvas_keypoints_are_malformed() {
        for x in ["100000", "1e7", "-3e38", "1.2", "-0.5"] {
            let err = decode(&body_with_head_x(x)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedResult, "x = {x}");
            assert!(err.to_string().contains("keypoint 0"), "x = {x}");
        }
    }

    #[test]
    fn keypoints_just_past_the_edge_are_kept() {
        for x in ["1.04", "-0.03", "0", "1"] {
            assert!(decode(&body_with_head_x(x)).is_ok(), "x = {x}");
        }
    }

    #[test]
    fn extracts_error_field() {
        assert_eq!(
            decode_error(r#"{"error": "Failed to load model"}"#).as_deref(),
            Some("Failed to load model")
        );
        assert_eq!(decode_error("<html>"), None);
    }
}
