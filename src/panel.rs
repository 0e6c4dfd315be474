//! Text model of the detection results panel: presence badge, pose badge and confidence bars.

use std::fmt;

use crate::pose::{ConfidenceVector, PoseClass};
use crate::render::{color_of, Color};
use crate::session::DisplayFrame;

pub const DEFAULT_BAR_WIDTH: usize = 20;
const NO_DATA: &str = "No data";

/// One horizontal confidence bar.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfidenceBar {
    pub pose: PoseClass,
    pub score: f32,
    /// Filled cells out of `width`.
    pub filled: usize,
    pub width: usize,
    /// Highlighted when this is the detected class.
    pub active: bool,
    pub color: Color,
}

impl ConfidenceBar {
    pub fn new(pose: PoseClass, score: f32, width: usize, active: bool) -> Self {
        let filled = ((score.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
        Self {
            pose,
            score,
            filled,
            width,
            active,
            color: color_of(Some(pose)),
        }
    }
}

impl fmt::Display for ConfidenceBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{marker} {pose:<6}[{fill}{rest}] {score:>4.0}%",
            marker = if self.active { '>' } else { ' ' },
            pose = self.pose.as_str(),
            fill = "#".repeat(self.filled),
            rest = "-".repeat(self.width - self.filled),
            score = self.score * 100.0,
        )
    }
}

pub fn confidence_bars(
    confidence: &ConfidenceVector,
    active: Option<PoseClass>,
    width: usize,
) -> Vec<ConfidenceBar> {
    confidence
        .iter()
        .map(|(pose, score)| ConfidenceBar::new(pose, score, width, Some(pose) == active))
        .collect()
}

/// Read-only view over a [`DisplayFrame`].
pub struct ResultPanel<'a> {
    frame: &'a DisplayFrame,
    bar_width: usize,
}

impl<'a> ResultPanel<'a> {
    pub fn new(frame: &'a DisplayFrame) -> Self {
        Self {
            frame,
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }

    pub fn with_bar_width(mut self, width: usize) -> Self {
        self.bar_width = width;
        self
    }

    pub fn presence_label(&self) -> &'static str {
        match self.frame.human_present {
            None => NO_DATA,
            Some(true) => "Present",
            Some(false) => "Not Detected",
        }
    }

    pub fn pose_label(&self) -> &'static str {
        self.frame.pose_class.map_or(NO_DATA, PoseClass::as_str)
    }

    pub fn pose_color(&self) -> Color {
        color_of(self.frame.pose_class)
    }

    pub fn bars(&self) -> Vec<ConfidenceBar> {
        self.frame
            .confidence
            .as_ref()
            .map(|conf| confidence_bars(conf, self.frame.pose_class, self.bar_width))
            .unwrap_or_default()
    }
}

impl fmt::Display for ResultPanel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Detection Results")?;
        writeln!(f, "  Human Presence: {}", self.presence_label())?;
        writeln!(
            f,
            "  Detected Pose:  {} ({})",
            self.pose_label(),
            self.pose_color().to_hex()
        )?;
        let bars = self.bars();
        if !bars.is_empty() {
            writeln!(f, "  Confidence:")?;
            for bar in bars {
                writeln!(f, "  {bar}")?;
            }
        }
        if let Some(message) = self.frame.overlay().message() {
            writeln!(f, "  {message}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_frame_reads_no_data() {
        let frame = DisplayFrame::default();
        let panel = ResultPanel::new(&frame);
        assert_eq!(panel.presence_label(), "No data");
        assert_eq!(panel.pose_label(), "No data");
        assert!(panel.bars().is_empty());
        assert!(panel.to_string().contains("No skeleton data available."));
    }

    #[test]
    fn bars_mark_detected_pose() {
        let frame = DisplayFrame {
            human_present: Some(false),
            pose_class: Some(PoseClass::Sleep),
            keypoints: None,
            confidence: Some(ConfidenceVector::new([0.1, 0.2, 0.15, 0.9]).unwrap()),
        };
        let panel = ResultPanel::new(&frame).with_bar_width(10);
        assert_eq!(panel.presence_label(), "Not Detected");

        let bars = panel.bars();
        assert_eq!(bars.len(), 4);
        let sleep = &bars[PoseClass::Sleep.index()];
        assert!(sleep.active);
        assert_eq!(sleep.filled, 9);
        assert_eq!(sleep.to_string(), "> Sleep [#########-]   90%");
        assert!(!bars[0].active);
        assert_eq!(bars[0].filled, 1);
    }
}
