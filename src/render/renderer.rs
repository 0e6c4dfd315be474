use crate::archetype::ArchetypeLibrary;
use crate::pose::PoseClass;
use crate::skeleton::{Skeleton, CONNECTIONS};

use super::color::color_of;
use super::surface::DrawSurface;

const NO_DATA_MESSAGE: &str = "No skeleton data available.";
const EXAMPLE_MESSAGE: &str = "Example skeleton. Upload data for actual prediction.";

/// Canvas geometry and stroke styling. `width` and `height` size the surface the view creates;
/// the renderer scales to whatever surface it is handed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub line_width: f32,
    pub joint_radius: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 300,
            height: 400,
            line_width: 3.0,
            joint_radius: 5.0,
        }
    }
}

/// Draw calls issued for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub lines: usize,
    pub joints: usize,
}

/// What the view shows on top of the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Overlay {
    /// Real keypoints are drawn.
    None,
    /// Neither keypoints nor a pose class exist.
    NoData,
    /// A pose class exists but keypoints do not; the view may draw the archetype, flagged as
    /// an example rather than real data.
    Example(PoseClass),
}

impl Overlay {
    pub fn for_frame(joints: Option<&Skeleton>, pose: Option<PoseClass>) -> Self {
        match (joints, pose) {
            (Some(_), _) => Overlay::None,
            (None, Some(pose)) => Overlay::Example(pose),
            (None, None) => Overlay::NoData,
        }
    }

    pub fn message(&self) -> Option<&'static str> {
        match self {
            Overlay::None => None,
            Overlay::NoData => Some(NO_DATA_MESSAGE),
            Overlay::Example(_) => Some(EXAMPLE_MESSAGE),
        }
    }
}

/// Draws skeletons scaled from normalized coordinates onto a [`DrawSurface`].
pub struct SkeletonRenderer {
    config: CanvasConfig,
    last: Option<(Option<Skeleton>, Option<PoseClass>)>,
}

impl SkeletonRenderer {
    pub fn new(config: CanvasConfig) -> Self {
        Self { config, last: None }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Clears the surface and draws `joints` scaled to the surface size, or nothing when `joints`
    /// is `None`.
    pub fn render<S: DrawSurface + ?Sized>(
        &self,
        surface: &mut S,
        joints: Option<&Skeleton>,
        pose: Option<PoseClass>,
    ) -> RenderStats {
        surface.clear();
        let Some(joints) = joints else {
            return RenderStats::default();
        };

        let color = color_of(pose);
        let (w, h) = surface.size();
        let (w, h) = (w as f32, h as f32);
        let mut stats = RenderStats::default();

        for [i, j] in CONNECTIONS {
            if let (Some(a), Some(b)) = (joints.get(i), joints.get(j)) {
                surface.stroke_line(a.to_pixels(w, h), b.to_pixels(w, h), color, self.config.line_width);
                stats.lines += 1;
            }
        }
        for joint in joints.iter() {
            surface.fill_circle(joint.to_pixels(w, h), self.config.joint_radius, color);
            stats.joints += 1;
        }
        stats
    }

    /// Re-renders only when the `(joints, pose)` pair differs from the last one drawn.
    pub fn update<S: DrawSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        joints: Option<&Skeleton>,
        pose: Option<PoseClass>,
    ) -> Option<RenderStats> {
        let unchanged = self
            .last
            .as_ref()
            .is_some_and(|(last_joints, last_pose)| {
                last_joints.as_ref() == joints && *last_pose == pose
            });
        if unchanged {
            return None;
        }
        let stats = self.render(surface, joints, pose);
        self.last = Some((joints.cloned(), pose));
        Some(stats)
    }

    /// Draws the archetype for `pose` (or the neutral placeholder) as an example skeleton.
    pub fn render_example<S: DrawSurface + ?Sized>(
        &self,
        surface: &mut S,
        library: &ArchetypeLibrary,
        pose: Option<PoseClass>,
    ) -> RenderStats {
        let skeleton = match pose {
            Some(pose) => library.archetype(pose),
            None => library.placeholder(),
        };
        self.render(surface, Some(&skeleton), pose)
    }
}

impl Default for SkeletonRenderer {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_distinguishes_example_from_no_data() {
        assert_eq!(Overlay::for_frame(None, None), Overlay::NoData);
        assert_eq!(
            Overlay::for_frame(None, Some(PoseClass::Sit)),
            Overlay::Example(PoseClass::Sit)
        );
        assert_ne!(
            Overlay::NoData.message(),
            Overlay::Example(PoseClass::Sit).message()
        );
        assert_eq!(Overlay::None.message(), None);
    }
}
