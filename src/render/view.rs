use std::cell::{Cell, RefCell};

use crate::session::{DisplayFrame, SessionObserver};

use super::renderer::{RenderStats, SkeletonRenderer};
use super::surface::DrawSurface;

/// Session observer that redraws its surface whenever a new frame is published.
///
/// Frames whose keypoints and pose class match the last drawn pair are skipped.
pub struct CanvasView<S: DrawSurface> {
    renderer: RefCell<SkeletonRenderer>,
    surface: RefCell<S>,
    redraws: Cell<usize>,
    last_stats: Cell<Option<RenderStats>>,
}

impl<S: DrawSurface> CanvasView<S> {
    pub fn new(renderer: SkeletonRenderer, surface: S) -> Self {
        Self {
            renderer: RefCell::new(renderer),
            surface: RefCell::new(surface),
            redraws: Cell::new(0),
            last_stats: Cell::new(None),
        }
    }

    /// Draws `frame` unless it matches what is already on the surface.
    pub fn show(&self, frame: &DisplayFrame) -> Option<RenderStats> {
        let stats = self.renderer.borrow_mut().update(
            &mut *self.surface.borrow_mut(),
            frame.keypoints.as_ref(),
            frame.pose_class,
        )?;
        self.redraws.set(self.redraws.get() + 1);
        self.last_stats.set(Some(stats));
        Some(stats)
    }

    pub fn redraws(&self) -> usize {
        self.redraws.get()
    }

    pub fn last_stats(&self) -> Option<RenderStats> {
        self.last_stats.get()
    }

    /// Runs `f` against the surface, e.g. to save or inspect it.
    pub fn with_surface<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.surface.borrow_mut())
    }

    pub fn with_renderer<R>(&self, f: impl FnOnce(&SkeletonRenderer) -> R) -> R {
        f(&self.renderer.borrow())
    }
}

impl<S: DrawSurface> SessionObserver for CanvasView<S> {
    fn frame_published(&self, frame: &DisplayFrame) {
        if let Some(stats) = self.show(frame) {
            log::debug!(
                "canvas redrawn: {} bones, {} joints",
                stats.lines,
                stats.joints
            );
        }
    }
}
