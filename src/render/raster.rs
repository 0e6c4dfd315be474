use std::io;
use std::path::Path;

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

use crate::error::{PoseError, Result};

use super::color::Color;
use super::surface::DrawSurface;

/// In-memory RGBA canvas backed by `image`, drawn with `imageproc`.
pub struct RasterSurface {
    image: RgbaImage,
    background: Rgba<u8>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_background(width, height, Color::WHITE)
    }

    pub fn with_background(width: u32, height: u32, background: Color) -> Self {
        let background = Rgba(background.to_rgba());
        Self {
            image: RgbaImage::from_pixel(width, height, background),
            background,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.image.width() || y >= self.image.height() {
            return None;
        }
        let Rgba([r, g, b, _]) = *self.image.get_pixel(x, y);
        Some(Color(r, g, b))
    }

    /// Writes the canvas to disk; the format follows the file extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.image.save(path).map_err(|e| match e {
            image::ImageError::IoError(err) => PoseError::Io(err),
            other => PoseError::Io(io::Error::other(format!(
                "cannot encode {}: {other}",
                path.display()
            ))),
        })
    }

    /// Largest canvas dimension. imageproc does not clip, so geometry is kept within one reach
    /// of the canvas before it is rounded to `i32`.
    fn reach(&self) -> f32 {
        self.image.width().max(self.image.height()).max(1) as f32
    }

    fn in_reach(&self, (x, y): (f32, f32)) -> bool {
        let reach = self.reach();
        let (w, h) = (self.image.width() as f32, self.image.height() as f32);
        x.is_finite()
            && y.is_finite()
            && (-reach..=w + reach).contains(&x)
            && (-reach..=h + reach).contains(&y)
    }
}

impl DrawSurface for RasterSurface {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = self.background;
        }
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), color: Color, width: f32) {
        if !(self.in_reach(from) && self.in_reach(to)) {
            log::debug!("skipping line {from:?} -> {to:?}: outside the canvas");
            return;
        }
        let width = width.min(self.reach());
        let rgba = Rgba(color.to_rgba());
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let length = (dx * dx + dy * dy).sqrt();
        if length <= f32::EPSILON {
            draw_filled_circle_mut(
                &mut self.image,
                (from.0.round() as i32, from.1.round() as i32),
                (width / 2.0).round() as i32,
                rgba,
            );
            return;
        }
        // imageproc strokes are one pixel wide; thicken by offsetting along the normal.
        let (nx, ny) = (-dy / length, dx / length);
        let passes = width.max(1.0).round() as i32;
        for pass in 0..passes {
            let offset = pass as f32 - (passes - 1) as f32 / 2.0;
            let (ox, oy) = (nx * offset, ny * offset);
            draw_line_segment_mut(
                &mut self.image,
                (from.0 + ox, from.1 + oy),
                (to.0 + ox, to.1 + oy),
                rgba,
            );
        }
    }

    fn fill_circle(&mut self, center: (f32, f32), radius: f32, color: Color) {
        if !self.in_reach(center) {
            log::debug!("skipping joint at {center:?}: outside the canvas");
            return;
        }
        let radius = radius.min(self.reach()).round() as i32;
        draw_filled_circle_mut(
            &mut self.image,
            (center.0.round() as i32, center.1.round() as i32),
            radius,
            Rgba(color.to_rgba()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_restores_background() {
        let mut surface = RasterSurface::new(20, 20);
        surface.fill_circle((10.0, 10.0), 3.0, Color::BLACK);
        assert_eq!(surface.pixel(10, 10), Some(Color::BLACK));

        surface.clear();
        assert_eq!(surface.pixel(10, 10), Some(Color::WHITE));
    }

    #[test]
    fn thick_lines_cover_neighbouring_rows() {
        let mut surface = RasterSurface::new(30, 30);
        let red = Color(255, 0, 0);
        surface.stroke_line((2.0, 15.0), (28.0, 15.0), red, 3.0);
        assert_eq!(surface.pixel(15, 14), Some(red));
        assert_eq!(surface.pixel(15, 15), Some(red));
        assert_eq!(surface.pixel(15, 16), Some(red));
        assert_eq!(surface.pixel(15, 20), Some(Color::WHITE));
    }

    #[test]
    fn far_off_canvas_geometry_is_skipped() {
        let mut surface = RasterSurface::new(300, 400);
        let red = Color(255, 0, 0);
        surface.stroke_line((1.0e7, 10.0), (150.0, 200.0), red, 3.0);
        surface.stroke_line((150.0, 200.0), (-3.0e38, 0.0), red, 3.0);
        surface.fill_circle((-3.0e38, 10.0), 5.0, red);
        surface.fill_circle((150.0, f32::NAN), 5.0, red);
        assert!(surface.image().pixels().all(|p| *p == surface.background));

        // Slightly outside still draws the visible part.
        surface.stroke_line((-20.0, 200.0), (150.0, 200.0), red, 1.0);
        assert_eq!(surface.pixel(10, 200), Some(red));
    }

    #[test]
    fn encoding_failures_are_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = RasterSurface::new(4, 4)
            .save(&dir.path().join("canvas.unknownformat"))
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Io);
    }

    #[test]
    fn saves_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canvas.png");
        RasterSurface::new(8, 8).save(&path).unwrap();
        let loaded = image::open(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (8, 8));
    }
}
