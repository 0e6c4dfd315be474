use super::color::Color;

/// 2D drawing target in pixel coordinates.
pub trait DrawSurface {
    /// Surface size in pixels.
    fn size(&self) -> (u32, u32);

    /// Erase everything drawn so far.
    fn clear(&mut self);

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), color: Color, width: f32);

    fn fill_circle(&mut self, center: (f32, f32), radius: f32, color: Color);
}

/// One recorded drawing call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear,
    Line {
        from: (f32, f32),
        to: (f32, f32),
        color: Color,
        width: f32,
    },
    Circle {
        center: (f32, f32),
        radius: f32,
        color: Color,
    },
}

/// Surface that records calls instead of rasterizing them.
///
/// `clear` resets the list, so `ops` always holds exactly the latest frame.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
    clears: usize,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
            clears: 0,
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn line_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Line { .. }))
            .count()
    }

    pub fn circle_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Circle { .. }))
            .count()
    }

    /// Number of times the surface was cleared, i.e. frames drawn.
    pub fn clear_count(&self) -> usize {
        self.clears
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.ops.push(DrawOp::Clear);
        self.clears += 1;
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), color: Color, width: f32) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn fill_circle(&mut self, center: (f32, f32), radius: f32, color: Color) {
        self.ops.push(DrawOp::Circle {
            center,
            radius,
            color,
        });
    }
}
