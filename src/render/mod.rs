//! Skeleton rendering.
//!
//! The renderer only knows the [`DrawSurface`] trait. [`RasterSurface`] rasterizes into an
//! RGBA image that can be saved as PNG; [`RecordingSurface`] keeps the draw calls for
//! inspection.

pub mod color;
mod raster;
mod renderer;
mod surface;
mod view;

pub use color::{color_of, Color};
pub use raster::RasterSurface;
pub use renderer::{CanvasConfig, Overlay, RenderStats, SkeletonRenderer};
pub use surface::{DrawOp, DrawSurface, RecordingSurface};
pub use view::CanvasView;
