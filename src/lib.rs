//! 2D vector graphics rasterizer
//!
//! Converts SVG style path descriptions into filled or stroked pixel
//! regions on an RGBA image using supersampled scanline antialiasing.
//! The pipeline is `string | builder -> commands -> contours ->
//! (optional stroke) -> coverage -> image`:
//!
//! ```
//! use pathfill::{fill_path, Image, Path, Rgba, WindingRule};
//!
//! let path: Path = "M2 2 L14 2 L14 14 L2 14 Z".parse()?;
//! let mut image = Image::new(16, 16);
//! fill_path(&mut image, &path, Rgba::new(255, 0, 0, 255), WindingRule::NonZero)?;
//! assert_eq!(image.get(8, 8), Rgba::new(255, 0, 0, 255));
//! # Ok::<(), pathfill::PathError>(())
//! ```
mod color;
mod flatten;
mod geometry;
mod image;
mod path;
mod rasterize;
mod stroke;
mod svg;
mod utils;

pub use crate::color::{blend_normal, Rgba};
pub use crate::flatten::commands_to_polygons;
pub use crate::geometry::{scalar_fmt, Mat3, Rect, Scalar, Segment, Vec2, EPSILON, PI};
pub use crate::image::Image;
pub use crate::path::{Path, PathCommand, PathCommandKind, PathError};
pub use crate::rasterize::{
    fill_path, fill_polygons, stroke_path, WindingRule, DEFAULT_QUALITY,
};
pub use crate::stroke::stroke_polygons;
pub use crate::svg::parse_path;
pub use crate::utils::clamp;

/// Add debug log message with time taken to execute provided function
pub fn timeit<F: FnOnce() -> R, R>(msg: &str, f: F) -> R {
    let start = std::time::Instant::now();
    let result = f();
    log::debug!("{} {:?}", msg, start.elapsed());
    result
}
