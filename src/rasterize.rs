//! Scanline rasterization of polyline contours
//!
//! Coverage is estimated by sampling `quality` scan lines per pixel row
//! and averaging their signed winding coverage. Each scan line collects
//! crossings with all contour segments, sorts them by x and walks the
//! columns left to right accumulating the winding counter.
use crate::{
    blend_normal, clamp, commands_to_polygons, stroke_polygons, timeit, Image, Path, PathError,
    Rect, Rgba, Scalar, Segment, Vec2, PI,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of scan lines sampled per pixel row by the convenience wrappers
pub const DEFAULT_QUALITY: usize = 4;

// shifts scan lines off exact vertex coordinates
const SCAN_EPSILON: Scalar = 0.0001 * PI;

/// The algorithm deciding which side of the contours is the inside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WindingRule {
    /// Fill area with non-zero winding number
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "nonzero"))]
    NonZero,
    /// Fill area with odd winding number
    #[cfg_attr(feature = "serde", serde(rename = "evenodd"))]
    EvenOdd,
}

/// Fill a path into the image with source-over blending
pub fn fill_path(
    image: &mut Image,
    path: &Path,
    color: Rgba,
    winding_rule: WindingRule,
) -> Result<(), PathError> {
    let polygons = commands_to_polygons(path.commands())?;
    let size = Vec2::new(image.width() as Scalar, image.height() as Scalar);
    fill_polygons(
        image,
        size,
        &polygons,
        color,
        winding_rule,
        blend_normal,
        DEFAULT_QUALITY,
    );
    Ok(())
}

/// Stroke a path into the image with source-over blending
///
/// The stroke is centered on the path, covering `stroke_width / 2` to
/// each side.
pub fn stroke_path(
    image: &mut Image,
    path: &Path,
    color: Rgba,
    stroke_width: Scalar,
) -> Result<(), PathError> {
    let polygons = commands_to_polygons(path.commands())?;
    let outlines = stroke_polygons(&polygons, stroke_width / 2.0, stroke_width / 2.0);
    let size = Vec2::new(image.width() as Scalar, image.height() as Scalar);
    fill_polygons(
        image,
        size,
        &outlines,
        color,
        WindingRule::NonZero,
        blend_normal,
        DEFAULT_QUALITY,
    );
    Ok(())
}

/// Rasterize contours into the image with the provided pixel mixer
///
/// `size` is the logical canvas size scan line hits are clamped to,
/// `quality` is the number of scan lines sampled per pixel row. Pixels
/// with zero accumulated coverage are left untouched.
pub fn fill_polygons(
    image: &mut Image,
    size: Vec2,
    polygons: &[Vec<Vec2>],
    color: Rgba,
    winding_rule: WindingRule,
    mixer: impl Fn(Rgba, Rgba) -> Rgba,
    quality: usize,
) {
    let bounds: Vec<Rect> = polygons.iter().map(|p| polygon_bounds(p)).collect();
    let mut hits: Vec<(Scalar, bool)> = Vec::new();
    let mut alphas: Vec<Scalar> = vec![0.0; image.width()];

    timeit("fill_polygons", || {
        for y in 0..image.height() {
            for alpha in alphas.iter_mut() {
                *alpha = 0.0;
            }
            for m in 0..quality {
                let y_line = y as Scalar + SCAN_EPSILON + m as Scalar / quality as Scalar;
                scan_line_hits(polygons, &bounds, &mut hits, size, y, y_line);

                let mut pen_fill = 0i32;
                let mut hit_index = 0;
                for (x, alpha) in alphas.iter_mut().enumerate() {
                    let mut pen_edge = match winding_rule {
                        WindingRule::NonZero => pen_fill as Scalar,
                        WindingRule::EvenOdd => {
                            if pen_fill % 2 != 0 {
                                1.0
                            } else {
                                0.0
                            }
                        }
                    };
                    while hit_index < hits.len() && hits[hit_index].0 as usize == x {
                        let (hit_x, winding) = hits[hit_index];
                        let cover = hit_x - x as Scalar;
                        if winding {
                            pen_edge -= 1.0 - cover;
                            pen_fill -= 1;
                        } else {
                            pen_edge += 1.0 - cover;
                            pen_fill += 1;
                        }
                        hit_index += 1;
                    }
                    *alpha += pen_edge;
                }
            }
            for x in 0..image.width() {
                let alpha = clamp(alphas[x].abs() / quality as Scalar, 0.0, 1.0);
                if alpha > 0.0 {
                    let src = color.with_alpha((alpha * 255.0).round() as u8);
                    let dst = image.get(x, y);
                    image.set(x, y, mixer(dst, src));
                }
            }
        }
    });
}

/// Collect crossings of all contours with the scan line at `y_line`
///
/// Hits are clamped into `[0, size.x]` and sorted by x, the recorded
/// winding is true for segments pointing upwards.
fn scan_line_hits(
    polygons: &[Vec<Vec2>],
    bounds: &[Rect],
    hits: &mut Vec<(Scalar, bool)>,
    size: Vec2,
    y: usize,
    y_line: Scalar,
) {
    hits.clear();
    for (polygon, bound) in polygons.iter().zip(bounds) {
        if bound.xy.y() > y as Scalar || bound.xy.y() + bound.wh.y() < y as Scalar {
            continue;
        }
        for pair in polygon.windows(2) {
            let segment = Segment::new(pair[0], pair[1]);
            if segment.at.y() == segment.to.y() {
                // horizontal segments produce no winding
                continue;
            }
            if let Some(hit) = segment.intersect_horizontal(y_line) {
                let winding = segment.at.y() > segment.to.y();
                hits.push((clamp(hit.x(), 0.0, size.x()), winding));
            }
        }
    }
    hits.sort_by(|a, b| a.0.total_cmp(&b.0));
}

/// Bounding rectangle of a contour aligned to the pixel grid
fn polygon_bounds(polygon: &[Vec2]) -> Rect {
    let mut points = polygon.iter();
    let first = match points.next() {
        Some(first) => *first,
        None => return Rect::default(),
    };
    let (mut min, mut max) = (first, first);
    for point in points {
        min = Vec2::new(min.x().min(point.x()), min.y().min(point.y()));
        max = Vec2::new(max.x().max(point.x()), max.y().max(point.y()));
    }
    Rect::new(
        Vec2::new(min.x().floor(), min.y().floor()),
        Vec2::new((max.x() - min.x()).ceil(), (max.y() - min.y()).ceil()),
    )
}
