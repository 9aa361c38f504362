//! Expansion of contours into stroke outline polygons
use crate::{Scalar, Segment, Vec2};

/// Expand polyline contours into closed outline polygons suitable for
/// filling
///
/// `width_right` and `width_left` are the offsets to each side of the
/// contour. Corners where consecutive offset segments intersect are
/// merged, corners where they do not are left as a notch.
// TODO: emit caps for open contours
pub fn stroke_polygons(
    polygons: &[Vec<Vec2>],
    width_right: Scalar,
    width_left: Scalar,
) -> Vec<Vec<Vec2>> {
    let mut result = Vec::new();
    for polygon in polygons {
        let mut right: Vec<Vec2> = Vec::new();
        let mut left: Vec<Vec2> = Vec::new();
        for pair in polygon.windows(2) {
            let (at, to) = (pair[0], pair[1]);
            let tangent = match (at - to).normalize() {
                Some(tangent) => tangent,
                None => continue,
            };
            let normal = Vec2::new(-tangent.y(), tangent.x());
            offset_side(
                &mut right,
                Segment::new(at + normal * width_right, to + normal * width_right),
            );
            offset_side(
                &mut left,
                Segment::new(at - normal * width_left, to - normal * width_left),
            );
        }
        if right.is_empty() {
            continue;
        }
        let mut outline = right;
        outline.extend(left.iter().rev());
        if let Some(first) = outline.first().copied() {
            outline.push(first);
        }
        result.push(outline);
    }
    result
}

/// Append an offset segment to one side of the stroke
///
/// When the segment intersects the previous one on the same side the
/// shared corner replaces the previous endpoint, otherwise both endpoints
/// are appended and a gap remains.
fn offset_side(side: &mut Vec<Vec2>, segment: Segment) {
    if side.len() >= 2 {
        let prev = Segment::new(side[side.len() - 2], side[side.len() - 1]);
        if let Some(corner) = prev.intersect(segment) {
            let last = side.len() - 1;
            side[last] = corner;
            side.push(segment.to);
            return;
        }
    }
    side.push(segment.at);
    side.push(segment.to);
}
