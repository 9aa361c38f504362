//! Flattening of path commands into polyline contours
//!
//! Straight commands map to single segments, quadratic beziers use a
//! uniform subdivision sized from the curve's second difference, cubic
//! beziers and elliptic arcs are refined adaptively until the chord
//! midpoint deviates from the curve by less than a quarter pixel.
use crate::{Mat3, PathCommand, PathCommandKind, PathError, Scalar, Vec2, PI};

/// Maximum deviation of the chord midpoint from the curve midpoint
const MAX_ERROR: Scalar = 0.25;

/// Convert a command stream into polyline contours, one per subpath
///
/// Contours are closed by the `Close` command inserting the closing
/// segment, iterating segments of a contour does not wrap around.
pub fn commands_to_polygons(commands: &[PathCommand]) -> Result<Vec<Vec<Vec2>>, PathError> {
    let mut polygons: Vec<Vec<Vec2>> = Vec::new();
    let mut polygon: Vec<Vec2> = Vec::new();
    let mut start = Vec2::default();
    let mut at = Vec2::default();
    let mut ctr = Vec2::default();
    let mut ctr2 = Vec2::default();
    let mut prev_command: Option<PathCommandKind> = None;

    for command in commands {
        let n = &command.numbers;
        match command.kind {
            PathCommandKind::Move => {
                at = Vec2::new(n[0], n[1]);
                start = at;
            }
            PathCommandKind::RMove => {
                at = at + Vec2::new(n[0], n[1]);
                start = at;
            }
            PathCommandKind::Line => {
                let to = Vec2::new(n[0], n[1]);
                push_segment(&mut polygon, at, to);
                at = to;
            }
            PathCommandKind::RLine => {
                let to = at + Vec2::new(n[0], n[1]);
                push_segment(&mut polygon, at, to);
                at = to;
            }
            PathCommandKind::HLine => {
                let to = Vec2::new(n[0], at.y());
                push_segment(&mut polygon, at, to);
                at = to;
            }
            PathCommandKind::RHLine => {
                let to = at + Vec2::new(n[0], 0.0);
                push_segment(&mut polygon, at, to);
                at = to;
            }
            PathCommandKind::VLine => {
                let to = Vec2::new(at.x(), n[0]);
                push_segment(&mut polygon, at, to);
                at = to;
            }
            PathCommandKind::RVLine => {
                let to = at + Vec2::new(0.0, n[0]);
                push_segment(&mut polygon, at, to);
                at = to;
            }
            PathCommandKind::Cubic => {
                ctr = Vec2::new(n[0], n[1]);
                ctr2 = Vec2::new(n[2], n[3]);
                let to = Vec2::new(n[4], n[5]);
                flatten_cubic(&mut polygon, at, ctr, ctr2, to);
                at = to;
            }
            PathCommandKind::RCubic => {
                ctr = at + Vec2::new(n[0], n[1]);
                ctr2 = at + Vec2::new(n[2], n[3]);
                let to = at + Vec2::new(n[4], n[5]);
                flatten_cubic(&mut polygon, at, ctr, ctr2, to);
                at = to;
            }
            PathCommandKind::RSCubic => {
                let ctrl1 = if is_cubic(prev_command) {
                    2.0 * at - ctr2
                } else {
                    at
                };
                ctr2 = at + Vec2::new(n[0], n[1]);
                let to = at + Vec2::new(n[2], n[3]);
                flatten_cubic(&mut polygon, at, ctrl1, ctr2, to);
                at = to;
            }
            PathCommandKind::Quad => {
                ctr = Vec2::new(n[0], n[1]);
                let to = Vec2::new(n[2], n[3]);
                flatten_quad(&mut polygon, at, ctr, to);
                at = to;
            }
            PathCommandKind::RQuad => {
                ctr = at + Vec2::new(n[0], n[1]);
                let to = at + Vec2::new(n[2], n[3]);
                flatten_quad(&mut polygon, at, ctr, to);
                at = to;
            }
            PathCommandKind::TQuad => {
                let to = Vec2::new(n[0], n[1]);
                ctr = if is_quad(prev_command) { 2.0 * at - ctr } else { at };
                flatten_quad(&mut polygon, at, ctr, to);
                at = to;
            }
            PathCommandKind::RTQuad => {
                let to = at + Vec2::new(n[0], n[1]);
                ctr = if is_quad(prev_command) { 2.0 * at - ctr } else { at };
                flatten_quad(&mut polygon, at, ctr, to);
                at = to;
            }
            PathCommandKind::Arc => {
                let to = Vec2::new(n[5], n[6]);
                flatten_arc(&mut polygon, at, to, n[0], n[1], n[2], n[3] != 0.0, n[4] != 0.0);
                at = to;
            }
            PathCommandKind::RArc => {
                let to = at + Vec2::new(n[5], n[6]);
                flatten_arc(&mut polygon, at, to, n[0], n[1], n[2], n[3] != 0.0, n[4] != 0.0);
                at = to;
            }
            PathCommandKind::Close => {
                if at != start {
                    if matches!(
                        prev_command,
                        Some(PathCommandKind::Quad) | Some(PathCommandKind::TQuad)
                    ) {
                        flatten_quad(&mut polygon, at, ctr, start);
                    } else {
                        push_segment(&mut polygon, at, start);
                    }
                }
                if !polygon.is_empty() {
                    polygons.push(std::mem::take(&mut polygon));
                }
                at = start;
            }
            kind => return Err(PathError::UnsupportedCommand { kind }),
        }
        prev_command = Some(command.kind);
    }
    if !polygon.is_empty() {
        polygons.push(polygon);
    }
    Ok(polygons)
}

fn is_cubic(kind: Option<PathCommandKind>) -> bool {
    matches!(
        kind,
        Some(PathCommandKind::Cubic)
            | Some(PathCommandKind::RCubic)
            | Some(PathCommandKind::SCubic)
            | Some(PathCommandKind::RSCubic)
    )
}

fn is_quad(kind: Option<PathCommandKind>) -> bool {
    matches!(
        kind,
        Some(PathCommandKind::Quad)
            | Some(PathCommandKind::RQuad)
            | Some(PathCommandKind::TQuad)
            | Some(PathCommandKind::RTQuad)
    )
}

/// Append the segment `(at, to)` to the contour
///
/// Zero length segments are skipped, the start point is not appended again
/// when it is already the last point of the contour.
fn push_segment(contour: &mut Vec<Vec2>, at: Vec2, to: Vec2) {
    if at == to {
        return;
    }
    if contour.last() != Some(&at) {
        contour.push(at);
    }
    contour.push(to);
}

/// Flatten a quadratic bezier with a uniform subdivision
///
/// The step count grows with the squared second difference of the control
/// points, nearly straight curves collapse to a single segment.
fn flatten_quad(contour: &mut Vec<Vec2>, at: Vec2, ctrl: Vec2, to: Vec2) {
    let Vec2([dx, dy]) = at - 2.0 * ctrl + to;
    let dev_sq = dx * dx + dy * dy;
    if dev_sq < 1.0 / 3.0 {
        push_segment(contour, at, to);
        return;
    }
    let n = 1 + (3.0 * dev_sq).sqrt().sqrt().floor() as usize;
    let mut prev = at;
    for k in 1..=n {
        let t = k as Scalar / n as Scalar;
        let sample = at.lerp(ctrl, t).lerp(ctrl.lerp(to, t), t);
        push_segment(contour, prev, sample);
        prev = sample;
    }
    push_segment(contour, prev, to);
}

fn flatten_cubic(contour: &mut Vec<Vec2>, at: Vec2, ctrl1: Vec2, ctrl2: Vec2, to: Vec2) {
    let curve = |t: Scalar| -> Vec2 {
        let t1 = 1.0 - t;
        t1 * t1 * t1 * at
            + 3.0 * t1 * t1 * t * ctrl1
            + 3.0 * t1 * t * t * ctrl2
            + t * t * t * to
    };
    let mut prev = at;
    discretize(contour, &mut prev, &curve, 1, 1);
}

/// Adaptive midpoint refinement shared by cubic and arc flattening
///
/// The step `[(i - 1) / steps, i / steps]` is replaced with two steps at
/// double resolution while the midpoint of its chord deviates from the
/// curve midpoint by `MAX_ERROR` or more.
fn discretize(
    contour: &mut Vec<Vec2>,
    prev: &mut Vec2,
    curve: &impl Fn(Scalar) -> Vec2,
    i: u64,
    steps: u64,
) {
    let t = i as Scalar / steps as Scalar;
    let current = curve(t);
    let halfway = curve((i as Scalar - 0.5) / steps as Scalar);
    let midpoint = (*prev + current) / 2.0;
    if (midpoint - halfway).length() >= MAX_ERROR {
        discretize(contour, prev, curve, i * 2 - 1, steps * 2);
        discretize(contour, prev, curve, i * 2, steps * 2);
    } else {
        push_segment(contour, *prev, current);
        *prev = current;
    }
}

/// Elliptic arc in center parameterization
struct ArcParams {
    radii: Vec2,
    rot_mat: Mat3,
    center: Vec2,
    theta: Scalar,
    delta: Scalar,
}

impl ArcParams {
    /// Convert an arc from endpoint to center parameterization
    ///
    /// Follows the arc implementation notes of the SVG specification
    /// (appendix F.6).
    fn new(
        at: Vec2,
        to: Vec2,
        rx: Scalar,
        ry: Scalar,
        rotation: Scalar,
        large: bool,
        sweep: bool,
    ) -> Option<Self> {
        let mut rx = rx.abs();
        let mut ry = ry.abs();
        let radians = rotation / 180.0 * PI;

        // Eq 5.1: midpoint in the rotated frame
        let Vec2([px, py]) = Mat3::rotation(-radians) * ((at - to) / 2.0);

        // scale radii up when the endpoints cannot be reached
        let ratio = px * px / (rx * rx) + py * py / (ry * ry);
        if ratio > 1.0 {
            let s = ratio.sqrt();
            rx *= s;
            ry *= s;
        }

        // Eq 5.2: center in the rotated frame
        let rx2 = rx * rx;
        let ry2 = ry * ry;
        let q = ((rx2 * ry2 - rx2 * py * py - ry2 * px * px) / (rx2 * py * py + ry2 * px * px))
            .max(0.0)
            .sqrt();
        let q = if large == sweep { -q } else { q };
        let cp = Vec2::new(q * rx * py / ry, -q * ry * px / rx);

        // Eq 5.3: center back in the original frame
        let center = Mat3::rotation(radians) * cp + (at + to) / 2.0;

        // Eq 5.5-6: start angle and signed sweep
        let v1 = Vec2::new((px - cp.x()) / rx, (py - cp.y()) / ry);
        let v2 = Vec2::new((-px - cp.x()) / rx, (-py - cp.y()) / ry);
        let theta = Vec2::new(1.0, 0.0).angle_between(v1)?;
        let mut delta = v1.angle_between(v2)?.rem_euclid(2.0 * PI);
        if !sweep {
            delta -= 2.0 * PI;
        }

        Some(Self {
            radii: Vec2::new(rx, ry),
            rot_mat: Mat3::rotation(radians),
            center,
            theta,
            delta,
        })
    }

    fn at(&self, t: Scalar) -> Vec2 {
        let (sin, cos) = (self.theta + t * self.delta).sin_cos();
        let Vec2([rx, ry]) = self.radii;
        self.center + self.rot_mat * Vec2::new(rx * cos, ry * sin)
    }
}

fn flatten_arc(
    contour: &mut Vec<Vec2>,
    at: Vec2,
    to: Vec2,
    rx: Scalar,
    ry: Scalar,
    rotation: Scalar,
    large: bool,
    sweep: bool,
) {
    if at == to {
        return;
    }
    // out of range radii degrade to a straight segment (SVG F.6.6)
    if rx == 0.0 || ry == 0.0 {
        push_segment(contour, at, to);
        return;
    }
    let arc = match ArcParams::new(at, to, rx, ry, rotation, large, sweep) {
        Some(arc) => arc,
        None => {
            push_segment(contour, at, to);
            return;
        }
    };
    let mut prev = at;
    discretize(contour, &mut prev, &|t| arc.at(t), 1, 1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert_approx_eq, parse_path, Path};

    fn flatten(data: &str) -> Vec<Vec<Vec2>> {
        let path = parse_path(data).unwrap();
        commands_to_polygons(path.commands()).unwrap()
    }

    #[test]
    fn test_flatten_square() {
        let polygons = flatten("M0 0 L10 0 L10 10 L0 10 Z");
        assert_eq!(
            polygons,
            vec![vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(10.0, 0.0),
                Vec2::new(10.0, 10.0),
                Vec2::new(0.0, 10.0),
                Vec2::new(0.0, 0.0),
            ]]
        );
    }

    #[test]
    fn test_flatten_relative() {
        let absolute = flatten("M1 1 L4 1 L4 5 Z");
        let relative = flatten("m1 1 l3 0 l0 4 z");
        assert_eq!(absolute, relative);

        let hv = flatten("M1 1 H4 V5 Z");
        assert_eq!(absolute, hv);
    }

    #[test]
    fn test_flatten_determinism() {
        let path: Path = "M0 0 C 5 10 15 10 20 0 Q 25 -10 30 0 A 5 5 0 0 1 40 0"
            .parse()
            .unwrap();
        let p0 = commands_to_polygons(path.commands()).unwrap();
        let p1 = commands_to_polygons(path.commands()).unwrap();
        assert_eq!(p0, p1);
    }

    #[test]
    fn test_flatten_quad() {
        let polygons = flatten("M0 0 Q 5 5 10 0");
        assert_eq!(polygons.len(), 1);
        let contour = &polygons[0];
        // second difference 100 gives five uniform steps
        assert_eq!(contour.len(), 6);
        assert_eq!(contour[0], Vec2::new(0.0, 0.0));
        assert_eq!(contour[5], Vec2::new(10.0, 0.0));
        assert_approx_eq!(contour[1].x(), 2.0, 1e-5);
        assert_approx_eq!(contour[1].y(), 1.6, 1e-5);

        // nearly straight quads collapse to a single segment
        let polygons = flatten("M0 0 Q 5 0.1 10 0");
        assert_eq!(polygons[0].len(), 2);
    }

    #[test]
    fn test_flatten_tquad_reflection() {
        // T after Q reflects the previous control point
        let chained = flatten("M0 0 Q 5 5 10 0 T 20 0");
        // the reflected control point is (15, -5)
        let explicit = flatten("M0 0 Q 5 5 10 0 Q 15 -5 20 0");
        assert_eq!(chained, explicit);

        // T without a previous quad uses the current point, a line
        let polygons = flatten("M0 0 T 10 0");
        assert_eq!(polygons[0], vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)]);
    }

    #[test]
    fn test_flatten_cubic() {
        let polygons = flatten("M0 0 C 0 10 10 10 10 0");
        assert_eq!(polygons.len(), 1);
        let contour = &polygons[0];
        assert!(contour.len() > 4);
        assert_eq!(contour[0], Vec2::new(0.0, 0.0));
        assert_eq!(*contour.last().unwrap(), Vec2::new(10.0, 0.0));
        // samples stay on the curve, the apex is at y = 7.5
        for point in contour {
            assert!(point.y() <= 7.5 + 1e-4);
        }
    }

    #[test]
    fn test_flatten_smooth_cubic() {
        // relative smooth cubic reflects the previous control point
        let smooth = flatten("M0 0 C 0 10 10 10 10 0 s 10 -10 10 0");
        let explicit = flatten("M0 0 C 0 10 10 10 10 0 C 10 -10 20 -10 20 0");
        assert_eq!(smooth, explicit);

        // absolute smooth cubic is not handled
        let path: Path = "M0 0 S 10 10 20 0".parse().unwrap();
        assert!(matches!(
            commands_to_polygons(path.commands()),
            Err(PathError::UnsupportedCommand {
                kind: PathCommandKind::SCubic
            })
        ));
    }

    #[test]
    fn test_flatten_arc() {
        let polygons = flatten("M0 0 A 5 5 0 0 1 10 0");
        assert_eq!(polygons.len(), 1);
        let contour = &polygons[0];
        assert_eq!(contour[0], Vec2::new(0.0, 0.0));
        let last = *contour.last().unwrap();
        assert_approx_eq!(last.x(), 10.0, 1e-3);
        assert_approx_eq!(last.y(), 0.0, 1e-3);
        // every sample stays on the circle of radius 5 around (5, 0)
        for point in contour {
            assert_approx_eq!((*point - Vec2::new(5.0, 0.0)).length(), 5.0, 1e-3);
        }

        // zero radius degrades to a straight segment
        let polygons = flatten("M0 0 A 0 5 0 0 1 10 0");
        assert_eq!(polygons[0], vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)]);
    }

    #[test]
    fn test_move_does_not_flush() {
        // a move without a preceding close keeps extending the same polygon
        let polygons = flatten("M0 0 L10 0 M0 5 L10 5");
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].len(), 4);

        // close flushes, the second subpath gets its own polygon
        let polygons = flatten("M0 0 L10 0 L10 10 Z M20 0 L30 0 L30 10 Z");
        assert_eq!(polygons.len(), 2);
    }

    #[test]
    fn test_close_with_quad() {
        // closing right after a quad closes with a quadratic using the
        // last control point
        let polygons = flatten("M0 0 L 10 0 Q 15 5 10 10 Z");
        let contour = &polygons[0];
        assert_eq!(*contour.last().unwrap(), Vec2::new(0.0, 0.0));
        // the closing quad produced intermediate samples
        assert!(contour.len() > 5);
    }

    #[test]
    fn test_trailing_polygon_flushed() {
        let polygons = flatten("M0 0 L10 0 L10 10");
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].len(), 3);
    }
}
