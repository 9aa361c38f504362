use std::{
    fmt,
    ops::{Add, Div, Mul, Neg, Sub},
};

pub type Scalar = f32;
pub const EPSILON: Scalar = f32::EPSILON;
pub const PI: Scalar = std::f32::consts::PI;

/// Format scalars in a compact way suitable for SVG path data
pub fn scalar_fmt(f: &mut fmt::Formatter<'_>, value: Scalar) -> fmt::Result {
    if value.fract() == 0.0 {
        write!(f, "{}", value as i64)
    } else {
        write!(f, "{}", value)
    }
}

/// Value representing a 2D point or vector.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct Vec2(pub [Scalar; 2]);

impl fmt::Debug for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Vec2([x, y]) = self;
        scalar_fmt(f, *x)?;
        write!(f, ",")?;
        scalar_fmt(f, *y)
    }
}

impl Vec2 {
    #[inline]
    pub fn new(x: Scalar, y: Scalar) -> Self {
        Self([x, y])
    }

    /// Get `x` component of the point
    #[inline]
    pub fn x(self) -> Scalar {
        self.0[0]
    }

    /// Get `y` component of the point
    #[inline]
    pub fn y(self) -> Scalar {
        self.0[1]
    }

    /// Get length of the vector (distance from the origin)
    pub fn length(self) -> Scalar {
        let Self([x, y]) = self;
        x.hypot(y)
    }

    /// Dot product between two vectors
    pub fn dot(self, other: Self) -> Scalar {
        let Self([x0, y0]) = self;
        let Self([x1, y1]) = other;
        x0 * x1 + y0 * y1
    }

    /// Cross product between two vectors
    pub fn cross(self, other: Self) -> Scalar {
        let Self([x0, y0]) = self;
        let Self([x1, y1]) = other;
        x0 * y1 - y0 * x1
    }

    /// Convert vector to a unit size vector, if length is not zero
    pub fn normalize(self) -> Option<Vec2> {
        let Self([x, y]) = self;
        let length = self.length();
        if length < EPSILON {
            None
        } else {
            Some(Self([x / length, y / length]))
        }
    }

    /// Linear interpolation between self and the other point
    pub fn lerp(self, other: Self, t: Scalar) -> Self {
        (1.0 - t) * self + t * other
    }

    /// Cosine of the angle (from self to the other) between two vectors
    pub fn cos_between(self, other: Self) -> Option<Scalar> {
        let lengths = self.length() * other.length();
        if lengths < EPSILON {
            None
        } else {
            Some(self.dot(other) / lengths)
        }
    }

    /// Calculate signed angle (from self to the other) between two vectors
    pub fn angle_between(self, other: Self) -> Option<Scalar> {
        let angle = crate::clamp(self.cos_between(other)?, -1.0, 1.0).acos();
        if self.cross(other) < 0.0 {
            Some(-angle)
        } else {
            Some(angle)
        }
    }
}

impl From<(Scalar, Scalar)> for Vec2 {
    #[inline]
    fn from(xy: (Scalar, Scalar)) -> Self {
        Self([xy.0, xy.1])
    }
}

impl Mul<Vec2> for Scalar {
    type Output = Vec2;

    #[inline]
    fn mul(self, other: Vec2) -> Self::Output {
        let Vec2([x, y]) = other;
        Vec2([self * x, self * y])
    }
}

impl Mul<Scalar> for Vec2 {
    type Output = Vec2;

    #[inline]
    fn mul(self, rhs: Scalar) -> Self::Output {
        let Vec2([x, y]) = self;
        Vec2([x * rhs, y * rhs])
    }
}

impl Div<Scalar> for Vec2 {
    type Output = Vec2;

    #[inline]
    fn div(self, rhs: Scalar) -> Self::Output {
        let Vec2([x, y]) = self;
        Vec2([x / rhs, y / rhs])
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    #[inline]
    fn add(self, other: Vec2) -> Self::Output {
        let Vec2([x0, y0]) = self;
        let Vec2([x1, y1]) = other;
        Vec2([x0 + x1, y0 + y1])
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    #[inline]
    fn sub(self, other: Vec2) -> Self::Output {
        let Vec2([x0, y0]) = self;
        let Vec2([x1, y1]) = other;
        Vec2([x0 - x1, y0 - y1])
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    #[inline]
    fn neg(self) -> Self::Output {
        let Vec2([x, y]) = self;
        Vec2([-x, -y])
    }
}

/// Square 3x3 matrix, used as a 2D affine transform
///
/// Stored in row-major order, points are transformed as columns `[x, y, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3(pub [Scalar; 9]);

impl Default for Mat3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat3 {
    pub fn identity() -> Self {
        Self([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0])
    }

    /// Rotation around the origin by `angle` radians
    pub fn rotation(angle: Scalar) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self([cos, -sin, 0.0, sin, cos, 0.0, 0.0, 0.0, 1.0])
    }

    /// Translation by `[tx, ty]`
    pub fn translation(tx: Scalar, ty: Scalar) -> Self {
        Self([1.0, 0.0, tx, 0.0, 1.0, ty, 0.0, 0.0, 1.0])
    }
}

impl Mul<Mat3> for Mat3 {
    type Output = Mat3;

    fn mul(self, other: Mat3) -> Self::Output {
        let Mat3(a) = self;
        let Mat3(b) = other;
        let mut out = [0.0; 9];
        for i in 0..3 {
            for j in 0..3 {
                for k in 0..3 {
                    out[k + 3 * i] += a[j + 3 * i] * b[k + 3 * j];
                }
            }
        }
        Mat3(out)
    }
}

impl Mul<Vec2> for Mat3 {
    type Output = Vec2;

    fn mul(self, point: Vec2) -> Self::Output {
        let Mat3(m) = self;
        let Vec2([x, y]) = point;
        Vec2([m[0] * x + m[1] * y + m[2], m[3] * x + m[4] * y + m[5]])
    }
}

/// Directed line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub at: Vec2,
    pub to: Vec2,
}

impl Segment {
    pub fn new(at: impl Into<Vec2>, to: impl Into<Vec2>) -> Self {
        Self {
            at: at.into(),
            to: to.into(),
        }
    }

    /// Length of the segment
    pub fn length(&self) -> Scalar {
        (self.to - self.at).length()
    }

    /// Find the crossing point of the segment with the unbounded
    /// horizontal line at `y`
    ///
    /// The segment is treated as half-open, a hit exactly at the `to`
    /// endpoint is not reported. Horizontal segments never cross.
    pub fn intersect_horizontal(&self, y: Scalar) -> Option<Vec2> {
        let Vec2([x0, y0]) = self.at;
        let Vec2([x1, y1]) = self.to;
        if y0 == y1 {
            return None;
        }
        let t = (y - y0) / (y1 - y0);
        if (0.0..1.0).contains(&t) {
            Some(Vec2::new(x0 + t * (x1 - x0), y))
        } else {
            None
        }
    }

    /// Find the crossing point of two segments
    ///
    /// Both segments are treated as half-open, a hit exactly at the `to`
    /// endpoint of either segment is not reported.
    pub fn intersect(&self, other: Segment) -> Option<Vec2> {
        let Vec2([d0x, d0y]) = self.to - self.at;
        let Vec2([d1x, d1y]) = other.to - other.at;
        let det = -d1x * d0y + d0x * d1y;
        if det == 0.0 {
            return None;
        }
        let Vec2([dx, dy]) = self.at - other.at;
        let s = (-d0y * dx + d0x * dy) / det;
        let t = (d1x * dy - d1y * dx) / det;
        if (0.0..1.0).contains(&s) && (0.0..1.0).contains(&t) {
            Some(Vec2::new(self.at.x() + t * d0x, self.at.y() + t * d0y))
        } else {
            None
        }
    }
}

/// Axis-aligned rectangle given by its origin and size
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub xy: Vec2,
    pub wh: Vec2,
}

impl Rect {
    pub fn new(xy: impl Into<Vec2>, wh: impl Into<Vec2>) -> Self {
        Self {
            xy: xy.into(),
            wh: wh.into(),
        }
    }
}
