//! Path commands and the canvas style path builder
use crate::{clamp, parse_path, scalar_fmt, Scalar, Vec2, PI};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Errors produced by path operations
#[derive(Debug)]
pub enum PathError {
    /// Path data failed to parse
    InvalidPath { reason: String, offset: usize },
    /// Builder operation that is documented but not implemented yet
    NotImplemented { what: &'static str },
    /// Flattener encountered a command kind it does not handle
    UnsupportedCommand { kind: PathCommandKind },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for std::io::Error {
    fn from(error: PathError) -> Self {
        Self::new(std::io::ErrorKind::InvalidData, error)
    }
}

/// Kind of an SVG path command
///
/// The `R` prefixed variants are the relative (lowercase) forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathCommandKind {
    Close,
    Move,
    RMove,
    Line,
    RLine,
    HLine,
    RHLine,
    VLine,
    RVLine,
    Cubic,
    RCubic,
    SCubic,
    RSCubic,
    Quad,
    RQuad,
    TQuad,
    RTQuad,
    Arc,
    RArc,
}

impl PathCommandKind {
    /// Number of parameters a single command of this kind takes
    pub fn arity(self) -> usize {
        use PathCommandKind::*;
        match self {
            Close => 0,
            HLine | RHLine | VLine | RVLine => 1,
            Move | RMove | Line | RLine | TQuad | RTQuad => 2,
            SCubic | RSCubic | Quad | RQuad => 4,
            Cubic | RCubic => 6,
            Arc | RArc => 7,
        }
    }

    /// Command letter used in SVG path data
    pub fn letter(self) -> char {
        use PathCommandKind::*;
        match self {
            Close => 'Z',
            Move => 'M',
            RMove => 'm',
            Line => 'L',
            RLine => 'l',
            HLine => 'H',
            RHLine => 'h',
            VLine => 'V',
            RVLine => 'v',
            Cubic => 'C',
            RCubic => 'c',
            SCubic => 'S',
            RSCubic => 's',
            Quad => 'Q',
            RQuad => 'q',
            TQuad => 'T',
            RTQuad => 't',
            Arc => 'A',
            RArc => 'a',
        }
    }

    /// Map an SVG command letter to the command kind
    pub fn from_letter(letter: u8) -> Option<Self> {
        use PathCommandKind::*;
        let kind = match letter {
            b'Z' | b'z' => Close,
            b'M' => Move,
            b'm' => RMove,
            b'L' => Line,
            b'l' => RLine,
            b'H' => HLine,
            b'h' => RHLine,
            b'V' => VLine,
            b'v' => RVLine,
            b'C' => Cubic,
            b'c' => RCubic,
            b'S' => SCubic,
            b's' => RSCubic,
            b'Q' => Quad,
            b'q' => RQuad,
            b'T' => TQuad,
            b't' => RTQuad,
            b'A' => Arc,
            b'a' => RArc,
            _ => return None,
        };
        Some(kind)
    }
}

/// Single path command with its parameters
///
/// `numbers` always holds exactly `kind.arity()` values, one command
/// corresponds to one invocation even where SVG path data allows implicit
/// repetition.
#[derive(Debug, Clone, PartialEq)]
pub struct PathCommand {
    pub kind: PathCommandKind,
    pub numbers: Vec<Scalar>,
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.letter())?;
        for number in self.numbers.iter() {
            write!(f, " ")?;
            scalar_fmt(f, *number)?;
        }
        Ok(())
    }
}

/// SVG style path, an ordered list of commands plus the builder pen position
///
/// The pen position is a property of the builder interface only, the
/// flattener recomputes positions from the commands themselves.
#[derive(Clone, PartialEq, Default)]
pub struct Path {
    at: Vec2,
    commands: Vec<PathCommand>,
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, command) in self.commands.iter().enumerate() {
            if index != 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", command)?;
        }
        Ok(())
    }
}

impl Path {
    /// Create empty path
    pub fn new() -> Self {
        Self::default()
    }

    /// Create path from a prepared command list
    pub fn from_commands(commands: Vec<PathCommand>) -> Self {
        Self {
            at: Vec2::default(),
            commands,
        }
    }

    /// Commands of the path
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Check if the path contains no commands
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Current pen position of the builder
    pub fn position(&self) -> Vec2 {
        self.at
    }

    pub(crate) fn push(&mut self, command: PathCommand) {
        self.commands.push(command);
    }

    fn push_cmd(&mut self, kind: PathCommandKind, numbers: Vec<Scalar>) {
        self.commands.push(PathCommand { kind, numbers });
    }

    /// Move the pen, starting a new subpath
    pub fn move_to(&mut self, x: Scalar, y: Scalar) -> &mut Self {
        self.push_cmd(PathCommandKind::Move, vec![x, y]);
        self.at = Vec2::new(x, y);
        self
    }

    /// Add a straight line from the pen to the given point
    pub fn line_to(&mut self, x: Scalar, y: Scalar) -> &mut Self {
        self.push_cmd(PathCommandKind::Line, vec![x, y]);
        self.at = Vec2::new(x, y);
        self
    }

    /// Close the current subpath
    pub fn close_path(&mut self) -> &mut Self {
        self.push_cmd(PathCommandKind::Close, Vec::new());
        self
    }

    /// Add a cubic bezier curve with two control points
    pub fn bezier_curve_to(
        &mut self,
        x1: Scalar,
        y1: Scalar,
        x2: Scalar,
        y2: Scalar,
        x3: Scalar,
        y3: Scalar,
    ) -> &mut Self {
        self.push_cmd(PathCommandKind::Cubic, vec![x1, y1, x2, y2, x3, y3]);
        self.at = Vec2::new(x3, y3);
        self
    }

    /// Add a quadratic bezier curve
    pub fn quadratic_curve_to(&mut self) -> Result<&mut Self, PathError> {
        Err(PathError::NotImplemented {
            what: "quadratic_curve_to",
        })
    }

    /// Add a circular arc
    pub fn arc(&mut self) -> Result<&mut Self, PathError> {
        Err(PathError::NotImplemented { what: "arc" })
    }

    /// Add an elliptic arc
    pub fn ellipse(&mut self) -> Result<&mut Self, PathError> {
        Err(PathError::NotImplemented { what: "ellipse" })
    }

    /// Add a rectangle traced clockwise from `(x, y)`
    pub fn rect(&mut self, x: Scalar, y: Scalar, w: Scalar, h: Scalar) -> &mut Self {
        self.move_to(x, y)
            .line_to(x + w, y)
            .line_to(x + w, y + h)
            .line_to(x, y + h)
            .line_to(x, y)
            .close_path()
    }

    /// Add a circular arc of the given radius tangent to the rays
    /// `pen -> (x1, y1)` and `(x1, y1) -> (x2, y2)`
    pub fn arc_to(
        &mut self,
        x1: Scalar,
        y1: Scalar,
        x2: Scalar,
        y2: Scalar,
        radius: Scalar,
    ) -> &mut Self {
        const EPS: Scalar = 1e-6;
        let Vec2([x0, y0]) = self.at;
        let (x21, y21) = (x2 - x1, y2 - y1);
        let (x01, y01) = (x0 - x1, y0 - y1);
        let l01_2 = x01 * x01 + y01 * y01;

        if l01_2 < EPS {
            // pen sits on the corner point, there is nothing to bend around
            return self.move_to(x1, y1);
        }
        if radius == 0.0 || (y01 * x21 - y21 * x01).abs() < EPS {
            // zero radius or collinear points degrade to a line
            return self.line_to(x1, y1);
        }

        let (x20, y20) = (x2 - x0, y2 - y0);
        let l21_2 = x21 * x21 + y21 * y21;
        let l20_2 = x20 * x20 + y20 * y20;
        let l21 = l21_2.sqrt();
        let l01 = l01_2.sqrt();
        // tangent distance from the corner by the law of cosines
        let cos = clamp((l21_2 + l01_2 - l20_2) / (2.0 * l21 * l01), -1.0, 1.0);
        let tangent = radius * ((PI - cos.acos()) / 2.0).tan();
        let t01 = tangent / l01;
        let t21 = tangent / l21;

        if (t01 - 1.0).abs() > EPS {
            self.line_to(x1 + t01 * x01, y1 + t01 * y01);
        }
        let sweep = y01 * x20 > x01 * y20;
        let to = Vec2::new(x1 + t21 * x21, y1 + t21 * y21);
        self.push_cmd(
            PathCommandKind::Arc,
            vec![
                radius,
                radius,
                0.0,
                0.0,
                if sweep { 1.0 } else { 0.0 },
                to.x(),
                to.y(),
            ],
        );
        self.at = to;
        self
    }

    /// Draw an n-sided regular polygon at `(x, y)` with the given size
    // FIXME: arguments are ignored, the polygon is always drawn at
    // (100, 100) with size 80
    #[allow(unused_variables)]
    pub fn polygon(&mut self, x: Scalar, y: Scalar, size: Scalar, sides: usize) -> &mut Self {
        let (x, y, size) = (100.0, 100.0, 80.0);
        self.move_to(x + size, y);
        for side in 1..=sides {
            let angle = side as Scalar * 2.0 * PI / sides as Scalar;
            self.line_to(x + size * angle.cos(), y + size * angle.sin());
        }
        self
    }

    /// Append all commands of the other path
    pub fn add_path(&mut self, other: &Path) -> &mut Self {
        self.commands.extend(other.commands.iter().cloned());
        self
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(text: &str) -> Result<Path, Self::Err> {
        parse_path(text)
    }
}

#[cfg(feature = "serde")]
impl Serialize for Path {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Path {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        std::borrow::Cow::<'de, str>::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;
    use PathCommandKind::*;

    fn kinds(path: &Path) -> Vec<PathCommandKind> {
        path.commands().iter().map(|cmd| cmd.kind).collect()
    }

    #[test]
    fn test_rect() {
        let mut path = Path::new();
        path.rect(10.0, 10.0, 20.0, 20.0);
        assert_eq!(kinds(&path), vec![Move, Line, Line, Line, Line, Close]);
        assert_eq!(path.commands()[2].numbers, vec![30.0, 30.0]);
        assert_eq!(path.position(), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_arc_to() {
        let mut path = Path::new();
        path.move_to(-10.0, 0.0).arc_to(10.0, 0.0, 10.0, 10.0, 5.0);
        assert_eq!(kinds(&path), vec![Move, Line, Arc]);
        // line to the first tangent point
        assert_approx_eq!(path.commands()[1].numbers[0], 5.0, 1e-4);
        assert_eq!(path.commands()[1].numbers[1], 0.0);
        // arc of radius 5 sweeping to the second tangent point
        let arc = &path.commands()[2].numbers;
        assert_approx_eq!(arc[0], 5.0);
        assert_approx_eq!(arc[1], 5.0);
        assert_eq!(arc[3], 0.0);
        assert_eq!(arc[4], 1.0);
        assert_approx_eq!(arc[5], 10.0, 1e-4);
        assert_approx_eq!(arc[6], 5.0, 1e-4);
        assert_approx_eq!(path.position().x(), 10.0, 1e-4);
        assert_approx_eq!(path.position().y(), 5.0, 1e-4);
    }

    #[test]
    fn test_arc_to_degenerate() {
        // collinear points degrade to a line
        let mut path = Path::new();
        path.move_to(0.0, 0.0).arc_to(5.0, 0.0, 10.0, 0.0, 1.0);
        assert_eq!(kinds(&path), vec![Move, Line]);
        assert_eq!(path.commands()[1].numbers, vec![5.0, 0.0]);

        // zero radius degrades to a line
        let mut path = Path::new();
        path.move_to(0.0, 0.0).arc_to(5.0, 5.0, 10.0, 0.0, 0.0);
        assert_eq!(kinds(&path), vec![Move, Line]);

        // pen on the corner point starts a new subpath
        let mut path = Path::new();
        path.move_to(3.0, 4.0).arc_to(3.0, 4.0, 10.0, 0.0, 1.0);
        assert_eq!(kinds(&path), vec![Move, Move]);
    }

    #[test]
    fn test_not_implemented() {
        let mut path = Path::new();
        path.move_to(1.0, 2.0);
        assert!(matches!(
            path.quadratic_curve_to(),
            Err(PathError::NotImplemented { .. })
        ));
        assert!(matches!(path.arc(), Err(PathError::NotImplemented { .. })));
        assert!(matches!(
            path.ellipse(),
            Err(PathError::NotImplemented { .. })
        ));
        // failed builder calls leave the command list unchanged
        assert_eq!(kinds(&path), vec![Move]);
    }

    #[test]
    fn test_polygon_ignores_arguments() {
        let mut p0 = Path::new();
        let mut p1 = Path::new();
        p0.polygon(0.0, 0.0, 10.0, 6);
        p1.polygon(500.0, 500.0, 3.0, 6);
        assert_eq!(p0.commands(), p1.commands());
        assert_eq!(p0.commands()[0].numbers, vec![180.0, 100.0]);
    }

    #[test]
    fn test_add_path() {
        let mut p0 = Path::new();
        p0.move_to(0.0, 0.0).line_to(1.0, 1.0);
        let mut p1 = Path::new();
        p1.rect(0.0, 0.0, 1.0, 1.0);
        p0.add_path(&p1);
        assert_eq!(p0.commands().len(), 2 + 6);
    }

    #[test]
    fn test_display() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0)
            .line_to(10.0, 0.5)
            .close_path();
        assert_eq!(path.to_string(), "M 0 0 L 10 0.5 Z");
    }
}
