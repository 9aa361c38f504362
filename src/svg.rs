//! SVG path data parser
//!
//! See [SVG Path Specification](https://www.w3.org/TR/SVG11/paths.html#PathData)
use crate::{Path, PathCommand, PathCommandKind, PathError, Scalar};

/// Parse SVG path data into a path
///
/// Implicit parameter repetition is expanded, `L 1,2 3,4` produces two
/// `Line` commands so that one command always holds one invocation worth
/// of parameters.
pub fn parse_path(data: &str) -> Result<Path, PathError> {
    SvgPathParser::new(data).parse()
}

/// Parser state for SVG encoded path data
#[derive(Debug)]
struct SvgPathParser<'a> {
    // unparsed path data
    text: &'a [u8],
    // kind of the command being accumulated
    kind: PathCommandKind,
    // parameters collected since the last command letter
    numbers: Vec<Scalar>,
    // start offset of the number under construction
    number_start: usize,
    // false until the first command letter has been seen
    armed: bool,
    // output path
    path: Path,
}

impl<'a> SvgPathParser<'a> {
    fn new(data: &'a str) -> Self {
        Self {
            text: data.as_bytes(),
            kind: PathCommandKind::Close,
            numbers: Vec::new(),
            number_start: 0,
            armed: false,
            path: Path::new(),
        }
    }

    // finish the number under construction, if any
    fn finish_number(&mut self, end: usize) -> Result<(), PathError> {
        if self.number_start >= end {
            return Ok(());
        }
        let offset = self.number_start;
        let token = std::str::from_utf8(&self.text[offset..end]).map_err(|_| {
            PathError::InvalidPath {
                reason: "path data is not valid utf-8".to_string(),
                offset,
            }
        })?;
        let value = token
            .parse::<Scalar>()
            .map_err(|_| PathError::InvalidPath {
                reason: format!("invalid number {:?}", token),
                offset,
            })?;
        self.numbers.push(value);
        Ok(())
    }

    // emit commands accumulated for the current kind
    fn finish_command(&mut self, offset: usize) -> Result<(), PathError> {
        if !self.armed {
            return Ok(());
        }
        let arity = self.kind.arity();
        if arity == 0 {
            if !self.numbers.is_empty() {
                return Err(PathError::InvalidPath {
                    reason: format!("{} takes no parameters", self.kind.letter()),
                    offset,
                });
            }
            self.path.push(PathCommand {
                kind: self.kind,
                numbers: Vec::new(),
            });
        } else {
            if self.numbers.is_empty() || self.numbers.len() % arity != 0 {
                return Err(PathError::InvalidPath {
                    reason: format!(
                        "{} takes a multiple of {} parameters, got {}",
                        self.kind.letter(),
                        arity,
                        self.numbers.len()
                    ),
                    offset,
                });
            }
            for chunk in self.numbers.chunks(arity) {
                self.path.push(PathCommand {
                    kind: self.kind,
                    numbers: chunk.to_vec(),
                });
            }
        }
        Ok(())
    }

    fn parse(mut self) -> Result<Path, PathError> {
        for offset in 0..self.text.len() {
            let byte = self.text[offset];
            match byte {
                b' ' | b'\t' | b'\r' | b'\n' | b',' => {
                    self.finish_number(offset)?;
                    self.number_start = offset + 1;
                }
                b'+' | b'-' => {
                    // a sign starts a new number unless it is the exponent
                    // sign of scientific notation
                    if offset > self.number_start
                        && !matches!(self.text[offset - 1], b'e' | b'E')
                    {
                        self.finish_number(offset)?;
                        self.number_start = offset;
                    }
                }
                _ => {
                    if let Some(kind) = PathCommandKind::from_letter(byte) {
                        self.finish_number(offset)?;
                        self.number_start = offset + 1;
                        self.finish_command(offset)?;
                        self.kind = kind;
                        self.numbers.clear();
                        self.armed = true;
                    }
                    // everything else is part of the number under
                    // construction and is validated when it finishes
                }
            }
        }
        self.finish_number(self.text.len())?;
        self.finish_command(self.text.len())?;
        Ok(self.path)
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
    fn test_parse_empty() {
        let path = parse_path("").unwrap();
        assert!(path.is_empty());
        let path = parse_path("   \n\t ").unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn test_parse_repetition() {
        let path = parse_path("M 0 0 L 1 2 3 4").unwrap();
        assert_eq!(kinds(&path), vec![Move, Line, Line]);
        assert_eq!(path.commands()[1].numbers, vec![1.0, 2.0]);
        assert_eq!(path.commands()[2].numbers, vec![3.0, 4.0]);

        // repeated moves share the move kind
        let path = parse_path("M.5-3-11-.11").unwrap();
        assert_eq!(kinds(&path), vec![Move, Move]);
        assert_eq!(path.commands()[0].numbers, vec![0.5, -3.0]);
        assert_eq!(path.commands()[1].numbers, vec![-11.0, -0.11]);
    }

    #[test]
    fn test_parse_scientific() {
        let path = parse_path("M1e2 -1.5e-1 L 0,0").unwrap();
        assert_eq!(kinds(&path), vec![Move, Line]);
        assert_approx_eq!(path.commands()[0].numbers[0], 100.0);
        assert_approx_eq!(path.commands()[0].numbers[1], -0.15);
        assert_eq!(path.commands()[1].numbers, vec![0.0, 0.0]);
    }

    #[test]
    fn test_parse_arc_flags() {
        let path = parse_path("M 0 0 A 5 5 0 0 1 10 0").unwrap();
        assert_eq!(kinds(&path), vec![Move, Arc]);
        assert_eq!(
            path.commands()[1].numbers,
            vec![5.0, 5.0, 0.0, 0.0, 1.0, 10.0, 0.0]
        );
    }

    #[test]
    fn test_parse_errors() {
        // wrong parameter count
        assert!(matches!(
            parse_path("L 1 2 3"),
            Err(PathError::InvalidPath { .. })
        ));
        // command without parameters
        assert!(matches!(
            parse_path("M"),
            Err(PathError::InvalidPath { .. })
        ));
        // close with parameters
        assert!(matches!(
            parse_path("M 0 0 Z 1"),
            Err(PathError::InvalidPath { .. })
        ));
        // unknown letters break number parsing
        assert!(matches!(
            parse_path("M 0 0 X 1 2"),
            Err(PathError::InvalidPath { .. })
        ));
        // malformed number
        assert!(matches!(
            parse_path("M 1..2 0"),
            Err(PathError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_roundtrip() {
        let source = "M 0 0 L 10 0 Q 15 5 10 10 C 5 15 0 15 0 10 Z m 1 1 a 2 2 0 0 1 4 0 Z";
        let path: Path = source.parse().unwrap();
        assert_eq!(path.to_string(), source);
        let reparsed: Path = path.to_string().parse().unwrap();
        assert_eq!(path.commands(), reparsed.commands());
    }
}
