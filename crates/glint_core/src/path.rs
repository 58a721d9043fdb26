//! Vector path types

use std::fmt::Write;

use crate::geometry::Point;

/// Path command for building vector paths
#[derive(Clone, Debug, PartialEq)]
pub enum PathCommand {
    /// Move to a point
    MoveTo(Point),
    /// Line to a point
    LineTo(Point),
    /// Quadratic Bézier curve
    QuadTo { control: Point, end: Point },
    /// Cubic Bézier curve
    CubicTo {
        control1: Point,
        control2: Point,
        end: Point,
    },
    /// Close the current subpath
    Close,
}

impl PathCommand {
    fn same_kind(&self, other: &PathCommand) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// A vector path
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    /// Create a new empty path
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Create a path from a vector of commands
    pub fn from_commands(commands: Vec<PathCommand>) -> Self {
        Self { commands }
    }

    /// Move to a point
    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::MoveTo(Point::new(x, y)));
        self
    }

    /// Line to a point
    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::LineTo(Point::new(x, y)));
        self
    }

    /// Quadratic Bézier curve
    pub fn quad_to(mut self, cx: f32, cy: f32, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::QuadTo {
            control: Point::new(cx, cy),
            end: Point::new(x, y),
        });
        self
    }

    /// Cubic Bézier curve
    pub fn cubic_to(mut self, cx1: f32, cy1: f32, cx2: f32, cy2: f32, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::CubicTo {
            control1: Point::new(cx1, cy1),
            control2: Point::new(cx2, cy2),
            end: Point::new(x, y),
        });
        self
    }

    /// Close the path
    pub fn close(mut self) -> Self {
        self.commands.push(PathCommand::Close);
        self
    }

    /// Get the path commands
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Check if the path is empty
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Whether both paths have the same command sequence
    ///
    /// Only paths with matching structure can be morphed point by point.
    pub fn is_compatible(&self, other: &Path) -> bool {
        self.commands.len() == other.commands.len()
            && self
                .commands
                .iter()
                .zip(&other.commands)
                .all(|(a, b)| a.same_kind(b))
    }

    /// Serialize to SVG path data (`d` attribute)
    pub fn to_svg_data(&self) -> String {
        let mut d = String::new();
        for cmd in &self.commands {
            if !d.is_empty() {
                d.push(' ');
            }
            // Writing into a String cannot fail
            let _ = match cmd {
                PathCommand::MoveTo(p) => write!(d, "M{},{}", fmt_num(p.x), fmt_num(p.y)),
                PathCommand::LineTo(p) => write!(d, "L{},{}", fmt_num(p.x), fmt_num(p.y)),
                PathCommand::QuadTo { control, end } => write!(
                    d,
                    "Q{},{} {},{}",
                    fmt_num(control.x),
                    fmt_num(control.y),
                    fmt_num(end.x),
                    fmt_num(end.y)
                ),
                PathCommand::CubicTo {
                    control1,
                    control2,
                    end,
                } => write!(
                    d,
                    "C{},{} {},{} {},{}",
                    fmt_num(control1.x),
                    fmt_num(control1.y),
                    fmt_num(control2.x),
                    fmt_num(control2.y),
                    fmt_num(end.x),
                    fmt_num(end.y)
                ),
                PathCommand::Close => write!(d, "Z"),
            };
        }
        d
    }
}

/// Format a coordinate with at most three decimals and no trailing zeros
pub fn fmt_num(v: f32) -> String {
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_data() {
        let path = Path::new()
            .move_to(10.0, 10.0)
            .line_to(20.5, 10.0)
            .cubic_to(1.0, 2.0, 3.0, 4.0, 5.0, 6.0)
            .close();
        assert_eq!(path.to_svg_data(), "M10,10 L20.5,10 C1,2 3,4 5,6 Z");
    }

    #[test]
    fn test_compatibility() {
        let a = Path::new().move_to(0.0, 0.0).line_to(1.0, 1.0);
        let b = Path::new().move_to(5.0, 5.0).line_to(9.0, 9.0);
        let c = Path::new().move_to(5.0, 5.0).quad_to(1.0, 1.0, 9.0, 9.0);
        assert!(a.is_compatible(&b));
        assert!(!a.is_compatible(&c));
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(1.0), "1");
        assert_eq!(fmt_num(62.8318), "62.832");
        assert_eq!(fmt_num(-0.0001), "0");
    }
}
