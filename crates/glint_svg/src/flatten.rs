//! Path flattening
//!
//! Curves are approximated by line segments using `lyon`'s flattening
//! iterator. The resulting [`Polyline`] can then be sampled by arc length,
//! which is how moving shapes follow a path at constant speed.

use glint_core::{Path, PathCommand, Point, Polyline};
use lyon::math::point;
use lyon::path::iterator::PathIterator;
use lyon::path::PathEvent;

use crate::error::SvgError;
use crate::path::parse_path_data;

/// Default flattening tolerance in user units
pub const DEFAULT_TOLERANCE: f32 = 0.05;

/// Flattened sample points of a path
pub type Trajectory = Polyline;

/// Converts SVG path data into a polyline
pub trait PathFlattener: Send + Sync {
    fn flatten(&self, data: &str) -> Result<Trajectory, SvgError>;
}

/// Flattens with `lyon` at a fixed tolerance
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LyonFlattener {
    tolerance: f32,
}

impl Default for LyonFlattener {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl LyonFlattener {
    /// Non-positive or non-finite tolerances fall back to the default
    pub fn new(tolerance: f32) -> Self {
        let tolerance = if tolerance.is_finite() && tolerance > 0.0 {
            tolerance
        } else {
            DEFAULT_TOLERANCE
        };
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Flatten an already parsed path
    pub fn flatten_path(&self, path: &Path) -> Result<Trajectory, SvgError> {
        let lyon_path = to_lyon(path);
        let mut points: Vec<Point> = Vec::new();

        for event in lyon_path.iter().flattened(self.tolerance) {
            match event {
                PathEvent::Begin { at } => points.push(Point::new(at.x, at.y)),
                PathEvent::Line { to, .. } => points.push(Point::new(to.x, to.y)),
                PathEvent::End { last, first, close } => {
                    if close && last != first {
                        points.push(Point::new(first.x, first.y));
                    }
                }
                // Flattening only yields lines
                PathEvent::Quadratic { to, .. } | PathEvent::Cubic { to, .. } => {
                    points.push(Point::new(to.x, to.y));
                }
            }
        }

        if points.is_empty() {
            return Err(SvgError::EmptyPath);
        }
        if !points.iter().all(Point::is_finite) {
            return Err(SvgError::Unsupported("non-finite coordinates".into()));
        }
        Ok(Polyline::new(points))
    }
}

impl PathFlattener for LyonFlattener {
    fn flatten(&self, data: &str) -> Result<Trajectory, SvgError> {
        let path = parse_path_data(data)?;
        let trajectory = self.flatten_path(&path)?;
        tracing::trace!(
            points = trajectory.len(),
            length = trajectory.length(),
            tolerance = self.tolerance,
            "flattened path"
        );
        Ok(trajectory)
    }
}

/// Convert a Glint path to a lyon path
fn to_lyon(path: &Path) -> lyon::path::Path {
    let mut builder = lyon::path::Path::builder();
    let mut open = false;
    let mut current = Point::ZERO;

    for command in path.commands() {
        match command {
            PathCommand::MoveTo(p) => {
                if open {
                    builder.end(false);
                }
                builder.begin(point(p.x, p.y));
                open = true;
                current = *p;
            }
            PathCommand::LineTo(p) => {
                if !open {
                    builder.begin(point(current.x, current.y));
                    open = true;
                }
                builder.line_to(point(p.x, p.y));
                current = *p;
            }
            PathCommand::QuadTo { control, end } => {
                if !open {
                    builder.begin(point(current.x, current.y));
                    open = true;
                }
                builder.quadratic_bezier_to(point(control.x, control.y), point(end.x, end.y));
                current = *end;
            }
            PathCommand::CubicTo {
                control1,
                control2,
                end,
            } => {
                if !open {
                    builder.begin(point(current.x, current.y));
                    open = true;
                }
                builder.cubic_bezier_to(
                    point(control1.x, control1.y),
                    point(control2.x, control2.y),
                    point(end.x, end.y),
                );
                current = *end;
            }
            PathCommand::Close => {
                if open {
                    builder.end(true);
                    open = false;
                }
            }
        }
    }
    if open {
        builder.end(false);
    }
    builder.build()
}
