//! Animatable value types
//!
//! Provides the interpolation trait and its implementations for the values
//! tweens write into a surface.

use glint_core::{AttrValue, Color, Path, PathCommand, Point};

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t
    ///
    /// `t` may leave 0.0..=1.0 for overshooting eases.
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Interpolate for Point {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Point::lerp(self, *other, t)
    }
}

impl Interpolate for Color {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Color::lerp(self, other, t)
    }
}

/// Morph between two paths point by point
///
/// Paths with different command structure cannot be morphed; the value then
/// switches to `other` when `t` reaches 1.
impl Interpolate for Path {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        if !self.is_compatible(other) {
            return if t >= 1.0 { other.clone() } else { self.clone() };
        }

        let p = |a: &Point, b: &Point| Interpolate::lerp(a, b, t);
        let commands = self
            .commands()
            .iter()
            .zip(other.commands())
            .map(|pair| match pair {
                (PathCommand::MoveTo(a), PathCommand::MoveTo(b)) => PathCommand::MoveTo(p(a, b)),
                (PathCommand::LineTo(a), PathCommand::LineTo(b)) => PathCommand::LineTo(p(a, b)),
                (
                    PathCommand::QuadTo { control, end },
                    PathCommand::QuadTo {
                        control: c2,
                        end: e2,
                    },
                ) => PathCommand::QuadTo {
                    control: p(control, c2),
                    end: p(end, e2),
                },
                (
                    PathCommand::CubicTo {
                        control1,
                        control2,
                        end,
                    },
                    PathCommand::CubicTo {
                        control1: o1,
                        control2: o2,
                        end: oe,
                    },
                ) => PathCommand::CubicTo {
                    control1: p(control1, o1),
                    control2: p(control2, o2),
                    end: p(end, oe),
                },
                (a, _) => a.clone(),
            })
            .collect();

        Path::from_commands(commands)
    }
}

impl Interpolate for AttrValue {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        match (self, other) {
            (AttrValue::Number(a), AttrValue::Number(b)) => {
                AttrValue::Number(Interpolate::lerp(a, b, t))
            }
            (AttrValue::Color(a), AttrValue::Color(b)) => AttrValue::Color(Color::lerp(a, b, t)),
            (AttrValue::Path(a), AttrValue::Path(b)) => AttrValue::Path(a.lerp(b, t)),
            // Flags and mismatched values are discrete
            _ => {
                if t >= 1.0 {
                    other.clone()
                } else {
                    self.clone()
                }
            }
        }
    }
}
