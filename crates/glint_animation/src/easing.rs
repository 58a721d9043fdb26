//! Easing curves
//!
//! Maps linear progress (0.0 to 1.0) to eased progress. Besides the usual
//! polynomial curves this includes CSS-style cubic Bézier curves and a
//! "slow motion" curve that eases in, runs linearly through the middle, and
//! eases out.

use crate::error::EasingError;
use crate::plugins;

/// Default overshoot for [`Easing::BackOut`]
pub const BACK_OVERSHOOT: f32 = 1.70158;

/// An easing curve
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    /// Overshoots the target before settling
    BackOut { overshoot: f32 },
    /// Cubic Bézier through (0,0), (x1,y1), (x2,y2), (1,1)
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
    /// Fast at both ends, linear through `linear_ratio` of the middle
    SlowMo { linear_ratio: f32, power: f32 },
}

impl Easing {
    pub const fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Easing::CubicBezier { x1, y1, x2, y2 }
    }

    pub const fn back_out() -> Self {
        Easing::BackOut {
            overshoot: BACK_OVERSHOOT,
        }
    }

    pub const fn slow_mo(linear_ratio: f32, power: f32) -> Self {
        Easing::SlowMo {
            linear_ratio,
            power,
        }
    }

    /// Build a cubic Bézier ease from single-segment SVG path data
    ///
    /// The path must be of the form `M0,0 C x1,y1 x2,y2 1,1`.
    pub fn custom(data: &str) -> Result<Self, EasingError> {
        let invalid = || EasingError::InvalidCurve(data.to_string());

        let trimmed = data.trim();
        if !trimmed.starts_with(|c: char| c == 'M' || c == 'm')
            || !trimmed.contains(|c: char| c == 'C' || c == 'c')
        {
            return Err(invalid());
        }

        let numbers = trimmed
            .split(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == 'e'))
            .filter(|s| !s.is_empty())
            .map(str::parse::<f32>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;

        match numbers.as_slice() {
            [sx, sy, x1, y1, x2, y2, ex, ey]
                if *sx == 0.0 && *sy == 0.0 && *ex == 1.0 && *ey == 1.0 =>
            {
                Ok(Easing::cubic_bezier(*x1, *y1, *x2, *y2))
            }
            _ => Err(invalid()),
        }
    }

    /// Look up an ease registered with [`plugins::register_ease`]
    pub fn named(name: &str) -> Result<Self, EasingError> {
        plugins::lookup(name).ok_or_else(|| EasingError::UnknownEase(name.to_string()))
    }

    /// Apply the curve to linear progress `t`
    ///
    /// Input is clamped to 0.0..=1.0; output may leave that range for
    /// overshooting curves.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::BackOut { overshoot } => {
                let c3 = overshoot + 1.0;
                let u = t - 1.0;
                1.0 + c3 * u.powi(3) + overshoot * u.powi(2)
            }
            Easing::CubicBezier { x1, y1, x2, y2 } => {
                if t <= 0.0 || t >= 1.0 {
                    return t;
                }
                UnitBezier::new(x1, y1, x2, y2).solve(t)
            }
            Easing::SlowMo {
                linear_ratio,
                power,
            } => slow_mo(t, linear_ratio, power),
        }
    }
}

fn slow_mo(t: f32, linear_ratio: f32, power: f32) -> f32 {
    let ratio = linear_ratio.clamp(0.0, 1.0);
    let power = if ratio < 1.0 { power } else { 0.0 };
    let edge = (1.0 - ratio) / 2.0;
    let linear_end = edge + ratio;

    let r = t + (0.5 - t) * power;
    if t < edge {
        let p = 1.0 - t / edge;
        r - p * p * p * p * r
    } else if t > linear_end {
        let p = (t - linear_end) / edge;
        r + (t - r) * p * p * p * p
    } else {
        r
    }
}

/// Cubic Bézier timing curve solver
struct UnitBezier {
    ax: f32,
    bx: f32,
    cx: f32,
    ay: f32,
    by: f32,
    cy: f32,
}

impl UnitBezier {
    fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        let cx = 3.0 * x1;
        let bx = 3.0 * (x2 - x1) - cx;
        let ax = 1.0 - cx - bx;
        let cy = 3.0 * y1;
        let by = 3.0 * (y2 - y1) - cy;
        let ay = 1.0 - cy - by;
        Self {
            ax,
            bx,
            cx,
            ay,
            by,
            cy,
        }
    }

    fn sample_x(&self, t: f32) -> f32 {
        ((self.ax * t + self.bx) * t + self.cx) * t
    }

    fn sample_y(&self, t: f32) -> f32 {
        ((self.ay * t + self.by) * t + self.cy) * t
    }

    fn sample_dx(&self, t: f32) -> f32 {
        (3.0 * self.ax * t + 2.0 * self.bx) * t + self.cx
    }

    /// Find the curve parameter for `x` (Newton, then bisection)
    fn solve_t(&self, x: f32) -> f32 {
        const EPSILON: f32 = 1e-6;

        let mut t = x;
        for _ in 0..8 {
            let err = self.sample_x(t) - x;
            if err.abs() < EPSILON {
                return t;
            }
            let d = self.sample_dx(t);
            if d.abs() < EPSILON {
                break;
            }
            t -= err / d;
        }

        let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
        t = x;
        for _ in 0..32 {
            let value = self.sample_x(t);
            if (value - x).abs() < EPSILON {
                break;
            }
            if x > value {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        t
    }

    fn solve(&self, x: f32) -> f32 {
        self.sample_y(self.solve_t(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 10] = [
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::back_out(),
        Easing::cubic_bezier(0.25, 0.1, 0.25, 1.0),
        Easing::slow_mo(0.5, 0.4),
    ];

    #[test]
    fn test_endpoints() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-4, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-4, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_input_is_clamped() {
        assert_eq!(Easing::QuadIn.apply(-1.0), 0.0);
        assert_eq!(Easing::QuadIn.apply(2.0), 1.0);
    }

    #[test]
    fn test_cubic_bezier_matches_css_ease() {
        // CSS `ease` is cubic-bezier(0.25, 0.1, 0.25, 1.0); at x=0.5, y≈0.8024
        let ease = Easing::cubic_bezier(0.25, 0.1, 0.25, 1.0);
        assert!((ease.apply(0.5) - 0.8024).abs() < 1e-3);
    }

    #[test]
    fn test_cubic_bezier_monotonic() {
        let ease = Easing::cubic_bezier(0.25, 0.1, 0.25, 1.0);
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = ease.apply(i as f32 / 100.0);
            assert!(v >= prev - 1e-5);
            prev = v;
        }
    }

    #[test]
    fn test_linear_bezier_is_identity() {
        let ease = Easing::cubic_bezier(0.0, 0.0, 1.0, 1.0);
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!((ease.apply(t) - t).abs() < 1e-4);
        }
    }

    #[test]
    fn test_back_out_overshoots() {
        let peak = (1..100)
            .map(|i| Easing::back_out().apply(i as f32 / 100.0))
            .fold(0.0_f32, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_slow_mo_is_linear_in_the_middle() {
        let ease = Easing::slow_mo(0.5, 0.4);
        // Inside the linear section the curve is the compressed line r(t)
        let a = ease.apply(0.4);
        let b = ease.apply(0.6);
        assert!((ease.apply(0.5) - 0.5).abs() < 1e-5);
        assert!(((a + b) / 2.0 - 0.5).abs() < 1e-5);
        assert!(b - a < 0.2, "middle section should be slowed down");
    }

    #[test]
    fn test_custom_parses_svg_curve() {
        let ease = Easing::custom("M0,0 C0.25,0.1 0.25,1 1,1").unwrap();
        assert_eq!(ease, Easing::cubic_bezier(0.25, 0.1, 0.25, 1.0));
    }

    #[test]
    fn test_custom_rejects_bad_curves() {
        assert!(Easing::custom("").is_err());
        assert!(Easing::custom("M0,0 L1,1").is_err());
        assert!(Easing::custom("M0,0 C0.2,0.2 0.8,0.8 2,1").is_err());
        assert!(Easing::custom("M0,0 C0.2,x 0.8,0.8 1,1").is_err());
    }
}
