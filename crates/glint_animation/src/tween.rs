//! Tweens
//!
//! A [`Tween`] is a duration, an easing curve and one or more
//! [`TweenAction`]s that receive the eased progress. The built-in actions
//! write into a [`SharedSurface`]:
//!
//! - [`AttrTween`] interpolates one attribute of one shape, capturing the
//!   start value when the tween first becomes active
//! - [`MotionTween`] moves a circle along a [`Polyline`]

use std::sync::{Arc, PoisonError};

use glint_core::{AttrValue, Polyline, Property, ShapeKey, SharedSurface};
use smallvec::SmallVec;

use crate::easing::Easing;
use crate::values::Interpolate;

/// Something driven by a tween's eased progress
pub trait TweenAction: Send {
    /// Called once when the playhead first reaches the tween
    fn begin(&mut self) {}

    /// Apply eased progress (usually 0.0 to 1.0, may overshoot)
    fn update(&mut self, eased: f32);
}

/// A timed, eased group of actions
pub struct Tween {
    duration_ms: f32,
    easing: Easing,
    actions: SmallVec<[Box<dyn TweenAction>; 2]>,
}

impl Tween {
    /// Create a tween lasting `duration_ms` with linear easing
    pub fn new(duration_ms: f32) -> Self {
        Self {
            duration_ms: duration_ms.max(0.0),
            easing: Easing::Linear,
            actions: SmallVec::new(),
        }
    }

    /// A zero-duration tween that jumps straight to its end values
    pub fn set() -> Self {
        Self::new(0.0)
    }

    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Add an arbitrary action
    pub fn with(mut self, action: impl TweenAction + 'static) -> Self {
        self.actions.push(Box::new(action));
        self
    }

    /// Animate one attribute of a shape to `to`
    pub fn attr(
        self,
        surface: &SharedSurface,
        key: ShapeKey,
        property: Property,
        to: impl Into<AttrValue>,
    ) -> Self {
        self.with(AttrTween::new(surface.clone(), key, property, to.into()))
    }

    /// Move a circle along `path`
    pub fn motion(self, surface: &SharedSurface, key: ShapeKey, path: Arc<Polyline>) -> Self {
        self.with(MotionTween::new(surface.clone(), key, path))
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub(crate) fn begin(&mut self) {
        for action in &mut self.actions {
            action.begin();
        }
    }

    /// Render linear progress `t` through the easing curve
    pub(crate) fn render(&mut self, t: f32) {
        let eased = self.easing.apply(t);
        for action in &mut self.actions {
            action.update(eased);
        }
    }
}

impl std::fmt::Debug for Tween {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tween")
            .field("duration_ms", &self.duration_ms)
            .field("easing", &self.easing)
            .field("actions", &self.actions.len())
            .finish()
    }
}

/// Interpolate one shape attribute
pub struct AttrTween {
    surface: SharedSurface,
    key: ShapeKey,
    property: Property,
    from: Option<AttrValue>,
    to: AttrValue,
}

impl AttrTween {
    pub fn new(surface: SharedSurface, key: ShapeKey, property: Property, to: AttrValue) -> Self {
        Self {
            surface,
            key,
            property,
            from: None,
            to,
        }
    }

    /// Start from an explicit value instead of the current one
    pub fn from(mut self, from: impl Into<AttrValue>) -> Self {
        self.from = Some(from.into());
        self
    }
}

impl TweenAction for AttrTween {
    fn begin(&mut self) {
        if self.from.is_none() {
            let surface = self.surface.lock().unwrap_or_else(PoisonError::into_inner);
            // Unreadable attributes jump straight to the target
            self.from = Some(
                surface
                    .get(self.key, self.property)
                    .unwrap_or_else(|| self.to.clone()),
            );
        }
    }

    fn update(&mut self, eased: f32) {
        // Land exactly on the target
        let value = match &self.from {
            Some(from) if eased != 1.0 => from.lerp(&self.to, eased),
            _ => self.to.clone(),
        };
        self.surface
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set(self.key, self.property, value);
    }
}

/// Move a circle's center along a polyline by arc length
pub struct MotionTween {
    surface: SharedSurface,
    key: ShapeKey,
    path: Arc<Polyline>,
}

impl MotionTween {
    pub fn new(surface: SharedSurface, key: ShapeKey, path: Arc<Polyline>) -> Self {
        Self { surface, key, path }
    }
}

impl TweenAction for MotionTween {
    fn update(&mut self, eased: f32) {
        let Some(point) = self.path.point_at(eased) else {
            return;
        };
        let mut surface = self.surface.lock().unwrap_or_else(PoisonError::into_inner);
        surface.set(self.key, Property::Cx, AttrValue::Number(point.x));
        surface.set(self.key, Property::Cy, AttrValue::Number(point.y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::{Point, Shape, Size, Surface};

    fn surface_with_dot() -> (SharedSurface, ShapeKey) {
        let mut surface = Surface::new(Size::new(100.0, 50.0), Size::new(620.0, 310.0));
        let dot = surface.insert(Shape::circle("dot", Point::new(0.0, 0.0), 1.0));
        (surface.into_shared(), dot)
    }

    fn number(surface: &SharedSurface, key: ShapeKey, property: Property) -> f32 {
        surface
            .lock()
            .unwrap()
            .get(key, property)
            .and_then(|v| v.as_number())
            .unwrap()
    }

    #[test]
    fn test_attr_tween_captures_start_on_begin() {
        let (surface, dot) = surface_with_dot();
        let mut tween = Tween::new(100.0).attr(&surface, dot, Property::R, 5.0_f32);

        // Value changes before the tween starts are picked up
        surface
            .lock()
            .unwrap()
            .set(dot, Property::R, AttrValue::Number(3.0));

        tween.begin();
        tween.render(0.5);
        assert!((number(&surface, dot, Property::R) - 4.0).abs() < 1e-6);
        tween.render(1.0);
        assert!((number(&surface, dot, Property::R) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_explicit_from() {
        let (surface, dot) = surface_with_dot();
        let mut tween = Tween::new(100.0).with(
            AttrTween::new(surface.clone(), dot, Property::Opacity, AttrValue::Number(1.0))
                .from(0.0_f32),
        );
        tween.begin();
        tween.render(0.25);
        assert!((number(&surface, dot, Property::Opacity) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_motion_tween_follows_path() {
        let (surface, dot) = surface_with_dot();
        let path = Arc::new(Polyline::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        ]));
        let mut tween = Tween::new(100.0).motion(&surface, dot, path);
        tween.begin();
        tween.render(0.3);
        assert!((number(&surface, dot, Property::Cx) - 3.0).abs() < 1e-5);
        assert!(number(&surface, dot, Property::Cy).abs() < 1e-6);
    }

    #[test]
    fn test_easing_applied() {
        let (surface, dot) = surface_with_dot();
        let mut tween = Tween::new(100.0)
            .ease(Easing::QuadIn)
            .attr(&surface, dot, Property::Cx, 10.0_f32);
        tween.begin();
        tween.render(0.5);
        assert!((number(&surface, dot, Property::Cx) - 2.5).abs() < 1e-5);
    }
}
