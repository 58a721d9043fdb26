//! The download cycle timeline
//!
//! | label   | time           | content                                      |
//! |---------|----------------|----------------------------------------------|
//! | `start` | 0              | arrow nudge, label shrinks and fades         |
//! | `morph` | 350            | pill collapses onto the ring, circles center |
//! | `load`  | `morph` + 500  | ring draws, dot travels, gradient fills      |
//! | `pop`   | end of `load`  | dot turns green and squashes                 |
//! | `fade`  | `pop` + 500    | everything fades, dot hidden                 |

use std::sync::{Arc, Once};

use glint_animation::{plugins, Easing, Position, Timeline, Tween};
use glint_core::{Polyline, Property, SharedSurface};

use super::icon::{green, loading_outline_path, ShapeName, ShapeRefs, LOADING_RADIUS};

pub const START: &str = "start";
pub const MORPH: &str = "morph";
pub const LOAD: &str = "load";
pub const POP: &str = "pop";
pub const FADE: &str = "fade";

/// Registered name of the outline morph ease
pub const MORPH_EASE: &str = "glint.morph";
/// Outline morph curve, `cubic-bezier(0.25, 0.1, 0.25, 1)` as SVG path data
pub const MORPH_CURVE: &str = "M0,0 C0.25,0.1 0.25,1 1,1";
const FILL_EASE: Easing = Easing::slow_mo(0.5, 0.4);

pub const MORPH_AT_MS: f32 = 350.0;
pub const LOAD_AFTER_MORPH_MS: f32 = 500.0;
pub const LOAD_DURATION_MS: f32 = 1800.0;
pub const FADE_AFTER_POP_MS: f32 = 500.0;

/// Nominal length of one cycle
pub const CYCLE_DURATION_MS: f32 = 3450.0;

static REGISTER: Once = Once::new();

/// Register the default eases plus the button's own, once per process
pub fn register_eases() {
    REGISTER.call_once(|| {
        plugins::register_plugins();
        match Easing::custom(MORPH_CURVE) {
            Ok(curve) => {
                plugins::register_ease(MORPH_EASE, curve);
                tracing::debug!(ease = MORPH_EASE, "registered button eases");
            }
            Err(err) => tracing::warn!(%err, "failed to register {}", MORPH_EASE),
        }
    });
}

fn morph_ease() -> Easing {
    register_eases();
    Easing::named(MORPH_EASE).unwrap_or_else(|err| {
        tracing::warn!(%err, "morph ease unavailable, using cubic in-out");
        Easing::CubicInOut
    })
}

/// Build one cycle; `on_complete` runs when the last step finishes
pub fn build<F>(
    surface: &SharedSurface,
    refs: &ShapeRefs,
    trajectory: &Arc<Polyline>,
    on_complete: F,
) -> Timeline
where
    F: FnOnce() + Send + 'static,
{
    let key = |name: ShapeName| refs.get(name);
    let morph = morph_ease();
    let mut tl = Timeline::new();

    // (a) arrow nudge, label shrinks
    tl.add_label(START, Position::at(0.0));
    tl.add(
        Tween::new(200.0)
            .ease(Easing::QuadIn)
            .attr(surface, key(ShapeName::Arrow), Property::TranslateY, 1.5_f32),
        Position::label(START),
    );
    tl.add(
        Tween::new(250.0)
            .ease(Easing::back_out())
            .attr(surface, key(ShapeName::Arrow), Property::TranslateY, 0.0_f32),
        Position::label_offset(START, 200.0),
    );
    tl.add(
        Tween::new(300.0)
            .ease(Easing::CubicOut)
            .attr(surface, key(ShapeName::Label), Property::FontSize, 4.0_f32)
            .attr(surface, key(ShapeName::Label), Property::Opacity, 0.0_f32),
        Position::label_offset(START, 100.0),
    );

    // (b) pill to circle
    tl.add_label(MORPH, Position::at(MORPH_AT_MS));
    tl.add(
        Tween::new(600.0).ease(morph).attr(
            surface,
            key(ShapeName::ButtonOutline),
            Property::PathData,
            loading_outline_path(),
        ),
        Position::label(MORPH),
    );
    let mut circles = Tween::new(600.0).ease(morph);
    for name in [ShapeName::MainCircle, ShapeName::MainCircleFill] {
        circles = circles
            .attr(surface, key(name), Property::Cx, 50.0_f32)
            .attr(surface, key(name), Property::R, LOADING_RADIUS);
    }
    tl.add(circles, Position::label(MORPH));
    tl.add(
        Tween::new(200.0)
            .attr(surface, key(ShapeName::Arrow), Property::Opacity, 0.0_f32)
            .attr(surface, key(ShapeName::Label), Property::Opacity, 0.0_f32),
        Position::label(MORPH),
    );

    // (c) ring, dot and fill level
    tl.add_label(LOAD, Position::label_offset(MORPH, LOAD_AFTER_MORPH_MS));
    tl.add(
        Tween::new(LOAD_DURATION_MS).ease(Easing::QuadInOut).attr(
            surface,
            key(ShapeName::SubCircle),
            Property::DashOffset,
            0.0_f32,
        ),
        Position::label(LOAD),
    );
    tl.add(
        Tween::new(100.0).attr(surface, key(ShapeName::Dot), Property::Opacity, 1.0_f32),
        Position::label(LOAD),
    );
    tl.add(
        Tween::new(LOAD_DURATION_MS).ease(Easing::QuadInOut).motion(
            surface,
            key(ShapeName::Dot),
            Arc::clone(trajectory),
        ),
        Position::label(LOAD),
    );
    tl.add(
        Tween::new(LOAD_DURATION_MS)
            .ease(FILL_EASE)
            .attr(surface, key(ShapeName::GradientStop), Property::Offset, 1.0_f32)
            .attr(surface, key(ShapeName::GradientStopEnd), Property::Offset, 1.0_f32),
        Position::label(LOAD),
    );
    tl.add(
        Tween::new(200.0).attr(surface, key(ShapeName::Square), Property::Opacity, 1.0_f32),
        Position::label_offset(LOAD, 100.0),
    );

    // (d) checkmark pop
    tl.add_label(POP, Position::End);
    tl.add(
        Tween::new(100.0).attr(surface, key(ShapeName::Dot), Property::Fill, green()),
        Position::label(POP),
    );
    tl.add(scale(surface, refs, 0.7, 1.8, 150.0).ease(Easing::QuadOut), Position::label(POP));
    tl.add(scale(surface, refs, 1.4, 0.8, 150.0), Position::label_offset(POP, 150.0));
    tl.add(
        scale(surface, refs, 1.0, 1.0, 300.0).ease(Easing::back_out()),
        Position::label_offset(POP, 300.0),
    );

    // (e) fade out
    tl.add_label(FADE, Position::label_offset(POP, FADE_AFTER_POP_MS));
    let mut fade = Tween::new(300.0).ease(Easing::CubicIn);
    for name in [
        ShapeName::ButtonOutline,
        ShapeName::SubCircle,
        ShapeName::MainCircle,
        ShapeName::MainCircleFill,
        ShapeName::Square,
    ] {
        fade = fade.attr(surface, key(name), Property::Opacity, 0.0_f32);
    }
    tl.add(fade, Position::label(FADE));
    tl.add(
        Tween::new(200.0).attr(surface, key(ShapeName::Dot), Property::Opacity, 0.0_f32),
        Position::label_offset(FADE, 100.0),
    );
    tl.add(
        Tween::set().attr(surface, key(ShapeName::Dot), Property::Visible, false),
        Position::End,
    );

    // (f)
    tl.on_complete(on_complete);
    tl
}

fn scale(surface: &SharedSurface, refs: &ShapeRefs, x: f32, y: f32, duration_ms: f32) -> Tween {
    let dot = refs.get(ShapeName::Dot);
    Tween::new(duration_ms)
        .attr(surface, dot, Property::ScaleX, x)
        .attr(surface, dot, Property::ScaleY, y)
}
