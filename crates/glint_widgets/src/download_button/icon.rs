//! Download button iconography
//!
//! The fixed shapes of the button, their class names, and the lookup table
//! that maps each logical shape to its handle in a [`Surface`].

use std::f32::consts::PI;

use glint_core::{Color, Paint, Path, Point, Shape, ShapeKey, Size, Surface};

use super::ButtonError;

/// Viewport in user units
pub const VIEWPORT: Size = Size::new(100.0, 50.0);
/// Displayed size
pub const DISPLAY_SIZE: Size = Size::new(620.0, 310.0);

pub const GRADIENT_ID: &str = "download-gradient";

/// Circle r=10 around (50, 25), starting at the top and running clockwise
pub const TRAJECTORY_PATH: &str = "M50,15 C55.523,15 60,19.477 60,25 \
                                   C60,30.523 55.523,35 50,35 \
                                   C44.477,35 40,30.523 40,25 \
                                   C40,19.477 44.477,15 50,15";
pub const TRAJECTORY_TOLERANCE: f32 = 0.05;

pub const RING_CENTER: Point = Point::new(50.0, 25.0);
pub const RING_RADIUS: f32 = 10.0;
/// Main circle radius once it sits inside the ring
pub const LOADING_RADIUS: f32 = 9.0;
pub const LABEL_FONT_SIZE: f32 = 6.0;

const BLUE: u32 = 0x5C86FF;
const GREEN: u32 = 0x3DDC97;
const WHITE: u32 = 0xFFFFFF;

pub fn blue() -> Color {
    Color::from_hex(BLUE)
}

pub fn green() -> Color {
    Color::from_hex(GREEN)
}

/// Circumference of the ring, used as its dash length
pub fn ring_circumference() -> f32 {
    2.0 * PI * RING_RADIUS
}

/// Logical shapes of the button
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeName {
    ButtonOutline,
    MainCircle,
    MainCircleFill,
    SubCircle,
    Arrow,
    Label,
    Dot,
    Square,
    GradientStop,
    GradientStopEnd,
}

impl ShapeName {
    pub const ALL: [ShapeName; 10] = [
        ShapeName::ButtonOutline,
        ShapeName::MainCircle,
        ShapeName::MainCircleFill,
        ShapeName::SubCircle,
        ShapeName::Arrow,
        ShapeName::Label,
        ShapeName::Dot,
        ShapeName::Square,
        ShapeName::GradientStop,
        ShapeName::GradientStopEnd,
    ];

    /// Class name in the markup
    pub const fn class(self) -> &'static str {
        match self {
            ShapeName::ButtonOutline => "button",
            ShapeName::MainCircle => "circle",
            ShapeName::MainCircleFill => "circle-fill",
            ShapeName::SubCircle => "sub-circle",
            ShapeName::Arrow => "arrow",
            ShapeName::Label => "label",
            ShapeName::Dot => "dot",
            ShapeName::Square => "square",
            ShapeName::GradientStop => "gradient-stop",
            ShapeName::GradientStopEnd => "gradient-stop-end",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Shape handles looked up once per setup
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapeRefs {
    keys: [ShapeKey; 10],
}

impl ShapeRefs {
    /// Find every named shape; the first missing one is an error
    pub fn resolve(surface: &Surface) -> Result<Self, ButtonError> {
        let mut keys = [ShapeKey::default(); 10];
        for name in ShapeName::ALL {
            keys[name.index()] = surface
                .find(name.class())
                .ok_or(ButtonError::MissingShape(name.class()))?;
        }
        Ok(Self { keys })
    }

    pub fn get(&self, name: ShapeName) -> ShapeKey {
        self.keys[name.index()]
    }
}

/// Put every named shape back into its static state with `text` in the label
///
/// Undoes whatever a previous cycle left behind on the surface.
pub fn reset_shapes(surface: &mut Surface, refs: &ShapeRefs, text: &str) {
    let fresh = build_surface(text);
    for name in ShapeName::ALL {
        let Some(shape) = fresh.find(name.class()).and_then(|key| fresh.shape(key)) else {
            continue;
        };
        if let Some(target) = surface.shape_mut(refs.get(name)) {
            *target = shape.clone();
        }
    }
}

/// Outline at rest: a pill spanning x 10..90, y 15..35
pub fn pill_path() -> Path {
    Path::new()
        .move_to(20.0, 15.0)
        .line_to(80.0, 15.0)
        .cubic_to(85.5, 15.0, 90.0, 19.5, 90.0, 25.0)
        .cubic_to(90.0, 30.5, 85.5, 35.0, 80.0, 35.0)
        .line_to(20.0, 35.0)
        .cubic_to(14.5, 35.0, 10.0, 30.5, 10.0, 25.0)
        .cubic_to(10.0, 19.5, 14.5, 15.0, 20.0, 15.0)
        .close()
}

/// Outline while loading: the pill collapsed onto the ring
///
/// Same command sequence as [`pill_path`] so the two interpolate.
pub fn loading_outline_path() -> Path {
    Path::new()
        .move_to(50.0, 15.0)
        .line_to(50.0, 15.0)
        .cubic_to(55.5, 15.0, 60.0, 19.5, 60.0, 25.0)
        .cubic_to(60.0, 30.5, 55.5, 35.0, 50.0, 35.0)
        .line_to(50.0, 35.0)
        .cubic_to(44.5, 35.0, 40.0, 30.5, 40.0, 25.0)
        .cubic_to(40.0, 19.5, 44.5, 15.0, 50.0, 15.0)
        .close()
}

/// Build the static button with `text` in the label
pub fn build_surface(text: &str) -> Surface {
    let blue = blue();
    let white = Color::from_hex(WHITE);
    let mut surface = Surface::new(VIEWPORT, DISPLAY_SIZE);

    surface.add_gradient(
        GRADIENT_ID,
        Point::new(0.0, 1.0),
        Point::new(0.0, 0.0),
        vec![
            Shape::gradient_stop(ShapeName::GradientStop.class(), 0.0, green()),
            Shape::gradient_stop(ShapeName::GradientStopEnd.class(), 0.0, blue),
        ],
    );

    surface.insert(
        Shape::path(ShapeName::ButtonOutline.class(), pill_path())
            .fill(Paint::None)
            .stroke(blue, 1.2),
    );
    surface.insert(
        Shape::circle(ShapeName::MainCircle.class(), Point::new(22.0, 25.0), 6.0)
            .fill(Paint::Solid(blue)),
    );
    surface.insert(
        Shape::circle(ShapeName::MainCircleFill.class(), Point::new(22.0, 25.0), 6.0)
            .fill(Paint::Gradient(GRADIENT_ID.to_string())),
    );
    surface.insert(
        Shape::rect(
            ShapeName::Square.class(),
            Point::new(47.5, 22.5),
            Size::new(5.0, 5.0),
        )
        .fill(Paint::Solid(white))
        .opacity(0.0),
    );

    let tip = Point::new(22.0, 28.0);
    surface.insert(
        Shape::lines(
            ShapeName::Arrow.class(),
            vec![
                (Point::new(22.0, 21.5), tip),
                (Point::new(19.5, 25.5), tip),
                (Point::new(24.5, 25.5), tip),
            ],
        )
        .stroke(white, 0.8)
        .round_caps(),
    );
    surface.insert(
        Shape::text(
            ShapeName::Label.class(),
            Point::new(33.0, 27.0),
            text,
            LABEL_FONT_SIZE,
        )
        .fill(Paint::Solid(blue)),
    );

    let circumference = ring_circumference();
    surface.insert(
        Shape::circle(ShapeName::SubCircle.class(), RING_CENTER, RING_RADIUS)
            .stroke(blue, 1.2)
            .dash(circumference, circumference)
            .rotate(-90.0),
    );
    surface.insert(
        Shape::circle(ShapeName::Dot.class(), Point::new(50.0, 15.0), 1.2)
            .fill(Paint::Solid(white))
            .opacity(0.0),
    );

    surface
}
