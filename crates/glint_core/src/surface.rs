//! Retained vector surface
//!
//! A [`Surface`] is a small retained scene of named shapes inside a fixed
//! viewport. Shapes are addressed by [`ShapeKey`] handles, found by their class
//! name, and mutated one attribute at a time through [`Property`] /
//! [`AttrValue`] pairs. The whole surface can be written out as SVG markup.

use std::fmt::Write;
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use slotmap::{new_key_type, SlotMap};

use crate::color::Color;
use crate::geometry::{Point, Size, Vec2};
use crate::path::{fmt_num, Path};

new_key_type! {
    /// Handle to a shape stored in a [`Surface`]
    pub struct ShapeKey;
}

/// A surface shared between a widget and the tweens that animate it
pub type SharedSurface = Arc<Mutex<Surface>>;

/// Geometry of a shape
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeKind {
    Path { data: Path },
    Circle { center: Point, radius: f32 },
    Rect { origin: Point, size: Size },
    /// A group of straight strokes sharing one style
    Lines { segments: Vec<(Point, Point)> },
    Text {
        origin: Point,
        content: String,
        font_size: f32,
    },
    /// A stop inside a gradient definition
    GradientStop { offset: f32, color: Color },
}

/// Fill or stroke paint
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    None,
    Solid(Color),
    /// Reference to a gradient definition by id
    Gradient(String),
}

impl Paint {
    fn to_attr(&self) -> String {
        match self {
            Paint::None => "none".to_string(),
            Paint::Solid(c) => c.to_hex_string(),
            Paint::Gradient(id) => format!("url(#{id})"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShapeStyle {
    pub fill: Paint,
    pub stroke: Paint,
    pub stroke_width: f32,
    pub opacity: f32,
    /// Single-length dash pattern (dash and gap of equal length)
    pub dash_array: Option<f32>,
    pub dash_offset: f32,
    pub round_caps: bool,
    pub visible: bool,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: Paint::None,
            stroke: Paint::None,
            stroke_width: 1.0,
            opacity: 1.0,
            dash_array: None,
            dash_offset: 0.0,
            round_caps: false,
            visible: true,
        }
    }
}

/// Per-shape transform, applied around the shape's own center
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeTransform {
    pub translate: Vec2,
    pub scale: Vec2,
    /// Rotation in degrees
    pub rotate: f32,
}

impl Default for ShapeTransform {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: Vec2::ONE,
            rotate: 0.0,
        }
    }
}

impl ShapeTransform {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

/// A named shape
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub class: String,
    pub kind: ShapeKind,
    pub style: ShapeStyle,
    pub transform: ShapeTransform,
}

impl Shape {
    pub fn new(class: impl Into<String>, kind: ShapeKind) -> Self {
        Self {
            class: class.into(),
            kind,
            style: ShapeStyle::default(),
            transform: ShapeTransform::default(),
        }
    }

    pub fn path(class: impl Into<String>, data: Path) -> Self {
        Self::new(class, ShapeKind::Path { data })
    }

    pub fn circle(class: impl Into<String>, center: Point, radius: f32) -> Self {
        Self::new(class, ShapeKind::Circle { center, radius })
    }

    pub fn rect(class: impl Into<String>, origin: Point, size: Size) -> Self {
        Self::new(class, ShapeKind::Rect { origin, size })
    }

    pub fn lines(class: impl Into<String>, segments: Vec<(Point, Point)>) -> Self {
        Self::new(class, ShapeKind::Lines { segments })
    }

    pub fn text(
        class: impl Into<String>,
        origin: Point,
        content: impl Into<String>,
        font_size: f32,
    ) -> Self {
        Self::new(
            class,
            ShapeKind::Text {
                origin,
                content: content.into(),
                font_size,
            },
        )
    }

    pub fn gradient_stop(class: impl Into<String>, offset: f32, color: Color) -> Self {
        Self::new(class, ShapeKind::GradientStop { offset, color })
    }

    pub fn fill(mut self, paint: Paint) -> Self {
        self.style.fill = paint;
        self
    }

    pub fn stroke(mut self, color: Color, width: f32) -> Self {
        self.style.stroke = Paint::Solid(color);
        self.style.stroke_width = width;
        self
    }

    pub fn round_caps(mut self) -> Self {
        self.style.round_caps = true;
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.style.opacity = opacity;
        self
    }

    /// Dash the stroke with one `length` dash, shifted by `offset`
    pub fn dash(mut self, length: f32, offset: f32) -> Self {
        self.style.dash_array = Some(length);
        self.style.dash_offset = offset;
        self
    }

    pub fn rotate(mut self, degrees: f32) -> Self {
        self.transform.rotate = degrees;
        self
    }

    /// Center used as the origin of rotation and scaling
    pub fn center(&self) -> Point {
        match &self.kind {
            ShapeKind::Circle { center, .. } => *center,
            ShapeKind::Rect { origin, size } => {
                Point::new(origin.x + size.width / 2.0, origin.y + size.height / 2.0)
            }
            ShapeKind::Text { origin, .. } => *origin,
            ShapeKind::Lines { segments } => {
                let (mut min, mut max) = (
                    Point::new(f32::INFINITY, f32::INFINITY),
                    Point::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
                );
                for (a, b) in segments {
                    for p in [a, b] {
                        min = Point::new(min.x.min(p.x), min.y.min(p.y));
                        max = Point::new(max.x.max(p.x), max.y.max(p.y));
                    }
                }
                if min.is_finite() && max.is_finite() {
                    min.lerp(max, 0.5)
                } else {
                    Point::ZERO
                }
            }
            ShapeKind::Path { .. } | ShapeKind::GradientStop { .. } => Point::ZERO,
        }
    }
}

/// Animatable attribute of a shape
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    /// Circle center x
    Cx,
    /// Circle center y
    Cy,
    /// Circle radius
    R,
    /// Path data of a path shape
    PathData,
    Opacity,
    /// Solid fill color
    Fill,
    StrokeWidth,
    DashOffset,
    /// Gradient stop offset
    Offset,
    StopColor,
    FontSize,
    TranslateX,
    TranslateY,
    ScaleX,
    ScaleY,
    Visible,
}

/// A value read from or written to a [`Property`]
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Number(f32),
    Color(Color),
    Path(Path),
    Flag(bool),
}

impl AttrValue {
    pub fn as_number(&self) -> Option<f32> {
        match self {
            AttrValue::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<f32> for AttrValue {
    fn from(v: f32) -> Self {
        AttrValue::Number(v)
    }
}

impl From<Color> for AttrValue {
    fn from(c: Color) -> Self {
        AttrValue::Color(c)
    }
}

impl From<Path> for AttrValue {
    fn from(p: Path) -> Self {
        AttrValue::Path(p)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Flag(b)
    }
}

/// Linear gradient definition referencing stop shapes
#[derive(Clone, Debug)]
struct GradientDef {
    id: String,
    from: Point,
    to: Point,
    stops: Vec<ShapeKey>,
}

/// Retained scene of named shapes
#[derive(Clone, Debug)]
pub struct Surface {
    shapes: SlotMap<ShapeKey, Shape>,
    /// Drawable shapes in paint order (gradient stops excluded)
    order: Vec<ShapeKey>,
    by_class: IndexMap<String, ShapeKey>,
    gradients: Vec<GradientDef>,
    viewport: Size,
    display: Size,
}

impl Surface {
    /// Create an empty surface with a viewport (user units) and display size
    pub fn new(viewport: Size, display: Size) -> Self {
        Self {
            shapes: SlotMap::with_key(),
            order: Vec::new(),
            by_class: IndexMap::new(),
            gradients: Vec::new(),
            viewport,
            display,
        }
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn display_size(&self) -> Size {
        self.display
    }

    /// Wrap the surface for sharing with tweens
    pub fn into_shared(self) -> SharedSurface {
        Arc::new(Mutex::new(self))
    }

    fn register(&mut self, shape: Shape) -> ShapeKey {
        let class = shape.class.clone();
        let key = self.shapes.insert(shape);
        self.by_class.entry(class).or_insert(key);
        key
    }

    /// Add a drawable shape on top of the existing ones
    pub fn insert(&mut self, shape: Shape) -> ShapeKey {
        let key = self.register(shape);
        self.order.push(key);
        key
    }

    /// Define a linear gradient; returns the keys of its stops in order
    ///
    /// `from` and `to` are in object bounding box units.
    pub fn add_gradient(
        &mut self,
        id: impl Into<String>,
        from: Point,
        to: Point,
        stops: Vec<Shape>,
    ) -> Vec<ShapeKey> {
        let keys: Vec<ShapeKey> = stops.into_iter().map(|s| self.register(s)).collect();
        self.gradients.push(GradientDef {
            id: id.into(),
            from,
            to,
            stops: keys.clone(),
        });
        keys
    }

    /// Find the first shape with the given class name
    pub fn find(&self, class: &str) -> Option<ShapeKey> {
        self.by_class.get(class).copied()
    }

    pub fn shape(&self, key: ShapeKey) -> Option<&Shape> {
        self.shapes.get(key)
    }

    pub fn shape_mut(&mut self, key: ShapeKey) -> Option<&mut Shape> {
        self.shapes.get_mut(key)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Text content of a text shape
    pub fn text(&self, key: ShapeKey) -> Option<&str> {
        match &self.shapes.get(key)?.kind {
            ShapeKind::Text { content, .. } => Some(content),
            _ => None,
        }
    }

    /// Replace the content of a text shape; false if `key` is not a text shape
    pub fn set_text(&mut self, key: ShapeKey, text: &str) -> bool {
        match self.shapes.get_mut(key).map(|s| &mut s.kind) {
            Some(ShapeKind::Text { content, .. }) => {
                content.clear();
                content.push_str(text);
                true
            }
            _ => false,
        }
    }

    /// Read an attribute; `None` if the shape is gone or has no such attribute
    pub fn get(&self, key: ShapeKey, property: Property) -> Option<AttrValue> {
        let shape = self.shapes.get(key)?;
        let value = match (property, &shape.kind) {
            (Property::Cx, ShapeKind::Circle { center, .. }) => AttrValue::Number(center.x),
            (Property::Cy, ShapeKind::Circle { center, .. }) => AttrValue::Number(center.y),
            (Property::R, ShapeKind::Circle { radius, .. }) => AttrValue::Number(*radius),
            (Property::PathData, ShapeKind::Path { data }) => AttrValue::Path(data.clone()),
            (Property::Offset, ShapeKind::GradientStop { offset, .. }) => {
                AttrValue::Number(*offset)
            }
            (Property::StopColor, ShapeKind::GradientStop { color, .. }) => {
                AttrValue::Color(*color)
            }
            (Property::FontSize, ShapeKind::Text { font_size, .. }) => {
                AttrValue::Number(*font_size)
            }
            (Property::Fill, _) => match &shape.style.fill {
                Paint::Solid(c) => AttrValue::Color(*c),
                _ => return None,
            },
            (Property::Opacity, _) => AttrValue::Number(shape.style.opacity),
            (Property::StrokeWidth, _) => AttrValue::Number(shape.style.stroke_width),
            (Property::DashOffset, _) => AttrValue::Number(shape.style.dash_offset),
            (Property::TranslateX, _) => AttrValue::Number(shape.transform.translate.x),
            (Property::TranslateY, _) => AttrValue::Number(shape.transform.translate.y),
            (Property::ScaleX, _) => AttrValue::Number(shape.transform.scale.x),
            (Property::ScaleY, _) => AttrValue::Number(shape.transform.scale.y),
            (Property::Visible, _) => AttrValue::Flag(shape.style.visible),
            _ => return None,
        };
        Some(value)
    }

    /// Write an attribute; false if the shape or the property/value pair is invalid
    pub fn set(&mut self, key: ShapeKey, property: Property, value: AttrValue) -> bool {
        let Some(shape) = self.shapes.get_mut(key) else {
            return false;
        };
        match (property, &mut shape.kind, value) {
            (Property::Cx, ShapeKind::Circle { center, .. }, AttrValue::Number(v)) => center.x = v,
            (Property::Cy, ShapeKind::Circle { center, .. }, AttrValue::Number(v)) => center.y = v,
            (Property::R, ShapeKind::Circle { radius, .. }, AttrValue::Number(v)) => {
                *radius = v.max(0.0)
            }
            (Property::PathData, ShapeKind::Path { data }, AttrValue::Path(p)) => *data = p,
            (Property::Offset, ShapeKind::GradientStop { offset, .. }, AttrValue::Number(v)) => {
                *offset = v.clamp(0.0, 1.0)
            }
            (Property::StopColor, ShapeKind::GradientStop { color, .. }, AttrValue::Color(c)) => {
                *color = c
            }
            (Property::FontSize, ShapeKind::Text { font_size, .. }, AttrValue::Number(v)) => {
                *font_size = v.max(0.0)
            }
            (Property::Fill, _, AttrValue::Color(c)) => shape.style.fill = Paint::Solid(c),
            (Property::Opacity, _, AttrValue::Number(v)) => shape.style.opacity = v.clamp(0.0, 1.0),
            (Property::StrokeWidth, _, AttrValue::Number(v)) => shape.style.stroke_width = v,
            (Property::DashOffset, _, AttrValue::Number(v)) => shape.style.dash_offset = v,
            (Property::TranslateX, _, AttrValue::Number(v)) => shape.transform.translate.x = v,
            (Property::TranslateY, _, AttrValue::Number(v)) => shape.transform.translate.y = v,
            (Property::ScaleX, _, AttrValue::Number(v)) => shape.transform.scale.x = v,
            (Property::ScaleY, _, AttrValue::Number(v)) => shape.transform.scale.y = v,
            (Property::Visible, _, AttrValue::Flag(b)) => shape.style.visible = b,
            (property, _, value) => {
                tracing::trace!(?property, ?value, class = %shape.class, "attribute not applicable");
                return false;
            }
        }
        true
    }

    /// Write the surface as a standalone SVG document
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}">"#,
            fmt_num(self.viewport.width),
            fmt_num(self.viewport.height),
            fmt_num(self.display.width),
            fmt_num(self.display.height),
        );

        if !self.gradients.is_empty() {
            out.push_str("<defs>");
            for gradient in &self.gradients {
                let _ = write!(
                    out,
                    r#"<linearGradient id="{}" x1="{}" y1="{}" x2="{}" y2="{}">"#,
                    escape(&gradient.id),
                    fmt_num(gradient.from.x),
                    fmt_num(gradient.from.y),
                    fmt_num(gradient.to.x),
                    fmt_num(gradient.to.y),
                );
                for stop in gradient.stops.iter().filter_map(|k| self.shapes.get(*k)) {
                    if let ShapeKind::GradientStop { offset, color } = &stop.kind {
                        let _ = write!(
                            out,
                            r#"<stop class="{}" offset="{}" stop-color="{}" stop-opacity="{}"/>"#,
                            escape(&stop.class),
                            fmt_num(*offset),
                            color.to_hex_string(),
                            fmt_num(color.a),
                        );
                    }
                }
                out.push_str("</linearGradient>");
            }
            out.push_str("</defs>");
        }

        for shape in self.order.iter().filter_map(|k| self.shapes.get(*k)) {
            write_shape(&mut out, shape);
        }

        out.push_str("</svg>");
        out
    }
}

fn write_shape(out: &mut String, shape: &Shape) {
    let common = style_attrs(shape);
    let class = escape(&shape.class);
    let _ = match &shape.kind {
        ShapeKind::Path { data } => write!(
            out,
            r#"<path class="{class}" d="{}"{common}/>"#,
            data.to_svg_data()
        ),
        ShapeKind::Circle { center, radius } => write!(
            out,
            r#"<circle class="{class}" cx="{}" cy="{}" r="{}"{common}/>"#,
            fmt_num(center.x),
            fmt_num(center.y),
            fmt_num(*radius)
        ),
        ShapeKind::Rect { origin, size } => write!(
            out,
            r#"<rect class="{class}" x="{}" y="{}" width="{}" height="{}"{common}/>"#,
            fmt_num(origin.x),
            fmt_num(origin.y),
            fmt_num(size.width),
            fmt_num(size.height)
        ),
        ShapeKind::Lines { segments } => {
            let _ = write!(out, r#"<g class="{class}"{common}>"#);
            for (a, b) in segments {
                let _ = write!(
                    out,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
                    fmt_num(a.x),
                    fmt_num(a.y),
                    fmt_num(b.x),
                    fmt_num(b.y)
                );
            }
            write!(out, "</g>")
        }
        ShapeKind::Text {
            origin,
            content,
            font_size,
        } => write!(
            out,
            r#"<text class="{class}" x="{}" y="{}" font-size="{}" font-family="sans-serif"{common}>{}</text>"#,
            fmt_num(origin.x),
            fmt_num(origin.y),
            fmt_num(*font_size),
            escape(content)
        ),
        ShapeKind::GradientStop { .. } => Ok(()),
    };
}

fn style_attrs(shape: &Shape) -> String {
    let style = &shape.style;
    let mut attrs = String::new();
    let _ = write!(attrs, r#" fill="{}""#, style.fill.to_attr());
    if style.stroke != Paint::None {
        let _ = write!(
            attrs,
            r#" stroke="{}" stroke-width="{}""#,
            style.stroke.to_attr(),
            fmt_num(style.stroke_width)
        );
        if style.round_caps {
            attrs.push_str(r#" stroke-linecap="round""#);
        }
        if let Some(dash) = style.dash_array {
            let _ = write!(
                attrs,
                r#" stroke-dasharray="{}" stroke-dashoffset="{}""#,
                fmt_num(dash),
                fmt_num(style.dash_offset)
            );
        }
    }
    if style.opacity < 1.0 {
        let _ = write!(attrs, r#" opacity="{}""#, fmt_num(style.opacity));
    }
    if !style.visible {
        attrs.push_str(r#" visibility="hidden""#);
    }
    if !shape.transform.is_identity() {
        let t = &shape.transform;
        let c = shape.center();
        let _ = write!(
            attrs,
            r#" transform="translate({} {}) rotate({} {} {}) translate({} {}) scale({} {}) translate({} {})""#,
            fmt_num(t.translate.x),
            fmt_num(t.translate.y),
            fmt_num(t.rotate),
            fmt_num(c.x),
            fmt_num(c.y),
            fmt_num(c.x),
            fmt_num(c.y),
            fmt_num(t.scale.x),
            fmt_num(t.scale.y),
            fmt_num(-c.x),
            fmt_num(-c.y),
        );
    }
    attrs
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\t' | '\n' | '\r' => escaped.push(ch),
            // Not representable in XML 1.0, even as a character reference
            c if c < ' ' || c == '\u{FFFE}' || c == '\u{FFFF}' => {}
            _ => escaped.push(ch),
        }
    }
    escaped
}
