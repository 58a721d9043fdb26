//! Glint Core
//!
//! Foundational types shared by the Glint crates:
//!
//! - **Geometry**: points, sizes and vectors in user units
//! - **Color**: RGBA colors with hex formatting and interpolation
//! - **Paths**: vector path commands with SVG path data output
//! - **Polylines**: flattened point runs sampled by arc length
//! - **Surface**: a retained scene of named shapes that widgets draw into and
//!   tweens animate, serializable to SVG markup
//!
//! # Example
//!
//! ```rust
//! use glint_core::{Color, Paint, Point, Shape, Size, Surface};
//!
//! let mut surface = Surface::new(Size::new(100.0, 50.0), Size::new(620.0, 310.0));
//! let dot = surface.insert(
//!     Shape::circle("dot", Point::new(50.0, 15.0), 1.2).fill(Paint::Solid(Color::WHITE)),
//! );
//! assert_eq!(surface.find("dot"), Some(dot));
//! assert!(surface.to_svg().contains("<circle"));
//! ```

pub mod color;
pub mod geometry;
pub mod path;
pub mod polyline;
pub mod surface;

pub use color::Color;
pub use geometry::{Point, Size, Vec2};
pub use path::{Path, PathCommand};
pub use polyline::Polyline;
pub use surface::{
    AttrValue, Paint, Property, Shape, ShapeKey, ShapeKind, ShapeStyle, ShapeTransform,
    SharedSurface, Surface,
};
