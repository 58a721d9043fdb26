//! SVG support for Glint
//!
//! - Path data parsing through `usvg`
//! - Flattening curves to polylines with `lyon`, behind the
//!   [`PathFlattener`] trait and the lazily loaded [`LazyFlattener`]
//! - Rasterization of SVG markup with `resvg`
//!
//! # Example
//!
//! ```rust
//! use glint_svg::{LyonFlattener, PathFlattener};
//!
//! let line = LyonFlattener::new(0.05).flatten("M0,0 L3,4").unwrap();
//! assert_eq!(line.length(), 5.0);
//! ```

mod capability;
mod error;
mod flatten;
mod path;
mod rasterize;

pub use capability::LazyFlattener;
pub use error::SvgError;
pub use flatten::{LyonFlattener, PathFlattener, Trajectory, DEFAULT_TOLERANCE};
pub use path::{parse_path_data, usvg_path_to_glint};
pub use rasterize::{parse_tree, RasterizedSvg};
