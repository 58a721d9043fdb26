//! Glint Widgets
//!
//! Animated components built on the Glint surface and animation crates.
//!
//! - [`DownloadButton`]: a download button that morphs into a progress ring,
//!   pops a checkmark and reports completion

pub mod download_button;

pub use download_button::{
    ButtonError, ButtonState, CompleteHook, DownloadButton, DownloadButtonProps, ShapeName,
    ShapeRefs, CYCLE_DURATION_MS,
};
