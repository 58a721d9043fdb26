//! Glint Animation
//!
//! Eased tweens, labelled timelines and a frame scheduler.
//!
//! # Features
//!
//! - **Easing**: polynomial, back, cubic Bézier and slow-motion curves
//! - **Plugins**: a process-wide registry of named eases, registered once
//! - **Tweens**: animate shape attributes or move shapes along a polyline
//! - **Timelines**: place tweens by absolute time, offset or label so
//!   segments can overlap
//! - **Scheduler**: ticks timelines on a background thread or on demand and
//!   runs completion callbacks outside its lock

pub mod easing;
pub mod error;
pub mod plugins;
pub mod scheduler;
pub mod timeline;
pub mod tween;
pub mod values;

pub use easing::{Easing, BACK_OVERSHOOT};
pub use error::EasingError;
pub use plugins::{is_registered, lookup, register_ease, register_plugins};
pub use scheduler::{
    AnimationScheduler, SchedulerHandle, TimelineId, WakeCallback, DEFAULT_TARGET_FPS,
};
pub use timeline::{CompleteCallback, Position, Timeline};
pub use tween::{AttrTween, MotionTween, Tween, TweenAction};
pub use values::Interpolate;
