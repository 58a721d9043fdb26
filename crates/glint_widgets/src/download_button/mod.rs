//! Animated download button
//!
//! Renders a pill-shaped "download" button and, when triggered, plays one
//! scripted cycle: the arrow nudges, the pill collapses into a ring that
//! draws itself while a dot travels around it and a gradient fills the
//! circle, the dot pops into a checkmark, everything fades, and the
//! completion hook runs.
//!
//! The button draws into a [`SharedSurface`] it does not own. Setup needs
//! the path flattener, which is loaded lazily; the static markup from
//! [`DownloadButton::render`] is available before that.
//!
//! ```rust
//! use glint_animation::AnimationScheduler;
//! use glint_svg::LazyFlattener;
//! use glint_widgets::{DownloadButton, DownloadButtonProps};
//!
//! let scheduler = AnimationScheduler::new();
//! let mut button = DownloadButton::new(
//!     scheduler.handle(),
//!     LazyFlattener::default(),
//!     DownloadButtonProps::new("Download"),
//! );
//!
//! let surface = button.render().into_shared();
//! let ready = pollster::block_on(button.mount(Some(surface))).unwrap();
//! assert!(ready);
//! assert!(button.trigger());
//! assert!(!button.trigger()); // ignored while playing
//! ```

mod cycle;
mod icon;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, MutexGuard, PoisonError};

use glint_animation::SchedulerHandle;
use glint_core::{SharedSurface, Surface};
use glint_svg::{LazyFlattener, SvgError, Trajectory};
use thiserror::Error;

pub use cycle::{register_eases, CYCLE_DURATION_MS, MORPH_EASE};
pub use icon::{
    build_surface, ShapeName, ShapeRefs, DISPLAY_SIZE, TRAJECTORY_PATH, TRAJECTORY_TOLERANCE,
    VIEWPORT,
};

/// Zero-argument completion hook
pub type CompleteHook = Arc<dyn Fn() + Send + Sync>;

/// Errors from [`DownloadButton::setup`]
#[derive(Error, Debug)]
pub enum ButtonError {
    /// The surface has no shape with this class
    #[error("surface has no shape with class `{0}`")]
    MissingShape(&'static str),

    /// The trajectory could not be computed
    #[error("failed to flatten trajectory: {0}")]
    Flatten(#[from] SvgError),
}

/// Download button properties
#[derive(Clone)]
pub struct DownloadButtonProps {
    /// Label text, rendered verbatim
    pub text: String,
    /// Called once at the end of every cycle
    pub on_complete: CompleteHook,
}

impl Default for DownloadButtonProps {
    fn default() -> Self {
        Self::new("Download")
    }
}

impl DownloadButtonProps {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            on_complete: Arc::new(|| {}),
        }
    }

    /// Set the completion hook
    pub fn on_complete<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_complete = Arc::new(hook);
        self
    }
}

impl std::fmt::Debug for DownloadButtonProps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadButtonProps")
            .field("text", &self.text)
            .finish_non_exhaustive()
    }
}

/// Playback state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonState {
    Idle,
    Playing,
}

/// Everything computed by setup
struct Mounted {
    refs: ShapeRefs,
    trajectory: Arc<Trajectory>,
    /// Surface right after setup; every cycle starts from it
    pristine: Surface,
}

/// The animated download button
pub struct DownloadButton {
    scheduler: SchedulerHandle,
    flattener: LazyFlattener,
    props: DownloadButtonProps,
    surface: Option<SharedSurface>,
    mounted: Option<Mounted>,
    playing: Arc<AtomicBool>,
}

/// Returns the button to idle when the cycle's completion step ends,
/// including by unwinding out of a panicking hook
struct IdleOnDrop(Arc<AtomicBool>);

impl Drop for IdleOnDrop {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn lock(surface: &SharedSurface) -> MutexGuard<'_, Surface> {
    surface.lock().unwrap_or_else(PoisonError::into_inner)
}

impl DownloadButton {
    /// Create an unmounted button
    pub fn new(
        scheduler: SchedulerHandle,
        flattener: LazyFlattener,
        props: DownloadButtonProps,
    ) -> Self {
        cycle::register_eases();
        Self {
            scheduler,
            flattener,
            props,
            surface: None,
            mounted: None,
            playing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Static markup with the current text
    pub fn render(&self) -> Surface {
        icon::build_surface(&self.props.text)
    }

    /// Attach `surface` (if any) and run [`setup`](Self::setup)
    pub async fn mount(&mut self, surface: Option<SharedSurface>) -> Result<bool, ButtonError> {
        if let Some(surface) = surface {
            self.attach(surface);
        }
        self.setup().await
    }

    /// Attach a surface; setup has to run again
    pub fn attach(&mut self, surface: SharedSurface) {
        self.mounted = None;
        self.surface = Some(surface);
    }

    /// Detach the surface, dropping shape references and trajectory
    ///
    /// A cycle that is already playing keeps writing to the detached surface
    /// until it ends.
    pub fn detach(&mut self) -> Option<SharedSurface> {
        self.mounted = None;
        self.surface.take()
    }

    /// Replace the props; setup has to run again
    pub fn set_props(&mut self, props: DownloadButtonProps) {
        self.props = props;
        self.mounted = None;
    }

    /// Prepare the attached surface for playback
    ///
    /// Returns `Ok(false)` without a surface. Otherwise looks up every named
    /// shape, puts them back into their static state with the current label,
    /// loads the flattener and computes the dot's trajectory. Any previous
    /// setup is discarded first.
    pub async fn setup(&mut self) -> Result<bool, ButtonError> {
        self.mounted = None;
        let Some(surface) = self.surface.clone() else {
            tracing::debug!("download button has no surface, skipping setup");
            return Ok(false);
        };

        let refs = {
            let mut guard = lock(&surface);
            let refs = ShapeRefs::resolve(&guard)?;
            icon::reset_shapes(&mut guard, &refs, &self.props.text);
            refs
        };

        let flattener = self.flattener.resolve().await?;
        let trajectory = flattener.flatten(TRAJECTORY_PATH)?;
        if trajectory.is_empty() {
            return Err(SvgError::EmptyPath.into());
        }
        if !trajectory.points().iter().all(|p| p.is_finite()) {
            return Err(SvgError::Unsupported("non-finite trajectory".into()).into());
        }

        let pristine = lock(&surface).clone();
        tracing::debug!(
            text = %self.props.text,
            points = trajectory.len(),
            "download button ready"
        );
        self.mounted = Some(Mounted {
            refs,
            trajectory: Arc::new(trajectory),
            pristine,
        });
        Ok(true)
    }

    /// Start a cycle
    ///
    /// Returns `false` (and does nothing) if setup has not completed or a
    /// cycle is already playing.
    pub fn trigger(&self) -> bool {
        let (Some(surface), Some(mounted)) = (&self.surface, &self.mounted) else {
            tracing::debug!("download button not ready, ignoring trigger");
            return false;
        };
        if self
            .playing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("download button already playing, ignoring trigger");
            return false;
        }

        *lock(surface) = mounted.pristine.clone();

        let hook = Arc::clone(&self.props.on_complete);
        let idle = IdleOnDrop(Arc::clone(&self.playing));
        let timeline = cycle::build(surface, &mounted.refs, &mounted.trajectory, move || {
            let _idle = idle;
            hook();
            tracing::debug!("download cycle complete");
        });

        match self.scheduler.register_timeline(timeline) {
            Some(id) => {
                tracing::debug!(?id, "download cycle started");
                true
            }
            None => {
                tracing::warn!("animation scheduler is gone, cannot play");
                self.playing.store(false, Ordering::Release);
                false
            }
        }
    }

    pub fn state(&self) -> ButtonState {
        if self.playing.load(Ordering::Acquire) {
            ButtonState::Playing
        } else {
            ButtonState::Idle
        }
    }

    /// Whether setup has completed for the current surface and props
    pub fn is_ready(&self) -> bool {
        self.mounted.is_some()
    }

    /// Sample points of the dot's path, once set up
    pub fn trajectory(&self) -> Option<&Arc<Trajectory>> {
        self.mounted.as_ref().map(|m| &m.trajectory)
    }

    pub fn props(&self) -> &DownloadButtonProps {
        &self.props
    }

    /// The attached surface
    pub fn surface(&self) -> Option<&SharedSurface> {
        self.surface.as_ref()
    }
}

impl std::fmt::Debug for DownloadButton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadButton")
            .field("props", &self.props)
            .field("state", &self.state())
            .field("ready", &self.is_ready())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_animation::AnimationScheduler;
    use glint_core::{Point, Shape};
    use glint_svg::PathFlattener;

    fn button(scheduler: &AnimationScheduler, text: &str) -> DownloadButton {
        DownloadButton::new(
            scheduler.handle(),
            LazyFlattener::lyon(TRAJECTORY_TOLERANCE),
            DownloadButtonProps::new(text),
        )
    }

    #[test]
    fn test_setup_without_surface_is_silent() {
        let scheduler = AnimationScheduler::new();
        let mut button = button(&scheduler, "Download");
        assert!(!pollster::block_on(button.mount(None)).unwrap());
        assert!(!button.is_ready());
        assert!(!button.trigger());
        assert_eq!(button.state(), ButtonState::Idle);
    }

    #[test]
    fn test_render_needs_no_flattener() {
        let scheduler = AnimationScheduler::new();
        let flattener = LazyFlattener::lyon(TRAJECTORY_TOLERANCE);
        let button = DownloadButton::new(
            scheduler.handle(),
            flattener.clone(),
            DownloadButtonProps::new("Save"),
        );
        let surface = button.render();
        let label = surface.find("label").unwrap();
        assert_eq!(surface.text(label), Some("Save"));
        assert!(!flattener.is_resolved());
    }

    #[test]
    fn test_setup_writes_label_and_trajectory() {
        let scheduler = AnimationScheduler::new();
        let mut button = button(&scheduler, "Get it");
        // Markup rendered with other text is corrected by setup
        let surface = build_surface("placeholder").into_shared();
        assert!(pollster::block_on(button.mount(Some(surface.clone()))).unwrap());

        let guard = lock(&surface);
        assert_eq!(guard.text(guard.find("label").unwrap()), Some("Get it"));
        drop(guard);

        let trajectory = button.trajectory().unwrap();
        assert!(!trajectory.is_empty());
        assert_eq!(trajectory.points()[0], Point::new(50.0, 15.0));
    }

    #[test]
    fn test_missing_shapes_fail_setup() {
        let scheduler = AnimationScheduler::new();
        let mut button = button(&scheduler, "Download");
        let mut surface = Surface::new(VIEWPORT, DISPLAY_SIZE);
        surface.insert(Shape::circle("dot", Point::new(0.0, 0.0), 1.0));

        let result = pollster::block_on(button.mount(Some(surface.into_shared())));
        assert!(matches!(result, Err(ButtonError::MissingShape("button"))));
        assert!(!button.is_ready());
        assert!(!button.trigger());
    }

    #[test]
    fn test_flattener_failure_is_reported() {
        struct Broken;
        impl PathFlattener for Broken {
            fn flatten(&self, _data: &str) -> Result<Trajectory, SvgError> {
                Err(SvgError::Unsupported("broken".into()))
            }
        }

        let scheduler = AnimationScheduler::new();
        let mut button = DownloadButton::new(
            scheduler.handle(),
            LazyFlattener::ready(Arc::new(Broken)),
            DownloadButtonProps::default(),
        );
        let surface = button.render().into_shared();
        let result = pollster::block_on(button.mount(Some(surface)));
        assert!(matches!(result, Err(ButtonError::Flatten(_))));
        assert!(!button.is_ready());
    }

    #[test]
    fn test_set_props_requires_new_setup() {
        let scheduler = AnimationScheduler::new();
        let mut button = button(&scheduler, "Download");
        let surface = button.render().into_shared();
        pollster::block_on(button.mount(Some(surface))).unwrap();
        assert!(button.is_ready());

        button.set_props(DownloadButtonProps::new("Again"));
        assert!(!button.is_ready());
        assert!(!button.trigger());
        assert!(pollster::block_on(button.setup()).unwrap());
        assert_eq!(button.props().text, "Again");
    }

    #[test]
    fn test_detach_drops_setup() {
        let scheduler = AnimationScheduler::new();
        let mut button = button(&scheduler, "Download");
        let surface = button.render().into_shared();
        pollster::block_on(button.mount(Some(surface))).unwrap();

        assert!(button.detach().is_some());
        assert!(!button.is_ready());
        assert!(button.trajectory().is_none());
        assert!(!pollster::block_on(button.setup()).unwrap());
    }

    #[test]
    fn test_panicking_hook_still_returns_to_idle() {
        let scheduler = AnimationScheduler::new();
        let mut button = DownloadButton::new(
            scheduler.handle(),
            LazyFlattener::lyon(TRAJECTORY_TOLERANCE),
            DownloadButtonProps::new("Download").on_complete(|| panic!("hook failed")),
        );
        let surface = button.render().into_shared();
        pollster::block_on(button.mount(Some(surface))).unwrap();
        assert!(button.trigger());

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            scheduler.tick_by(CYCLE_DURATION_MS + 100.0);
        }));
        assert!(result.is_err());
        assert_eq!(button.state(), ButtonState::Idle);
        assert!(button.trigger());
    }

    #[test]
    fn test_trigger_without_scheduler_stays_idle() {
        let scheduler = AnimationScheduler::new();
        let mut button = button(&scheduler, "Download");
        let surface = button.render().into_shared();
        pollster::block_on(button.mount(Some(surface))).unwrap();

        drop(scheduler);
        assert!(!button.trigger());
        assert_eq!(button.state(), ButtonState::Idle);
    }
}
