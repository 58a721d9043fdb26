//! Animation scheduler
//!
//! Owns every playing [`Timeline`] and advances them each frame, either from
//! a background thread ([`AnimationScheduler::start_background`]) or by
//! explicit ticks from the caller. Components never own the scheduler; they
//! hold a weak [`SchedulerHandle`] and register timelines through it.
//!
//! Finished timelines are dropped from the scheduler and their completion
//! callbacks run after the scheduler lock is released, so a callback may
//! register a new timeline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use slotmap::{new_key_type, SlotMap};

use crate::timeline::{CompleteCallback, Timeline};

new_key_type! {
    pub struct TimelineId;
}

/// Default frame rate of the background thread
pub const DEFAULT_TARGET_FPS: u32 = 120;

/// Internal state of the animation scheduler
struct SchedulerInner {
    timelines: SlotMap<TimelineId, Timeline>,
    last_frame: Instant,
    target_fps: u32,
}

impl SchedulerInner {
    /// Advance every timeline, dropping finished ones
    ///
    /// Returns the completion callbacks to run once the lock is released.
    fn advance(&mut self, dt_ms: f32) -> Vec<CompleteCallback> {
        let mut completed = Vec::new();
        let mut finished = Vec::new();

        for (id, timeline) in self.timelines.iter_mut() {
            if let Some(callback) = timeline.tick(dt_ms) {
                completed.push(callback);
            }
            if !timeline.is_playing() {
                finished.push(id);
            }
        }

        for id in finished {
            self.timelines.remove(id);
            tracing::trace!(?id, "timeline removed");
        }
        completed
    }

    fn has_active(&self) -> bool {
        self.timelines.iter().any(|(_, t)| t.is_playing())
    }
}

fn lock(inner: &Mutex<SchedulerInner>) -> MutexGuard<'_, SchedulerInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

fn run_callbacks(callbacks: Vec<CompleteCallback>) {
    for callback in callbacks {
        callback();
    }
}

/// Callback for waking up the main thread from the animation thread
pub type WakeCallback = Arc<dyn Fn() + Send + Sync>;

/// Ticks all registered timelines
///
/// # Background Thread Mode
///
/// ```ignore
/// let mut scheduler = AnimationScheduler::new();
/// scheduler.start_background(); // Runs at the target fps until dropped
/// ```
pub struct AnimationScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
    /// Stop signal for background thread
    stop_flag: Arc<AtomicBool>,
    /// Set by the background thread while timelines are playing
    needs_redraw: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
    wake_callback: Option<WakeCallback>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                timelines: SlotMap::with_key(),
                last_frame: Instant::now(),
                target_fps: DEFAULT_TARGET_FPS,
            })),
            stop_flag: Arc::new(AtomicBool::new(false)),
            needs_redraw: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
            wake_callback: None,
        }
    }

    /// Set a callback invoked from the background thread on every frame in
    /// which timelines are playing
    pub fn set_wake_callback<F>(&mut self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.wake_callback = Some(Arc::new(callback));
    }

    /// Run the scheduler on a background thread
    pub fn start_background(&mut self) {
        if self.thread_handle.is_some() {
            return;
        }

        let inner = Arc::clone(&self.inner);
        let stop_flag = Arc::clone(&self.stop_flag);
        let needs_redraw = Arc::clone(&self.needs_redraw);
        let wake_callback = self.wake_callback.clone();

        self.thread_handle = Some(thread::spawn(move || {
            tracing::debug!("animation thread started");
            while !stop_flag.load(Ordering::Relaxed) {
                let start = Instant::now();

                let (completed, has_active, fps) = {
                    let mut inner = lock(&inner);
                    let now = Instant::now();
                    let dt_ms = (now - inner.last_frame).as_secs_f32() * 1000.0;
                    inner.last_frame = now;
                    let completed = inner.advance(dt_ms);
                    (completed, inner.has_active(), inner.target_fps.max(1))
                };
                let any_completed = !completed.is_empty();
                run_callbacks(completed);

                if has_active || any_completed {
                    needs_redraw.store(true, Ordering::Release);
                    if let Some(ref callback) = wake_callback {
                        callback();
                    }
                }

                let frame_duration = Duration::from_micros(1_000_000 / u64::from(fps));
                let elapsed = start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }
            tracing::debug!("animation thread stopped");
        }));
    }

    /// Stop the background thread
    pub fn stop_background(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
        self.stop_flag.store(false, Ordering::Relaxed);
    }

    pub fn is_background_running(&self) -> bool {
        self.thread_handle.is_some()
    }

    /// Check and clear the needs_redraw flag
    pub fn take_needs_redraw(&self) -> bool {
        self.needs_redraw.swap(false, Ordering::Acquire)
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn set_target_fps(&mut self, fps: u32) {
        lock(&self.inner).target_fps = fps.max(1);
    }

    pub fn target_fps(&self) -> u32 {
        lock(&self.inner).target_fps
    }

    /// Tick by the wall-clock time since the previous frame
    ///
    /// Returns true if any timelines are still playing.
    pub fn tick(&self) -> bool {
        let completed = {
            let mut inner = lock(&self.inner);
            let now = Instant::now();
            let dt_ms = (now - inner.last_frame).as_secs_f32() * 1000.0;
            inner.last_frame = now;
            inner.advance(dt_ms)
        };
        run_callbacks(completed);
        self.has_active_animations()
    }

    /// Tick by a fixed step, independent of the wall clock
    ///
    /// Returns true if any timelines are still playing.
    pub fn tick_by(&self, dt_ms: f32) -> bool {
        let completed = {
            let mut inner = lock(&self.inner);
            inner.last_frame = Instant::now();
            inner.advance(dt_ms)
        };
        run_callbacks(completed);
        self.has_active_animations()
    }

    pub fn has_active_animations(&self) -> bool {
        lock(&self.inner).has_active()
    }

    /// Number of registered timelines
    pub fn timeline_count(&self) -> usize {
        lock(&self.inner).timelines.len()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AnimationScheduler {
    fn drop(&mut self) {
        self.stop_background();
    }
}

impl std::fmt::Debug for AnimationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationScheduler")
            .field("timelines", &self.timeline_count())
            .field("background", &self.is_background_running())
            .finish()
    }
}

/// A weak handle to the animation scheduler
///
/// It won't prevent the scheduler from being dropped; every operation is a
/// no-op once it is.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Start `timeline` from the beginning and hand it to the scheduler
    ///
    /// The first frame is rendered before registration. Returns `None` if
    /// the scheduler is gone.
    pub fn register_timeline(&self, mut timeline: Timeline) -> Option<TimelineId> {
        let inner = self.inner.upgrade()?;
        timeline.play();
        let mut guard = lock(&inner);
        // Reset last_frame to now to prevent a huge dt on the first tick
        if !guard.has_active() {
            guard.last_frame = Instant::now();
        }
        let id = guard.timelines.insert(timeline);
        tracing::trace!(?id, "timeline registered");
        Some(id)
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl std::fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}
