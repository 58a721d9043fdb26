//! Timeline orchestration
//!
//! A [`Timeline`] places tweens on a shared playhead. Each tween is positioned
//! with a [`Position`]: appended after everything so far, offset from that
//! end, pinned to an absolute time, or placed relative to a named label.
//! Labels let later segments start before earlier ones finish, so eased
//! segments overlap instead of running strictly one after another.
//!
//! ```rust
//! use glint_animation::{Position, Timeline, Tween};
//!
//! let mut timeline = Timeline::new();
//! timeline.add(Tween::new(300.0), Position::End);
//! timeline.add_label("next", Position::offset(-100.0));
//! timeline.add(Tween::new(500.0), Position::label("next"));
//! assert_eq!(timeline.duration_ms(), 700.0);
//! ```

use indexmap::IndexMap;

use crate::tween::Tween;

/// Callback fired once when a timeline reaches its end
pub type CompleteCallback = Box<dyn FnOnce() + Send>;

/// Where a tween or label goes on the timeline
#[derive(Clone, Debug, PartialEq)]
pub enum Position {
    /// At the current end of the timeline
    End,
    /// Relative to the current end (negative overlaps the previous content)
    Offset(f32),
    /// Absolute time in milliseconds
    At(f32),
    /// At a label; unknown labels are created at the current end
    Label(String),
    /// Relative to a label
    LabelOffset(String, f32),
}

impl Position {
    pub fn offset(ms: f32) -> Self {
        Position::Offset(ms)
    }

    pub fn at(ms: f32) -> Self {
        Position::At(ms)
    }

    pub fn label(name: impl Into<String>) -> Self {
        Position::Label(name.into())
    }

    pub fn label_offset(name: impl Into<String>, ms: f32) -> Self {
        Position::LabelOffset(name.into(), ms)
    }
}

#[derive(Debug)]
struct TimelineEntry {
    start_ms: f32,
    tween: Tween,
    started: bool,
    finished: bool,
}

impl TimelineEntry {
    fn end_ms(&self) -> f32 {
        self.start_ms + self.tween.duration_ms()
    }
}

/// Tweens and labels on one playhead
pub struct Timeline {
    /// Sorted by start time; ties keep insertion order
    entries: Vec<TimelineEntry>,
    labels: IndexMap<String, f32>,
    end_ms: f32,
    time_ms: f32,
    playing: bool,
    on_complete: Option<CompleteCallback>,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            labels: IndexMap::new(),
            end_ms: 0.0,
            time_ms: 0.0,
            playing: false,
            on_complete: None,
        }
    }

    fn resolve(&mut self, position: &Position) -> f32 {
        let time = match position {
            Position::End => self.end_ms,
            Position::Offset(ms) => self.end_ms + ms,
            Position::At(ms) => *ms,
            Position::Label(name) => self.label_or_end(name),
            Position::LabelOffset(name, ms) => self.label_or_end(name) + ms,
        };
        time.max(0.0)
    }

    fn label_or_end(&mut self, name: &str) -> f32 {
        let end = self.end_ms;
        *self.labels.entry(name.to_string()).or_insert(end)
    }

    /// Add (or move) a label; returns its time
    ///
    /// Labels do not extend the timeline's duration.
    pub fn add_label(&mut self, name: impl Into<String>, position: Position) -> f32 {
        let time = self.resolve(&position);
        self.labels.insert(name.into(), time);
        time
    }

    /// Time of a label in milliseconds
    pub fn label_time(&self, name: &str) -> Option<f32> {
        self.labels.get(name).copied()
    }

    /// Place a tween; returns its start time
    pub fn add(&mut self, tween: Tween, position: Position) -> f32 {
        let start_ms = self.resolve(&position);
        let entry = TimelineEntry {
            start_ms,
            tween,
            started: false,
            finished: false,
        };
        self.end_ms = self.end_ms.max(entry.end_ms());

        let idx = self.entries.partition_point(|e| e.start_ms <= start_ms);
        self.entries.insert(idx, entry);
        start_ms
    }

    /// Set the callback fired when the playhead reaches the end
    pub fn on_complete<F>(&mut self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_complete = Some(Box::new(callback));
    }

    pub fn duration_ms(&self) -> f32 {
        self.end_ms
    }

    pub fn time_ms(&self) -> f32 {
        self.time_ms
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get progress (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        if self.end_ms <= 0.0 {
            return if self.playing { 0.0 } else { 1.0 };
        }
        (self.time_ms / self.end_ms).clamp(0.0, 1.0)
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Start from the beginning and render the first frame
    pub fn play(&mut self) {
        self.time_ms = 0.0;
        self.playing = true;
        for entry in &mut self.entries {
            entry.started = false;
            entry.finished = false;
        }
        self.render();
    }

    /// Advance by `dt_ms`
    ///
    /// Returns the completion callback when this tick reaches the end; the
    /// caller decides where to run it.
    pub fn tick(&mut self, dt_ms: f32) -> Option<CompleteCallback> {
        if !self.playing {
            return None;
        }

        self.time_ms = (self.time_ms + dt_ms.max(0.0)).min(self.end_ms);
        self.render();

        if self.time_ms >= self.end_ms {
            self.playing = false;
            tracing::trace!(duration_ms = self.end_ms, "timeline complete");
            return self.on_complete.take();
        }
        None
    }

    fn render(&mut self) {
        let time = self.time_ms;
        for entry in &mut self.entries {
            if entry.finished {
                continue;
            }
            if time < entry.start_ms {
                // Entries are sorted, nothing later has started either
                break;
            }
            if !entry.started {
                entry.tween.begin();
                entry.started = true;
            }

            let duration = entry.tween.duration_ms();
            let local = if duration <= 0.0 {
                1.0
            } else {
                ((time - entry.start_ms) / duration).clamp(0.0, 1.0)
            };
            entry.tween.render(local);
            if local >= 1.0 {
                entry.finished = true;
            }
        }
    }
}

impl std::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("entries", &self.entries.len())
            .field("labels", &self.labels)
            .field("end_ms", &self.end_ms)
            .field("time_ms", &self.time_ms)
            .field("playing", &self.playing)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tween::TweenAction;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Records every eased value it receives
    struct Probe(Arc<Mutex<Vec<f32>>>);

    impl TweenAction for Probe {
        fn update(&mut self, eased: f32) {
            self.0.lock().unwrap().push(eased);
        }
    }

    fn probe() -> (Probe, Arc<Mutex<Vec<f32>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        (Probe(log.clone()), log)
    }

    #[test]
    fn test_sequential_positions() {
        let mut tl = Timeline::new();
        let a = tl.add(Tween::new(200.0), Position::End);
        let b = tl.add(Tween::new(300.0), Position::End);
        assert_eq!(a, 0.0);
        assert_eq!(b, 200.0);
        assert_eq!(tl.duration_ms(), 500.0);
    }

    #[test]
    fn test_overlap_and_labels() {
        let mut tl = Timeline::new();
        tl.add(Tween::new(600.0), Position::label("morph"));
        assert_eq!(tl.label_time("morph"), Some(0.0));

        let load = tl.add_label("load", Position::label_offset("morph", 500.0));
        assert_eq!(load, 500.0);

        let ring = tl.add(Tween::new(1000.0), Position::label("load"));
        assert_eq!(ring, 500.0);
        assert_eq!(tl.duration_ms(), 1500.0);

        let tail = tl.add(Tween::new(100.0), Position::offset(-200.0));
        assert_eq!(tail, 1300.0);
    }

    #[test]
    fn test_unknown_label_created_at_end() {
        let mut tl = Timeline::new();
        tl.add(Tween::new(250.0), Position::End);
        let start = tl.add(Tween::new(50.0), Position::label("later"));
        assert_eq!(start, 250.0);
        assert_eq!(tl.label_time("later"), Some(250.0));
    }

    #[test]
    fn test_negative_positions_clamp_to_zero() {
        let mut tl = Timeline::new();
        let start = tl.add(Tween::new(100.0), Position::offset(-500.0));
        assert_eq!(start, 0.0);
    }

    #[test]
    fn test_playback_renders_progress() {
        let (action, log) = probe();
        let mut tl = Timeline::new();
        tl.add(Tween::new(100.0).with(action), Position::at(100.0));

        tl.play();
        assert!(log.lock().unwrap().is_empty(), "not started yet");

        tl.tick(150.0);
        assert_eq!(*log.lock().unwrap(), vec![0.5]);

        // Overshooting the end renders the final value exactly once
        tl.tick(500.0);
        tl.tick(16.0);
        assert_eq!(*log.lock().unwrap(), vec![0.5, 1.0]);
        assert!(!tl.is_playing());
        assert_eq!(tl.progress(), 1.0);
    }

    #[test]
    fn test_skipped_tweens_still_finish() {
        let (first, first_log) = probe();
        let (second, second_log) = probe();
        let mut tl = Timeline::new();
        tl.add(Tween::new(100.0).with(first), Position::End);
        tl.add(Tween::new(100.0).with(second), Position::End);

        tl.play();
        tl.tick(1000.0);
        assert_eq!(first_log.lock().unwrap().last(), Some(&1.0));
        assert_eq!(second_log.lock().unwrap().last(), Some(&1.0));
    }

    #[test]
    fn test_zero_duration_set() {
        let (action, log) = probe();
        let mut tl = Timeline::new();
        tl.add(Tween::new(100.0), Position::End);
        tl.add(Tween::set().with(action), Position::End);

        tl.play();
        tl.tick(99.0);
        assert!(log.lock().unwrap().is_empty());
        tl.tick(1.0);
        assert_eq!(*log.lock().unwrap(), vec![1.0]);
    }

    #[test]
    fn test_complete_callback_returned_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut tl = Timeline::new();
        tl.add(Tween::new(100.0), Position::End);
        let c = count.clone();
        tl.on_complete(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        tl.play();
        assert!(tl.tick(50.0).is_none());
        let callback = tl.tick(50.0).expect("completes at the end");
        callback();
        assert!(tl.tick(50.0).is_none());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_tick_before_play_does_nothing() {
        let (action, log) = probe();
        let mut tl = Timeline::new();
        tl.add(Tween::new(100.0).with(action), Position::End);
        assert!(tl.tick(50.0).is_none());
        assert!(log.lock().unwrap().is_empty());
    }
}
