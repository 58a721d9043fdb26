//! End-to-end playback of the download button

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use glint_animation::AnimationScheduler;
use glint_core::{AttrValue, Property, SharedSurface};
use glint_svg::LazyFlattener;
use glint_widgets::{
    ButtonState, DownloadButton, DownloadButtonProps, ShapeName, CYCLE_DURATION_MS,
};

const FRAME_MS: f32 = 1000.0 / 60.0;

struct Harness {
    scheduler: AnimationScheduler,
    button: DownloadButton,
    surface: SharedSurface,
    completions: Arc<AtomicUsize>,
}

fn counting_props(text: &str, completions: &Arc<AtomicUsize>) -> DownloadButtonProps {
    let counter = completions.clone();
    DownloadButtonProps::new(text).on_complete(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    })
}

fn mount(text: &str) -> Harness {
    let scheduler = AnimationScheduler::new();
    let completions = Arc::new(AtomicUsize::new(0));
    let props = counting_props(text, &completions);

    let mut button = DownloadButton::new(scheduler.handle(), LazyFlattener::default(), props);
    let surface = button.render().into_shared();
    let ready = pollster::block_on(button.mount(Some(surface.clone()))).unwrap();
    assert!(ready);

    Harness {
        scheduler,
        button,
        surface,
        completions,
    }
}

impl Harness {
    /// Advance in 60 fps frames
    fn run_for(&self, ms: f32) {
        let mut elapsed = 0.0;
        while elapsed < ms {
            let step = FRAME_MS.min(ms - elapsed);
            self.scheduler.tick_by(step);
            elapsed += step;
        }
    }

    /// Swap in new text and mount again on the same surface
    fn remount(&mut self, text: &str) {
        self.button.set_props(counting_props(text, &self.completions));
        let ready = pollster::block_on(self.button.mount(Some(self.surface.clone()))).unwrap();
        assert!(ready);
    }

    fn assert_static(&self, text: &str) {
        assert_eq!(self.label(), text);
        assert_eq!(
            self.attr(ShapeName::Label, Property::Opacity),
            AttrValue::Number(1.0)
        );
        assert_eq!(
            self.attr(ShapeName::Label, Property::FontSize),
            AttrValue::Number(6.0)
        );
        assert_eq!(
            self.attr(ShapeName::ButtonOutline, Property::Opacity),
            AttrValue::Number(1.0)
        );
        assert_eq!(
            self.attr(ShapeName::Dot, Property::Visible),
            AttrValue::Flag(true)
        );
    }

    fn completions(&self) -> usize {
        self.completions.load(Ordering::SeqCst)
    }

    fn label(&self) -> String {
        let surface = self.surface.lock().unwrap();
        let key = surface.find(ShapeName::Label.class()).unwrap();
        surface.text(key).unwrap().to_string()
    }

    fn attr(&self, name: ShapeName, property: Property) -> AttrValue {
        let surface = self.surface.lock().unwrap();
        let key = surface.find(name.class()).unwrap();
        surface.get(key, property).unwrap()
    }
}

#[test]
fn download_cycle_completes_once() {
    let h = mount("Download");
    assert!(h.button.trigger());
    assert_eq!(h.button.state(), ButtonState::Playing);

    h.run_for(CYCLE_DURATION_MS + 100.0);

    assert_eq!(h.completions(), 1);
    assert_eq!(h.label(), "Download");
    assert_eq!(h.button.state(), ButtonState::Idle);
    assert!(!h.scheduler.has_active_animations());
    assert_eq!(h.scheduler.timeline_count(), 0);
}

#[test]
fn nothing_completes_early() {
    let h = mount("Download");
    h.button.trigger();
    h.run_for(CYCLE_DURATION_MS - 50.0);
    assert_eq!(h.completions(), 0);
    assert_eq!(h.button.state(), ButtonState::Playing);
}

#[test]
fn double_trigger_plays_one_cycle() {
    let h = mount("Download");
    assert!(h.button.trigger());
    assert!(!h.button.trigger());

    h.run_for(500.0);
    assert!(!h.button.trigger());
    assert_eq!(h.scheduler.timeline_count(), 1);

    h.run_for(CYCLE_DURATION_MS);
    assert_eq!(h.completions(), 1);
}

#[test]
fn empty_label_still_completes() {
    let h = mount("");
    assert_eq!(h.label(), "");
    assert!(h.button.trigger());
    h.run_for(CYCLE_DURATION_MS + 100.0);
    assert_eq!(h.completions(), 1);
    assert_eq!(h.label(), "");
}

#[test]
fn new_cycle_after_completion() {
    let h = mount("Download");
    h.button.trigger();
    h.run_for(CYCLE_DURATION_MS + 100.0);
    assert_eq!(
        h.attr(ShapeName::Dot, Property::Visible),
        AttrValue::Flag(false)
    );

    // The next cycle starts from the pristine button
    assert!(h.button.trigger());
    assert_eq!(
        h.attr(ShapeName::Label, Property::Opacity),
        AttrValue::Number(1.0)
    );
    assert_eq!(
        h.attr(ShapeName::Dot, Property::Visible),
        AttrValue::Flag(true)
    );

    h.run_for(CYCLE_DURATION_MS + 100.0);
    assert_eq!(h.completions(), 2);
    assert_eq!(h.button.state(), ButtonState::Idle);
}

#[test]
fn label_text_is_verbatim() {
    for text in ["Download", "", "Save <file> & \"go\"", "ダウンロード", "Down\u{1}load"] {
        let h = mount(text);
        assert_eq!(h.label(), text);

        let svg = h.surface.lock().unwrap().to_svg();
        let tree = usvg::Tree::from_str(&svg, &usvg::Options::default());
        assert!(tree.is_ok(), "{text:?}: {:?}", tree.err());
    }
}

#[test]
fn trajectory_points_are_finite() {
    let h = mount("Download");
    let trajectory = h.button.trajectory().unwrap();
    assert!(trajectory.len() > 1);
    assert!(trajectory.points().iter().all(|p| p.is_finite()));
}

#[test]
fn dot_ends_the_load_phase_back_at_the_top() {
    let h = mount("Download");
    h.button.trigger();
    // Past the end of the ring, before the dot fades
    h.run_for(2700.0);

    let cx = h.attr(ShapeName::Dot, Property::Cx).as_number().unwrap();
    let cy = h.attr(ShapeName::Dot, Property::Cy).as_number().unwrap();
    assert!((cx - 50.0).abs() < 1e-3 && (cy - 15.0).abs() < 1e-3, "({cx}, {cy})");
    assert_eq!(
        h.attr(ShapeName::SubCircle, Property::DashOffset),
        AttrValue::Number(0.0)
    );
}

#[test]
fn remount_after_cycle_starts_from_static_button() {
    let mut h = mount("Download");
    h.button.trigger();
    h.run_for(CYCLE_DURATION_MS + 100.0);
    assert_eq!(h.completions(), 1);

    h.remount("Again");
    h.assert_static("Again");

    assert!(h.button.trigger());
    h.assert_static("Again");

    // Halfway through loading everything but the label is on screen
    h.run_for(1750.0);
    for name in [ShapeName::ButtonOutline, ShapeName::SubCircle, ShapeName::Dot] {
        assert_eq!(
            h.attr(name, Property::Opacity),
            AttrValue::Number(1.0),
            "{name:?}"
        );
    }
    assert_eq!(
        h.attr(ShapeName::Dot, Property::Visible),
        AttrValue::Flag(true)
    );

    h.run_for(CYCLE_DURATION_MS);
    assert_eq!(h.completions(), 2);
    assert_eq!(h.label(), "Again");
}

#[test]
fn remount_while_playing() {
    let mut h = mount("Download");
    assert!(h.button.trigger());
    h.run_for(1000.0);

    h.remount("Again");
    assert_eq!(h.label(), "Again");
    assert_eq!(
        h.attr(ShapeName::ButtonOutline, Property::Opacity),
        AttrValue::Number(1.0)
    );
    // The running cycle keeps going and still guards against a second one
    assert_eq!(h.button.state(), ButtonState::Playing);
    assert!(!h.button.trigger());

    h.run_for(CYCLE_DURATION_MS);
    assert_eq!(h.completions(), 1);
    assert_eq!(h.button.state(), ButtonState::Idle);

    assert!(h.button.trigger());
    h.assert_static("Again");
    h.run_for(CYCLE_DURATION_MS + 100.0);
    assert_eq!(h.completions(), 2);
}
