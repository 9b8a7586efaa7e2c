//! End-to-end behavior of the phase engine driven by deterministic ticks

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chartkit_animation::{
    Animator, AnimatorHandle, AnimatorObserver, Dimension, EasingFunction, EasingOption,
    FrameLoop, ManualClock, ManualTickSource,
};

const EPSILON: f64 = 1e-9;

fn engine() -> (Rc<ManualTickSource>, ManualClock, Animator) {
    let ticks = Rc::new(ManualTickSource::new());
    let clock = ManualClock::new(0.0);
    let animator = Animator::new(ticks.clone(), Rc::new(clock.clone()));
    (ticks, clock, animator)
}

#[test]
fn linear_phase_follows_elapsed_time() {
    let (ticks, clock, animator) = engine();
    animator.animate(Dimension::Y, 2.0, None);

    clock.set(1.0);
    ticks.tick();
    assert!((animator.phase_y() - 0.5).abs() < EPSILON);

    clock.set(2.0);
    ticks.tick();
    assert_eq!(animator.phase_y(), 1.0);
    assert!(!ticks.has_subscribers());
}

#[test]
fn phase_is_monotonic_under_irregular_ticks() {
    let (ticks, clock, animator) = engine();
    animator.animate_xy_with_options(3.0, 2.0, EasingOption::Linear, EasingOption::EaseOutCubic);

    let mut last = (animator.phase_x(), animator.phase_y());
    for step in [0.01, 0.4, 0.05, 0.9, 0.0, 0.33, 0.7, 1.2] {
        clock.advance(step);
        ticks.tick();

        let current = (animator.phase_x(), animator.phase_y());
        assert!(current.0 >= last.0 && current.1 >= last.1);
        assert!((0.0..=1.0).contains(&current.0));
        assert!((0.0..=1.0).contains(&current.1));
        last = current;
    }

    assert_eq!(last, (1.0, 1.0));
    assert!(!animator.is_running());
}

#[test]
fn skipped_frames_land_on_the_same_value() {
    let (ticks_a, clock_a, smooth) = engine();
    let (ticks_b, clock_b, choppy) = engine();
    smooth.animate_with_option(Dimension::X, 1.0, EasingOption::EaseInOutSine);
    choppy.animate_with_option(Dimension::X, 1.0, EasingOption::EaseInOutSine);

    for frame in 1..=6 {
        clock_a.set(f64::from(frame) * 0.1);
        ticks_a.tick();
    }
    clock_b.set(0.6);
    ticks_b.tick();

    assert!((smooth.phase_x() - choppy.phase_x()).abs() < EPSILON);
}

#[test]
fn wild_easing_output_is_clamped() {
    let (ticks, clock, animator) = engine();
    let wild: EasingFunction = Rc::new(|elapsed, _| if elapsed < 0.5 { -3.0 } else { f64::NAN });
    animator.animate(Dimension::Magnitude, 1.0, Some(wild));
    assert_eq!(animator.phase_magnitude(), 0.0);

    clock.set(0.25);
    ticks.tick();
    assert_eq!(animator.phase_magnitude(), 0.0);

    clock.set(0.75);
    ticks.tick();
    assert_eq!(animator.phase_magnitude(), 0.0);

    clock.set(1.0);
    ticks.tick();
    assert_eq!(animator.phase_magnitude(), 1.0);
}

#[test]
fn overshooting_presets_stay_in_range() {
    let (ticks, clock, animator) = engine();
    animator.animate_xy_with_options(1.0, 1.0, EasingOption::EaseOutBack, EasingOption::EaseOutElastic);

    for _ in 0..20 {
        clock.advance(0.05);
        ticks.tick();
        assert!((0.0..=1.0).contains(&animator.phase_x()));
        assert!((0.0..=1.0).contains(&animator.phase_y()));
    }
    assert!(!animator.is_running());
}

#[test]
fn stop_from_stopped_callback_is_harmless() {
    let (ticks, clock, animator) = engine();
    let stopped = Rc::new(Cell::new(0));
    let count = stopped.clone();
    animator.on_stopped(move |handle| {
        count.set(count.get() + 1);
        handle.stop();
    });

    animator.animate(Dimension::X, 1.0, None);
    clock.set(1.0);
    ticks.tick();
    animator.stop();

    assert_eq!(stopped.get(), 1);
}

#[test]
fn restart_from_stopped_callback() {
    let (ticks, clock, animator) = engine();
    let rounds = Rc::new(Cell::new(0));
    let count = rounds.clone();
    animator.on_stopped(move |handle| {
        count.set(count.get() + 1);
        if count.get() < 3 {
            handle.animate(Dimension::X, 1.0, None);
        }
    });

    animator.animate(Dimension::X, 1.0, None);
    for _ in 0..10 {
        clock.advance(1.0);
        ticks.tick();
    }

    assert_eq!(rounds.get(), 3);
    assert!(!animator.is_running());
    assert_eq!(animator.phase_x(), 1.0);
}

struct Sparkline {
    frames: RefCell<Vec<(f64, f64)>>,
    finished: Cell<bool>,
}

impl AnimatorObserver for Sparkline {
    fn animator_updated(&self, animator: &AnimatorHandle) {
        self.frames
            .borrow_mut()
            .push((animator.phase_x(), animator.phase_y()));
    }

    fn animator_stopped(&self, _animator: &AnimatorHandle) {
        self.finished.set(true);
    }
}

#[test]
fn delegate_sees_every_frame() {
    let (ticks, clock, animator) = engine();
    let view = Rc::new(Sparkline {
        frames: RefCell::new(Vec::new()),
        finished: Cell::new(false),
    });
    let delegate: Rc<dyn AnimatorObserver> = view.clone();
    animator.subscribe(Rc::downgrade(&delegate));

    animator.animate_xy_shared(1.0, 0.5, None);
    for _ in 0..4 {
        clock.advance(0.25);
        ticks.tick();
    }

    assert_eq!(
        *view.frames.borrow(),
        vec![(0.25, 0.5), (0.5, 1.0), (0.75, 1.0), (1.0, 1.0)]
    );
    assert!(view.finished.get());
}

#[test]
fn frame_loop_runs_animation_to_completion() {
    let frames = Rc::new(FrameLoop::new(240));
    let animator = Animator::with_system_clock(frames.clone());
    let stopped = Rc::new(Cell::new(false));
    let flag = stopped.clone();
    animator.on_stopped(move |_| flag.set(true));

    animator.animate_xy(0.02, 0.03, None, None);
    let delivered = frames.run_until_idle();

    assert!(delivered >= 1);
    assert!(stopped.get());
    assert_eq!(animator.phase_x(), 1.0);
    assert_eq!(animator.phase_y(), 1.0);
    assert!(!frames.has_subscribers());
}
