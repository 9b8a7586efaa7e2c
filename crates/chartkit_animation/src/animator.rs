//! Animation phase engine
//!
//! The [`Animator`] turns wall-clock time into a normalized phase per
//! [`Dimension`]. Renderers poll [`Animator::phase`] while drawing and listen
//! for `updated`/`stopped` notifications to know when to redraw.
//!
//! The animator holds a tick subscription only while at least one dimension is
//! running, and drops it as soon as everything has settled or
//! [`Animator::stop`] is called. Dropping the animator stops it.
//!
//! ```
//! use std::rc::Rc;
//! use chartkit_animation::{Animator, Dimension, ManualClock, ManualTickSource};
//!
//! let ticks = Rc::new(ManualTickSource::new());
//! let clock = ManualClock::new(0.0);
//! let animator = Animator::new(ticks.clone(), Rc::new(clock.clone()));
//!
//! animator.animate(Dimension::Y, 2.0, None);
//! assert_eq!(animator.phase_y(), 0.0);
//! assert!(animator.is_running());
//!
//! clock.advance(1.0);
//! ticks.tick();
//! assert_eq!(animator.phase_y(), 0.5);
//!
//! clock.advance(1.0);
//! ticks.tick();
//! assert_eq!(animator.phase_y(), 1.0);
//! assert!(!animator.is_running());
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use crate::clock::{Clock, SystemClock};
use crate::dimension::Dimension;
use crate::easing::{EasingFunction, EasingOption};
use crate::error::{AnimationError, Result};
use crate::observer::{AnimatorCallback, AnimatorObserver, Notification, ObserverId, ObserverSet};
use crate::state::{DimensionState, StateStore};
use crate::ticker::{TickSource, TickSubscription};

/// A request to (re)arm one dimension
struct ArmRequest {
    dimension: Dimension,
    duration: f64,
    easing: Option<EasingFunction>,
}

impl ArmRequest {
    fn new(dimension: Dimension, duration: f64, easing: Option<EasingFunction>) -> Self {
        Self {
            dimension,
            duration,
            easing,
        }
    }
}

/// State shared between the owning [`Animator`], its handles and its tick
/// callback
///
/// No `RefCell` borrow is held while observers run, so they may call back
/// into the animator.
struct AnimatorShared {
    store: RefCell<StateStore>,
    observers: RefCell<ObserverSet>,
    subscription: Cell<Option<TickSubscription>>,
    tick_source: Rc<dyn TickSource>,
    clock: Rc<dyn Clock>,
}

impl AnimatorShared {
    fn handle(self: &Rc<Self>) -> AnimatorHandle {
        AnimatorHandle {
            shared: Rc::downgrade(self),
        }
    }

    /// Replace the records for every requested dimension, all starting now
    fn arm(self: &Rc<Self>, requests: impl IntoIterator<Item = ArmRequest>) {
        let now = self.clock.now();

        let armed: SmallVec<[(Dimension, DimensionState); 3]> = requests
            .into_iter()
            .map(|request| {
                let duration = sanitize_duration(request.dimension, request.duration);
                // Computed immediately so a renderer polling before the first
                // tick already sees the right value
                let state = DimensionState::armed(duration, now, request.easing).advanced(now);
                tracing::debug!(
                    dimension = %request.dimension,
                    duration,
                    phase = state.phase(),
                    "arming dimension"
                );
                (request.dimension, state)
            })
            .collect();

        {
            let mut store = self.store.borrow_mut();
            for (dimension, state) in armed {
                store.insert(dimension, state);
            }
        }

        // Re-arming the last running dimension with a zero duration leaves
        // nothing to tick
        let idle = !self.store.borrow().any_enabled();
        if idle && self.subscription.get().is_some() {
            self.stop();
        } else {
            self.ensure_subscribed();
        }
    }

    /// Cancel whatever is in flight, then arm X and Y together
    fn arm_xy(
        self: &Rc<Self>,
        x_duration: f64,
        y_duration: f64,
        easing_x: Option<EasingFunction>,
        easing_y: Option<EasingFunction>,
    ) {
        self.stop();
        self.arm([
            ArmRequest::new(Dimension::X, x_duration, easing_x),
            ArmRequest::new(Dimension::Y, y_duration, easing_y),
        ]);
    }

    fn ensure_subscribed(self: &Rc<Self>) {
        if self.subscription.get().is_some() || !self.store.borrow().any_enabled() {
            return;
        }

        let weak = Rc::downgrade(self);
        let subscription = self.tick_source.subscribe(Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.on_tick();
            }
        }));
        tracing::debug!("animator subscribed to tick source");
        self.subscription.set(Some(subscription));
    }

    fn on_tick(self: &Rc<Self>) {
        let now = self.clock.now();
        let advanced = self.store.borrow_mut().advance_enabled(now);
        tracing::trace!(now, advanced, "animator tick");

        self.notify(Notification::Updated);

        // Observers may have stopped or re-armed the animator
        if self.subscription.get().is_none() {
            return;
        }

        let finished = {
            let store = self.store.borrow();
            !store.any_enabled() || store.max_end_time().map_or(true, |end| now >= end)
        };
        if finished {
            self.stop();
        }
    }

    fn stop(self: &Rc<Self>) {
        // Taking the subscription first makes nested calls from observers no-ops
        let Some(subscription) = self.subscription.take() else {
            return;
        };
        self.tick_source.unsubscribe(subscription);

        let interrupted = {
            let mut store = self.store.borrow_mut();
            let interrupted = store.any_unfinished();
            store.disable_all();
            if interrupted {
                store.settle_all();
            }
            interrupted
        };
        tracing::debug!(interrupted, "animator stopped");

        if interrupted {
            self.notify(Notification::Updated);
        }

        // An observer may have re-armed from the forced update
        if self.subscription.get().is_some() {
            tracing::debug!("animator re-armed while stopping");
            return;
        }
        self.notify(Notification::Stopped);
    }

    fn notify(self: &Rc<Self>, notification: Notification) {
        let targets = self.observers.borrow_mut().targets(notification);
        if targets.is_empty() {
            return;
        }

        let handle = self.handle();
        for target in &targets {
            target.deliver(notification, &handle);
        }
    }

    fn phase(&self, dimension: Dimension) -> f64 {
        self.store.borrow().phase(dimension)
    }

    fn dimension_state(&self, dimension: Dimension) -> Option<DimensionState> {
        self.store.borrow().get(dimension).cloned()
    }

    fn is_running(&self) -> bool {
        self.subscription.get().is_some()
    }
}

impl Drop for AnimatorShared {
    fn drop(&mut self) {
        // Only reachable with a live subscription if an observer re-armed the
        // animator while it was being dropped
        if let Some(subscription) = self.subscription.take() {
            self.tick_source.unsubscribe(subscription);
        }
    }
}

fn sanitize_duration(dimension: Dimension, duration: f64) -> f64 {
    if duration.is_finite() && duration >= 0.0 {
        duration
    } else {
        tracing::warn!(%dimension, duration, "invalid animation duration, treating as zero");
        0.0
    }
}

/// Drives per-dimension phases from a [`TickSource`]
///
/// Single-threaded: ticks must arrive on the thread that owns the animator.
pub struct Animator {
    shared: Rc<AnimatorShared>,
}

impl Animator {
    pub fn new(tick_source: Rc<dyn TickSource>, clock: Rc<dyn Clock>) -> Self {
        Self {
            shared: Rc::new(AnimatorShared {
                store: RefCell::new(StateStore::new()),
                observers: RefCell::new(ObserverSet::new()),
                subscription: Cell::new(None),
                tick_source,
                clock,
            }),
        }
    }

    /// Create an animator timed by the monotonic system clock
    pub fn with_system_clock(tick_source: Rc<dyn TickSource>) -> Self {
        Self::new(tick_source, Rc::new(SystemClock::new()))
    }

    /// Get a weak handle to this animator
    ///
    /// The handle doesn't keep the animator alive.
    pub fn handle(&self) -> AnimatorHandle {
        self.shared.handle()
    }

    // =========================================================================
    // Arming
    // =========================================================================

    /// (Re)arm a single dimension
    ///
    /// Other dimensions keep running. A negative or non-finite duration is
    /// treated as zero, which settles the dimension at once.
    pub fn animate(&self, dimension: Dimension, duration: f64, easing: Option<EasingFunction>) {
        self.shared
            .arm([ArmRequest::new(dimension, duration, easing)]);
    }

    /// (Re)arm a single dimension with a preset curve
    pub fn animate_with_option(&self, dimension: Dimension, duration: f64, easing: EasingOption) {
        self.animate(dimension, duration, Some(easing.function()));
    }

    /// Like [`Animator::animate`], but rejects invalid durations instead of
    /// clamping them
    pub fn try_animate(
        &self,
        dimension: Dimension,
        duration: f64,
        easing: Option<EasingFunction>,
    ) -> Result<()> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(AnimationError::InvalidDuration {
                dimension,
                duration,
            });
        }
        self.animate(dimension, duration, easing);
        Ok(())
    }

    /// Stop anything in flight, then animate X and Y from the same instant
    pub fn animate_xy(
        &self,
        x_duration: f64,
        y_duration: f64,
        easing_x: Option<EasingFunction>,
        easing_y: Option<EasingFunction>,
    ) {
        self.shared
            .arm_xy(x_duration, y_duration, easing_x, easing_y);
    }

    /// [`Animator::animate_xy`] with one curve for both axes
    pub fn animate_xy_shared(
        &self,
        x_duration: f64,
        y_duration: f64,
        easing: Option<EasingFunction>,
    ) {
        self.animate_xy(x_duration, y_duration, easing.clone(), easing);
    }

    /// [`Animator::animate_xy`] with preset curves
    pub fn animate_xy_with_options(
        &self,
        x_duration: f64,
        y_duration: f64,
        easing_x: EasingOption,
        easing_y: EasingOption,
    ) {
        self.animate_xy(
            x_duration,
            y_duration,
            Some(easing_x.function()),
            Some(easing_y.function()),
        );
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current phase of `dimension`, `1.0` if it was never armed
    pub fn phase(&self, dimension: Dimension) -> f64 {
        self.shared.phase(dimension)
    }

    pub fn phase_x(&self) -> f64 {
        self.phase(Dimension::X)
    }

    pub fn phase_y(&self) -> f64 {
        self.phase(Dimension::Y)
    }

    pub fn phase_magnitude(&self) -> f64 {
        self.phase(Dimension::Magnitude)
    }

    /// Snapshot of the record for `dimension`
    pub fn dimension_state(&self, dimension: Dimension) -> Option<DimensionState> {
        self.shared.dimension_state(dimension)
    }

    /// Every dimension armed so far
    pub fn armed_dimensions(&self) -> Vec<Dimension> {
        self.shared.store.borrow().dimensions()
    }

    /// Whether the animator currently holds a tick subscription
    pub fn is_running(&self) -> bool {
        self.shared.is_running()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Release the tick subscription and settle every dimension
    ///
    /// Fires `updated` (only if something was still short of `1.0`) and then
    /// `stopped`. If an observer re-arms the animator from that `updated`,
    /// `stopped` is skipped and fires when the new animation ends. Does
    /// nothing when the animator is not running.
    pub fn stop(&self) {
        self.shared.stop();
    }

    // =========================================================================
    // Observers
    // =========================================================================

    /// Register a delegate
    ///
    /// Only a weak reference is kept; once the delegate is dropped it stops
    /// receiving notifications.
    pub fn subscribe(&self, observer: Weak<dyn AnimatorObserver>) -> ObserverId {
        self.shared.observers.borrow_mut().add_delegate(observer)
    }

    /// Call `callback` after every phase update
    pub fn on_updated<F>(&self, callback: F) -> ObserverId
    where
        F: Fn(&AnimatorHandle) + 'static,
    {
        let callback: AnimatorCallback = Rc::new(callback);
        self.shared
            .observers
            .borrow_mut()
            .add_callback(Notification::Updated, callback)
    }

    /// Call `callback` whenever the animator goes idle
    pub fn on_stopped<F>(&self, callback: F) -> ObserverId
    where
        F: Fn(&AnimatorHandle) + 'static,
    {
        let callback: AnimatorCallback = Rc::new(callback);
        self.shared
            .observers
            .borrow_mut()
            .add_callback(Notification::Stopped, callback)
    }

    /// Remove a delegate or callback; returns whether it was registered
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        self.shared.observers.borrow_mut().remove(id)
    }
}

impl Drop for Animator {
    fn drop(&mut self) {
        self.shared.stop();
    }
}

impl fmt::Debug for Animator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animator")
            .field("running", &self.is_running())
            .field("dimensions", &self.shared.store.borrow().len())
            .field("observers", &self.shared.observers.borrow().len())
            .finish()
    }
}

/// A weak handle to an [`Animator`]
///
/// Passed to observers, and safe to keep around: once the animator is gone
/// every operation becomes a no-op and phases read as settled.
#[derive(Clone, Default)]
pub struct AnimatorHandle {
    shared: Weak<AnimatorShared>,
}

impl AnimatorHandle {
    /// Check if the animator is still alive
    pub fn is_alive(&self) -> bool {
        self.shared.strong_count() > 0
    }

    pub fn phase(&self, dimension: Dimension) -> f64 {
        self.shared
            .upgrade()
            .map_or(1.0, |shared| shared.phase(dimension))
    }

    pub fn phase_x(&self) -> f64 {
        self.phase(Dimension::X)
    }

    pub fn phase_y(&self) -> f64 {
        self.phase(Dimension::Y)
    }

    pub fn dimension_state(&self, dimension: Dimension) -> Option<DimensionState> {
        self.shared
            .upgrade()
            .and_then(|shared| shared.dimension_state(dimension))
    }

    pub fn is_running(&self) -> bool {
        self.shared
            .upgrade()
            .is_some_and(|shared| shared.is_running())
    }

    /// See [`Animator::animate`]
    pub fn animate(&self, dimension: Dimension, duration: f64, easing: Option<EasingFunction>) {
        if let Some(shared) = self.shared.upgrade() {
            shared.arm([ArmRequest::new(dimension, duration, easing)]);
        }
    }

    /// See [`Animator::animate_xy`]
    pub fn animate_xy(
        &self,
        x_duration: f64,
        y_duration: f64,
        easing_x: Option<EasingFunction>,
        easing_y: Option<EasingFunction>,
    ) {
        if let Some(shared) = self.shared.upgrade() {
            shared.arm_xy(x_duration, y_duration, easing_x, easing_y);
        }
    }

    /// See [`Animator::stop`]
    pub fn stop(&self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.stop();
        }
    }
}

impl fmt::Debug for AnimatorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimatorHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}
