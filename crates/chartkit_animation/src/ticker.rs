//! Frame tick sources
//!
//! The animator never owns a timer. It subscribes to a [`TickSource`] while it
//! has work to do and unsubscribes as soon as it is idle. Two sources ship
//! with the crate:
//!
//! - [`ManualTickSource`] - ticks only when [`ManualTickSource::tick`] is
//!   called, for tests and headless rendering
//! - [`FrameLoop`] - paces ticks against the wall clock on the calling thread
//!
//! Both allow callbacks to subscribe and unsubscribe while a tick is being
//! dispatched. A subscription added during a tick first fires on the next one.

use std::cell::RefCell;
use std::thread;
use std::time::{Duration, Instant};

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Handle to a tick subscription
    pub struct TickSubscription;
}

/// Callback invoked once per frame
pub type TickCallback = Box<dyn FnMut()>;

/// Periodic frame callback provider
///
/// Implementations must invoke callbacks on the same logical thread the
/// subscriptions were made from.
pub trait TickSource {
    /// Start calling `callback` once per frame
    fn subscribe(&self, callback: TickCallback) -> TickSubscription;

    /// Stop calling the callback registered under `subscription`
    ///
    /// Unknown or already removed subscriptions are ignored.
    fn unsubscribe(&self, subscription: TickSubscription);
}

/// Subscriber registry shared by the built-in sources
///
/// A slot holds `None` while its callback is running.
#[derive(Default)]
struct Subscribers {
    callbacks: RefCell<SlotMap<TickSubscription, Option<TickCallback>>>,
}

impl Subscribers {
    fn insert(&self, callback: TickCallback) -> TickSubscription {
        self.callbacks.borrow_mut().insert(Some(callback))
    }

    fn remove(&self, subscription: TickSubscription) {
        self.callbacks.borrow_mut().remove(subscription);
    }

    fn len(&self) -> usize {
        self.callbacks.borrow().len()
    }

    /// Invoke every current subscriber once
    ///
    /// No borrow is held while a callback runs, so callbacks may subscribe or
    /// unsubscribe freely. Returns the number of callbacks invoked.
    fn dispatch(&self) -> usize {
        let keys: SmallVec<[TickSubscription; 4]> = self.callbacks.borrow().keys().collect();
        let mut fired = 0;

        for key in keys {
            let taken = self
                .callbacks
                .borrow_mut()
                .get_mut(key)
                .and_then(Option::take);
            let Some(mut callback) = taken else {
                continue;
            };

            callback();
            fired += 1;

            // The subscription may have been removed by its own callback
            if let Some(slot) = self.callbacks.borrow_mut().get_mut(key) {
                *slot = Some(callback);
            }
        }

        fired
    }
}

/// A tick source driven by hand
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use chartkit_animation::{ManualTickSource, TickSource};
///
/// let source = ManualTickSource::new();
/// let count = Rc::new(Cell::new(0));
/// let seen = count.clone();
/// let subscription = source.subscribe(Box::new(move || seen.set(seen.get() + 1)));
///
/// source.tick();
/// source.tick();
/// source.unsubscribe(subscription);
/// source.tick();
/// assert_eq!(count.get(), 2);
/// ```
#[derive(Default)]
pub struct ManualTickSource {
    subscribers: Subscribers,
}

impl ManualTickSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one frame to every subscriber
    ///
    /// Returns the number of callbacks invoked.
    pub fn tick(&self) -> usize {
        self.subscribers.dispatch()
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn has_subscribers(&self) -> bool {
        self.subscriber_count() > 0
    }
}

impl TickSource for ManualTickSource {
    fn subscribe(&self, callback: TickCallback) -> TickSubscription {
        self.subscribers.insert(callback)
    }

    fn unsubscribe(&self, subscription: TickSubscription) {
        self.subscribers.remove(subscription);
    }
}

/// Real-time frame loop running on the calling thread
///
/// [`FrameLoop::run_until_idle`] blocks, ticking at the configured rate, and
/// returns once the last subscriber has left.
pub struct FrameLoop {
    subscribers: Subscribers,
    frame_interval: Duration,
}

impl FrameLoop {
    /// Create a loop ticking `frame_rate` times per second (at least once)
    pub fn new(frame_rate: u32) -> Self {
        let frame_rate = frame_rate.max(1);
        Self {
            subscribers: Subscribers::default(),
            frame_interval: Duration::from_micros(1_000_000 / u64::from(frame_rate)),
        }
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub fn has_subscribers(&self) -> bool {
        self.subscribers.len() > 0
    }

    /// Tick until nobody is subscribed
    ///
    /// Returns the number of frames delivered.
    pub fn run_until_idle(&self) -> u64 {
        let mut frames = 0;

        while self.has_subscribers() {
            let start = Instant::now();
            self.subscribers.dispatch();
            frames += 1;

            if frames % 120 == 0 {
                tracing::trace!(frames, "frame loop still busy");
            }

            // Sleep for remaining frame time
            let elapsed = start.elapsed();
            if elapsed < self.frame_interval && self.has_subscribers() {
                thread::sleep(self.frame_interval - elapsed);
            }
        }

        tracing::debug!(frames, "frame loop idle");
        frames
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new(60)
    }
}

impl TickSource for FrameLoop {
    fn subscribe(&self, callback: TickCallback) -> TickSubscription {
        self.subscribers.insert(callback)
    }

    fn unsubscribe(&self, subscription: TickSubscription) {
        self.subscribers.remove(subscription);
    }
}
