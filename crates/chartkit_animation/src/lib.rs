//! Chartkit Animation
//!
//! Per-dimension phase engine for chart entry animations.
//!
//! # Features
//!
//! - **Independent timelines**: X, Y and magnitude each run on their own clock
//! - **Easing presets**: Linear plus 30 classic curves, or any custom function
//! - **Frame-driven**: Advances only on ticks from a [`TickSource`]
//! - **Self-releasing**: Unsubscribes from the tick source once everything settles
//! - **Observers**: Weak delegates or owned callbacks for `updated`/`stopped`
//! - **Deterministic testing**: [`ManualTickSource`] and [`ManualClock`]

pub mod animator;
pub mod clock;
pub mod dimension;
pub mod easing;
pub mod error;
pub mod observer;
pub mod state;
pub mod ticker;

pub use animator::{Animator, AnimatorHandle};
pub use clock::{Clock, ManualClock, SystemClock};
pub use dimension::Dimension;
pub use easing::{EasingFunction, EasingOption};
pub use error::{AnimationError, Result};
pub use observer::{AnimatorCallback, AnimatorObserver, ObserverId};
pub use state::DimensionState;
pub use ticker::{FrameLoop, ManualTickSource, TickCallback, TickSource, TickSubscription};
