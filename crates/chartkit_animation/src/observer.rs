//! Animator notifications
//!
//! Renderers learn about progress through two events: `updated` after each
//! phase recomputation, and `stopped` once the animator has gone idle.
//! Listeners come in two flavours:
//!
//! - delegates implementing [`AnimatorObserver`], held weakly so the animator
//!   never keeps a renderer alive
//! - plain closures registered for a single event kind, owned by the animator

use std::rc::{Rc, Weak};

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::animator::AnimatorHandle;

new_key_type! {
    /// Handle to a registered listener
    pub struct ObserverId;
}

/// Delegate-style listener
///
/// Both methods default to doing nothing.
pub trait AnimatorObserver {
    /// Phases were recomputed
    fn animator_updated(&self, animator: &AnimatorHandle) {
        let _ = animator;
    }

    /// The animator released its tick subscription
    fn animator_stopped(&self, animator: &AnimatorHandle) {
        let _ = animator;
    }
}

/// Closure listener for one event kind
pub type AnimatorCallback = Rc<dyn Fn(&AnimatorHandle)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Notification {
    Updated,
    Stopped,
}

enum Listener {
    Delegate(Weak<dyn AnimatorObserver>),
    Callback(Notification, AnimatorCallback),
}

/// A listener resolved for delivery
pub(crate) enum Target {
    Delegate(Rc<dyn AnimatorObserver>),
    Callback(AnimatorCallback),
}

impl Target {
    pub(crate) fn deliver(&self, notification: Notification, animator: &AnimatorHandle) {
        match (self, notification) {
            (Target::Delegate(observer), Notification::Updated) => {
                observer.animator_updated(animator)
            }
            (Target::Delegate(observer), Notification::Stopped) => {
                observer.animator_stopped(animator)
            }
            (Target::Callback(callback), _) => callback(animator),
        }
    }
}

#[derive(Default)]
pub(crate) struct ObserverSet {
    listeners: SlotMap<ObserverId, Listener>,
}

impl ObserverSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_delegate(&mut self, observer: Weak<dyn AnimatorObserver>) -> ObserverId {
        self.listeners.insert(Listener::Delegate(observer))
    }

    pub(crate) fn add_callback(
        &mut self,
        notification: Notification,
        callback: AnimatorCallback,
    ) -> ObserverId {
        self.listeners
            .insert(Listener::Callback(notification, callback))
    }

    pub(crate) fn remove(&mut self, id: ObserverId) -> bool {
        self.listeners.remove(id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Snapshot the listeners interested in `notification`
    ///
    /// Delegates that have been dropped are pruned on the way. The snapshot
    /// owns everything it needs, so delivery can happen with the set unborrowed.
    pub(crate) fn targets(&mut self, notification: Notification) -> SmallVec<[Target; 4]> {
        self.listeners.retain(|_, listener| match listener {
            Listener::Delegate(observer) => observer.strong_count() > 0,
            Listener::Callback(..) => true,
        });

        self.listeners
            .values()
            .filter_map(|listener| match listener {
                Listener::Delegate(observer) => observer.upgrade().map(Target::Delegate),
                Listener::Callback(kind, callback) if *kind == notification => {
                    Some(Target::Callback(callback.clone()))
                }
                Listener::Callback(..) => None,
            })
            .collect()
    }
}
