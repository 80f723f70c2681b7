//! "Selection changed" fan-out to the subscribed views.
//!
//! The propagator only keeps the subscriber list and the cycle state; the
//! [`Dashboard`](crate::dashboard::Dashboard) builds the snapshot and drives
//! each cycle through [`ChangePropagator::begin_cycle`] and
//! [`ChangePropagator::end_cycle`].

use crate::view::View;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Kinds of view, declared in fan-out order.
///
/// The map goes first because a region it selects must be visible to the
/// chart and list in the same cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Map,
    Chart,
    List,
    Filters,
}

impl ViewKind {
    pub const ALL: [ViewKind; 4] = [ViewKind::Map, ViewKind::Chart, ViewKind::List, ViewKind::Filters];
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewKind::Map => "map",
            ViewKind::Chart => "chart",
            ViewKind::List => "list",
            ViewKind::Filters => "filters",
        };
        f.write_str(name)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// When a change reaches the views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delivery {
    /// Fan out synchronously on every change.
    #[default]
    Immediate,
    /// Trailing-edge debounce: a burst of changes fans out once, when
    /// [`ChangePropagator::poll`] is called after the window has elapsed
    /// since the last change.
    Debounced(Duration),
}

/// What the caller should do after reporting a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notify {
    /// Run a cycle now.
    FanOut,
    /// A cycle is running; another one follows it.
    Deferred,
    /// Debounced; `poll` will release it.
    Scheduled,
}

#[derive(Clone)]
pub struct Subscriber {
    pub id: SubscriptionId,
    pub kind: ViewKind,
    pub view: Rc<RefCell<dyn View>>,
}

#[derive(Default)]
pub struct ChangePropagator {
    delivery: Delivery,
    subscribers: Vec<Subscriber>,
    next_id: u64,
    in_cycle: bool,
    pending: bool,
    due: Option<Instant>,
    cycles: u64,
}

impl ChangePropagator {
    pub fn new(delivery: Delivery) -> Self {
        ChangePropagator {
            delivery,
            ..Default::default()
        }
    }

    pub fn delivery(&self) -> Delivery {
        self.delivery
    }

    /// Register a view. Views run in [`ViewKind`] order; views of the same
    /// kind run in subscription order.
    pub fn subscribe(&mut self, kind: ViewKind, view: Rc<RefCell<dyn View>>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        let at = self.subscribers.partition_point(|s| s.kind <= kind);
        self.subscribers.insert(at, Subscriber { id, kind, view });
        log::debug!("[EVA Debug] propagator: subscribed {} view {:?}", kind, id);
        id
    }

    /// Returns false when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        before != self.subscribers.len()
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn in_cycle(&self) -> bool {
        self.in_cycle
    }

    /// Completed and running cycles so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Report a change to the selection or filters at time `now`.
    pub fn notify(&mut self, now: Instant) -> Notify {
        if self.in_cycle {
            self.pending = true;
            return Notify::Deferred;
        }
        match self.delivery {
            Delivery::Immediate => Notify::FanOut,
            Delivery::Debounced(window) => {
                self.due = Some(now + window);
                Notify::Scheduled
            }
        }
    }

    /// Request a cycle regardless of the delivery mode (initial render).
    pub fn request(&mut self) -> Notify {
        if self.in_cycle {
            self.pending = true;
            Notify::Deferred
        } else {
            Notify::FanOut
        }
    }

    /// Whether a debounced change is due at `now`. Clears the schedule when
    /// it is.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if !self.in_cycle && now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }

    /// Start a cycle and return the views to run, in fan-out order.
    ///
    /// The list is a copy, so views may subscribe or unsubscribe during the
    /// cycle; that takes effect from the next one.
    pub fn begin_cycle(&mut self) -> Vec<Subscriber> {
        self.in_cycle = true;
        self.pending = false;
        self.due = None;
        self.cycles += 1;
        self.subscribers.clone()
    }

    /// Finish the running cycle. Returns true when changes arrived during it
    /// and another cycle must follow.
    pub fn end_cycle(&mut self) -> bool {
        self.in_cycle = false;
        std::mem::take(&mut self.pending)
    }
}
