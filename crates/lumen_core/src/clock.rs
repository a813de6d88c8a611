//! # Frame Clock
//!
//! Host-owned tick source for animation managers.
//!
//! ## Design
//!
//! - One subscription per manager, held by the manager itself. Disposing or
//!   dropping the manager drops the subscription, which unsubscribes
//!   synchronously; no tick can reach a torn-down manager afterwards.
//! - The clock only keeps weak references, so it never extends a
//!   manager's lifetime.
//! - Ticks run on the caller's thread. [`FrameClock::advance`] is a
//!   fixed-timestep accumulator for hosts that only know wall-clock time.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;

use crate::manager::AnimationManager;

/// Nominal tick rate used by the controls this engine was built for.
pub const DEFAULT_TICK_RATE_HZ: u32 = 60;

/// Upper bound on ticks replayed by a single [`FrameClock::advance`] call.
///
/// A host that stalls for seconds should jump ahead rather than replay
/// hundreds of frames nobody will see.
pub const MAX_CATCH_UP_TICKS: u32 = 8;

/// Anything a [`FrameClock`] can drive.
pub trait TickTarget: Send {
    /// Advances one step. Returns true if the target notified its observer.
    fn on_tick(&mut self) -> bool;
}

impl<D: Send> TickTarget for AnimationManager<D> {
    fn on_tick(&mut self) -> bool {
        self.tick()
    }
}

/// Manager shared between a host control and the clock.
pub type SharedAnimation<D = ()> = Arc<Mutex<AnimationManager<D>>>;

/// Weak handle the clock keeps for each subscriber.
pub type WeakTarget = Weak<Mutex<dyn TickTarget>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SubscriptionId(u64);

struct ClockState {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, WeakTarget)>,
    tick_duration: Duration,
    accumulator: Duration,
    tick_count: u64,
}

/// Periodic tick source shared by every manager of a host.
///
/// Cloning is cheap and yields a handle to the same clock.
#[derive(Clone)]
pub struct FrameClock {
    state: Arc<Mutex<ClockState>>,
}

impl FrameClock {
    /// Creates a clock ticking at `tick_rate_hz` (clamped to at least 1).
    #[must_use]
    pub fn new(tick_rate_hz: u32) -> Self {
        let tick_duration = Duration::from_micros(1_000_000 / u64::from(tick_rate_hz.max(1)));

        Self {
            state: Arc::new(Mutex::new(ClockState {
                next_id: 0,
                subscribers: Vec::new(),
                tick_duration,
                accumulator: Duration::ZERO,
                tick_count: 0,
            })),
        }
    }

    /// Duration of one tick.
    #[must_use]
    pub fn tick_duration(&self) -> Duration {
        self.state.lock().tick_duration
    }

    /// Total ticks delivered since creation.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.state.lock().tick_count
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state
            .lock()
            .subscribers
            .iter()
            .filter(|(_, target)| target.strong_count() > 0)
            .count()
    }

    /// Registers a target. The target is ticked until the returned
    /// subscription is dropped or the target itself is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, target: WeakTarget) -> ClockSubscription {
        let mut state = self.state.lock();
        let id = SubscriptionId(state.next_id);
        state.next_id += 1;
        state.subscribers.push((id, target));
        tracing::debug!(id = id.0, "clock subscription added");

        ClockSubscription {
            id,
            state: Arc::downgrade(&self.state),
        }
    }

    /// Delivers one tick to every live subscriber, in subscription order.
    ///
    /// Returns how many subscribers notified their observer. A subscriber
    /// that is locked at tick time (re-entrant use from inside its own
    /// observer) is skipped for this tick.
    pub fn tick(&self) -> usize {
        let targets: Vec<Arc<Mutex<dyn TickTarget>>> = {
            let mut state = self.state.lock();
            state.tick_count += 1;
            state.subscribers.retain(|(_, target)| target.strong_count() > 0);
            state
                .subscribers
                .iter()
                .filter_map(|(_, target)| target.upgrade())
                .collect()
        };

        let mut notified = 0;
        for target in targets {
            let Some(mut guard) = target.try_lock() else {
                tracing::warn!("skipping animation target locked during clock tick");
                continue;
            };
            if guard.on_tick() {
                notified += 1;
            }
        }
        notified
    }

    /// Feeds wall-clock time into the fixed-timestep accumulator and runs
    /// every tick that became due. Returns the number of ticks run.
    ///
    /// At most [`MAX_CATCH_UP_TICKS`] run per call; any remaining backlog
    /// is discarded.
    pub fn advance(&self, elapsed: Duration) -> u32 {
        let due = {
            let mut state = self.state.lock();
            state.accumulator += elapsed;

            let mut due = 0;
            let step = state.tick_duration;
            while state.accumulator >= step && due < MAX_CATCH_UP_TICKS {
                state.accumulator -= step;
                due += 1;
            }
            if due == MAX_CATCH_UP_TICKS && state.accumulator >= step {
                tracing::debug!(
                    backlog_us = u64::try_from(state.accumulator.as_micros()).unwrap_or(u64::MAX),
                    "clock fell behind, dropping backlog"
                );
                state.accumulator = Duration::ZERO;
            }
            due
        };

        for _ in 0..due {
            self.tick();
        }
        due
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_RATE_HZ)
    }
}

impl std::fmt::Debug for FrameClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("FrameClock")
            .field("tick_duration", &state.tick_duration)
            .field("subscribers", &state.subscribers.len())
            .field("tick_count", &state.tick_count)
            .finish()
    }
}

/// Live registration with a [`FrameClock`]. Unsubscribes on drop.
#[derive(Debug)]
pub struct ClockSubscription {
    id: SubscriptionId,
    state: Weak<Mutex<ClockState>>,
}

impl Drop for ClockSubscription {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            let id = self.id;
            state.lock().subscribers.retain(|(sub, _)| *sub != id);
            tracing::debug!(id = id.0, "clock subscription removed");
        }
    }
}

impl<D: Send + 'static> AnimationManager<D> {
    /// Moves the manager behind a shared handle and subscribes it to
    /// `clock`.
    ///
    /// A manager holds one subscription at a time; attaching the returned
    /// handle again via [`attach_shared`] replaces the old one.
    pub fn attach(self, clock: &FrameClock) -> SharedAnimation<D> {
        let shared = Arc::new(Mutex::new(self));
        attach_shared(&shared, clock);
        shared
    }
}

/// Subscribes an already shared manager to `clock`, replacing any
/// previous subscription. Disposed managers are left detached.
pub fn attach_shared<D: Send + 'static>(shared: &SharedAnimation<D>, clock: &FrameClock) {
    if shared.lock().is_disposed() {
        tracing::warn!("refusing to attach a disposed animation manager");
        return;
    }

    let target: Arc<Mutex<dyn TickTarget>> = shared.clone();
    let subscription = clock.subscribe(Arc::downgrade(&target));
    drop(target);

    shared.lock().set_subscription(subscription);
}
