//! # Animation Manager
//!
//! Owns an ordered set of [`AnimationInstance`]s, advances them once per
//! clock tick and tells a single observer when anything visible changed.
//!
//! ## Tick order
//!
//! Every tick runs in three steps:
//!
//! 1. Instances that were already complete when the tick began are retired
//!    (a held `In` instance on a `hold` manager is kept).
//! 2. Every remaining instance advances by one increment.
//! 3. The observer is notified once if anything moved, an instance was
//!    retired, or an animation was started since the previous tick.
//!
//! Retirement happens before advancing, so an animation that reaches its
//! end value stays visible for exactly one tick at that value.
//!
//! ## Queries
//!
//! Queries never fail. An index that hits no instance reports the
//! configured `rest_progress`, because painters query every frame without
//! checking the instance count first.

use std::fmt;

use crate::clock::ClockSubscription;
use crate::config::{validate_increment, validate_secondary_increment, AnimationConfig};
use crate::easing::Easing;
use crate::error::{AnimationError, AnimationResult};
use crate::instance::{AnimationInstance, Direction};

/// Observer invoked after a tick that changed visible progress.
///
/// The observer only borrows the manager immutably, so it can query
/// progress for a repaint but cannot start animations from inside the
/// notification.
pub type ProgressCallback<D> = Box<dyn FnMut(&AnimationManager<D>) + Send>;

/// Timed progress engine driving one visual effect.
///
/// `D` is the payload type snapshotted with each animation, e.g. the
/// checked state of a control at click time.
pub struct AnimationManager<D = ()> {
    config: AnimationConfig,
    instances: Vec<AnimationInstance<D>>,
    /// Forces a notification on the next tick.
    dirty: bool,
    disposed: bool,
    on_progress: Option<ProgressCallback<D>>,
    subscription: Option<ClockSubscription>,
}

impl<D> AnimationManager<D> {
    /// Creates a manager after validating its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AnimationError::InvalidConfig`] if the configuration is
    /// rejected by [`AnimationConfig::validate`].
    pub fn new(config: AnimationConfig) -> AnimationResult<Self> {
        config.validate()?;

        Ok(Self {
            config,
            instances: Vec::new(),
            dirty: false,
            disposed: false,
            on_progress: None,
            subscription: None,
        })
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Replaces the easing curve. Takes effect on the next query.
    pub fn set_easing(&mut self, easing: Easing) {
        self.config.easing = easing;
    }

    /// Changes the primary per-tick delta.
    ///
    /// # Errors
    ///
    /// Returns [`AnimationError::InvalidConfig`] for non-positive or
    /// non-finite values.
    pub fn set_increment(&mut self, increment: f64) -> AnimationResult<()> {
        validate_increment(increment)?;
        self.config.increment = increment;
        Ok(())
    }

    /// Changes the secondary per-tick delta.
    ///
    /// Zero parks `InOutIn` instances after their first phase until a
    /// positive value is set again.
    ///
    /// # Errors
    ///
    /// Returns [`AnimationError::InvalidConfig`] for negative or
    /// non-finite values.
    pub fn set_secondary_increment(&mut self, increment: f64) -> AnimationResult<()> {
        validate_secondary_increment(increment)?;
        self.config.secondary_increment = increment;
        Ok(())
    }

    /// Registers the progress observer, replacing any previous one.
    pub fn on_progress<F>(&mut self, callback: F)
    where
        F: FnMut(&AnimationManager<D>) + Send + 'static,
    {
        self.on_progress = Some(Box::new(callback));
    }

    /// Removes the progress observer.
    pub fn clear_on_progress(&mut self) {
        self.on_progress = None;
    }

    /// Starts an animation with an empty payload.
    ///
    /// # Errors
    ///
    /// Returns [`AnimationError::Disposed`] after [`dispose`](Self::dispose).
    pub fn start(&mut self, direction: Direction) -> AnimationResult<()> {
        self.start_with_data(direction, Vec::new())
    }

    /// Starts an animation carrying a payload snapshot.
    ///
    /// Single-instance managers re-target their existing instance in place;
    /// otherwise a fresh instance is appended to the end of the sequence.
    ///
    /// # Errors
    ///
    /// Returns [`AnimationError::Disposed`] after [`dispose`](Self::dispose).
    pub fn start_with_data(&mut self, direction: Direction, data: Vec<D>) -> AnimationResult<()> {
        if self.disposed {
            tracing::warn!(?direction, "start requested on a disposed animation manager");
            return Err(AnimationError::Disposed);
        }

        self.dirty = true;

        if !self.config.allow_multiple {
            if let Some(instance) = self.instances.first_mut() {
                instance.restart(direction, data);
                return Ok(());
            }
        }

        self.instances.push(AnimationInstance::new(direction, data));
        Ok(())
    }

    /// Forces the primary progress of the most recent instance.
    ///
    /// Used to reset a visual right before restarting it. Values are
    /// clamped into `[0, 1]`; with no instance this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`AnimationError::Disposed`] after [`dispose`](Self::dispose).
    pub fn set_progress(&mut self, value: f64) -> AnimationResult<()> {
        if self.disposed {
            return Err(AnimationError::Disposed);
        }

        if let Some(instance) = self.instances.last_mut() {
            instance.set_progress(value);
            self.dirty = true;
        }
        Ok(())
    }

    /// Eased primary progress of the oldest instance.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress_at(0)
    }

    /// Eased primary progress of the instance at `index`.
    ///
    /// Returns the configured rest value when `index` is out of range.
    #[must_use]
    pub fn progress_at(&self, index: usize) -> f64 {
        self.instances
            .get(index)
            .map_or(self.config.rest_progress, |instance| {
                self.config.easing.apply(instance.progress())
            })
    }

    /// Eased secondary progress of the oldest instance.
    #[must_use]
    pub fn secondary_progress(&self) -> f64 {
        self.secondary_progress_at(0)
    }

    /// Eased secondary progress of the instance at `index`.
    ///
    /// Returns the configured rest value when `index` is out of range.
    #[must_use]
    pub fn secondary_progress_at(&self, index: usize) -> f64 {
        self.instances
            .get(index)
            .map_or(self.config.rest_progress, |instance| {
                self.config.easing.apply(instance.secondary_progress())
            })
    }

    /// Direction of the instance at `index`.
    #[must_use]
    pub fn direction(&self, index: usize) -> Option<Direction> {
        self.instances.get(index).map(AnimationInstance::direction)
    }

    /// Payload of the instance at `index`.
    #[must_use]
    pub fn data(&self, index: usize) -> Option<&[D]> {
        self.instances.get(index).map(AnimationInstance::data)
    }

    /// All tracked instances, oldest first.
    #[must_use]
    pub fn instances(&self) -> &[AnimationInstance<D>] {
        &self.instances
    }

    /// Number of tracked instances. Zero means the effect is at rest.
    #[must_use]
    pub fn animation_count(&self) -> usize {
        self.instances.len()
    }

    /// True while any instance still has a phase to finish.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.instances.iter().any(|instance| !instance.is_complete())
    }

    /// True once [`dispose`](Self::dispose) has run.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// True if this manager currently holds a clock subscription.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Advances every instance by one step.
    ///
    /// Returns true if the observer was notified. Disposed managers ignore
    /// ticks.
    pub fn tick(&mut self) -> bool {
        if self.disposed {
            return false;
        }

        let hold = self.config.hold;
        let before = self.instances.len();
        self.instances.retain(|instance| {
            !instance.is_complete() || (hold && instance.direction() == Direction::In)
        });
        let mut changed = self.instances.len() != before;

        let increment = self.config.increment;
        let secondary_increment = self.config.secondary_increment;
        for instance in &mut self.instances {
            changed |= instance.advance(increment, secondary_increment);
        }

        let dirty = std::mem::take(&mut self.dirty);
        let notify = changed || dirty;
        if notify {
            tracing::trace!(count = self.instances.len(), "animation progress changed");
            self.notify();
        }
        notify
    }

    /// Tears the manager down.
    ///
    /// Drops the clock subscription and observer synchronously, so no
    /// notification can reach the host afterwards. Calling it twice is
    /// harmless.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }

        self.disposed = true;
        self.dirty = false;
        self.instances.clear();
        self.on_progress = None;
        self.subscription = None;
        tracing::debug!("animation manager disposed");
    }

    pub(crate) fn set_subscription(&mut self, subscription: ClockSubscription) {
        self.subscription = Some(subscription);
    }

    fn notify(&mut self) {
        if let Some(mut callback) = self.on_progress.take() {
            callback(&*self);
            self.on_progress = Some(callback);
        }
    }
}

impl<D> fmt::Debug for AnimationManager<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationManager")
            .field("config", &self.config)
            .field("animation_count", &self.instances.len())
            .field("dirty", &self.dirty)
            .field("disposed", &self.disposed)
            .field("attached", &self.subscription.is_some())
            .finish_non_exhaustive()
    }
}
