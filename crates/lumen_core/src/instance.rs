//! Animation instances and their directions.

use serde::{Deserialize, Serialize};

/// Snap distance used to absorb floating point drift when accumulating
/// increments (e.g. ten steps of `0.1`).
pub(crate) const SNAP_EPSILON: f64 = 1e-9;

/// Qualitative shape of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Primary progress grows toward 1.0.
    In,
    /// Primary progress shrinks toward 0.0.
    Out,
    /// Primary progress grows to 1.0, then secondary progress grows to 1.0.
    InOutIn,
}

impl Direction {
    /// Primary progress a fresh instance starts from.
    #[must_use]
    pub const fn start_value(self) -> f64 {
        match self {
            Self::In | Self::InOutIn => 0.0,
            Self::Out => 1.0,
        }
    }

    /// Primary progress at which the direction's first phase is done.
    #[must_use]
    pub const fn end_value(self) -> f64 {
        match self {
            Self::In | Self::InOutIn => 1.0,
            Self::Out => 0.0,
        }
    }

    /// Returns true if `other` runs the primary phase the opposite way.
    #[must_use]
    pub const fn reverses(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Out, Self::In | Self::InOutIn) | (Self::In | Self::InOutIn, Self::Out)
        )
    }
}

/// One in-flight timed transition.
///
/// Progress values are raw (un-eased) and always inside `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationInstance<D> {
    direction: Direction,
    progress: f64,
    secondary_progress: f64,
    data: Vec<D>,
}

impl<D> AnimationInstance<D> {
    /// Creates an instance at its direction's start value.
    #[must_use]
    pub fn new(direction: Direction, data: Vec<D>) -> Self {
        Self {
            direction,
            progress: direction.start_value(),
            secondary_progress: 0.0,
            data,
        }
    }

    /// Direction this instance runs in.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Raw primary progress.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Raw secondary progress. Always 0.0 unless the direction is `InOutIn`.
    #[must_use]
    pub fn secondary_progress(&self) -> f64 {
        self.secondary_progress
    }

    /// Payload snapshotted when the animation started.
    #[must_use]
    pub fn data(&self) -> &[D] {
        &self.data
    }

    /// Returns true once every phase applicable to the direction is done.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        match self.direction {
            Direction::In => self.progress >= 1.0,
            Direction::Out => self.progress <= 0.0,
            Direction::InOutIn => self.progress >= 1.0 && self.secondary_progress >= 1.0,
        }
    }

    /// Re-targets the instance in place.
    ///
    /// Reversing keeps the current primary value so the visual does not
    /// jump; any other restart begins again from the start value.
    pub(crate) fn restart(&mut self, direction: Direction, data: Vec<D>) {
        if !self.direction.reverses(direction) {
            self.progress = direction.start_value();
        }
        self.direction = direction;
        self.secondary_progress = 0.0;
        self.data = data;
    }

    pub(crate) fn set_progress(&mut self, value: f64) {
        self.progress = clamp_unit(value);
    }

    /// Advances one tick. Returns true if any progress value moved.
    pub(crate) fn advance(&mut self, increment: f64, secondary_increment: f64) -> bool {
        let before = (self.progress, self.secondary_progress);

        match self.direction {
            Direction::In => self.progress = step_up(self.progress, increment),
            Direction::Out => self.progress = step_down(self.progress, increment),
            Direction::InOutIn => {
                // Second phase only begins on the tick after the first one lands.
                if self.progress < 1.0 {
                    self.progress = step_up(self.progress, increment);
                } else {
                    self.secondary_progress = step_up(self.secondary_progress, secondary_increment);
                }
            }
        }

        before != (self.progress, self.secondary_progress)
    }
}

pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn step_up(value: f64, increment: f64) -> f64 {
    let next = value + increment;
    if next >= 1.0 - SNAP_EPSILON {
        1.0
    } else {
        clamp_unit(next)
    }
}

fn step_down(value: f64, increment: f64) -> f64 {
    let next = value - increment;
    if next <= SNAP_EPSILON {
        0.0
    } else {
        clamp_unit(next)
    }
}
