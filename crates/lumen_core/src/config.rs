//! # Animation Manager Configuration
//!
//! Construction-time settings for an [`AnimationManager`](crate::AnimationManager).
//! Configurations are usually loaded once from a theme file and validated
//! before any manager is built, so the tick path never has to re-check them.

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::{AnimationError, AnimationResult};

/// Settings shared by every instance a manager tracks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    /// Curve applied to raw progress on every query.
    pub easing: Easing,
    /// Per-tick delta for primary progress.
    pub increment: f64,
    /// Per-tick delta for secondary progress (`InOutIn` only).
    pub secondary_increment: f64,
    /// Track overlapping instances instead of re-targeting a single one.
    pub allow_multiple: bool,
    /// Keep a completed `In` instance at rest instead of retiring it.
    pub hold: bool,
    /// Value reported by progress queries that hit no instance.
    pub rest_progress: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            easing: Easing::Linear,
            increment: Self::DEFAULT_INCREMENT,
            secondary_increment: Self::DEFAULT_INCREMENT,
            allow_multiple: false,
            hold: false,
            rest_progress: 0.0,
        }
    }
}

impl AnimationConfig {
    /// Default per-tick delta: a full transition in ten ticks.
    pub const DEFAULT_INCREMENT: f64 = 0.1;

    /// Single-instance configuration with the given curve and increment.
    #[must_use]
    pub fn new(easing: Easing, increment: f64) -> Self {
        Self {
            easing,
            increment,
            ..Self::default()
        }
    }

    /// Sets the secondary increment.
    #[must_use]
    pub fn with_secondary_increment(mut self, secondary_increment: f64) -> Self {
        self.secondary_increment = secondary_increment;
        self
    }

    /// Allows overlapping instances.
    #[must_use]
    pub fn with_multiple(mut self) -> Self {
        self.allow_multiple = true;
        self
    }

    /// Keeps completed `In` instances at rest.
    #[must_use]
    pub fn with_hold(mut self) -> Self {
        self.hold = true;
        self
    }

    /// Sets the value reported for out-of-range queries.
    #[must_use]
    pub fn with_rest_progress(mut self, rest_progress: f64) -> Self {
        self.rest_progress = rest_progress;
        self
    }

    /// Checks every field.
    ///
    /// # Errors
    ///
    /// Returns [`AnimationError::InvalidConfig`] when an increment is
    /// non-finite or out of range, the rest value is outside `[0, 1]`, or
    /// hold mode is combined with multiple instances.
    pub fn validate(&self) -> AnimationResult<()> {
        validate_increment(self.increment)?;
        validate_secondary_increment(self.secondary_increment)?;

        if !(0.0..=1.0).contains(&self.rest_progress) {
            return Err(AnimationError::InvalidConfig(format!(
                "rest_progress must be within [0, 1], got {}",
                self.rest_progress
            )));
        }

        if self.hold && self.allow_multiple {
            return Err(AnimationError::InvalidConfig(
                "hold requires a single-instance manager".to_string(),
            ));
        }

        Ok(())
    }
}

/// Primary increments must be positive, or the animation never finishes.
pub(crate) fn validate_increment(increment: f64) -> AnimationResult<()> {
    if increment.is_finite() && increment > 0.0 {
        Ok(())
    } else {
        Err(AnimationError::InvalidConfig(format!(
            "increment must be a positive finite number, got {increment}"
        )))
    }
}

/// Zero is allowed here: it parks a two-phase animation between phases.
pub(crate) fn validate_secondary_increment(increment: f64) -> AnimationResult<()> {
    if increment.is_finite() && increment >= 0.0 {
        Ok(())
    } else {
        Err(AnimationError::InvalidConfig(format!(
            "secondary_increment must be a non-negative finite number, got {increment}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(AnimationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_negative_increment_rejected() {
        let config = AnimationConfig::new(Easing::Linear, -0.1);
        assert!(matches!(config.validate(), Err(AnimationError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_primary_increment_rejected() {
        let config = AnimationConfig::new(Easing::Linear, 0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_secondary_increment_accepted() {
        let config = AnimationConfig::new(Easing::Linear, 0.1).with_secondary_increment(0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(AnimationConfig::new(Easing::Linear, f64::NAN).validate().is_err());
        assert!(AnimationConfig::new(Easing::Linear, f64::INFINITY).validate().is_err());
        assert!(AnimationConfig::default()
            .with_secondary_increment(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_hold_with_multiple_rejected() {
        let config = AnimationConfig::default().with_multiple().with_hold();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rest_progress_range() {
        assert!(AnimationConfig::default().with_rest_progress(1.0).validate().is_ok());
        assert!(AnimationConfig::default().with_rest_progress(1.5).validate().is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: AnimationConfig =
            toml::from_str("easing = \"ease-out\"\nincrement = 0.04\nhold = true").unwrap();

        assert_eq!(config.easing, Easing::EaseOut);
        assert!((config.increment - 0.04).abs() < 1e-12);
        assert!(config.hold);
        assert!(!config.allow_multiple);
        assert!((config.secondary_increment - AnimationConfig::DEFAULT_INCREMENT).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let parsed: Result<AnimationConfig, _> = toml::from_str("speed = 3.0");
        assert!(parsed.is_err());
    }
}
