//! Interpolation curves.
//!
//! Every curve maps a raw linear fraction in `[0, 1]` onto an eased
//! fraction in `[0, 1]`, with `f(0) == 0` and `f(1) == 1`. Inputs outside
//! the unit interval are clamped first.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Easing function applied to raw progress before it is handed to a painter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    /// Identity curve.
    #[default]
    Linear,
    /// Slow start and end, `s - sin(2πs) / 2π`.
    EaseInOut,
    /// Decelerating quadratic, `-s(s - 2)`.
    EaseOut,
    /// Accelerating quadratic, `s²`.
    CustomQuadratic,
    /// Exponential ease-in (accelerating).
    ExponentialIn,
    /// Exponential ease-out (sharp snap to target).
    ExponentialOut,
    /// Exponential ease-in-out.
    ExponentialInOut,
}

impl Easing {
    /// Applies the curve to a raw fraction.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        let eased = match self {
            Self::Linear => t,
            Self::EaseInOut => t - (t * 2.0 * PI).sin() / (2.0 * PI),
            Self::EaseOut => -t * (t - 2.0),
            Self::CustomQuadratic => t * t,
            Self::ExponentialIn => {
                if t <= 0.0 {
                    0.0
                } else {
                    2.0_f64.powf(10.0 * (t - 1.0))
                }
            }
            Self::ExponentialOut => {
                // 1 - 2^(-10t) never quite reaches 1
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2.0_f64.powf(-10.0 * t)
                }
            }
            Self::ExponentialInOut => {
                if t <= 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else if t < 0.5 {
                    2.0_f64.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2.0_f64.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
        };

        eased.clamp(0.0, 1.0)
    }

    /// All curves, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Linear,
        Self::EaseInOut,
        Self::EaseOut,
        Self::CustomQuadratic,
        Self::ExponentialIn,
        Self::ExponentialOut,
        Self::ExponentialInOut,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_endpoints_are_fixed() {
        for easing in Easing::ALL {
            assert!(easing.apply(0.0).abs() < EPSILON, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < EPSILON, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_out_of_range_input_is_clamped() {
        for easing in Easing::ALL {
            assert!(easing.apply(-3.0).abs() < EPSILON);
            assert!((easing.apply(7.5) - 1.0).abs() < EPSILON);
            assert!(easing.apply(f64::NAN).abs() < EPSILON);
        }
    }

    #[test]
    fn test_curves_stay_in_unit_interval() {
        for easing in Easing::ALL {
            for step in 0..=100 {
                let value = easing.apply(f64::from(step) / 100.0);
                assert!((0.0..=1.0).contains(&value), "{easing:?} gave {value}");
            }
        }
    }

    #[test]
    fn test_ease_out_leads_linear() {
        assert!(Easing::EaseOut.apply(0.25) > Easing::Linear.apply(0.25));
        assert!((Easing::EaseOut.apply(0.5) - 0.75).abs() < EPSILON);
    }

    #[test]
    fn test_ease_in_out_is_symmetric() {
        let a = Easing::EaseInOut.apply(0.2);
        let b = Easing::EaseInOut.apply(0.8);
        assert!((a + b - 1.0).abs() < EPSILON);
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_exponential_out_is_sharp() {
        let value = Easing::ExponentialOut.apply(0.3);
        assert!(value > 0.8, "exponential out should snap quickly: {value}");
    }

    #[test]
    fn test_kebab_case_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            easing: Easing,
        }

        let parsed: Wrapper = toml::from_str("easing = \"ease-in-out\"").unwrap();
        assert_eq!(parsed.easing, Easing::EaseInOut);
        let parsed: Wrapper = toml::from_str("easing = \"custom-quadratic\"").unwrap();
        assert_eq!(parsed.easing, Easing::CustomQuadratic);
    }
}
