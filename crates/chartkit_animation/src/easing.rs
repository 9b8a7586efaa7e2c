//! Easing curves
//!
//! An easing function maps `(elapsed, total)` to progress in `[0, 1]`. Callers
//! can plug in any closure, or pick one of the classic presets from
//! [`EasingOption`].

use std::f64::consts::PI;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnimationError;

/// Pluggable easing curve: `(elapsed, total) -> progress`
///
/// `total` is always greater than zero when the animator calls it.
pub type EasingFunction = Rc<dyn Fn(f64, f64) -> f64>;

/// Built-in easing presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EasingOption {
    #[default]
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInExpo,
    EaseOutExpo,
    EaseInOutExpo,
    EaseInCirc,
    EaseOutCirc,
    EaseInOutCirc,
    EaseInElastic,
    EaseOutElastic,
    EaseInOutElastic,
    EaseInBack,
    EaseOutBack,
    EaseInOutBack,
    EaseInBounce,
    EaseOutBounce,
    EaseInOutBounce,
}

impl EasingOption {
    pub const ALL: [EasingOption; 31] = [
        EasingOption::Linear,
        EasingOption::EaseInQuad,
        EasingOption::EaseOutQuad,
        EasingOption::EaseInOutQuad,
        EasingOption::EaseInCubic,
        EasingOption::EaseOutCubic,
        EasingOption::EaseInOutCubic,
        EasingOption::EaseInQuart,
        EasingOption::EaseOutQuart,
        EasingOption::EaseInOutQuart,
        EasingOption::EaseInQuint,
        EasingOption::EaseOutQuint,
        EasingOption::EaseInOutQuint,
        EasingOption::EaseInSine,
        EasingOption::EaseOutSine,
        EasingOption::EaseInOutSine,
        EasingOption::EaseInExpo,
        EasingOption::EaseOutExpo,
        EasingOption::EaseInOutExpo,
        EasingOption::EaseInCirc,
        EasingOption::EaseOutCirc,
        EasingOption::EaseInOutCirc,
        EasingOption::EaseInElastic,
        EasingOption::EaseOutElastic,
        EasingOption::EaseInOutElastic,
        EasingOption::EaseInBack,
        EasingOption::EaseOutBack,
        EasingOption::EaseInOutBack,
        EasingOption::EaseInBounce,
        EasingOption::EaseOutBounce,
        EasingOption::EaseInOutBounce,
    ];

    /// Kebab-case name, as accepted by `FromStr` and serde
    pub fn name(self) -> &'static str {
        match self {
            EasingOption::Linear => "linear",
            EasingOption::EaseInQuad => "ease-in-quad",
            EasingOption::EaseOutQuad => "ease-out-quad",
            EasingOption::EaseInOutQuad => "ease-in-out-quad",
            EasingOption::EaseInCubic => "ease-in-cubic",
            EasingOption::EaseOutCubic => "ease-out-cubic",
            EasingOption::EaseInOutCubic => "ease-in-out-cubic",
            EasingOption::EaseInQuart => "ease-in-quart",
            EasingOption::EaseOutQuart => "ease-out-quart",
            EasingOption::EaseInOutQuart => "ease-in-out-quart",
            EasingOption::EaseInQuint => "ease-in-quint",
            EasingOption::EaseOutQuint => "ease-out-quint",
            EasingOption::EaseInOutQuint => "ease-in-out-quint",
            EasingOption::EaseInSine => "ease-in-sine",
            EasingOption::EaseOutSine => "ease-out-sine",
            EasingOption::EaseInOutSine => "ease-in-out-sine",
            EasingOption::EaseInExpo => "ease-in-expo",
            EasingOption::EaseOutExpo => "ease-out-expo",
            EasingOption::EaseInOutExpo => "ease-in-out-expo",
            EasingOption::EaseInCirc => "ease-in-circ",
            EasingOption::EaseOutCirc => "ease-out-circ",
            EasingOption::EaseInOutCirc => "ease-in-out-circ",
            EasingOption::EaseInElastic => "ease-in-elastic",
            EasingOption::EaseOutElastic => "ease-out-elastic",
            EasingOption::EaseInOutElastic => "ease-in-out-elastic",
            EasingOption::EaseInBack => "ease-in-back",
            EasingOption::EaseOutBack => "ease-out-back",
            EasingOption::EaseInOutBack => "ease-in-out-back",
            EasingOption::EaseInBounce => "ease-in-bounce",
            EasingOption::EaseOutBounce => "ease-out-bounce",
            EasingOption::EaseInOutBounce => "ease-in-out-bounce",
        }
    }

    /// Evaluate the curve at normalized time `t`
    ///
    /// `t` is clamped to `[0, 1]`. Elastic and back curves overshoot, so the
    /// result can leave `[0, 1]` in between the endpoints.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);

        match self {
            EasingOption::Linear => t,
            EasingOption::EaseInQuad => t * t,
            EasingOption::EaseOutQuad => 1.0 - (1.0 - t).powi(2),
            EasingOption::EaseInOutQuad => in_out(t, |t| t * t),
            EasingOption::EaseInCubic => t.powi(3),
            EasingOption::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            EasingOption::EaseInOutCubic => in_out(t, |t| t.powi(3)),
            EasingOption::EaseInQuart => t.powi(4),
            EasingOption::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            EasingOption::EaseInOutQuart => in_out(t, |t| t.powi(4)),
            EasingOption::EaseInQuint => t.powi(5),
            EasingOption::EaseOutQuint => 1.0 - (1.0 - t).powi(5),
            EasingOption::EaseInOutQuint => in_out(t, |t| t.powi(5)),
            EasingOption::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            EasingOption::EaseOutSine => (t * PI / 2.0).sin(),
            EasingOption::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
            EasingOption::EaseInExpo => ease_in_expo(t),
            EasingOption::EaseOutExpo => 1.0 - ease_in_expo(1.0 - t),
            EasingOption::EaseInOutExpo => in_out(t, ease_in_expo),
            EasingOption::EaseInCirc => ease_in_circ(t),
            EasingOption::EaseOutCirc => 1.0 - ease_in_circ(1.0 - t),
            EasingOption::EaseInOutCirc => in_out(t, ease_in_circ),
            EasingOption::EaseInElastic => ease_in_elastic(t),
            EasingOption::EaseOutElastic => 1.0 - ease_in_elastic(1.0 - t),
            EasingOption::EaseInOutElastic => in_out(t, ease_in_elastic),
            EasingOption::EaseInBack => ease_in_back(t),
            EasingOption::EaseOutBack => 1.0 - ease_in_back(1.0 - t),
            EasingOption::EaseInOutBack => in_out(t, ease_in_back),
            EasingOption::EaseInBounce => 1.0 - ease_out_bounce(1.0 - t),
            EasingOption::EaseOutBounce => ease_out_bounce(t),
            EasingOption::EaseInOutBounce => in_out(t, |t| 1.0 - ease_out_bounce(1.0 - t)),
        }
    }

    /// Evaluate the curve for `elapsed` out of `total` seconds
    ///
    /// A non-positive `total` means the animation is already over.
    pub fn ease(self, elapsed: f64, total: f64) -> f64 {
        if total <= 0.0 {
            return 1.0;
        }
        self.apply(elapsed / total)
    }

    /// Resolve the preset into a pluggable [`EasingFunction`]
    pub fn function(self) -> EasingFunction {
        Rc::new(move |elapsed, total| self.ease(elapsed, total))
    }
}

impl fmt::Display for EasingOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EasingOption {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        EasingOption::ALL
            .into_iter()
            .find(|option| option.name() == wanted)
            .ok_or_else(|| AnimationError::UnknownEasing(s.to_string()))
    }
}

/// Mirror an ease-in curve into an ease-in-out curve
fn in_out(t: f64, ease_in: impl Fn(f64) -> f64) -> f64 {
    if t < 0.5 {
        ease_in(t * 2.0) / 2.0
    } else {
        1.0 - ease_in((1.0 - t) * 2.0) / 2.0
    }
}

fn ease_in_expo(t: f64) -> f64 {
    if t <= 0.0 {
        0.0
    } else {
        2f64.powf(10.0 * (t - 1.0))
    }
}

fn ease_in_circ(t: f64) -> f64 {
    1.0 - (1.0 - t * t).max(0.0).sqrt()
}

fn ease_in_elastic(t: f64) -> f64 {
    if t <= 0.0 {
        0.0
    } else if t >= 1.0 {
        1.0
    } else {
        let c4 = (2.0 * PI) / 3.0;
        -(2f64.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * c4).sin()
    }
}

fn ease_in_back(t: f64) -> f64 {
    let c1 = 1.70158;
    let c3 = c1 + 1.0;
    c3 * t * t * t - c1 * t * t
}

fn ease_out_bounce(t: f64) -> f64 {
    let n1 = 7.5625;
    let d1 = 2.75;

    if t < 1.0 / d1 {
        n1 * t * t
    } else if t < 2.0 / d1 {
        let t = t - 1.5 / d1;
        n1 * t * t + 0.75
    } else if t < 2.5 / d1 {
        let t = t - 2.25 / d1;
        n1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / d1;
        n1 * t * t + 0.984375
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_presets_hit_endpoints() {
        for option in EasingOption::ALL {
            assert!(option.apply(0.0).abs() < EPSILON, "{option} at 0");
            assert!((option.apply(1.0) - 1.0).abs() < EPSILON, "{option} at 1");
        }
    }

    #[test]
    fn test_linear() {
        let easing = EasingOption::Linear;
        assert_eq!(easing.apply(0.25), 0.25);
        assert_eq!(easing.ease(1.0, 2.0), 0.5);
        // Out of range input is clamped
        assert_eq!(easing.apply(-0.5), 0.0);
        assert_eq!(easing.apply(1.5), 1.0);
    }

    #[test]
    fn test_in_out_symmetry() {
        for option in [
            EasingOption::EaseInOutQuad,
            EasingOption::EaseInOutCubic,
            EasingOption::EaseInOutSine,
            EasingOption::EaseInOutCirc,
        ] {
            assert!((option.apply(0.5) - 0.5).abs() < EPSILON, "{option}");
            let a = option.apply(0.2);
            let b = option.apply(0.8);
            assert!((a + b - 1.0).abs() < EPSILON, "{option}");
        }
    }

    #[test]
    fn test_ease_in_is_slow_at_start() {
        assert!(EasingOption::EaseInCubic.apply(0.25) < 0.25);
        assert!(EasingOption::EaseOutCubic.apply(0.25) > 0.25);
    }

    #[test]
    fn test_back_overshoots() {
        assert!(EasingOption::EaseInBack.apply(0.2) < 0.0);
        assert!(EasingOption::EaseOutBack.apply(0.8) > 1.0);
    }

    #[test]
    fn test_zero_total_is_finished() {
        assert_eq!(EasingOption::EaseInQuad.ease(0.0, 0.0), 1.0);
    }

    #[test]
    fn test_function_matches_apply() {
        let f = EasingOption::EaseOutBounce.function();
        assert_eq!(f(0.5, 2.0), EasingOption::EaseOutBounce.apply(0.25));
    }

    #[test]
    fn test_parse_names() {
        for option in EasingOption::ALL {
            assert_eq!(option.name().parse::<EasingOption>(), Ok(option));
        }
        assert_eq!(
            "EASE_IN_OUT_QUAD".parse::<EasingOption>(),
            Ok(EasingOption::EaseInOutQuad)
        );
        assert!("ease-sideways".parse::<EasingOption>().is_err());
    }
}
