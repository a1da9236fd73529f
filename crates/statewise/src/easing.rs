//! Easing curves.
//!
//! Every curve maps normalized time `t` in `[0, 1]` to progress, with
//! `f(0) == 0` and `f(1) == 1`. `in_out` variants run the `in` curve on the
//! first half and the mirrored `out` curve on the second half.

use std::f32::consts::PI;
use std::fmt;

use crate::error::{Error, Result};

/// Easing function type: takes progress (0.0 to 1.0) and returns eased value (0.0 to 1.0)
pub type EasingFn = fn(f32) -> f32;

/// Linear interpolation (no easing)
pub fn linear(t: f32) -> f32 {
    t
}

/// Ease in (quadratic) - slow start, accelerating
pub fn quadratic_in(t: f32) -> f32 {
    t * t
}

/// Ease out (quadratic) - fast start, decelerating
pub fn quadratic_out(t: f32) -> f32 {
    -t * (t - 2.0)
}

pub fn quadratic_in_out(t: f32) -> f32 {
    let t = t * 2.0;
    if t < 1.0 {
        t * t / 2.0
    } else {
        let t = t - 1.0;
        -(t * (t - 2.0) - 1.0) / 2.0
    }
}

/// Ease in (cubic) - stronger slow start effect
pub fn cubic_in(t: f32) -> f32 {
    t * t * t
}

/// Ease out (cubic) - stronger fast start effect
pub fn cubic_out(t: f32) -> f32 {
    let t = t - 1.0;
    t * t * t + 1.0
}

pub fn cubic_in_out(t: f32) -> f32 {
    let t = t * 2.0;
    if t < 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

pub fn quartic_in(t: f32) -> f32 {
    t * t * t * t
}

pub fn quartic_out(t: f32) -> f32 {
    let t = t - 1.0;
    -(t * t * t * t - 1.0)
}

pub fn quartic_in_out(t: f32) -> f32 {
    let t = t * 2.0;
    if t < 1.0 {
        t * t * t * t / 2.0
    } else {
        let t = t - 2.0;
        -(t * t * t * t - 2.0) / 2.0
    }
}

pub fn quintic_in(t: f32) -> f32 {
    t * t * t * t * t
}

pub fn quintic_out(t: f32) -> f32 {
    let t = t - 1.0;
    t * t * t * t * t + 1.0
}

pub fn quintic_in_out(t: f32) -> f32 {
    let t = t * 2.0;
    if t < 1.0 {
        t * t * t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t * t * t + 2.0) / 2.0
    }
}

pub fn sine_in(t: f32) -> f32 {
    1.0 - (t * PI / 2.0).cos()
}

pub fn sine_out(t: f32) -> f32 {
    (t * PI / 2.0).sin()
}

pub fn sine_in_out(t: f32) -> f32 {
    -((PI * t).cos() - 1.0) / 2.0
}

// The exponential curves only approach their endpoints, so both ends are pinned.

pub fn exponential_in(t: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    2f32.powf(10.0 * (t - 1.0))
}

pub fn exponential_out(t: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    1.0 - 2f32.powf(-10.0 * t)
}

pub fn exponential_in_out(t: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let t = t * 2.0;
    if t < 1.0 {
        2f32.powf(10.0 * (t - 1.0)) / 2.0
    } else {
        (2.0 - 2f32.powf(-10.0 * (t - 1.0))) / 2.0
    }
}

/// `sqrt(1 - t^2)` with the argument clamped to the real domain
fn unit_circle(t: f32) -> f32 {
    (1.0 - t * t).max(0.0).sqrt()
}

pub fn circular_in(t: f32) -> f32 {
    1.0 - unit_circle(t)
}

pub fn circular_out(t: f32) -> f32 {
    unit_circle(t - 1.0)
}

pub fn circular_in_out(t: f32) -> f32 {
    let t = t * 2.0;
    if t < 1.0 {
        (1.0 - unit_circle(t)) / 2.0
    } else {
        (unit_circle(t - 2.0) + 1.0) / 2.0
    }
}

/// Every named curve, `linear` first
pub const EASING_FUNCTIONS: [(&str, EasingFn); 22] = [
    ("linear", linear),
    ("quadratic_in", quadratic_in),
    ("quadratic_out", quadratic_out),
    ("quadratic_in_out", quadratic_in_out),
    ("cubic_in", cubic_in),
    ("cubic_out", cubic_out),
    ("cubic_in_out", cubic_in_out),
    ("quartic_in", quartic_in),
    ("quartic_out", quartic_out),
    ("quartic_in_out", quartic_in_out),
    ("quintic_in", quintic_in),
    ("quintic_out", quintic_out),
    ("quintic_in_out", quintic_in_out),
    ("sine_in", sine_in),
    ("sine_out", sine_out),
    ("sine_in_out", sine_in_out),
    ("exponential_in", exponential_in),
    ("exponential_out", exponential_out),
    ("exponential_in_out", exponential_in_out),
    ("circular_in", circular_in),
    ("circular_out", circular_out),
    ("circular_in_out", circular_in_out),
];

/// Look up a curve by name
///
/// `quadric_*` is accepted as an older spelling of `quadratic_*`.
pub fn easing_by_name(name: &str) -> Result<EasingFn> {
    let canonical = match name.strip_prefix("quadric_") {
        Some(variant) => format!("quadratic_{variant}"),
        None => name.to_string(),
    };
    EASING_FUNCTIONS
        .iter()
        .find(|(n, _)| *n == canonical)
        .map(|(_, f)| *f)
        .ok_or_else(|| Error::InvalidCurve(name.to_string()))
}

/// The easing of a transition: a registered name or a caller-supplied function
#[derive(Clone)]
pub enum Curve {
    Named(String),
    Custom(EasingFn),
}

impl Curve {
    /// Resolve to a function, failing on unknown names
    pub fn resolve(&self) -> Result<EasingFn> {
        match self {
            Curve::Named(name) => easing_by_name(name),
            Curve::Custom(f) => Ok(*f),
        }
    }
}

impl Default for Curve {
    fn default() -> Self {
        Curve::Named("linear".to_string())
    }
}

impl fmt::Debug for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Curve::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Curve::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<&str> for Curve {
    fn from(name: &str) -> Self {
        Curve::Named(name.to_string())
    }
}

impl From<String> for Curve {
    fn from(name: String) -> Self {
        Curve::Named(name)
    }
}

impl From<EasingFn> for Curve {
    fn from(f: EasingFn) -> Self {
        Curve::Custom(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    #[test]
    fn test_endpoints_for_every_curve() {
        for (name, f) in EASING_FUNCTIONS {
            assert!(f(0.0).abs() < EPS, "{name}(0) = {}", f(0.0));
            assert!((f(1.0) - 1.0).abs() < EPS, "{name}(1) = {}", f(1.0));
        }
    }

    #[test]
    fn test_exponential_pinned_exactly() {
        for f in [exponential_in, exponential_out, exponential_in_out] {
            assert_eq!(f(0.0), 0.0);
            assert_eq!(f(1.0), 1.0);
        }
    }

    #[test]
    fn test_in_out_midpoint() {
        for (name, f) in EASING_FUNCTIONS.iter().filter(|(n, _)| n.ends_with("in_out")) {
            assert!((f(0.5) - 0.5).abs() < EPS, "{name}(0.5) = {}", f(0.5));
        }
    }

    #[test]
    fn test_in_out_monotonic() {
        for (name, f) in EASING_FUNCTIONS {
            let mut prev = f(0.0);
            for i in 1..=100 {
                let v = f(i as f32 / 100.0);
                assert!(v >= prev - 1e-5, "{name} decreases at {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn test_circular_stays_in_domain() {
        // Slightly outside [0, 1] must not produce NaN
        assert!(!circular_in(1.0001).is_nan());
        assert!(!circular_out(-0.0001).is_nan());
        assert!(!circular_in_out(1.0001).is_nan());
    }

    #[test]
    fn test_ease_in_slower_at_start() {
        assert!(quadratic_in(0.5) < 0.5);
        assert!(quadratic_out(0.5) > 0.5);
    }

    #[test]
    fn test_lookup_and_alias() {
        assert_eq!(easing_by_name("cubic_in").map(|f| f(0.5)), Ok(0.125));
        assert_eq!(easing_by_name("quadric_in").map(|f| f(0.5)), Ok(0.25));
        assert_eq!(
            easing_by_name("bouncy").map(|f| f(0.5)),
            Err(Error::InvalidCurve("bouncy".into()))
        );
    }

    #[test]
    fn test_curve_default_is_linear() {
        let f = Curve::default().resolve().map(|f| f(0.3));
        assert_eq!(f, Ok(0.3));
    }
}
