//=========================================================================
// Interpolators
//=========================================================================
//
// Pure functions shaping normalized progress `t` in [0, 1].
//
// Two families:
// - eases go from 0 to 1 (`f(0) = 0`, `f(1) = 1`); `bump` overshoots
//   before settling
// - humps go from 0 back to 0, peaking at 1 in between; used for
//   non-returning flashes and pulses
//
//=========================================================================

/// Shapes normalized progress. Held by value in every attribute tween.
pub type Interpolator = fn(f32) -> f32;

/// Interpolator used by tracks that were never given one.
pub const DEFAULT: Interpolator = sqrt;

//=== Eases ===============================================================

pub fn linear(t: f32) -> f32 {
    t
}

/// Cubic smoothstep: zero slope at both ends.
pub fn smooth(t: f32) -> f32 {
    3.0 * t * t - 2.0 * t * t * t
}

pub fn square(t: f32) -> f32 {
    t * t
}

/// Fast start, slow settle.
pub fn sqrt(t: f32) -> f32 {
    t.sqrt()
}

/// Overshoots past 1 then settles back.
pub fn bump(t: f32) -> f32 {
    -5.0 * t * (1.0 - t) * (t - 1.0) + t
}

//=== Humps ===============================================================

/// Parabola peaking at 1 when `t = 0.5`.
pub fn hump(t: f32) -> f32 {
    4.0 * t * (1.0 - t)
}

/// Smoother hump with flat ends.
pub fn hump_smooth(t: f32) -> f32 {
    16.0 * t * t * (1.0 - t) * (1.0 - t)
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn eases_start_at_zero_and_end_at_one() {
        for (name, f) in [
            ("linear", linear as Interpolator),
            ("smooth", smooth),
            ("square", square),
            ("sqrt", sqrt),
            ("bump", bump),
        ] {
            assert!(approx(f(0.0), 0.0), "{} should start at 0", name);
            assert!(approx(f(1.0), 1.0), "{} should end at 1", name);
        }
    }

    #[test]
    fn humps_return_to_zero() {
        for (name, f) in [("hump", hump as Interpolator), ("hump_smooth", hump_smooth)] {
            assert!(approx(f(0.0), 0.0), "{} should start at 0", name);
            assert!(approx(f(0.5), 1.0), "{} should peak at the midpoint", name);
            assert!(approx(f(1.0), 0.0), "{} should end at 0", name);
        }
    }

    #[test]
    fn smooth_is_symmetric_around_midpoint() {
        assert!(approx(smooth(0.5), 0.5));
        assert!(approx(smooth(0.25) + smooth(0.75), 1.0));
    }

    #[test]
    fn bump_overshoots() {
        assert!(bump(0.7) > 1.0, "bump should exceed 1 before settling");
    }

    #[test]
    fn default_is_sqrt() {
        assert!(approx(DEFAULT(0.25), 0.5));
    }
}
