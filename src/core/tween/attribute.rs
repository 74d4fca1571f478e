//=========================================================================
// Attribute Tween
//=========================================================================
//
// Animation state for a single scalar.
//
// The destination is never stored: only `source` and `delta`. Moving the
// source after configuration adjusts `delta` so the original destination
// is kept.
//
// Progress is a normalized `fraction` that advances by `dt / duration`:
//   Linear   → clamps at 1, the only style that can be "unfinished"
//   Saw      → wraps to 0, perpetual
//   PingPong → wraps to 0, folded into a triangle wave on evaluation
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::easing::{self, Interpolator};

//=== RepeatStyle =========================================================

/// How a track behaves once its fraction reaches 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatStyle {
    /// Not animating: never written back, never polled for completion.
    #[default]
    Inactive,

    /// One-shot: clamps at the destination and completes.
    Linear,

    /// Repeats source → destination forever.
    Saw,

    /// Repeats source → destination → source forever.
    PingPong,
}

impl RepeatStyle {
    /// Whether the style repeats forever (and so never blocks completion).
    pub fn is_perpetual(self) -> bool {
        matches!(self, RepeatStyle::Saw | RepeatStyle::PingPong)
    }
}

//=== AttributeTween ======================================================

/// Interpolation state of one attribute.
#[derive(Debug, Clone, Copy)]
pub struct AttributeTween {
    source: f32,
    delta: f32,
    fraction: f32,
    duration: f32,
    style: RepeatStyle,
    interpolator: Interpolator,
    /// Offset requested before the track had a duration; applied on the
    /// next `configure`.
    pending_offset: f32,
}

impl Default for AttributeTween {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeTween {
    //--- Construction -----------------------------------------------------

    /// Creates an inactive track using [`easing::DEFAULT`].
    pub fn new() -> Self {
        Self {
            source: 0.0,
            delta: 0.0,
            fraction: 0.0,
            duration: 0.0,
            style: RepeatStyle::Inactive,
            interpolator: easing::DEFAULT,
            pending_offset: 0.0,
        }
    }

    //--- Configuration ----------------------------------------------------

    /// Starts animating from `source` to `destination`.
    ///
    /// `initial_offset` (seconds) pre-advances the track; negative values
    /// delay it. Any offset stored while the track was unconfigured is
    /// added on top.
    ///
    /// # Panics
    ///
    /// Panics if `duration <= 0.0`.
    pub fn configure(
        &mut self,
        source: f32,
        destination: f32,
        initial_offset: f32,
        duration: f32,
        style: RepeatStyle,
    ) {
        assert!(duration > 0.0, "Tween duration must be positive, got {}", duration);

        self.source = source;
        self.delta = destination - source;
        self.duration = duration;
        self.fraction = (initial_offset + std::mem::take(&mut self.pending_offset)) / duration;
        self.style = style;
    }

    /// Moves the starting point while keeping the destination.
    pub fn rebase_source(&mut self, source: f32) {
        self.delta += self.source - source;
        self.source = source;
    }

    pub fn set_interpolator(&mut self, interpolator: Interpolator) {
        self.interpolator = interpolator;
    }

    /// Jumps to `seconds` into the animation (negative delays it).
    ///
    /// On a track without a duration yet, the offset is remembered and
    /// applied when the track is configured.
    pub fn set_initial_offset(&mut self, seconds: f32) {
        if self.duration > 0.0 {
            self.fraction = seconds / self.duration;
        } else {
            self.pending_offset = seconds;
        }
    }

    //--- Update -----------------------------------------------------------

    /// Advances progress by `dt` seconds.
    ///
    /// Returns `true` when this track does not hold its owner unfinished:
    /// always for inactive and perpetual tracks, and for linear tracks once
    /// they reach the destination.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.style == RepeatStyle::Inactive {
            return true;
        }

        let fraction = self.fraction + dt / self.duration;

        match self.style {
            RepeatStyle::Linear => {
                self.fraction = fraction.min(1.0);
                self.fraction >= 1.0
            }
            _ => {
                self.fraction = if fraction >= 1.0 { fraction - fraction.floor() } else { fraction };
                true
            }
        }
    }

    /// Current interpolated value.
    pub fn evaluate(&self) -> f32 {
        let mut t = self.fraction.max(0.0);
        if self.style == RepeatStyle::PingPong {
            if t > 0.5 {
                t = 1.0 - t;
            }
            t *= 2.0;
        }
        self.source + (self.interpolator)(t) * self.delta
    }

    //--- Accessors --------------------------------------------------------

    pub fn is_active(&self) -> bool {
        self.style != RepeatStyle::Inactive
    }

    pub fn style(&self) -> RepeatStyle {
        self.style
    }

    pub fn source(&self) -> f32 {
        self.source
    }

    pub fn destination(&self) -> f32 {
        self.source + self.delta
    }

    pub fn fraction(&self) -> f32 {
        self.fraction
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tween::easing::{hump, linear, smooth};

    const EPSILON: f32 = 1e-4;

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    fn linear_track(source: f32, destination: f32, duration: f32) -> AttributeTween {
        let mut track = AttributeTween::new();
        track.configure(source, destination, 0.0, duration, RepeatStyle::Linear);
        track.set_interpolator(linear);
        track
    }

    //=====================================================================
    // Linear Style
    //=====================================================================

    #[test]
    fn linear_finishes_exactly_at_duration() {
        let mut track = linear_track(-200.0, 0.0, 0.5);

        assert!(!track.advance(0.25), "Half way must not report finished");
        assert_close(track.evaluate(), -100.0);

        assert!(track.advance(0.25), "Reaching the duration must report finished");
        assert_close(track.evaluate(), 0.0);
    }

    #[test]
    fn linear_clamps_past_the_end() {
        let mut track = linear_track(0.0, 10.0, 1.0);

        assert!(track.advance(5.0));
        assert_eq!(track.fraction(), 1.0);
        assert_close(track.evaluate(), 10.0);

        assert!(track.advance(1.0), "Stays finished");
    }

    #[test]
    fn final_value_uses_interpolator_endpoint() {
        let mut track = AttributeTween::new();
        track.configure(1.0, 3.0, 0.0, 2.0, RepeatStyle::Linear);
        track.set_interpolator(hump);

        track.advance(2.0);
        assert_close(track.evaluate(), 1.0 + hump(1.0) * 2.0);
    }

    #[test]
    fn default_interpolator_is_sqrt() {
        let mut track = AttributeTween::new();
        track.configure(0.0, 100.0, 0.0, 1.0, RepeatStyle::Linear);

        track.advance(0.25);
        assert_close(track.evaluate(), 50.0);
    }

    #[test]
    fn negative_offset_delays_start() {
        let mut track = linear_track(0.0, 10.0, 1.0);
        track.set_initial_offset(-0.5);

        assert!(!track.advance(0.25));
        assert_close(track.evaluate(), 0.0);

        track.advance(0.75);
        assert_close(track.evaluate(), 5.0);
    }

    #[test]
    #[should_panic(expected = "Tween duration must be positive")]
    fn zero_duration_panics() {
        AttributeTween::new().configure(0.0, 1.0, 0.0, 0.0, RepeatStyle::Linear);
    }

    //=====================================================================
    // Perpetual Styles
    //=====================================================================

    #[test]
    fn saw_wraps_and_never_blocks() {
        let mut track = AttributeTween::new();
        track.configure(0.0, 10.0, 0.0, 1.0, RepeatStyle::Saw);
        track.set_interpolator(linear);

        for _ in 0..12 {
            assert!(track.advance(0.25), "Saw tracks never block completion");
        }
        // 3.0 seconds wrap back to the start
        assert_close(track.fraction(), 0.0);

        track.advance(0.25);
        assert_close(track.evaluate(), 2.5);
    }

    #[test]
    fn pingpong_never_blocks() {
        let mut track = AttributeTween::new();
        track.configure(0.0, 10.0, 0.0, 0.4, RepeatStyle::PingPong);

        for _ in 0..20 {
            assert!(track.advance(0.07));
        }
    }

    #[test]
    fn pingpong_mirror_points_match() {
        let mut rising = AttributeTween::new();
        rising.configure(5.0, 15.0, 0.25, 1.0, RepeatStyle::PingPong);
        rising.set_interpolator(smooth);

        let mut falling = AttributeTween::new();
        falling.configure(5.0, 15.0, 0.75, 1.0, RepeatStyle::PingPong);
        falling.set_interpolator(smooth);

        assert_close(rising.evaluate(), falling.evaluate());
    }

    #[test]
    fn pingpong_peaks_at_destination_midway() {
        let mut track = AttributeTween::new();
        track.configure(0.0, 8.0, 0.0, 2.0, RepeatStyle::PingPong);
        track.set_interpolator(linear);

        track.advance(1.0);
        assert_close(track.evaluate(), 8.0);

        track.advance(0.5);
        assert_close(track.evaluate(), 4.0);
    }

    //=====================================================================
    // Rebasing and Offsets
    //=====================================================================

    #[test]
    fn rebase_preserves_destination() {
        let mut track = linear_track(10.0, 50.0, 1.0);
        track.rebase_source(-30.0);

        assert_eq!(track.source(), -30.0);
        assert_close(track.destination(), 50.0);

        track.advance(1.0);
        assert_close(track.evaluate(), 50.0);
    }

    #[test]
    fn rebase_moves_start_value() {
        let mut track = linear_track(0.0, 100.0, 1.0);
        track.rebase_source(-100.0);

        track.advance(0.0);
        assert_close(track.evaluate(), -100.0);
    }

    #[test]
    fn offset_before_configure_is_applied_later() {
        let mut track = AttributeTween::new();
        track.set_initial_offset(0.5);
        track.configure(0.0, 10.0, 0.0, 2.0, RepeatStyle::Linear);
        track.set_interpolator(linear);

        assert_close(track.fraction(), 0.25);
        assert_close(track.evaluate(), 2.5);
    }

    //=====================================================================
    // Inactive Style
    //=====================================================================

    #[test]
    fn inactive_track_is_inert() {
        let mut track = AttributeTween::new();
        assert!(!track.is_active());
        assert!(track.advance(1.0), "Inactive tracks never block completion");
        assert_eq!(track.fraction(), 0.0, "Inactive tracks do not advance");
    }
}
