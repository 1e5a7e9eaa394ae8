//! Count-up animation for the health score ring.
//!
//! The displayed score climbs from 0 to the target over two seconds, one
//! frame every 16 ms. Each frame carries the ring's stroke offset and the
//! colour tier of the running value, so the colour can change mid-animation.
//!
//! This type only computes frames; scheduling lives in the application layer.

use std::f64::consts::PI;
use std::time::Duration;

use super::Tier;

/// Total animation length.
pub const SCORE_ANIMATION_DURATION: Duration = Duration::from_millis(2000);

/// Time between frames (~60 fps).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Ring radius in drawing units.
const RING_RADIUS: f64 = 90.0;

/// Circumference of the score ring, `2π × 90`.
pub const RING_CIRCUMFERENCE: f64 = 2.0 * PI * RING_RADIUS;

/// One rendered step of the animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreFrame {
    /// Score text, the running value rounded
    pub displayed: u32,

    /// Unrounded running value
    pub current: f64,

    /// `circumference − (current / 100) × circumference`
    pub stroke_offset: f64,

    /// Colour tier of the running value
    pub tier: Tier,

    /// Whether this is the last frame
    pub finished: bool,
}

impl ScoreFrame {
    /// Filled fraction of the ring (0.0 to 1.0), derived from the stroke offset.
    #[must_use]
    pub fn fill_ratio(&self) -> f64 {
        (1.0 - self.stroke_offset / RING_CIRCUMFERENCE).clamp(0.0, 1.0)
    }
}

/// State of a running count-up.
#[derive(Debug, Clone)]
pub struct ScoreAnimation {
    target: f64,
    increment: f64,
    current: f64,
    finished: bool,
}

impl ScoreAnimation {
    /// Start a new animation toward `target`.
    ///
    /// The target is clamped to 0-100; a non-finite target animates to 0.
    #[must_use]
    pub fn new(target: f64) -> Self {
        let target = if target.is_finite() {
            target.clamp(0.0, 100.0)
        } else {
            0.0
        };
        let steps = SCORE_ANIMATION_DURATION.as_millis() as f64 / FRAME_INTERVAL.as_millis() as f64;

        Self {
            target,
            increment: target / steps,
            current: 0.0,
            finished: false,
        }
    }

    /// The frame before the first tick (score 0).
    #[must_use]
    pub fn initial_frame(&self) -> ScoreFrame {
        self.frame()
    }

    /// Advance one frame. Once finished, keeps returning the final frame.
    pub fn advance(&mut self) -> ScoreFrame {
        if !self.finished {
            self.current += self.increment;
            if self.current >= self.target {
                self.current = self.target;
                self.finished = true;
            }
        }
        self.frame()
    }

    fn frame(&self) -> ScoreFrame {
        ScoreFrame {
            displayed: self.current.round() as u32,
            current: self.current,
            stroke_offset: RING_CIRCUMFERENCE - (self.current / 100.0) * RING_CIRCUMFERENCE,
            tier: Tier::for_score(self.current),
            finished: self.finished,
        }
    }
}
