use serde::{Deserialize, Serialize};

use crate::color::Color;

pub const MIN_TOLERANCE: f32 = 0.0;
pub const MAX_TOLERANCE: f32 = 100.0;
const MAX_CHANNEL: f32 = 255.0;

/// Color tolerance as a percentage of the 8-bit channel range
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Tolerance(f32);

impl Tolerance {
    pub const EXACT: Tolerance = Tolerance(MIN_TOLERANCE);
    pub const FULL: Tolerance = Tolerance(MAX_TOLERANCE);

    /// Clamp `percent` into `0..=100`; NaN becomes an exact match
    pub fn new(percent: f32) -> Self {
        if percent.is_nan() {
            return Self::EXACT;
        }
        Self(percent.clamp(MIN_TOLERANCE, MAX_TOLERANCE))
    }

    /// `None` when `percent` is outside `0..=100`
    pub fn checked(percent: f32) -> Option<Self> {
        (MIN_TOLERANCE..=MAX_TOLERANCE)
            .contains(&percent)
            .then_some(Self(percent))
    }

    pub fn percent(self) -> f32 {
        self.0
    }

    /// Allowed deviation per RGB channel
    pub fn channel_window(self) -> f32 {
        (self.0 / MAX_TOLERANCE) * MAX_CHANNEL
    }
}

impl From<f32> for Tolerance {
    fn from(percent: f32) -> Self {
        Tolerance::new(percent)
    }
}

impl From<Tolerance> for f32 {
    fn from(tolerance: Tolerance) -> Self {
        tolerance.0
    }
}

/// Tolerance-based comparison of RGB channels.
///
/// Alpha never takes part: two colors that differ only in opacity match.
#[derive(Debug, Clone, Copy)]
pub struct ColorMatcher {
    window: f32,
}

impl ColorMatcher {
    pub fn new(tolerance: Tolerance) -> Self {
        Self {
            window: tolerance.channel_window(),
        }
    }

    pub fn matches(&self, reference: Color, candidate: Color) -> bool {
        let within = |a: u8, b: u8| (a as f32 - b as f32).abs() <= self.window;
        within(reference.red, candidate.red)
            && within(reference.green, candidate.green)
            && within(reference.blue, candidate.blue)
    }
}

/// One-shot form of [`ColorMatcher::matches`]
pub fn matches(reference: Color, candidate: Color, tolerance_percent: f32) -> bool {
    ColorMatcher::new(Tolerance::new(tolerance_percent)).matches(reference, candidate)
}
