//! First-order exponential smoothing for the aura position
//!
//! Each frame closes a fixed fraction of the remaining distance on both axes.
//! This is an IIR low-pass filter whose time constant is set by the frame
//! rate: at 60fps and a factor of 0.16 the aura is ~95% settled after
//! roughly 18 frames.

use crate::config::AuraConfig;
use crate::error::{AuraError, AuraResult};
use crate::geometry::Point;

/// Default fraction of the remaining distance closed per frame
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.16;

/// Default settle threshold, in summed absolute-axis pixels
pub const DEFAULT_TOLERANCE: f64 = 0.3;

/// Smoothing parameters shared by every tracker on a page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoothing {
    pub factor: f64,
    pub tolerance: f64,
}

impl Default for Smoothing {
    fn default() -> Self {
        Self {
            factor: DEFAULT_SMOOTHING_FACTOR,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl Smoothing {
    /// Create validated smoothing parameters
    ///
    /// The factor must lie in `(0, 1]` and the tolerance must be positive,
    /// otherwise the loop would never converge or never stop.
    pub fn new(factor: f64, tolerance: f64) -> AuraResult<Self> {
        if !factor.is_finite() || factor <= 0.0 || factor > 1.0 {
            return Err(AuraError::InvalidConfig(format!(
                "smoothing factor must be in (0, 1], got {}",
                factor
            )));
        }
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(AuraError::InvalidConfig(format!(
                "tolerance must be positive, got {}",
                tolerance
            )));
        }
        Ok(Self { factor, tolerance })
    }

    pub fn from_config(config: &AuraConfig) -> AuraResult<Self> {
        Self::new(config.smoothing_factor, config.tolerance)
    }

    /// Advance `current` one frame toward `target`
    pub fn step(&self, current: Point, target: Point) -> Point {
        Point::new(
            current.x + (target.x - current.x) * self.factor,
            current.y + (target.y - current.y) * self.factor,
        )
    }

    /// True once the remaining Manhattan distance is within tolerance
    pub fn is_settled(&self, current: Point, target: Point) -> bool {
        current.manhattan_distance(target) <= self.tolerance
    }

    /// Number of frames needed to bring `distance` within tolerance
    ///
    /// Closed form of the step recurrence: the error after `n` frames is
    /// `distance * (1 - factor)^n`.
    pub fn steps_to_converge(&self, distance: f64) -> u32 {
        let distance = distance.abs();
        if distance <= self.tolerance {
            return 0;
        }
        if self.factor >= 1.0 {
            return 1;
        }
        let steps = (self.tolerance / distance).ln() / (1.0 - self.factor).ln();
        steps.ceil() as u32
    }
}
