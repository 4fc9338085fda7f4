//! Calibrated speed from the two most recent history points.
//!
//! The conversion chain is pixels/frame → pixels/second (× fps) →
//! meters/second (÷ pixels per meter) → km/h (× 3.6).

use crate::kinematics::config::AnalyserConfig;
use crate::kinematics::track_state::{History, HistoryPoint};

/// Meters per second to kilometers per hour.
pub const KPH_PER_MPS: f64 = 3.6;

/// Frame gaps above this are treated as missed detections, not motion.
pub const DEFAULT_MAX_FRAME_GAP: u64 = 5;

/// Stateless pixel-to-km/h speed conversion for one camera calibration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedEstimator {
    fps: f64,
    scale_factor: f64,
    max_frame_gap: u64,
}

impl SpeedEstimator {
    pub fn new(fps: f64, scale_factor: f64) -> Self {
        Self {
            fps,
            scale_factor,
            max_frame_gap: DEFAULT_MAX_FRAME_GAP,
        }
    }

    pub fn from_config(config: &AnalyserConfig) -> Self {
        Self::new(config.fps, config.scale_factor).with_max_frame_gap(config.max_frame_gap)
    }

    pub fn with_max_frame_gap(mut self, gap: u64) -> Self {
        self.max_frame_gap = gap;
        self
    }

    /// Instantaneous speed in km/h from the last two points of `history`.
    ///
    /// Returns 0.0 with fewer than two points.
    pub fn estimate(&self, history: &History) -> f64 {
        match history.last_two() {
            Some((previous, latest)) => self.between(previous, latest),
            None => 0.0,
        }
    }

    /// Speed in km/h between two observations.
    ///
    /// A zero, negative or too large frame gap yields 0.0.
    pub fn between(&self, from: &HistoryPoint, to: &HistoryPoint) -> f64 {
        let frame_gap = match to.frame.checked_sub(from.frame) {
            Some(gap) if gap > 0 && gap <= self.max_frame_gap => gap,
            _ => return 0.0,
        };

        let distance_pixels = (to.position() - from.position()).norm();
        (distance_pixels / frame_gap as f64) * (self.fps / self.scale_factor) * KPH_PER_MPS
    }
}

/// Shorthand for [`SpeedEstimator::estimate`] with the default frame gap limit.
pub fn estimate(history: &History, fps: f64, scale_factor: f64) -> f64 {
    SpeedEstimator::new(fps, scale_factor).estimate(history)
}
