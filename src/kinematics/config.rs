//! Calibration and policy constants for the kinematics engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when an [`AnalyserConfig`] cannot produce meaningful speeds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("fps must be a positive finite number, got {0}")]
    InvalidFps(f64),
    #[error("scale factor must be a positive finite number of pixels per meter, got {0}")]
    InvalidScaleFactor(f64),
    #[error("history capacity must hold at least 2 points, got {0}")]
    HistoryTooShort(usize),
}

/// Configuration for the frame processor and everything it owns.
///
/// `scale_factor` has to be calibrated per camera setup. A wrong value is
/// not detectable here and silently scales every reported speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyserConfig {
    /// Source frame rate.
    pub fps: f64,
    /// Pixels per meter.
    pub scale_factor: f64,
    /// Number of recent center points kept per track.
    pub history_capacity: usize,
    /// Largest frame gap between two history points that still yields a speed.
    pub max_frame_gap: u64,
    /// Speeds at or below this value (km/h) are not aggregated.
    pub noise_floor_kph: f64,
    /// Tracks observed for this many frames or fewer are left out of the report.
    pub min_report_frames: u32,
    /// Evict tracks unseen for more than this many frames. `None` keeps every track.
    pub stale_track_ttl: Option<u64>,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            fps: 30.0,
            scale_factor: 5.0,
            history_capacity: 10,
            max_frame_gap: 5,
            noise_floor_kph: 1.0,
            min_report_frames: 10,
            stale_track_ttl: None,
        }
    }
}

impl AnalyserConfig {
    pub fn new(fps: f64, scale_factor: f64) -> Self {
        Self {
            fps,
            scale_factor,
            ..Self::default()
        }
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn with_max_frame_gap(mut self, gap: u64) -> Self {
        self.max_frame_gap = gap;
        self
    }

    pub fn with_noise_floor(mut self, kph: f64) -> Self {
        self.noise_floor_kph = kph;
        self
    }

    pub fn with_min_report_frames(mut self, frames: u32) -> Self {
        self.min_report_frames = frames;
        self
    }

    pub fn with_stale_track_ttl(mut self, ttl: u64) -> Self {
        self.stale_track_ttl = Some(ttl);
        self
    }

    /// Check that the calibration values can produce finite speeds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(ConfigError::InvalidFps(self.fps));
        }
        if !(self.scale_factor.is_finite() && self.scale_factor > 0.0) {
            return Err(ConfigError::InvalidScaleFactor(self.scale_factor));
        }
        if self.history_capacity < 2 {
            return Err(ConfigError::HistoryTooShort(self.history_capacity));
        }
        Ok(())
    }
}
