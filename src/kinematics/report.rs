//! End-of-session report.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::kinematics::registry::TrackRegistry;
use crate::kinematics::track_state::TrackState;

/// Round to two decimal places, ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Report entry for one identity that was observed long enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedObjectReport {
    pub track_id: i64,
    pub class_name: String,
    pub entry_frame: u64,
    pub exit_frame: u64,
    pub total_frames_tracked: u32,
    pub avg_speed_kph: f64,
    pub max_speed_kph: f64,
    pub path_length: usize,
}

impl From<&TrackState> for TrackedObjectReport {
    fn from(track: &TrackState) -> Self {
        Self {
            track_id: track.id(),
            class_name: track.class_label().to_owned(),
            entry_frame: track.entry_frame(),
            exit_frame: track.exit_frame(),
            total_frames_tracked: track.duration_frames(),
            avg_speed_kph: round2(track.avg_speed()),
            max_speed_kph: round2(track.max_speed()),
            path_length: track.history().len(),
        }
    }
}

/// Session facts supplied by the caller, not computed by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub total_frames: u64,
    pub video_fps: f64,
    pub video_width: u32,
    pub video_height: u32,
    pub analysis_time_seconds: f64,
}

impl SessionMetadata {
    pub fn new(total_frames: u64, video_fps: f64, width: u32, height: u32, elapsed: Duration) -> Self {
        Self {
            total_frames,
            video_fps,
            video_width: width,
            video_height: height,
            analysis_time_seconds: round2(elapsed.as_secs_f64()),
        }
    }
}

/// Time-domain summary row for one reported object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSummary {
    pub track_id: i64,
    pub class_name: String,
    pub entry_time_s: f64,
    pub exit_time_s: f64,
    pub duration_s: f64,
    pub path_points: usize,
}

/// Final session report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub total_objects_per_class: BTreeMap<String, u64>,
    pub all_tracked_objects: Vec<TrackedObjectReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SessionMetadata>,
}

impl Report {
    pub fn with_metadata(mut self, metadata: SessionMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Convert frame counts of every reported object to seconds at `fps`.
    ///
    /// A non-positive `fps` yields zero times.
    pub fn summaries(&self, fps: f64) -> Vec<ObjectSummary> {
        let seconds = |frames: f64| {
            if fps > 0.0 {
                round2(frames / fps)
            } else {
                0.0
            }
        };

        self.all_tracked_objects
            .iter()
            .map(|obj| ObjectSummary {
                track_id: obj.track_id,
                class_name: obj.class_name.clone(),
                entry_time_s: seconds(obj.entry_frame as f64),
                exit_time_s: seconds(obj.exit_frame as f64),
                duration_s: seconds(obj.total_frames_tracked as f64),
                path_points: obj.path_length,
            })
            .collect()
    }

    /// Pretty-printed JSON rendering of the report.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Turns registry contents into a [`Report`], dropping short-lived tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportAggregator {
    min_report_frames: u32,
}

impl Default for ReportAggregator {
    fn default() -> Self {
        Self::new(10)
    }
}

impl ReportAggregator {
    pub fn new(min_report_frames: u32) -> Self {
        Self { min_report_frames }
    }

    pub fn finalize(&self, registry: &TrackRegistry) -> Report {
        let mut all_tracked_objects: Vec<TrackedObjectReport> = registry
            .retired()
            .iter()
            .chain(registry.iter())
            .filter(|t| t.is_reportable(self.min_report_frames))
            .map(TrackedObjectReport::from)
            .collect();
        // First-sighting order.
        all_tracked_objects.sort_by_key(|r| (r.entry_frame, r.track_id));

        info!(
            reported = all_tracked_objects.len(),
            active = registry.len(),
            retired = registry.retired().len(),
            "finalized track report"
        );

        Report {
            total_objects_per_class: registry.class_counts().clone(),
            all_tracked_objects,
            metadata: None,
        }
    }
}
