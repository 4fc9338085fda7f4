//! Identity-keyed store of track states.

use std::collections::BTreeMap;

use tracing::{debug, info, trace, warn};

use crate::kinematics::bbox::PixelBox;
use crate::kinematics::config::AnalyserConfig;
use crate::kinematics::speed::SpeedEstimator;
use crate::kinematics::track_state::TrackState;

/// Outcome of a single [`TrackRegistry::update`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackUpdate {
    /// Instantaneous speed for this frame, whether or not it passed the noise floor.
    pub speed_kph: f64,
    /// True when the identity was seen for the first time.
    pub is_new: bool,
}

/// Owns every [`TrackState`] of a session plus per-class first-sighting counts.
#[derive(Debug, Clone)]
pub struct TrackRegistry {
    tracks: BTreeMap<i64, TrackState>,
    retired: Vec<TrackState>,
    class_counts: BTreeMap<String, u64>,
    estimator: SpeedEstimator,
    history_capacity: usize,
    noise_floor_kph: f64,
    min_report_frames: u32,
    stale_track_ttl: Option<u64>,
}

impl TrackRegistry {
    pub fn new(config: &AnalyserConfig) -> Self {
        Self {
            tracks: BTreeMap::new(),
            retired: Vec::new(),
            class_counts: BTreeMap::new(),
            estimator: SpeedEstimator::from_config(config),
            history_capacity: config.history_capacity,
            noise_floor_kph: config.noise_floor_kph,
            min_report_frames: config.min_report_frames,
            stale_track_ttl: config.stale_track_ttl,
        }
    }

    /// Seed per-class counts with zero so that classes never seen still get reported.
    pub fn with_class_labels<'a, I>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        for label in labels {
            self.class_counts.entry(label.to_owned()).or_insert(0);
        }
        self
    }

    /// Record a sighting of `identity` in `frame` and return its instantaneous speed.
    ///
    /// The class label of an identity is fixed at its first sighting.
    pub fn update(
        &mut self,
        identity: i64,
        class_label: &str,
        bbox: PixelBox,
        frame: u64,
    ) -> TrackUpdate {
        let is_new = !self.tracks.contains_key(&identity);
        if is_new {
            debug!(identity, class_label, frame, "new track");
            *self.class_counts.entry(class_label.to_owned()).or_insert(0) += 1;
        }

        let capacity = self.history_capacity;
        let track = self
            .tracks
            .entry(identity)
            .or_insert_with(|| TrackState::new(identity, class_label, frame, capacity));

        if !is_new && track.class_label() != class_label {
            warn!(
                identity,
                kept = track.class_label(),
                reported = class_label,
                "class changed for existing track, keeping first label"
            );
        }

        let (cx, cy) = bbox.center();
        track.observe(cx as f64, cy as f64, frame);

        let speed_kph = self.estimator.estimate(track.history());
        if speed_kph > self.noise_floor_kph {
            trace!(identity, frame, speed_kph, "speed sample");
            track.record_speed(speed_kph);
        }

        TrackUpdate { speed_kph, is_new }
    }

    /// Evict tracks whose last sighting lags `current_frame` by more than the configured TTL.
    ///
    /// Evicted tracks long enough to be reported are kept aside for the final
    /// report. Does nothing when no TTL is configured. Returns the number of
    /// tracks removed from the active set.
    pub fn sweep_stale(&mut self, current_frame: u64) -> usize {
        let Some(ttl) = self.stale_track_ttl else {
            return 0;
        };

        let stale: Vec<i64> = self
            .tracks
            .values()
            .filter(|t| current_frame.saturating_sub(t.exit_frame()) > ttl)
            .map(TrackState::id)
            .collect();

        for id in &stale {
            if let Some(track) = self.tracks.remove(id) {
                if track.is_reportable(self.min_report_frames) {
                    self.retired.push(track);
                }
            }
        }

        if !stale.is_empty() {
            info!(
                current_frame,
                evicted = stale.len(),
                active = self.tracks.len(),
                "swept stale tracks"
            );
        }
        stale.len()
    }

    pub fn get(&self, identity: i64) -> Option<&TrackState> {
        self.tracks.get(&identity)
    }

    /// Number of active tracks.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Active tracks in identity order.
    pub fn iter(&self) -> impl Iterator<Item = &TrackState> {
        self.tracks.values()
    }

    /// Tracks evicted by [`Self::sweep_stale`] that qualify for the report.
    pub fn retired(&self) -> &[TrackState] {
        &self.retired
    }

    /// Cumulative count of distinct identities per class label.
    pub fn class_counts(&self) -> &BTreeMap<String, u64> {
        &self.class_counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn centered(cx: i64, cy: i64) -> PixelBox {
        PixelBox::new(cx - 10, cy - 10, cx + 10, cy + 10)
    }

    #[test]
    fn test_first_sighting() {
        let mut registry = TrackRegistry::new(&AnalyserConfig::default());
        let update = registry.update(5, "car", centered(100, 100), 1);
        assert!(update.is_new);
        assert_eq!(update.speed_kph, 0.0);

        let track = registry.get(5).unwrap();
        assert_eq!(track.entry_frame(), 1);
        assert_eq!(track.exit_frame(), 1);
        assert_eq!(track.duration_frames(), 1);
        assert_eq!(track.history().len(), 1);
        assert_eq!(registry.class_counts()["car"], 1);
    }

    #[test]
    fn test_speed_and_noise_floor() {
        let mut registry = TrackRegistry::new(&AnalyserConfig::new(30.0, 5.0));
        registry.update(5, "car", centered(100, 100), 1);

        let moved = registry.update(5, "car", centered(110, 100), 2);
        assert!(!moved.is_new);
        assert_relative_eq!(moved.speed_kph, 216.0, epsilon = 1e-9);

        let still = registry.update(5, "car", centered(110, 100), 3);
        assert_eq!(still.speed_kph, 0.0);

        let track = registry.get(5).unwrap();
        assert_eq!(track.valid_speed_samples().len(), 1);
        assert_relative_eq!(track.avg_speed(), 216.0, epsilon = 1e-9);
        assert_relative_eq!(track.max_speed(), 216.0, epsilon = 1e-9);
        assert_eq!(track.duration_frames(), 3);
    }

    #[test]
    fn test_sub_floor_speed_is_returned_but_not_aggregated() {
        // 1 px/frame at fps 1 and 10 px/m is 0.36 km/h
        let mut registry = TrackRegistry::new(&AnalyserConfig::new(1.0, 10.0));
        registry.update(1, "person", centered(0, 0), 1);
        let update = registry.update(1, "person", centered(1, 0), 2);
        assert_relative_eq!(update.speed_kph, 0.36, epsilon = 1e-9);
        assert!(registry.get(1).unwrap().valid_speed_samples().is_empty());
        assert_eq!(registry.get(1).unwrap().avg_speed(), 0.0);
    }

    #[test]
    fn test_speed_at_floor_is_not_aggregated() {
        // 1 px/frame at fps 1 and 3.6 px/m is exactly 1.0 km/h
        let mut registry = TrackRegistry::new(&AnalyserConfig::new(1.0, 3.6));
        registry.update(1, "car", centered(0, 0), 1);

        let at_floor = registry.update(1, "car", centered(1, 0), 2);
        assert_eq!(at_floor.speed_kph, 1.0);
        assert!(registry.get(1).unwrap().valid_speed_samples().is_empty());
        assert_eq!(registry.get(1).unwrap().max_speed(), 0.0);

        let above = registry.update(1, "car", centered(3, 0), 3);
        assert_eq!(above.speed_kph, 2.0);
        let track = registry.get(1).unwrap();
        assert_eq!(track.valid_speed_samples(), &[2.0]);
        assert_eq!(track.avg_speed(), 2.0);
        assert_eq!(track.max_speed(), 2.0);
    }

    #[test]
    fn test_first_label_wins() {
        let mut registry = TrackRegistry::new(&AnalyserConfig::default());
        registry.update(3, "car", centered(0, 0), 1);
        registry.update(3, "truck", centered(0, 0), 2);
        assert_eq!(registry.get(3).unwrap().class_label(), "car");
        assert_eq!(registry.class_counts().get("truck"), None);
        assert_eq!(registry.class_counts()["car"], 1);
    }

    #[test]
    fn test_seeded_counts() {
        let registry =
            TrackRegistry::new(&AnalyserConfig::default()).with_class_labels(["car", "person"]);
        assert_eq!(registry.class_counts()["car"], 0);
        assert_eq!(registry.class_counts()["person"], 0);
    }

    #[test]
    fn test_duration_ignores_frame_gaps() {
        let mut registry = TrackRegistry::new(&AnalyserConfig::default());
        for frame in [1, 2, 50, 51, 400] {
            registry.update(8, "bus", centered(0, 0), frame);
        }
        let track = registry.get(8).unwrap();
        assert_eq!(track.duration_frames(), 5);
        assert_eq!(track.entry_frame(), 1);
        assert_eq!(track.exit_frame(), 400);
    }

    #[test]
    fn test_sweep_is_off_by_default() {
        let mut registry = TrackRegistry::new(&AnalyserConfig::default());
        registry.update(1, "car", centered(0, 0), 1);
        assert_eq!(registry.sweep_stale(10_000), 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_sweep_retires_reportable_tracks() {
        let config = AnalyserConfig::default().with_stale_track_ttl(30);
        let mut registry = TrackRegistry::new(&config);
        for frame in 1..=12 {
            registry.update(1, "car", centered(0, 0), frame);
        }
        registry.update(2, "car", centered(50, 50), 5);

        assert_eq!(registry.sweep_stale(40), 1);
        assert!(registry.get(2).is_none());
        assert!(registry.get(1).is_some());

        assert_eq!(registry.sweep_stale(100), 1);
        assert!(registry.is_empty());
        assert_eq!(registry.retired().len(), 1);
        assert_eq!(registry.retired()[0].id(), 1);
        assert_eq!(registry.class_counts()["car"], 2);
    }
}
