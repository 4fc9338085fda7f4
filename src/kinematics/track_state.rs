//! Per-identity kinematic record.

use std::collections::VecDeque;

use nalgebra::Point2;

/// One observed center position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryPoint {
    pub x: f64,
    pub y: f64,
    pub frame: u64,
}

impl HistoryPoint {
    pub fn new(x: f64, y: f64, frame: u64) -> Self {
        Self { x, y, frame }
    }

    pub fn position(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }
}

/// Fixed-capacity trailing window of center positions, oldest first.
#[derive(Debug, Clone)]
pub struct History {
    points: VecDeque<HistoryPoint>,
    capacity: usize,
}

impl History {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a point, evicting the oldest one when full.
    pub fn push(&mut self, point: HistoryPoint) {
        if self.capacity == 0 {
            return;
        }
        while self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&HistoryPoint> {
        self.points.back()
    }

    /// The two most recent points as `(previous, latest)`.
    pub fn last_two(&self) -> Option<(&HistoryPoint, &HistoryPoint)> {
        let n = self.points.len();
        if n < 2 {
            return None;
        }
        Some((&self.points[n - 2], &self.points[n - 1]))
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryPoint> {
        self.points.iter()
    }
}

impl FromIterator<HistoryPoint> for History {
    /// Collect points into a history whose capacity equals the point count.
    fn from_iter<I: IntoIterator<Item = HistoryPoint>>(iter: I) -> Self {
        let points: VecDeque<_> = iter.into_iter().collect();
        let capacity = points.len().max(1);
        Self { points, capacity }
    }
}

/// State kept for one tracked identity over a session.
#[derive(Debug, Clone)]
pub struct TrackState {
    id: i64,
    class_label: String,
    entry_frame: u64,
    exit_frame: u64,
    duration_frames: u32,
    history: History,
    valid_speed_samples: Vec<f64>,
    speed_sum: f64,
    avg_speed: f64,
    max_speed: f64,
}

impl TrackState {
    /// Create the state for an identity first seen at `frame`.
    pub fn new(id: i64, class_label: impl Into<String>, frame: u64, history_capacity: usize) -> Self {
        Self {
            id,
            class_label: class_label.into(),
            entry_frame: frame,
            exit_frame: frame,
            duration_frames: 0,
            history: History::with_capacity(history_capacity),
            valid_speed_samples: Vec::new(),
            speed_sum: 0.0,
            avg_speed: 0.0,
            max_speed: 0.0,
        }
    }

    /// Register a sighting centered at `(x, y)` in `frame`.
    pub fn observe(&mut self, x: f64, y: f64, frame: u64) {
        self.exit_frame = frame;
        self.history.push(HistoryPoint::new(x, y, frame));
        self.duration_frames += 1;
    }

    /// Fold a speed sample that passed the noise floor into the aggregates.
    pub fn record_speed(&mut self, kph: f64) {
        self.valid_speed_samples.push(kph);
        self.speed_sum += kph;
        self.avg_speed = self.speed_sum / self.valid_speed_samples.len() as f64;
        self.max_speed = self.max_speed.max(kph);
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn class_label(&self) -> &str {
        &self.class_label
    }

    pub fn entry_frame(&self) -> u64 {
        self.entry_frame
    }

    pub fn exit_frame(&self) -> u64 {
        self.exit_frame
    }

    pub fn duration_frames(&self) -> u32 {
        self.duration_frames
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn valid_speed_samples(&self) -> &[f64] {
        &self.valid_speed_samples
    }

    pub fn avg_speed(&self) -> f64 {
        self.avg_speed
    }

    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    /// Whether the track was observed long enough to appear in a report.
    pub fn is_reportable(&self, min_report_frames: u32) -> bool {
        self.duration_frames > min_report_frames
    }
}
