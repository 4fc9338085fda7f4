//! Per-frame orchestration of tracker output through the registry.

use ndarray::ArrayView2;
use tracing::debug;

use crate::kinematics::class_names::ClassNames;
use crate::kinematics::config::{AnalyserConfig, ConfigError};
use crate::kinematics::object::{AnnotatedObject, TrackedObject};
use crate::kinematics::registry::TrackRegistry;
use crate::kinematics::report::{Report, ReportAggregator};

/// Feeds tracked objects frame by frame into a [`TrackRegistry`] and
/// annotates each one with its instantaneous speed.
///
/// Frames must be processed in increasing `frame_number` order. Malformed
/// records never abort a frame: they are skipped and the rest is processed.
#[derive(Debug, Clone)]
pub struct FrameProcessor {
    registry: TrackRegistry,
    class_names: ClassNames,
    config: AnalyserConfig,
    frames_processed: u64,
    last_frame: Option<u64>,
}

impl FrameProcessor {
    pub fn new(class_names: ClassNames, config: AnalyserConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let registry = TrackRegistry::new(&config).with_class_labels(class_names.labels());
        Ok(Self {
            registry,
            class_names,
            config,
            frames_processed: 0,
            last_frame: None,
        })
    }

    /// Process raw tracker records `(x1, y1, x2, y2, track_id, class_id, ..)`.
    ///
    /// Fields may be `f32` or `f64`; use `f64` when identities can exceed
    /// 2^24. Records with fewer than six fields or a non-finite field are
    /// skipped.
    pub fn process_frame<R, T>(
        &mut self,
        tracked_objects: &[R],
        frame_number: u64,
    ) -> Vec<AnnotatedObject>
    where
        R: AsRef<[T]>,
        T: Copy + Into<f64>,
    {
        let objects = tracked_objects.iter().map(|r| TrackedObject::from_slice(r.as_ref()));
        self.process(objects, frame_number)
    }

    /// Process a tracker output matrix with one object per row.
    pub fn process_array<T>(
        &mut self,
        tracked_objects: ArrayView2<'_, T>,
        frame_number: u64,
    ) -> Vec<AnnotatedObject>
    where
        T: Copy + Into<f64>,
    {
        let objects = tracked_objects
            .rows()
            .into_iter()
            .map(|row| TrackedObject::from_fields(row.iter().map(|&v| v.into())));
        self.process(objects, frame_number)
    }

    /// Process already typed tracker output.
    pub fn process_objects(
        &mut self,
        tracked_objects: &[TrackedObject],
        frame_number: u64,
    ) -> Vec<AnnotatedObject> {
        self.process(tracked_objects.iter().copied().map(Some), frame_number)
    }

    fn process<I>(&mut self, objects: I, frame_number: u64) -> Vec<AnnotatedObject>
    where
        I: Iterator<Item = Option<TrackedObject>>,
    {
        let mut annotated = Vec::with_capacity(objects.size_hint().0);
        let mut skipped = 0usize;

        for object in objects {
            let Some(object) = object else {
                skipped += 1;
                continue;
            };
            let label = self.class_names.label(object.class_id);
            let update = self
                .registry
                .update(object.track_id, label, object.bbox, frame_number);
            annotated.push(AnnotatedObject::new(&object, update.speed_kph));
        }

        if skipped > 0 {
            debug!(frame_number, skipped, "skipped malformed tracker records");
        }

        self.frames_processed += 1;
        self.last_frame = Some(frame_number);
        self.registry.sweep_stale(frame_number);

        annotated
    }

    /// Build the end-of-session report from the current state.
    pub fn finalize(&self) -> Report {
        ReportAggregator::new(self.config.min_report_frames).finalize(&self.registry)
    }

    pub fn registry(&self) -> &TrackRegistry {
        &self.registry
    }

    pub fn class_names(&self) -> &ClassNames {
        &self.class_names
    }

    pub fn config(&self) -> &AnalyserConfig {
        &self.config
    }

    /// Number of frames handed to this processor.
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn last_frame(&self) -> Option<u64> {
        self.last_frame
    }
}
