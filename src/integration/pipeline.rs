//! AnalysisPipeline for combining detection and tracking with speed analysis.

use std::time::Instant;

use thiserror::Error;

use crate::kinematics::{
    AnalyserConfig, AnnotatedObject, ClassNames, ConfigError, FrameProcessor, Report,
    SessionMetadata,
};

use super::{DetectionSource, IdentityTracker};

/// Failure of one of the external collaborators while processing a frame.
#[derive(Debug, Error)]
pub enum PipelineError<D, T> {
    #[error("detection failed: {0}")]
    Detection(D),
    #[error("tracking failed: {0}")]
    Tracking(T),
}

/// Bundles a detector, a tracker and a [`FrameProcessor`] into one
/// frame-by-frame analysis session.
///
/// Frames are numbered from 1 in the order they are submitted, failed
/// frames included, so that frame gaps seen by the speed estimator match
/// the source video.
pub struct AnalysisPipeline<D: DetectionSource, T: IdentityTracker> {
    detector: D,
    tracker: T,
    processor: FrameProcessor,
    frame_number: u64,
    frame_size: (u32, u32),
    started: Instant,
}

impl<D: DetectionSource, T: IdentityTracker> AnalysisPipeline<D, T> {
    /// Create a new analysis pipeline. The wall clock for the session starts here.
    pub fn new(
        detector: D,
        tracker: T,
        class_names: ClassNames,
        config: AnalyserConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            detector,
            tracker,
            processor: FrameProcessor::new(class_names, config)?,
            frame_number: 0,
            frame_size: (0, 0),
            started: Instant::now(),
        })
    }

    /// Detect, track and annotate a single frame.
    ///
    /// On a collaborator error the frame still consumes a frame number but
    /// leaves the track state untouched.
    pub fn process_frame(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<AnnotatedObject>, PipelineError<D::Error, T::Error>> {
        self.frame_number += 1;
        self.frame_size = (width, height);

        let detections = self
            .detector
            .detect(input, width, height)
            .map_err(PipelineError::Detection)?;
        let tracked = self
            .tracker
            .track(detections, input, width, height)
            .map_err(PipelineError::Tracking)?;

        Ok(self.processor.process_objects(&tracked, self.frame_number))
    }

    /// Final report with session metadata attached.
    pub fn finish(&self) -> Report {
        let (width, height) = self.frame_size;
        let metadata = SessionMetadata::new(
            self.frame_number,
            self.processor.config().fps,
            width,
            height,
            self.started.elapsed(),
        );
        self.processor.finalize().with_metadata(metadata)
    }

    /// Number of frames submitted so far.
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a reference to the underlying tracker.
    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    /// Get a mutable reference to the underlying tracker.
    pub fn tracker_mut(&mut self) -> &mut T {
        &mut self.tracker
    }

    pub fn processor(&self) -> &FrameProcessor {
        &self.processor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::Detection;
    use crate::kinematics::{PixelBox, TrackedObject};

    /// Emits one detection moving 10 px right per frame.
    struct SlidingDetector {
        x: f32,
        fail_on: Option<u64>,
        calls: u64,
    }

    impl DetectionSource for SlidingDetector {
        type Error = String;

        fn detect(
            &mut self,
            _input: &[u8],
            _width: u32,
            _height: u32,
        ) -> Result<Vec<Detection>, Self::Error> {
            self.calls += 1;
            if self.fail_on == Some(self.calls) {
                return Err("decoder hiccup".to_owned());
            }
            let det = Detection::new(self.x, 90.0, self.x + 20.0, 110.0, 0.9, 2);
            self.x += 10.0;
            Ok(vec![det])
        }
    }

    /// Gives every detection the same identity.
    struct SingleIdTracker;

    impl IdentityTracker for SingleIdTracker {
        type Error = std::convert::Infallible;

        fn track(
            &mut self,
            detections: Vec<Detection>,
            _input: &[u8],
            _width: u32,
            _height: u32,
        ) -> Result<Vec<TrackedObject>, Self::Error> {
            Ok(detections
                .into_iter()
                .filter_map(|d| {
                    let [x1, y1, x2, y2] = d.bbox;
                    PixelBox::from_tlbr(x1.into(), y1.into(), x2.into(), y2.into())
                        .map(|bbox| TrackedObject::new(bbox, 1, d.class_id))
                })
                .collect())
        }
    }

    fn pipeline(fail_on: Option<u64>) -> AnalysisPipeline<SlidingDetector, SingleIdTracker> {
        let detector = SlidingDetector {
            x: 90.0,
            fail_on,
            calls: 0,
        };
        AnalysisPipeline::new(
            detector,
            SingleIdTracker,
            ClassNames::coco(),
            AnalyserConfig::new(30.0, 5.0),
        )
        .unwrap()
    }

    #[test]
    fn test_analysis_pipeline() {
        let mut pipeline = pipeline(None);
        let first = pipeline.process_frame(&[], 640, 480).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].speed_kph, 0.0);

        let second = pipeline.process_frame(&[], 640, 480).unwrap();
        assert!((second[0].speed_kph - 216.0).abs() < 1e-9);

        for _ in 0..10 {
            pipeline.process_frame(&[], 640, 480).unwrap();
        }

        let report = pipeline.finish();
        assert_eq!(report.all_tracked_objects.len(), 1);
        assert_eq!(report.all_tracked_objects[0].class_name, "car");
        assert_eq!(report.all_tracked_objects[0].avg_speed_kph, 216.0);
        assert_eq!(report.total_objects_per_class["car"], 1);

        let metadata = report.metadata.unwrap();
        assert_eq!(metadata.total_frames, 12);
        assert_eq!(metadata.video_fps, 30.0);
        assert_eq!((metadata.video_width, metadata.video_height), (640, 480));
    }

    #[test]
    fn test_detector_error_keeps_state() {
        let mut pipeline = pipeline(Some(2));
        pipeline.process_frame(&[], 640, 480).unwrap();

        let err = pipeline.process_frame(&[], 640, 480).unwrap_err();
        assert!(matches!(err, PipelineError::Detection(_)));
        assert_eq!(err.to_string(), "detection failed: decoder hiccup");
        assert_eq!(pipeline.frame_number(), 2);
        assert_eq!(pipeline.processor().frames_processed(), 1);

        // Frame 3 follows frame 1 with a two frame gap: 10 px over 2 frames.
        let third = pipeline.process_frame(&[], 640, 480).unwrap();
        assert!((third[0].speed_kph - 108.0).abs() < 1e-9);
        assert_eq!(pipeline.processor().registry().get(1).unwrap().duration_frames(), 2);
    }
}
