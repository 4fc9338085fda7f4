//! Per-frame track kinematics.
//!
//! Feed the output of any multi-object tracker into a [`FrameProcessor`]
//! frame by frame. Each object comes back annotated with its instantaneous
//! speed in km/h, and at the end of a session [`FrameProcessor::finalize`]
//! produces a [`Report`] with per-identity lifecycle and speed statistics.
//!
//! ```
//! use speedtrack_rs::{AnalyserConfig, ClassNames, FrameProcessor};
//!
//! let mut processor = FrameProcessor::new(ClassNames::coco(), AnalyserConfig::new(30.0, 5.0))?;
//! processor.process_frame(&[[90.0f32, 90.0, 110.0, 110.0, 5.0, 2.0]], 1);
//! let out = processor.process_frame(&[[100.0f32, 90.0, 120.0, 110.0, 5.0, 2.0]], 2);
//! assert!((out[0].speed_kph - 216.0).abs() < 1e-9);
//! # Ok::<(), speedtrack_rs::ConfigError>(())
//! ```

pub mod integration;
pub mod kinematics;

pub use integration::{
    AnalysisPipeline, Detection, DetectionSource, IdentityTracker, PipelineError,
    TrackedObjectBuilder,
};
pub use kinematics::{
    AnalyserConfig, AnnotatedObject, ClassNames, ConfigError, FrameProcessor, PixelBox, Report,
    ReportAggregator, SessionMetadata, SpeedEstimator, TrackRegistry, TrackState, TrackedObject,
    TrackedObjectReport,
};
