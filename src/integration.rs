//! Integration module for connecting detection and tracking backends with
//! the kinematics engine.
//!
//! Detectors and trackers are external collaborators. This module provides
//! the traits they implement and a pipeline that drives them frame by frame.

mod builder;
mod detector;
mod pipeline;

pub use builder::TrackedObjectBuilder;
pub use detector::{Detection, DetectionSource, IdentityTracker};
pub use pipeline::{AnalysisPipeline, PipelineError};
