//! Capability traits for the external detector and tracker.

use crate::kinematics::TrackedObject;

/// Raw detection produced by a detector for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// Bounding box in TLBR format (x1, y1, x2, y2), source pixels
    pub bbox: [f32; 4],
    /// Detection confidence score
    pub score: f32,
    /// Detector class id
    pub class_id: i64,
}

impl Detection {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32, score: f32, class_id: i64) -> Self {
        Self {
            bbox: [x1, y1, x2, y2],
            score,
            class_id,
        }
    }
}

/// Trait for object detection inference backends.
///
/// Implement this trait to connect any detection model to the pipeline.
///
/// # Example
///
/// ```ignore
/// use speedtrack_rs::{Detection, DetectionSource};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl DetectionSource for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, input: &[u8], width: u32, height: u32) -> Result<Vec<Detection>, Self::Error> {
///         // Run inference and return detections
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error;

    /// Run inference on raw image data and return detections.
    ///
    /// # Arguments
    /// * `input` - Raw image bytes (format depends on implementation)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    fn detect(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<Detection>, Self::Error>;
}

/// Trait for multi-object trackers that assign persistent identities.
///
/// The kinematics engine only depends on the shape of the output: box,
/// identity and class per object. How identities are associated across
/// frames is entirely up to the implementation.
pub trait IdentityTracker {
    /// Error type for tracking failures.
    type Error;

    /// Associate this frame's detections with existing identities.
    ///
    /// The frame itself is passed along for trackers that use appearance
    /// features; purely geometric trackers can ignore it.
    fn track(
        &mut self,
        detections: Vec<Detection>,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<TrackedObject>, Self::Error>;
}
