//! Builder for creating TrackedObject values from various box formats.

use crate::kinematics::{PixelBox, TrackedObject};

/// Builder for creating a [`TrackedObject`] from tracker-specific box formats.
///
/// Corners are truncated to whole pixels when the object is built.
#[derive(Debug, Clone, Default)]
pub struct TrackedObjectBuilder {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    track_id: i64,
    class_id: i64,
}

impl TrackedObjectBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.x1 = x1;
        self.y1 = y1;
        self.x2 = x2;
        self.y2 = y2;
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.x1 = cx - w / 2.0;
        self.y1 = cy - h / 2.0;
        self.x2 = cx + w / 2.0;
        self.y2 = cy + h / 2.0;
        self
    }

    /// Set bounding box in TLWH format (left, top, width, height).
    pub fn tlwh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.x1 = x;
        self.y1 = y;
        self.x2 = x + w;
        self.y2 = y + h;
        self
    }

    pub fn track_id(mut self, track_id: i64) -> Self {
        self.track_id = track_id;
        self
    }

    pub fn class_id(mut self, class_id: i64) -> Self {
        self.class_id = class_id;
        self
    }

    /// Build the final `TrackedObject`, or `None` if a corner is not finite.
    pub fn build(self) -> Option<TrackedObject> {
        let bbox = PixelBox::from_tlbr(
            self.x1.into(),
            self.y1.into(),
            self.x2.into(),
            self.y2.into(),
        )?;
        Some(TrackedObject::new(bbox, self.track_id, self.class_id))
    }
}
