//! Per-frame tracker records and the annotated results handed to renderers.

use serde::{Deserialize, Serialize};

use crate::kinematics::bbox::PixelBox;

/// Number of numeric fields a tracker record must supply:
/// `(x1, y1, x2, y2, track_id, class_id)`.
pub const RECORD_FIELDS: usize = 6;

/// One object as resolved by an external tracker for a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedObject {
    pub bbox: PixelBox,
    pub track_id: i64,
    pub class_id: i64,
}

impl TrackedObject {
    pub fn new(bbox: PixelBox, track_id: i64, class_id: i64) -> Self {
        Self {
            bbox,
            track_id,
            class_id,
        }
    }

    /// Reduce a raw record to a tracked object.
    ///
    /// Only the first six fields are read. Returns `None` if fewer are
    /// supplied or any of them is not finite. Identities are exact up to
    /// 2^53 when the record is given as `f64`.
    pub fn from_fields<I>(fields: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut it = fields.into_iter();
        let mut values = [0.0f64; RECORD_FIELDS];
        for slot in values.iter_mut() {
            *slot = it.next()?;
        }
        let [x1, y1, x2, y2, track_id, class_id] = values;
        if !(track_id.is_finite() && class_id.is_finite()) {
            return None;
        }
        let bbox = PixelBox::from_tlbr(x1, y1, x2, y2)?;
        Some(Self::new(bbox, track_id as i64, class_id as i64))
    }

    /// Reduce a record of `f32` or `f64` (or any type widening to `f64`) fields.
    pub fn from_slice<T>(record: &[T]) -> Option<Self>
    where
        T: Copy + Into<f64>,
    {
        Self::from_fields(record.iter().map(|&v| v.into()))
    }
}

/// A tracked object together with its instantaneous speed for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedObject {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
    pub track_id: i64,
    pub class_id: i64,
    pub speed_kph: f64,
}

impl AnnotatedObject {
    pub fn new(object: &TrackedObject, speed_kph: f64) -> Self {
        let [x1, y1, x2, y2] = object.bbox.to_tlbr();
        Self {
            x1,
            y1,
            x2,
            y2,
            track_id: object.track_id,
            class_id: object.class_id,
            speed_kph,
        }
    }

    pub fn bbox(&self) -> PixelBox {
        PixelBox::new(self.x1, self.y1, self.x2, self.y2)
    }

    /// The flat `(x1, y1, x2, y2, track_id, class_id, speed_kph)` form.
    pub fn as_tuple(&self) -> (i64, i64, i64, i64, i64, i64, f64) {
        (
            self.x1,
            self.y1,
            self.x2,
            self.y2,
            self.track_id,
            self.class_id,
            self.speed_kph,
        )
    }
}
