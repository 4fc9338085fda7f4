/// Axis-aligned bounding box in integer source-pixel coordinates.
///
/// Trackers usually report floating point corners. They are truncated
/// toward zero on the way in so that centers and output boxes line up with
/// the pixel grid used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelBox {
    /// Top-left x coordinate
    pub x1: i64,
    /// Top-left y coordinate
    pub y1: i64,
    /// Bottom-right x coordinate
    pub x2: i64,
    /// Bottom-right y coordinate
    pub y2: i64,
}

impl PixelBox {
    /// Create a box from TLBR integer corners.
    #[inline]
    pub fn new(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a box from floating TLBR corners, truncating toward zero.
    ///
    /// Returns `None` if any corner is not finite. Corners beyond the `i64`
    /// range saturate.
    #[inline]
    pub fn from_tlbr(x1: f64, y1: f64, x2: f64, y2: f64) -> Option<Self> {
        if [x1, y1, x2, y2].iter().any(|v| !v.is_finite()) {
            return None;
        }
        Some(Self::new(x1 as i64, y1 as i64, x2 as i64, y2 as i64))
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [i64; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    #[inline]
    pub fn width(&self) -> i64 {
        self.x2.saturating_sub(self.x1)
    }

    #[inline]
    pub fn height(&self) -> i64 {
        self.y2.saturating_sub(self.y1)
    }

    /// Integer midpoint of the box, rounded toward negative infinity.
    #[inline]
    pub fn center(&self) -> (i64, i64) {
        (midpoint(self.x1, self.x2), midpoint(self.y1, self.y2))
    }
}

/// Floor of `(a + b) / 2` without overflowing at the ends of the `i64` range.
#[inline]
fn midpoint(a: i64, b: i64) -> i64 {
    (a as i128 + b as i128).div_euclid(2) as i64
}
