use serde::{Deserialize, Serialize};

/// Frame dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Pixel-space box: top-left corner plus extent.
///
/// Serialized as `[x, y, width, height]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Converts detector output given as normalized corners `(x1, y1, x2, y2)` into a
    /// pixel box. Coordinates are truncated to whole pixels.
    pub fn from_normalized_corners(x1: f32, y1: f32, x2: f32, y2: f32, frame: FrameSize) -> Self {
        let w = frame.width as f32;
        let h = frame.height as f32;
        let start_x = (x1 * w).trunc();
        let start_y = (y1 * h).trunc();
        let end_x = (x2 * w).trunc();
        let end_y = (y2 * h).trunc();
        Self::new(start_x, start_y, end_x - start_x, end_y - start_y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Area, or zero for malformed boxes.
    pub fn area(&self) -> f32 {
        if !self.is_finite() || self.width <= 0.0 || self.height <= 0.0 {
            return 0.0;
        }
        self.width * self.height
    }

    /// Intersection-over-union with another box. Zero when either box is empty.
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = (self.x + self.width).min(other.x + other.width);
        let bottom = (self.y + self.height).min(other.y + other.height);

        let inter_w = (right - left).max(0.0);
        let inter_h = (bottom - top).max(0.0);
        let inter = inter_w * inter_h;
        let union = self.area() + other.area() - inter;
        if union.is_nan() || union <= 0.0 || !inter.is_finite() {
            return 0.0;
        }
        inter / union
    }

    /// Clips the box against the frame bounds.
    ///
    /// The origin is clamped to the frame, and the far edge is measured from the
    /// clamped origin. Returns `None` when the clipped region has zero area.
    pub fn clip_to(&self, frame: FrameSize) -> Option<Region> {
        if !self.is_finite() || self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let frame_w = frame.width as f32;
        let frame_h = frame.height as f32;

        let x = self.x.max(0.0);
        let y = self.y.max(0.0);
        let x_end = frame_w.min(x + self.width);
        let y_end = frame_h.min(y + self.height);
        if x_end <= x || y_end <= y {
            return None;
        }
        Some(Region {
            x,
            y,
            x_end,
            y_end,
            box_width: self.width,
            box_height: self.height,
        })
    }
}

impl From<[f32; 4]> for BoundingBox {
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x, b.y, b.width, b.height]
    }
}

/// A box clipped to the frame, as seen by the pose estimator.
///
/// Landmarks are normalized against the unclipped box extent (`box_width`,
/// `box_height`) starting at the clipped origin; validity is checked against the
/// clipped rectangle `[x, x_end] x [y, y_end]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub x_end: f32,
    pub y_end: f32,
    pub box_width: f32,
    pub box_height: f32,
}

impl Region {
    /// Maps a normalized landmark coordinate to absolute frame space.
    pub fn to_frame(&self, nx: f32, ny: f32) -> (f32, f32) {
        (self.x + nx * self.box_width, self.y + ny * self.box_height)
    }

    /// Inclusive containment test in frame space.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        self.x <= px && px <= self.x_end && self.y <= py && py <= self.y_end
    }
}

/// A candidate person detection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: BoundingBox,
    /// Detector confidence, 0..=1.
    pub confidence: f32,
}
