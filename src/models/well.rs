use std::fmt;

use super::Point;
use crate::error::GeometryError;

/// Axis-aligned rectangle in whole pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelRect {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl PixelRect {
    /// Zero-area rectangle at the origin, used as the "nothing here" value
    pub const EMPTY: PixelRect = PixelRect {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    /// Create a new rectangle
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the right-most column
    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// One past the bottom-most row
    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    /// Area in pixels
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// True when width or height is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when the rectangle lies inside a `width` x `height` image
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width as u64 && self.bottom() <= height as u64
    }

    /// True when `other` lies entirely inside `self` (edges may touch)
    pub fn contains_rect(&self, other: &PixelRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// True when `p` is strictly inside the rectangle; points on an edge are rejected.
    pub fn strictly_contains(&self, p: Point) -> bool {
        let (left, top) = (self.x as f32, self.y as f32);
        let (right, bottom) = (self.right() as f32, self.bottom() as f32);
        p.x > left && p.x < right && p.y > top && p.y < bottom
    }

    /// Rectangle shifted by an origin offset
    pub fn offset(&self, dx: u32, dy: u32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

impl fmt::Display for PixelRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) {}x{}",
            self.x, self.y, self.width, self.height
        )
    }
}

/// One well's pixel region together with its rack label
///
/// Immutable once built; decode tasks borrow it for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WellRectangle {
    label: String,
    rect: PixelRect,
}

impl WellRectangle {
    /// Create a well rectangle; zero width or height is rejected.
    pub fn new(
        label: impl Into<String>,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<Self, GeometryError> {
        Self::from_rect(label, PixelRect::new(x, y, width, height))
    }

    /// Create a well rectangle from an existing [`PixelRect`]
    pub fn from_rect(label: impl Into<String>, rect: PixelRect) -> Result<Self, GeometryError> {
        let label = label.into();
        if rect.is_empty() {
            return Err(GeometryError::EmptyRectangle { label, rect });
        }
        Ok(Self { label, rect })
    }

    /// Rack label, e.g. "A12"
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Pixel region in image coordinates
    pub fn rect(&self) -> PixelRect {
        self.rect
    }
}

impl fmt::Display for WellRectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_rectangle() {
        assert!(WellRectangle::new("A1", 0, 0, 0, 10).is_err());
        assert!(WellRectangle::new("A1", 0, 0, 10, 0).is_err());
        let well = WellRectangle::new("A1", 5, 6, 10, 12).unwrap();
        assert_eq!(well.label(), "A1");
        assert_eq!(well.rect(), PixelRect::new(5, 6, 10, 12));
    }

    #[test]
    fn test_strictly_contains_rejects_edges() {
        let r = PixelRect::new(100, 100, 100, 100);
        assert!(r.strictly_contains(Point::new(150.0, 150.0)));
        assert!(!r.strictly_contains(Point::new(100.0, 150.0)));
        assert!(!r.strictly_contains(Point::new(200.0, 150.0)));
        assert!(!r.strictly_contains(Point::new(150.0, 100.0)));
        assert!(!r.strictly_contains(Point::new(150.0, 200.0)));
    }

    #[test]
    fn test_containment() {
        let outer = PixelRect::new(0, 0, 1200, 800);
        assert!(outer.contains_rect(&PixelRect::new(1100, 700, 100, 100)));
        assert!(!outer.contains_rect(&PixelRect::new(1101, 700, 100, 100)));
        assert!(PixelRect::new(1100, 700, 100, 100).fits_within(1200, 800));
        assert!(!PixelRect::new(1100, 700, 100, 101).fits_within(1200, 800));
    }
}
