/// 2D point in image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Translate point by (dx, dy)
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Point halfway between `self` and `other`
    pub fn midpoint(&self, other: &Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate() {
        let p = Point::new(1.5, 2.0).translate(10.0, -1.0);
        assert_eq!(p, Point::new(11.5, 1.0));
    }

    #[test]
    fn test_midpoint() {
        let c = Point::new(10.0, 20.0).midpoint(&Point::new(30.0, 40.0));
        assert_eq!(c, Point::new(20.0, 30.0));
    }
}
