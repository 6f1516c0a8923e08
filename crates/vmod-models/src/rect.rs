use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PixelRect {
    /// X coordinate of the top-left corner.
    pub x: u32,
    /// Y coordinate of the top-left corner.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// Create a new pixel rectangle.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Area covered by the rectangle, in pixels.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Geometric center of the rectangle.
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    /// Check whether the rectangle lies fully within a grid of the given size.
    pub fn fits_within(&self, grid_width: u32, grid_height: u32) -> bool {
        self.x + self.width <= grid_width && self.y + self.height <= grid_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_and_center() {
        let r = PixelRect::new(10, 20, 4, 6);
        assert_eq!(r.area(), 24);
        assert_eq!(r.center(), (12.0, 23.0));
    }

    #[test]
    fn test_fits_within() {
        let r = PixelRect::new(0, 0, 320, 180);
        assert!(r.fits_within(320, 180));
        assert!(!r.fits_within(319, 180));
    }
}
