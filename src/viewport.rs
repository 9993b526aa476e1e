//! Viewport dimensions shared by every layer.

use glam::Vec2;

/// Current drawable area in pixels.
///
/// Dimensions are never negative. A zero-sized viewport (hidden or minimized
/// window) is valid: everything keeps running and draws simply produce nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    /// Create a viewport, clamping negative or NaN dimensions to zero.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: sanitize(width),
            height: sanitize(height),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Size as `Vec2`.
    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }

    /// Whether either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Clamp a point into `[0, width] x [0, height]`.
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(Vec2::ZERO, self.size())
    }

    /// Whether a point lies inside the closed viewport rectangle.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.y >= 0.0 && point.x <= self.width && point.y <= self.height
    }

    /// Pixel dimensions for surfaces backing this viewport.
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width.round() as u32, self.height.round() as u32)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

fn sanitize(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_dimensions_clamp_to_zero() {
        let vp = Viewport::new(-10.0, f32::NAN);
        assert_eq!(vp.width(), 0.0);
        assert_eq!(vp.height(), 0.0);
        assert!(vp.is_empty());
        assert_eq!(vp.pixel_size(), (0, 0));
    }

    #[test]
    fn test_clamp_and_center() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.center(), Vec2::new(400.0, 300.0));
        assert_eq!(vp.clamp(Vec2::new(-5.0, 900.0)), Vec2::new(0.0, 600.0));
        assert!(vp.contains(Vec2::new(800.0, 0.0)));
        assert!(!vp.contains(Vec2::new(800.1, 0.0)));
    }
}
