//! Raster drawing surfaces.
//!
//! Each visual layer (waves, particles, chrome) draws onto its own
//! [`Surface`]. The overlay only needs a handful of primitives: clear, a
//! filled circle with a glow halo, and a stroked polyline with a glow halo.
//!
//! Two implementations ship with the crate:
//!
//! | Type | Use |
//! |------|-----|
//! | [`Canvas`](crate::raster::Canvas) | CPU RGBA raster presented by the window host |
//! | [`RecordingSurface`] | Logs draw calls; headless runs and tests |

use glam::{Vec2, Vec3};

/// A filled circle with a soft glow halo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowCircle {
    pub center: Vec2,
    pub radius: f32,
    pub color: Vec3,
    /// Overall opacity, 0.0-1.0.
    pub alpha: f32,
    /// Glow halo radius in pixels. The halo uses the fill color.
    pub blur: f32,
}

/// A stroked, connected polyline with a soft glow halo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowStroke<'a> {
    pub points: &'a [Vec2],
    pub color: Vec3,
    pub alpha: f32,
    pub line_width: f32,
    pub blur: f32,
}

/// A resizable raster target.
///
/// Implementations must tolerate zero dimensions and degenerate geometry
/// (empty or single-point polylines, zero alpha) by drawing nothing.
pub trait Surface {
    /// Current size in pixels.
    fn size(&self) -> (u32, u32);

    /// Resize the surface. Contents after a resize are cleared.
    fn resize(&mut self, width: u32, height: u32);

    /// Clear the whole surface to transparent.
    fn clear(&mut self);

    /// Draw a glowing filled circle.
    fn fill_circle(&mut self, circle: &GlowCircle);

    /// Draw a glowing polyline through `stroke.points`.
    fn stroke_polyline(&mut self, stroke: &GlowStroke<'_>);
}

/// A recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear,
    Circle(GlowCircle),
    Polyline {
        points: Vec<Vec2>,
        color: Vec3,
        alpha: f32,
        line_width: f32,
        blur: f32,
    },
}

/// A surface that records draw calls instead of rasterizing them.
///
/// Calls since the last `clear` are kept, so after a frame the log holds
/// exactly what that frame drew.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Draw calls issued since the last clear.
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Circles drawn since the last clear.
    pub fn circles(&self) -> impl Iterator<Item = &GlowCircle> {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::Circle(circle) => Some(circle),
            _ => None,
        })
    }

    /// Number of polylines drawn since the last clear.
    pub fn polyline_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, DrawCall::Polyline { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.calls.clear();
    }

    fn clear(&mut self) {
        self.calls.clear();
        self.calls.push(DrawCall::Clear);
    }

    fn fill_circle(&mut self, circle: &GlowCircle) {
        self.calls.push(DrawCall::Circle(*circle));
    }

    fn stroke_polyline(&mut self, stroke: &GlowStroke<'_>) {
        self.calls.push(DrawCall::Polyline {
            points: stroke.points.to_vec(),
            color: stroke.color,
            alpha: stroke.alpha,
            line_width: stroke.line_width,
            blur: stroke.blur,
        });
    }
}
