//! CPU raster surface.
//!
//! [`Canvas`] stores premultiplied RGBA as `Vec4` per pixel and implements
//! [`Surface`] with a soft Gaussian-style halo approximating a canvas
//! shadow blur. The window host composites the layer canvases and uploads
//! the result as a texture.

use glam::{Vec2, Vec3, Vec4};

use crate::surface::{GlowCircle, GlowStroke, Surface};

/// Peak opacity of the glow halo relative to the shape itself.
const GLOW_STRENGTH: f32 = 0.55;

/// Premultiplied RGBA raster.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Vec4>,
    /// Per-stroke coverage scratch, so joints between segments are not
    /// blended twice.
    mask: Vec<f32>,
}

/// Pixel-space rectangle, `x1`/`y1` exclusive.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
}

impl Bounds {
    fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    fn union(self, other: Bounds) -> Bounds {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        Bounds {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: vec![Vec4::ZERO; len],
            mask: vec![0.0; len],
        }
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Vec4> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.idx(x as usize, y as usize)).copied()
    }

    /// Raw premultiplied pixels, row-major.
    pub fn pixels(&self) -> &[Vec4] {
        &self.pixels
    }

    /// Blend this canvas over `dst` (source-over). Sizes must match;
    /// mismatched canvases are composited over their common area.
    pub fn composite_onto(&self, dst: &mut Canvas) {
        let w = self.width.min(dst.width) as usize;
        let h = self.height.min(dst.height) as usize;
        for y in 0..h {
            for x in 0..w {
                let src = self.pixels[y * self.width as usize + x];
                if src.w <= 0.0 {
                    continue;
                }
                let i = y * dst.width as usize + x;
                dst.pixels[i] = src + dst.pixels[i] * (1.0 - src.w);
            }
        }
    }

    /// Flatten over an opaque background into tightly packed RGBA8.
    pub fn to_rgba8(&self, background: Vec3) -> Vec<u8> {
        let mut texels = Vec::new();
        self.write_rgba8(background, &mut texels);
        bytemuck::cast_slice(&texels).to_vec()
    }

    /// Flatten over an opaque background into `out`, one texel per pixel,
    /// reusing its allocation.
    pub fn write_rgba8(&self, background: Vec3, out: &mut Vec<[u8; 4]>) {
        out.clear();
        out.extend(self.pixels.iter().map(|px| {
            let rgb = px.truncate() + background * (1.0 - px.w);
            [to_byte(rgb.x), to_byte(rgb.y), to_byte(rgb.z), 255]
        }));
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width as usize + x
    }

    /// Pixel bounds covering `[min, max]`, clipped to the canvas.
    fn bounds(&self, min: Vec2, max: Vec2) -> Bounds {
        let clip = |v: f32, limit: u32| -> usize { v.clamp(0.0, limit as f32) as usize };
        Bounds {
            x0: clip(min.x.floor(), self.width),
            y0: clip(min.y.floor(), self.height),
            x1: clip(max.x.ceil() + 1.0, self.width),
            y1: clip(max.y.ceil() + 1.0, self.height),
        }
    }

    #[inline]
    fn blend(&mut self, i: usize, color: Vec3, alpha: f32) {
        let src = (color * alpha).extend(alpha);
        self.pixels[i] = src + self.pixels[i] * (1.0 - alpha);
    }
}

impl Surface for Canvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        *self = Canvas::new(width, height);
    }

    fn clear(&mut self) {
        self.pixels.fill(Vec4::ZERO);
    }

    fn fill_circle(&mut self, circle: &GlowCircle) {
        let alpha = circle.alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 || circle.radius <= 0.0 || self.pixels.is_empty() {
            return;
        }

        let reach = circle.radius + circle.blur.max(0.0) + 1.0;
        let bounds = self.bounds(circle.center - reach, circle.center + reach);
        if bounds.is_empty() {
            return;
        }

        for y in bounds.y0..bounds.y1 {
            for x in bounds.x0..bounds.x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let d = p.distance(circle.center);
                let cov = coverage(d, circle.radius, circle.blur);
                if cov > 0.0 {
                    let i = self.idx(x, y);
                    self.blend(i, circle.color, cov * alpha);
                }
            }
        }
    }

    fn stroke_polyline(&mut self, stroke: &GlowStroke<'_>) {
        let alpha = stroke.alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 || stroke.points.len() < 2 || self.pixels.is_empty() {
            return;
        }

        let half = stroke.line_width.max(0.0) * 0.5;
        let reach = half + stroke.blur.max(0.0) + 1.0;
        let mut touched = Bounds { x0: 0, y0: 0, x1: 0, y1: 0 };

        for seg in stroke.points.windows(2) {
            let (a, b) = (seg[0], seg[1]);
            let bounds = self.bounds(a.min(b) - reach, a.max(b) + reach);
            if bounds.is_empty() {
                continue;
            }
            touched = touched.union(bounds);

            for y in bounds.y0..bounds.y1 {
                for x in bounds.x0..bounds.x1 {
                    let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                    let cov = coverage(segment_distance(p, a, b), half, stroke.blur);
                    let i = self.idx(x, y);
                    if cov > self.mask[i] {
                        self.mask[i] = cov;
                    }
                }
            }
        }

        if touched.is_empty() {
            return;
        }

        for y in touched.y0..touched.y1 {
            for x in touched.x0..touched.x1 {
                let i = self.idx(x, y);
                let cov = std::mem::take(&mut self.mask[i]);
                if cov > 0.0 {
                    self.blend(i, stroke.color, cov * alpha);
                }
            }
        }
    }
}

/// Coverage of a pixel at distance `d` from a shape of half-extent `extent`,
/// including the glow halo.
fn coverage(d: f32, extent: f32, blur: f32) -> f32 {
    let core = (extent + 0.5 - d).clamp(0.0, 1.0);
    if blur <= 0.0 {
        return core;
    }
    let outside = (d - extent).max(0.0);
    let sigma = blur * 0.5;
    let halo = GLOW_STRENGTH * (-(outside * outside) / (2.0 * sigma * sigma)).exp();
    core.max(halo)
}

fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}
