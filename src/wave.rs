//! Layered sinusoidal wave bands.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::Rng;

use crate::color;
use crate::surface::{GlowStroke, Surface};

/// Horizontal distance between polyline samples.
pub const SAMPLE_STEP: f32 = 2.0;

/// Stroke width of a wave band.
pub const LINE_WIDTH: f32 = 2.0;

/// Glow radius of a wave band.
pub const WAVE_BLUR: f32 = 15.0;

/// Saturation (percent) of every wave color.
const SATURATION: f32 = 70.0;

/// One animated two-harmonic band.
#[derive(Debug, Clone, PartialEq)]
pub struct Wave {
    /// Unique per created instance; a regenerated set never reuses ids.
    pub id: u64,
    pub amplitude: f32,
    pub frequency: f32,
    pub phase: f32,
    /// Phase advance per update.
    pub speed: f32,
    /// Baseline height of the band.
    pub y_offset: f32,
    pub hue: f32,
    pub lightness: f32,
    pub opacity: f32,
}

impl Wave {
    /// Create wave `index` of a set of `total`, spread down a viewport of
    /// `viewport_height`.
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        id: u64,
        index: usize,
        total: usize,
        viewport_height: f32,
    ) -> Self {
        let y_offset = if total == 0 {
            0.0
        } else {
            index as f32 / total as f32 * viewport_height
        };

        Self {
            id,
            amplitude: rng.gen_range(30.0..=80.0),
            frequency: rng.gen_range(0.01..=0.03),
            phase: rng.gen_range(0.0..TAU),
            speed: rng.gen_range(0.02..=0.05),
            y_offset,
            hue: rng.gen_range(120.0..=180.0),
            lightness: rng.gen_range(30.0..=70.0),
            opacity: rng.gen_range(0.3..=0.7),
        }
    }

    pub fn update(&mut self) {
        self.phase += self.speed;
    }

    pub fn color(&self) -> Vec3 {
        color::hsl(self.hue, SATURATION, self.lightness)
    }

    /// Height of the band at horizontal position `x`.
    pub fn sample(&self, x: f32) -> f32 {
        self.y_offset
            + self.amplitude * (x * self.frequency + self.phase).sin()
            + self.amplitude * 0.5 * (x * self.frequency * 2.0 + self.phase * 1.5).sin()
    }

    /// Polyline samples from `x = 0` to `width` inclusive.
    ///
    /// A zero width yields the single point at `x = 0`.
    pub fn points(&self, width: f32) -> Vec<Vec2> {
        if width.is_nan() || width < 0.0 {
            return Vec::new();
        }
        let count = (width / SAMPLE_STEP).floor() as usize + 1;
        (0..count)
            .map(|i| {
                let x = i as f32 * SAMPLE_STEP;
                Vec2::new(x, self.sample(x))
            })
            .collect()
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, width: f32) {
        let points = self.points(width);
        surface.stroke_polyline(&GlowStroke {
            points: &points,
            color: self.color(),
            alpha: self.opacity,
            line_width: LINE_WIDTH,
            blur: WAVE_BLUR,
        });
    }
}
