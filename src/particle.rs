//! Twinkling particles.
//!
//! Each particle drifts in a straight line, bounces off the viewport edges,
//! pulses its opacity with a sine "twinkle" and fades out as `life` decays.
//! Dead particles are replaced in place by the simulation loop.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::Rng;

use crate::color;
use crate::surface::{GlowCircle, Surface};
use crate::viewport::Viewport;

/// Twinkle phase advance per update.
pub const TWINKLE_STEP: f32 = 0.1;

/// Glow radius used when drawing a particle.
pub const PARTICLE_BLUR: f32 = 10.0;

/// Probability that a new particle uses the accent color.
pub const ACCENT_CHANCE: f64 = 0.3;

/// Which of the two palette entries a particle uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleColor {
    /// Phosphor green.
    Accent,
    /// White.
    Base,
}

impl ParticleColor {
    pub fn rgb(self) -> Vec3 {
        match self {
            ParticleColor::Accent => color::NEON_GREEN,
            ParticleColor::Base => color::WHITE,
        }
    }
}

/// One self-propelled twinkling dot.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Radius in pixels, 1.0-4.0.
    pub size: f32,
    /// Remaining life, starts at 1.0. Dead at or below zero.
    pub life: f32,
    /// Life lost per update.
    pub decay: f32,
    pub color: ParticleColor,
    /// Twinkle phase in radians, grows without bound.
    pub twinkle: f32,
}

impl Particle {
    /// Create a particle at a uniformly random position inside `viewport`.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, viewport: &Viewport) -> Self {
        let position = Vec2::new(
            rng.gen::<f32>() * viewport.width(),
            rng.gen::<f32>() * viewport.height(),
        );
        let velocity = Vec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0));
        let color = if rng.gen_bool(ACCENT_CHANCE) {
            ParticleColor::Accent
        } else {
            ParticleColor::Base
        };

        Self {
            position,
            velocity,
            size: rng.gen_range(1.0..=4.0),
            life: 1.0,
            decay: rng.gen_range(0.005..=0.025),
            color,
            twinkle: rng.gen_range(0.0..TAU),
        }
    }

    /// Create a particle jittered around `anchor` with boosted velocity.
    ///
    /// The position may fall outside the viewport; the first `update`
    /// clamps it back in.
    pub fn spawn_near<R: Rng + ?Sized>(
        rng: &mut R,
        viewport: &Viewport,
        anchor: Vec2,
        jitter: f32,
        speed_scale: f32,
    ) -> Self {
        let mut particle = Self::spawn(rng, viewport);
        let offset = if jitter > 0.0 {
            Vec2::new(
                rng.gen_range(-jitter..=jitter),
                rng.gen_range(-jitter..=jitter),
            )
        } else {
            Vec2::ZERO
        };
        particle.position = anchor + offset;
        particle.velocity *= speed_scale;
        particle
    }

    /// Advance one frame: move, decay, twinkle, bounce, clamp.
    pub fn update(&mut self, viewport: &Viewport) {
        self.position += self.velocity;
        self.life -= self.decay;
        self.twinkle += TWINKLE_STEP;

        if self.position.x <= 0.0 || self.position.x >= viewport.width() {
            self.velocity.x = -self.velocity.x;
        }
        if self.position.y <= 0.0 || self.position.y >= viewport.height() {
            self.velocity.y = -self.velocity.y;
        }

        self.position = viewport.clamp(self.position);
    }

    /// Whether this particle should be replaced.
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }

    /// Opacity for the current frame: life scaled by the twinkle pulse.
    pub fn alpha(&self) -> f32 {
        (self.life * (0.5 + 0.5 * self.twinkle.sin())).clamp(0.0, 1.0)
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.fill_circle(&GlowCircle {
            center: self.position,
            radius: self.size,
            color: self.color.rgb(),
            alpha: self.alpha(),
            blur: PARTICLE_BLUR,
        });
    }
}
