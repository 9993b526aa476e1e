//! Overlay configuration.
//!
//! Every tunable of the effect lives in [`OverlayConfig`]. The defaults
//! reproduce the stock look; builder-style `with_*` methods adjust it.
//!
//! ```ignore
//! use glowfield::prelude::*;
//!
//! let config = OverlayConfig::default()
//!     .with_viewport(1920.0, 1080.0)
//!     .with_particle_count(300)
//!     .with_particle_cap(400)
//!     .with_headline("GOOD MORNING");
//!
//! glowfield::run(config)?;
//! ```

use crate::error::ConfigError;
use crate::timer::Millis;
use crate::viewport::Viewport;

/// Tunables for the whole overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    /// Initial viewport. The window opens at this logical size; the running
    /// overlay then works in the window's physical pixels.
    pub viewport: Viewport,
    /// Window title.
    pub title: String,
    /// Headline text.
    pub headline: String,

    /// Particles created at start-up; the population never drops below this.
    pub particle_count: usize,
    /// Soft cap: pointer-spawned particles past this evict the oldest.
    pub particle_cap: usize,
    /// Wave bands, regenerated on every resize.
    pub wave_count: usize,

    /// Probability a pointer move injects a particle.
    pub pointer_spawn_chance: f64,
    /// Per-axis jitter around the pointer for injected particles.
    pub pointer_spawn_jitter: f32,
    /// Velocity multiplier for injected particles.
    pub pointer_spawn_speed: f32,

    /// Live trail marks before the oldest is evicted.
    pub trail_cap: usize,
    /// Trail mark lifetime.
    pub trail_ttl_ms: Millis,

    /// Headline shift per pixel of pointer distance from center.
    pub parallax_factor: f32,

    /// Glitch coin-flip period.
    pub glitch_interval_ms: Millis,
    /// Probability each flip glitches.
    pub glitch_chance: f64,
    /// How long a glitch shows.
    pub glitch_duration_ms: Millis,

    /// Fixed RNG seed. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            title: "glowfield".to_string(),
            headline: "HELLO WORLD".to_string(),
            particle_count: 150,
            particle_cap: 200,
            wave_count: 8,
            pointer_spawn_chance: 0.2,
            pointer_spawn_jitter: 50.0,
            pointer_spawn_speed: 2.0,
            trail_cap: 20,
            trail_ttl_ms: 500.0,
            parallax_factor: 0.1,
            glitch_interval_ms: 200.0,
            glitch_chance: 0.2,
            glitch_duration_ms: 100.0,
            seed: None,
        }
    }
}

impl OverlayConfig {
    /// Set the initial viewport size.
    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Viewport::new(width, height);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_headline(mut self, text: impl Into<String>) -> Self {
        self.headline = text.into();
        self
    }

    /// Set the resting particle population.
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the particle soft cap.
    pub fn with_particle_cap(mut self, cap: usize) -> Self {
        self.particle_cap = cap;
        self
    }

    pub fn with_wave_count(mut self, count: usize) -> Self {
        self.wave_count = count;
        self
    }

    /// Configure pointer particle injection.
    pub fn with_pointer_spawn(mut self, chance: f64, jitter: f32, speed: f32) -> Self {
        self.pointer_spawn_chance = chance;
        self.pointer_spawn_jitter = jitter;
        self.pointer_spawn_speed = speed;
        self
    }

    /// Configure trail marks.
    pub fn with_trails(mut self, cap: usize, ttl_ms: Millis) -> Self {
        self.trail_cap = cap;
        self.trail_ttl_ms = ttl_ms;
        self
    }

    pub fn with_parallax(mut self, factor: f32) -> Self {
        self.parallax_factor = factor;
        self
    }

    /// Configure headline glitches.
    pub fn with_glitch(mut self, interval_ms: Millis, chance: f64, duration_ms: Millis) -> Self {
        self.glitch_interval_ms = interval_ms;
        self.glitch_chance = chance;
        self.glitch_duration_ms = duration_ms;
        self
    }

    /// Use a fixed RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every value for consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_cap < self.particle_count {
            return Err(ConfigError::ParticleCapBelowTarget {
                target: self.particle_count,
                cap: self.particle_cap,
            });
        }

        for (name, value) in [
            ("pointer_spawn_chance", self.pointer_spawn_chance),
            ("glitch_chance", self.glitch_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Probability { name, value });
            }
        }

        for (name, value) in [
            ("trail_ttl_ms", self.trail_ttl_ms),
            ("glitch_interval_ms", self.glitch_interval_ms),
            ("glitch_duration_ms", self.glitch_duration_ms),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NonPositiveDuration { name, value });
            }
        }

        for (name, value) in [
            ("pointer_spawn_jitter", self.pointer_spawn_jitter),
            ("pointer_spawn_speed", self.pointer_spawn_speed),
            ("parallax_factor", self.parallax_factor),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::InvalidScalar { name, value });
            }
        }

        Ok(())
    }
}
