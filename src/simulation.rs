//! The per-frame simulation loop.
//!
//! [`SimulationLoop`] owns every piece of overlay state: the particle and
//! wave collections, the pointer snapshot, the retained element state the
//! host renders (headline, cursor glyph, trail layer), the transient-effect
//! timers and the two raster surfaces. Hosts drive it with four calls:
//!
//! | Call | When |
//! |------|------|
//! | [`tick`](SimulationLoop::tick) | once per displayed frame |
//! | [`on_pointer_move`](SimulationLoop::on_pointer_move) | every pointer move |
//! | [`on_resize`](SimulationLoop::on_resize) | every viewport resize |
//! | [`advance`](SimulationLoop::advance) | whenever the clock moves, typically before `tick` |
//!
//! All calls run to completion; there is no interior locking because there
//! is never concurrent access.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::config::OverlayConfig;
use crate::error::ConfigError;
use crate::headline::{GlitchTimer, Headline};
use crate::particle::Particle;
use crate::surface::Surface;
use crate::timer::Millis;
use crate::trail::{MarkId, TrailEmitter, TrailLayer};
use crate::viewport::Viewport;
use crate::wave::Wave;

/// Overlay state plus the two raster layers it draws into.
pub struct SimulationLoop<S: Surface> {
    config: OverlayConfig,
    viewport: Viewport,
    rng: StdRng,
    particles: Vec<Particle>,
    waves: Vec<Wave>,
    next_wave_id: u64,
    pointer: Vec2,
    cursor: Vec2,
    headline: Headline,
    trails: TrailEmitter,
    trail_layer: TrailLayer,
    glitch: GlitchTimer,
    particle_surface: S,
    wave_surface: S,
    running: bool,
    frames: u64,
}

impl<S: Surface> SimulationLoop<S> {
    /// Build the loop, sizing both surfaces to `config.viewport` and seeding
    /// the particle and wave sets. The frame scheduler starts stopped.
    pub fn new(
        config: OverlayConfig,
        mut particle_surface: S,
        mut wave_surface: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let viewport = config.viewport;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let (width, height) = viewport.pixel_size();
        particle_surface.resize(width, height);
        wave_surface.resize(width, height);

        let particles = (0..config.particle_count)
            .map(|_| Particle::spawn(&mut rng, &viewport))
            .collect();

        let mut sim = Self {
            viewport,
            rng,
            particles,
            waves: Vec::with_capacity(config.wave_count),
            next_wave_id: 0,
            pointer: viewport.center(),
            cursor: viewport.center(),
            headline: Headline::new(config.headline.clone()),
            trails: TrailEmitter::new(config.trail_ttl_ms, config.trail_cap),
            trail_layer: TrailLayer::new(),
            glitch: GlitchTimer::new(
                config.glitch_interval_ms,
                config.glitch_chance,
                config.glitch_duration_ms,
                0.0,
            ),
            particle_surface,
            wave_surface,
            running: false,
            frames: 0,
            config,
        };
        sim.regenerate_waves();

        debug!(
            particles = sim.particles.len(),
            waves = sim.waves.len(),
            width,
            height,
            "simulation initialised"
        );
        Ok(sim)
    }

    // ========== Frame scheduling ==========

    /// Begin ticking. Returns `false` if already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        debug!("frame scheduler started");
        true
    }

    /// Stop ticking. Returns `false` if already stopped.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        debug!("frame scheduler stopped");
        true
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Step and draw one frame.
    ///
    /// Waves are fully updated and drawn before any particle, so the wave
    /// layer always reflects the same frame as the particle layer in front
    /// of it. Returns whether the host should schedule another frame.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }

        self.wave_surface.clear();
        self.particle_surface.clear();

        let viewport = self.viewport;

        for wave in &mut self.waves {
            wave.update();
            wave.draw(&mut self.wave_surface, viewport.width());
        }

        for slot in &mut self.particles {
            slot.update(&viewport);
            slot.draw(&mut self.particle_surface);
            if slot.is_dead() {
                *slot = Particle::spawn(&mut self.rng, &viewport);
            }
        }

        self.frames += 1;
        true
    }

    // ========== Events ==========

    /// Handle a pointer move at host time `now`.
    ///
    /// Moves the cursor glyph, shifts the headline, drops a trail mark and
    /// sometimes injects a particle near the pointer.
    pub fn on_pointer_move(&mut self, x: f32, y: f32, now: Millis) -> MarkId {
        let pointer = Vec2::new(x, y);
        self.pointer = pointer;
        self.cursor = pointer;

        self.headline
            .apply_parallax(pointer, &self.viewport, self.config.parallax_factor);

        let mark = self.trails.spawn(pointer, now, &mut self.trail_layer);

        if self.rng.gen_bool(self.config.pointer_spawn_chance) {
            let particle = Particle::spawn_near(
                &mut self.rng,
                &self.viewport,
                pointer,
                self.config.pointer_spawn_jitter,
                self.config.pointer_spawn_speed,
            );
            self.particles.push(particle);
            if self.particles.len() > self.config.particle_cap {
                self.particles.remove(0);
            }
        }

        mark
    }

    /// Handle a viewport resize.
    ///
    /// Existing particles are pulled inside the new bounds rather than
    /// re-randomized; the wave set is rebuilt from scratch.
    pub fn on_resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);

        self.pointer = self.viewport.center();
        self.cursor = self.pointer;
        self.headline.reset_translation();

        let (w, h) = self.viewport.pixel_size();
        self.particle_surface.resize(w, h);
        self.wave_surface.resize(w, h);

        self.regenerate_waves();

        let max = self.viewport.size();
        for particle in &mut self.particles {
            particle.position = particle.position.min(max);
        }

        debug!(width = w, height = h, "viewport resized");
    }

    /// Fire every transient-effect timer due by `now`: trail expiry and
    /// headline glitches.
    ///
    /// Independent of [`start`](Self::start)/[`stop`](Self::stop): timers
    /// keep running while the frame scheduler is paused. Returns `true` if
    /// the headline or trail layer changed and the chrome needs redrawing.
    pub fn advance(&mut self, now: Millis) -> bool {
        let expired = self.trails.expire(now, &mut self.trail_layer);
        let glitch = self.glitch.poll(now, &mut self.rng, &mut self.headline);

        let changed = expired > 0 || glitch.triggered > 0 || glitch.reverted;
        if changed {
            trace!(
                now,
                expired,
                triggered = glitch.triggered,
                reverted = glitch.reverted,
                "timers fired"
            );
        }
        changed
    }

    /// Earliest host time at which [`advance`](Self::advance) has work to
    /// do. Hosts that sleep between events wake up then.
    pub fn next_deadline(&self) -> Option<Millis> {
        match (self.trails.next_expiry(), self.glitch.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn regenerate_waves(&mut self) {
        let total = self.config.wave_count;
        let height = self.viewport.height();
        self.waves.clear();
        for index in 0..total {
            let id = self.next_wave_id;
            self.next_wave_id += 1;
            self.waves
                .push(Wave::spawn(&mut self.rng, id, index, total, height));
        }
    }

    // ========== Accessors ==========

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable view of the particles. The collection length cannot change
    /// through it.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn waves(&self) -> &[Wave] {
        &self.waves
    }

    /// Last pointer position (viewport center until the first move).
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Cursor glyph position.
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    pub fn headline(&self) -> &Headline {
        &self.headline
    }

    pub fn trail_layer(&self) -> &TrailLayer {
        &self.trail_layer
    }

    pub fn trails(&self) -> &TrailEmitter {
        &self.trails
    }

    pub fn particle_surface(&self) -> &S {
        &self.particle_surface
    }

    pub fn wave_surface(&self) -> &S {
        &self.wave_surface
    }

    /// Frames ticked so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
