//! # glowfield
//!
//! A decorative animated overlay: a drifting field of twinkling particles,
//! a stack of glowing sine-wave bands, a cursor glow with a fading pointer
//! trail, and a headline that shifts with the pointer and occasionally
//! glitches.
//!
//! The animation core is independent of any window system. It draws into
//! anything implementing [`Surface`] and reads time only from the values
//! its host passes in, so it runs the same under the bundled winit/wgpu
//! window, a headless [`Canvas`], or a [`RecordingSurface`] in tests.
//!
//! ## Quick Start
//!
//! ```ignore
//! use glowfield::prelude::*;
//!
//! fn main() -> Result<(), OverlayError> {
//!     glowfield::run(
//!         OverlayConfig::default()
//!             .with_headline("HELLO WORLD")
//!             .with_particle_count(150),
//!     )
//! }
//! ```
//!
//! ## Driving the loop yourself
//!
//! ```ignore
//! use glowfield::prelude::*;
//!
//! let config = OverlayConfig::default().with_viewport(800.0, 600.0);
//! let mut sim = SimulationLoop::new(config, Canvas::default(), Canvas::default())?;
//! sim.start();
//!
//! sim.on_pointer_move(420.0, 310.0, 16.0);
//! sim.advance(16.0);
//! sim.tick();
//! ```
//!
//! ## Feature Overview
//!
//! | Element | Type | Behavior |
//! |---------|------|----------|
//! | Particles | [`Particle`] | drift, bounce off edges, twinkle, fade out and respawn |
//! | Waves | [`Wave`] | sinusoidal bands that scroll horizontally |
//! | Trails | [`trail::TrailEmitter`] | one mark per pointer move, capped, expiring |
//! | Headline | [`headline::Headline`] | parallax shift plus timed glitches |
//! | Surfaces | [`Canvas`], [`RecordingSurface`] | raster and test back ends |

pub mod chrome;
pub mod color;
pub mod config;
pub mod error;
pub mod gpu;
pub mod headline;
pub mod input;
pub mod particle;
pub mod raster;
pub mod simulation;
pub mod surface;
pub mod time;
pub mod timer;
pub mod trail;
pub mod viewport;
pub mod wave;
mod window;

pub use glam::{Vec2, Vec3};

pub use config::OverlayConfig;
pub use error::{ConfigError, GpuError, OverlayError};
pub use particle::Particle;
pub use raster::Canvas;
pub use simulation::SimulationLoop;
pub use surface::{RecordingSurface, Surface};
pub use viewport::Viewport;
pub use wave::Wave;
pub use window::{run, App};

/// Common imports for hosting the overlay.
pub mod prelude {
    pub use crate::config::OverlayConfig;
    pub use crate::error::{ConfigError, OverlayError};
    pub use crate::raster::Canvas;
    pub use crate::simulation::SimulationLoop;
    pub use crate::surface::{RecordingSurface, Surface};
    pub use crate::timer::Millis;
    pub use crate::viewport::Viewport;
    pub use glam::{Vec2, Vec3};
}
