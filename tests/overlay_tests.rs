//! End-to-end tests driving a full [`SimulationLoop`] the way a host would.
//!
//! Most tests use [`RecordingSurface`] so draw calls can be inspected; one
//! runs the CPU raster to check the whole pipeline produces pixels.

use std::collections::HashSet;

use glowfield::prelude::*;
use glowfield::{Particle, Wave};

fn config() -> OverlayConfig {
    OverlayConfig::default()
        .with_viewport(800.0, 600.0)
        .with_seed(7)
}

fn recording(config: OverlayConfig) -> SimulationLoop<RecordingSurface> {
    SimulationLoop::new(config, RecordingSurface::default(), RecordingSurface::default())
        .expect("valid config")
}

fn assert_in_bounds(sim: &SimulationLoop<RecordingSurface>) {
    let vp = sim.viewport();
    for (i, p) in sim.particles().iter().enumerate() {
        assert!(
            p.position.x >= 0.0 && p.position.x <= vp.width(),
            "particle {} x out of bounds: {}",
            i,
            p.position.x
        );
        assert!(
            p.position.y >= 0.0 && p.position.y <= vp.height(),
            "particle {} y out of bounds: {}",
            i,
            p.position.y
        );
    }
}

// ============================================================================
// Initialization
// ============================================================================

#[test]
fn test_init_populates_particles_and_waves() {
    let sim = recording(config());
    assert_eq!(sim.particles().len(), 150);
    assert_eq!(sim.waves().len(), 8);
    assert_eq!(sim.particle_surface().size(), (800, 600));
    assert_eq!(sim.wave_surface().size(), (800, 600));
    assert_eq!(sim.pointer(), Vec2::new(400.0, 300.0));
    assert!(!sim.is_running());
}

#[test]
fn test_same_seed_same_state() {
    let a = recording(config());
    let b = recording(config());
    assert_eq!(a.particles(), b.particles());
    assert_eq!(a.waves(), b.waves());
}

// ============================================================================
// Particles
// ============================================================================

#[test]
fn test_particle_dies_after_one_update() {
    let vp = Viewport::new(800.0, 600.0);
    let mut rng = rand::thread_rng();
    let mut p = Particle::spawn(&mut rng, &vp);
    p.life = 0.01;
    p.decay = 0.05;
    p.update(&vp);
    assert!(p.life <= 0.0);
    assert!(p.is_dead());
}

#[test]
fn test_bounds_and_population_hold_over_many_frames() {
    let mut sim = recording(config());
    sim.start();

    let mut lives: Vec<f32> = sim.particles().iter().map(|p| p.life).collect();
    for frame in 0..400 {
        sim.tick();
        assert_eq!(sim.particles().len(), 150, "frame {}", frame);
        assert_in_bounds(&sim);

        for (slot, p) in sim.particles().iter().enumerate() {
            // Either decayed in place or was just replaced with a fresh one.
            assert!(
                p.life < lives[slot] || p.life == 1.0,
                "slot {} life went from {} to {}",
                slot,
                lives[slot],
                p.life
            );
            assert!(p.life > 0.0);
            lives[slot] = p.life;
        }
    }
}

#[test]
fn test_pointer_burst_never_exceeds_cap() {
    let mut sim = recording(config().with_pointer_spawn(1.0, 50.0, 2.0));
    sim.start();

    for i in 0..100 {
        let x = (i * 8) as f32;
        let y = 300.0 + (i % 10) as f32 * 5.0;
        sim.on_pointer_move(x, y, i as Millis);
        assert!(sim.particles().len() <= 200, "move {}", i);
        assert!(sim.particles().len() >= 150, "move {}", i);
    }
    assert_eq!(sim.particles().len(), 200);

    sim.tick();
    assert_in_bounds(&sim);
}

#[test]
fn test_default_burst_stays_between_target_and_cap() {
    let mut sim = recording(config());
    sim.start();
    for i in 0..100 {
        sim.on_pointer_move(400.0, 300.0, i as Millis * 16.0);
        sim.tick();
        let n = sim.particles().len();
        assert!((150..=200).contains(&n));
    }
}

// ============================================================================
// Trails
// ============================================================================

#[test]
fn test_trail_cap_evicts_oldest_marks() {
    let mut sim = recording(config());
    let marks: Vec<_> = (0..25)
        .map(|i| sim.on_pointer_move(10.0 + i as f32, 10.0, i as Millis))
        .collect();

    assert_eq!(sim.trails().len(), 20);
    assert_eq!(sim.trail_layer().len(), 20);
    for mark in &marks[..5] {
        assert!(!sim.trail_layer().contains(*mark));
        assert!(!sim.trails().contains(*mark));
    }
    for mark in &marks[5..] {
        assert!(sim.trail_layer().contains(*mark));
    }
}

#[test]
fn test_evicted_mark_expiry_is_harmless() {
    let mut sim = recording(config());
    for i in 0..25 {
        sim.on_pointer_move(10.0, 10.0, i as Millis);
        assert!(sim.trails().len() <= 20);
    }

    // Past every mark's lifetime, including the evicted ones.
    sim.advance(10_000.0);
    assert!(sim.trails().is_empty());
    assert!(sim.trail_layer().is_empty());
}

#[test]
fn test_trails_expire_in_spawn_order() {
    let mut sim = recording(config());
    let first = sim.on_pointer_move(1.0, 1.0, 0.0);
    let second = sim.on_pointer_move(2.0, 2.0, 100.0);

    sim.advance(550.0);
    assert!(!sim.trail_layer().contains(first));
    assert!(sim.trail_layer().contains(second));

    sim.advance(600.0);
    assert!(sim.trail_layer().is_empty());
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn test_resize_resizes_surfaces_and_regenerates_waves() {
    let mut sim = recording(config());
    let before: HashSet<u64> = sim.waves().iter().map(|w| w.id).collect();

    sim.on_resize(1024.0, 768.0);

    assert_eq!(sim.particle_surface().size(), (1024, 768));
    assert_eq!(sim.wave_surface().size(), (1024, 768));
    assert_eq!(sim.waves().len(), 8);
    for wave in sim.waves() {
        assert!(!before.contains(&wave.id), "wave {} survived resize", wave.id);
    }
    assert_eq!(sim.pointer(), Vec2::new(512.0, 384.0));
}

#[test]
fn test_wave_offsets_follow_new_height() {
    let mut sim = recording(config());
    sim.on_resize(1024.0, 800.0);
    let offsets: Vec<f32> = sim.waves().iter().map(|w: &Wave| w.y_offset).collect();
    for (i, y) in offsets.iter().enumerate() {
        assert_eq!(*y, i as f32 / 8.0 * 800.0);
    }
}

// ============================================================================
// Headline
// ============================================================================

#[test]
fn test_headline_parallax_follows_pointer() {
    let mut sim = recording(config());
    sim.on_pointer_move(600.0, 100.0, 0.0);
    assert_eq!(sim.headline().translation, Vec2::new(20.0, -20.0));
}

#[test]
fn test_glitches_always_revert() {
    let mut sim = recording(config().with_glitch(200.0, 1.0, 100.0));

    sim.advance(200.0);
    assert!(!sim.headline().shadow.is_baseline());

    sim.advance(300.0);
    assert!(sim.headline().shadow.is_baseline());
    assert_eq!(sim.headline().filter, glowfield::headline::Filter::IDENTITY);
}

#[test]
fn test_overlapping_glitch_reverts_after_last_trigger() {
    // Each glitch outlasts the interval, so consecutive triggers overlap.
    let mut sim = recording(config().with_glitch(200.0, 1.0, 300.0));

    sim.advance(200.0);
    sim.advance(400.0);
    // Past the first trigger's revert time but not the second's.
    sim.advance(550.0);
    assert!(!sim.headline().shadow.is_baseline());

    // With every firing glitching, the shadow never gets back to baseline.
    for step in 3..=20 {
        sim.advance(step as Millis * 200.0 + 150.0);
        assert!(!sim.headline().shadow.is_baseline(), "step {}", step);
    }
}

#[test]
fn test_glitch_never_fires_when_chance_is_zero() {
    let mut sim = recording(config().with_glitch(200.0, 0.0, 100.0));
    for step in 1..=50 {
        sim.advance(step as Millis * 200.0);
        assert!(sim.headline().shadow.is_baseline());
    }
}

// ============================================================================
// Raster pipeline
// ============================================================================

#[test]
fn test_canvas_pipeline_produces_pixels() {
    let config = OverlayConfig::default()
        .with_viewport(160.0, 120.0)
        .with_particle_count(40)
        .with_particle_cap(50)
        .with_seed(3);
    let mut sim = SimulationLoop::new(config, Canvas::default(), Canvas::default())
        .expect("valid config");
    sim.start();
    sim.tick();

    let lit = |c: &Canvas| c.pixels().iter().filter(|p| p.w > 0.0).count();
    assert!(lit(sim.particle_surface()) > 0);
    assert!(lit(sim.wave_surface()) > 0);

    let mut frame = Canvas::new(160, 120);
    sim.wave_surface().composite_onto(&mut frame);
    sim.particle_surface().composite_onto(&mut frame);
    let rgba = frame.to_rgba8(Vec3::ZERO);
    assert_eq!(rgba.len(), 160 * 120 * 4);
    assert!(rgba.chunks(4).any(|px| px[0] > 0 || px[1] > 0 || px[2] > 0));
}
