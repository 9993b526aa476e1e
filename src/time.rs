//! Host clock.
//!
//! The simulation never reads the system clock itself. The window host owns
//! a [`Time`] and feeds `now_ms()` into pointer handlers and
//! [`SimulationLoop::advance`](crate::SimulationLoop::advance), which keeps
//! the core testable with hand-picked timestamps.
//!
//! # Example
//!
//! ```ignore
//! use glowfield::time::Time;
//!
//! let mut time = Time::new();
//!
//! // Once per displayed frame:
//! time.update();
//! sim.advance(time.now_ms());
//! sim.tick();
//! ```

use std::time::{Duration, Instant};

use crate::timer::Millis;

/// Monotonic millisecond clock with frame and FPS bookkeeping.
#[derive(Debug)]
pub struct Time {
    /// When the clock was created.
    start: Instant,
    /// Frames since start.
    frame_count: u64,
    /// Frames per second, refreshed every `fps_update_interval`.
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
}

impl Time {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Mark a new frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }
    }

    /// Milliseconds since the clock started, read fresh.
    ///
    /// Event handlers call this between frames, so it is not frozen at
    /// the last `update`.
    #[inline]
    pub fn now_ms(&self) -> Millis {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// The instant `ms` milliseconds after the clock started. Used to
    /// sleep the event loop until the next timer is due.
    pub fn instant_at(&self, ms: Millis) -> Instant {
        self.start + Duration::from_secs_f64(ms.max(0.0) / 1000.0)
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
