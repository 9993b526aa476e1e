//! Window host.
//!
//! [`App`] is the winit application handler that owns the window, the GPU
//! presenter, the host clock and the [`SimulationLoop`]. It forwards pointer
//! and resize events into the loop, drives `advance` and `tick` once per
//! redraw, draws the chrome layer, composites the three canvases and hands
//! the result to the GPU.
//!
//! While the animation is paused no frames are scheduled, but the timers
//! still fire: the event loop sleeps until the loop's next deadline, pumps
//! `advance`, and redraws the chrome when a trail expired or the headline
//! glitched.

use std::sync::Arc;

use glam::Vec3;
use tracing::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::chrome::{self, ChromeFrame};
use crate::config::OverlayConfig;
use crate::error::OverlayError;
use crate::gpu::GpuState;
use crate::input::{Action, Input};
use crate::raster::Canvas;
use crate::simulation::SimulationLoop;
use crate::surface::Surface;
use crate::time::Time;

/// Page background behind every layer.
const BACKGROUND: Vec3 = Vec3::ZERO;

/// Frames between "frame stats" debug lines.
const FRAME_STATS_EVERY: u64 = 600;

/// Open a window and run the overlay until it is closed.
///
/// Blocks the calling thread. Space pauses and resumes the animation,
/// Escape quits.
pub fn run(config: OverlayConfig) -> Result<(), OverlayError> {
    config.validate()?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

pub struct App {
    config: OverlayConfig,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    sim: Option<SimulationLoop<Canvas>>,
    chrome: Canvas,
    frame: Canvas,
    texels: Vec<[u8; 4]>,
    input: Input,
    time: Time,
    error: Option<OverlayError>,
}

impl App {
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            config,
            window: None,
            gpu: None,
            sim: None,
            chrome: Canvas::default(),
            frame: Canvas::default(),
            texels: Vec::new(),
            input: Input::new(),
            time: Time::new(),
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), OverlayError> {
        let viewport = self.config.viewport;
        let window_attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                viewport.width() as f64,
                viewport.height() as f64,
            ));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let size = window.inner_size();

        // Everything downstream works in physical pixels.
        let config = self
            .config
            .clone()
            .with_viewport(size.width as f32, size.height as f32);
        let mut sim = SimulationLoop::new(config, Canvas::default(), Canvas::default())?;

        let gpu = pollster::block_on(GpuState::new(window.clone()))?;

        self.chrome.resize(size.width, size.height);
        self.frame.resize(size.width, size.height);

        sim.start();
        info!(
            width = size.width,
            height = size.height,
            particles = sim.particles().len(),
            waves = sim.waves().len(),
            "overlay started"
        );

        window.request_redraw();
        self.window = Some(window);
        self.gpu = Some(gpu);
        self.sim = Some(sim);
        Ok(())
    }

    fn handle_action(&mut self, event_loop: &ActiveEventLoop, action: Action) {
        let Some(sim) = self.sim.as_mut() else {
            return;
        };

        match action {
            Action::PointerMoved(position) => {
                sim.on_pointer_move(position.x, position.y, self.time.now_ms());
                // The cursor and trail still follow the pointer while paused.
                if !sim.is_running() {
                    self.request_redraw();
                }
            }
            Action::Resized { width, height } => {
                sim.on_resize(width as f32, height as f32);
                self.chrome.resize(width, height);
                self.frame.resize(width, height);
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(winit::dpi::PhysicalSize::new(width, height));
                }
                self.request_redraw();
            }
            Action::ToggleRunning => {
                if sim.is_running() {
                    sim.stop();
                    info!("animation paused");
                } else {
                    sim.start();
                    info!("animation resumed");
                    self.request_redraw();
                }
            }
            Action::Quit => {
                info!("overlay closing");
                event_loop.exit();
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(sim), Some(gpu)) = (self.sim.as_mut(), self.gpu.as_mut()) else {
            return;
        };

        self.time.update();
        let now = self.time.now_ms();
        sim.advance(now);
        let running = sim.tick();

        chrome::render(
            &mut self.chrome,
            &ChromeFrame {
                viewport: sim.viewport(),
                headline: sim.headline(),
                cursor: sim.cursor(),
                trails: sim.trail_layer(),
                trail_ttl: sim.trails().ttl(),
                now,
            },
        );

        self.frame.clear();
        sim.wave_surface().composite_onto(&mut self.frame);
        sim.particle_surface().composite_onto(&mut self.frame);
        self.chrome.composite_onto(&mut self.frame);
        self.frame.write_rgba8(BACKGROUND, &mut self.texels);

        match gpu.render(bytemuck::cast_slice(&self.texels)) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("surface lost, reconfiguring");
                gpu.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                event_loop.exit();
                return;
            }
            Err(e) => warn!(error = ?e, "render error"),
        }

        if should_log_frame_stats(sim.frames(), running) {
            debug!(frames = sim.frames(), fps = self.time.fps(), "frame stats");
        }

        if running {
            self.request_redraw();
        }
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Pump the timers while paused and sleep until the next one is due.
    fn idle(&mut self, event_loop: &ActiveEventLoop) {
        let Some(sim) = self.sim.as_mut() else {
            return;
        };
        if sim.is_running() {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        }

        let changed = sim.advance(self.time.now_ms());
        let control_flow = match sim.next_deadline() {
            Some(deadline) => ControlFlow::WaitUntil(self.time.instant_at(deadline)),
            None => ControlFlow::Wait,
        };
        event_loop.set_control_flow(control_flow);
        if changed {
            self.request_redraw();
        }
    }
}

/// Frame stats are logged periodically while frames are being produced,
/// never for redraws of a paused overlay.
fn should_log_frame_stats(frames: u64, running: bool) -> bool {
    running && frames > 0 && frames % FRAME_STATS_EVERY == 0
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            error!(error = %e, "failed to start overlay");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let WindowEvent::RedrawRequested = event {
            self.redraw(event_loop);
            return;
        }
        if let Some(action) = self.input.handle_event(&event) {
            self.handle_action(event_loop, action);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.idle(event_loop);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_stats_only_while_running() {
        assert!(should_log_frame_stats(600, true));
        assert!(should_log_frame_stats(1_200, true));
        assert!(!should_log_frame_stats(601, true));
        assert!(!should_log_frame_stats(0, true));
        // A paused overlay keeps redrawing with the frame count frozen.
        assert!(!should_log_frame_stats(600, false));
    }
}
