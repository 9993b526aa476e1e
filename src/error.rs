//! Error types for glowfield.
//!
//! The simulation itself cannot fail; errors only come from configuration
//! and from bringing up the window and GPU.

use std::fmt;

/// Invalid [`OverlayConfig`](crate::config::OverlayConfig) values.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The particle soft cap is below the target population.
    ParticleCapBelowTarget { target: usize, cap: usize },
    /// A probability lies outside 0.0-1.0.
    Probability { name: &'static str, value: f64 },
    /// A timer period or lifetime is not strictly positive.
    NonPositiveDuration { name: &'static str, value: f64 },
    /// A scalar that must be finite and non-negative is not.
    InvalidScalar { name: &'static str, value: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParticleCapBelowTarget { target, cap } => write!(
                f,
                "Particle cap ({}) must be at least the target population ({})",
                cap, target
            ),
            ConfigError::Probability { name, value } => {
                write!(f, "{} must be between 0 and 1, got {}", name, value)
            }
            ConfigError::NonPositiveDuration { name, value } => {
                write!(f, "{} must be greater than zero, got {}", name, value)
            }
            ConfigError::InvalidScalar { name, value } => {
                write!(f, "{} must be finite and non-negative, got {}", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// The surface reports no usable texture format.
    NoSurfaceFormat,
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
            GpuError::NoSurfaceFormat => write!(f, "GPU surface reports no supported texture formats"),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur when running the overlay window.
#[derive(Debug)]
pub enum OverlayError {
    /// Failed to create or run the event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// The configuration was rejected.
    Config(ConfigError),
}

impl fmt::Display for OverlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayError::EventLoop(e) => write!(f, "Event loop error: {}", e),
            OverlayError::Window(e) => write!(f, "Failed to create window: {}", e),
            OverlayError::Gpu(e) => write!(f, "GPU error: {}", e),
            OverlayError::Config(e) => write!(f, "Invalid configuration: {}", e),
        }
    }
}

impl std::error::Error for OverlayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OverlayError::EventLoop(e) => Some(e),
            OverlayError::Window(e) => Some(e),
            OverlayError::Gpu(e) => Some(e),
            OverlayError::Config(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for OverlayError {
    fn from(e: winit::error::EventLoopError) -> Self {
        OverlayError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for OverlayError {
    fn from(e: winit::error::OsError) -> Self {
        OverlayError::Window(e)
    }
}

impl From<GpuError> for OverlayError {
    fn from(e: GpuError) -> Self {
        OverlayError::Gpu(e)
    }
}

impl From<ConfigError> for OverlayError {
    fn from(e: ConfigError) -> Self {
        OverlayError::Config(e)
    }
}
