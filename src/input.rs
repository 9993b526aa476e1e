//! Window input translation.
//!
//! Raw winit window events are reduced to the handful of [`Action`]s the
//! overlay reacts to: pointer moves, resizes, toggling the frame scheduler
//! and quitting. Positions and sizes stay in physical pixels, the same unit
//! as the raster surfaces.

use glam::Vec2;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// Keys the overlay responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Space,
    Escape,
    Other,
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::Space => KeyCode::Space,
            WinitKeyCode::Escape => KeyCode::Escape,
            _ => KeyCode::Other,
        }
    }
}

/// Something the host should do in response to a window event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// The pointer moved to this position.
    PointerMoved(Vec2),
    /// The drawable area changed size.
    Resized { width: u32, height: u32 },
    /// Start or stop the frame scheduler.
    ToggleRunning,
    /// Close the overlay.
    Quit,
}

/// Event translation. Stateless; the simulation owns the pointer.
#[derive(Debug, Default)]
pub struct Input;

impl Input {
    pub fn new() -> Self {
        Self
    }

    /// Translate a winit window event.
    pub fn handle_event(&self, event: &WindowEvent) -> Option<Action> {
        match event {
            WindowEvent::CloseRequested => Some(Action::Quit),

            WindowEvent::Resized(size) => Some(Action::Resized {
                width: size.width,
                height: size.height,
            }),

            WindowEvent::CursorMoved { position, .. } => Some(Action::PointerMoved(Vec2::new(
                position.x as f32,
                position.y as f32,
            ))),

            WindowEvent::KeyboardInput { event, .. } => {
                if event.repeat {
                    return None;
                }
                match event.physical_key {
                    PhysicalKey::Code(code) => key_action(KeyCode::from(code), event.state),
                    PhysicalKey::Unidentified(_) => None,
                }
            }

            _ => None,
        }
    }
}

/// Key bindings: Space toggles animation, Escape quits. Actions fire on
/// press only.
pub fn key_action(key: KeyCode, state: ElementState) -> Option<Action> {
    if state != ElementState::Pressed {
        return None;
    }
    match key {
        KeyCode::Space => Some(Action::ToggleRunning),
        KeyCode::Escape => Some(Action::Quit),
        KeyCode::Other => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalSize;

    #[test]
    fn test_key_bindings() {
        assert_eq!(
            key_action(KeyCode::Space, ElementState::Pressed),
            Some(Action::ToggleRunning)
        );
        assert_eq!(key_action(KeyCode::Space, ElementState::Released), None);
        assert_eq!(
            key_action(KeyCode::Escape, ElementState::Pressed),
            Some(Action::Quit)
        );
        assert_eq!(
            key_action(KeyCode::from(WinitKeyCode::KeyA), ElementState::Pressed),
            None
        );
    }

    #[test]
    fn test_resize_and_close() {
        let input = Input::new();
        assert_eq!(
            input.handle_event(&WindowEvent::Resized(PhysicalSize::new(1024, 768))),
            Some(Action::Resized {
                width: 1024,
                height: 768
            })
        );
        assert_eq!(
            input.handle_event(&WindowEvent::CloseRequested),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_unhandled_events_are_ignored() {
        let input = Input::new();
        assert_eq!(input.handle_event(&WindowEvent::Focused(true)), None);
        assert_eq!(input.handle_event(&WindowEvent::Destroyed), None);
    }
}
