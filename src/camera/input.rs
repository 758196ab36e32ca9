//! Translates winit window events into orbit-controller input.

use glam::Vec2;
use winit::event::{
    ElementState, MouseButton, MouseScrollDelta, WindowEvent,
};

use crate::camera::controller::OrbitController;

/// Stateful window-event → camera-input translator.
pub struct InputHandler {
    last_mouse_pos: Vec2,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Create a handler with no mouse history.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_mouse_pos: Vec2::ZERO,
        }
    }

    /// Returns true if the event was consumed by the camera.
    pub fn handle_event(
        &mut self,
        controller: &mut OrbitController,
        event: &WindowEvent,
    ) -> bool {
        match event {
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                controller.rotate_pressed = *state == ElementState::Pressed;
                true
            }
            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state,
                ..
            } => {
                controller.pan_pressed = *state == ElementState::Pressed;
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                let current_pos =
                    Vec2::new(position.x as f32, position.y as f32);
                let delta = current_pos - self.last_mouse_pos;
                self.last_mouse_pos = current_pos;

                if controller.rotate_pressed {
                    controller.rotate(delta);
                } else if controller.pan_pressed {
                    controller.pan(delta);
                }
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                controller.zoom(scroll);
                true
            }
            _ => false,
        }
    }
}
