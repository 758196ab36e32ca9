//! Perspective camera, orbit controller, and input translation.

/// Orbit controller, damped input velocities, and figure framing.
pub mod controller;
/// Perspective camera and its GPU uniform.
pub mod core;
/// Window-event to camera-action translation.
#[cfg(feature = "viewer")]
pub mod input;

pub use controller::{CameraFrame, OrbitController};
pub use core::{Camera, CameraUniform};
#[cfg(feature = "viewer")]
pub use input::InputHandler;
