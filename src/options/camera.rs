use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Camera projection and orbit-control parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
    /// Rotation sensitivity (radians per pixel of drag).
    pub rotate_speed: f32,
    /// Pan sensitivity (meters per pixel of drag).
    pub pan_speed: f32,
    /// Zoom sensitivity multiplier per scroll step.
    pub zoom_speed: f32,
    /// Closest the orbit camera may approach the target, in meters.
    pub min_distance: f32,
    /// Farthest the orbit camera may retreat from the target, in meters.
    pub max_distance: f32,
    /// Per-frame velocity retention for damped input, in `[0, 1)`.
    /// Higher values coast longer after the mouse stops.
    pub damping: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 50.0,
            znear: 0.1,
            zfar: 1000.0,
            rotate_speed: 0.005,
            pan_speed: 0.003,
            zoom_speed: 0.05,
            min_distance: 0.5,
            max_distance: 10.0,
            damping: 0.85,
        }
    }
}
