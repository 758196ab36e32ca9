use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Viewport display parameters.
pub struct DisplayOptions {
    /// Background clear color, linear RGB.
    pub background: [f32; 3],
    /// Frame-rate cap for the render loop (0 = vsync only).
    pub target_fps: u32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            // Dark slate matching the hosting page theme (#282c34)
            background: [0.157, 0.173, 0.204],
            target_fps: 0,
        }
    }
}
