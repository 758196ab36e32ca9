//! Small shared utilities.

/// FPS tracking and optional frame-rate capping.
pub mod frame_timing;

pub use frame_timing::FrameTiming;
