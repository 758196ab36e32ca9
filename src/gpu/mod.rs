//! Core GPU plumbing: device, queue, surface, and configuration.

/// wgpu device, surface, and queue initialization.
pub mod render_context;

pub use render_context::{RenderContext, RenderContextError};
