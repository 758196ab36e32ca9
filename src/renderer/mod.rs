//! GPU render passes: figure geometry and scene lighting.

/// Figure mesh pipeline and per-mesh GPU buffers.
pub mod figure_renderer;
/// Directional plus ambient lighting uniform.
pub mod lighting;

pub use figure_renderer::FigureRenderer;
pub use lighting::Lighting;
