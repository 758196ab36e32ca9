use wgpu::util::DeviceExt;

use crate::gpu::render_context::RenderContext;

/// Lighting configuration shared by the figure shader.
/// NOTE: Must match the WGSL struct layout exactly (32 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    /// Key light direction (normalized, pointing toward the scene).
    pub light_dir: [f32; 3],
    /// Padding for GPU alignment.
    pub _pad1: f32,
    /// Key light intensity.
    pub light_intensity: f32,
    /// Ambient light intensity.
    pub ambient: f32,
    /// Padding for GPU alignment.
    pub _pad2: [f32; 2],
}

impl Default for LightingUniform {
    fn default() -> Self {
        Self {
            // Key light from upper-front-right, matching the presentation
            // scene's directional light at (3, 5, 4)
            light_dir: normalize([3.0, 5.0, 4.0]),
            _pad1: 0.0,
            light_intensity: 1.2,
            ambient: 0.6,
            _pad2: [0.0; 2],
        }
    }
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    [v[0] / len, v[1] / len, v[2] / len]
}

/// Lighting uniform plus its GPU binding resources.
pub struct Lighting {
    /// CPU copy of the lighting uniform.
    pub uniform: LightingUniform,
    /// GPU uniform buffer.
    pub buffer: wgpu::Buffer,
    /// Bind group layout shared with render pipelines.
    pub layout: wgpu::BindGroupLayout,
    /// Bind group binding [`Self::buffer`].
    pub bind_group: wgpu::BindGroup,
}

impl Lighting {
    /// Create lighting resources on `context` with default values.
    #[must_use]
    pub fn new(context: &RenderContext) -> Self {
        let uniform = LightingUniform::default();

        let buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Lighting Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );

        let layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Lighting Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            },
        );

        let bind_group =
            context
                .device
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    layout: &layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                    label: Some("Lighting Bind Group"),
                });

        Self {
            uniform,
            buffer,
            layout,
            bind_group,
        }
    }

    /// Push the current lighting values to the GPU.
    pub fn update_gpu(&self, queue: &wgpu::Queue) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[
            self.uniform,
        ]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_light_direction_is_normalized() {
        let uniform = LightingUniform::default();
        let d = uniform.light_dir;
        let len = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
        assert!((len - 1.0).abs() < 1e-6);
    }

    #[test]
    fn uniform_is_32_bytes() {
        assert_eq!(size_of::<LightingUniform>(), 32);
    }
}
