//! Indexed-mesh render pass for the presented figure.
//!
//! Owns one vertex/index buffer pair per decoded mesh primitive plus a
//! model uniform carrying the non-uniform measurement scale. Installing a
//! new figure drops the previous figure's buffers first, so repeated
//! presentations never accumulate GPU resources.

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::figure::FigureData;
use crate::gpu::render_context::RenderContext;

/// Vertex layout for figure meshes.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct FigureVertex {
    position: [f32; 3],
    normal: [f32; 3],
}

/// Model transform uniform. The normal matrix is the inverse-transpose of
/// the model matrix, needed because the measurement scale is non-uniform.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct ModelUniform {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 4],
}

impl ModelUniform {
    fn from_scale(scale: Vec3) -> Self {
        let model = Mat4::from_scale(scale);
        Self {
            model: model.to_cols_array_2d(),
            normal: model.inverse().transpose().to_cols_array_2d(),
        }
    }
}

/// GPU buffers for one mesh primitive.
struct MeshBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Render pass drawing the currently presented figure.
pub struct FigureRenderer {
    pipeline: wgpu::RenderPipeline,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    meshes: Vec<MeshBuffers>,
}

impl FigureRenderer {
    /// Create the figure pipeline against the shared camera and lighting
    /// bind group layouts. Starts with no figure installed.
    #[must_use]
    pub fn new(
        context: &RenderContext,
        camera_layout: &wgpu::BindGroupLayout,
        lighting_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = context.device.create_shader_module(wgpu::include_wgsl!(
            "../../assets/shaders/figure.wgsl"
        ));

        let model_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Figure Model Buffer"),
                contents: bytemuck::cast_slice(&[ModelUniform::from_scale(
                    Vec3::ONE,
                )]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );

        let model_layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Figure Model Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            },
        );

        let model_bind_group =
            context
                .device
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    layout: &model_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: model_buffer.as_entire_binding(),
                    }],
                    label: Some("Figure Model Bind Group"),
                });

        let pipeline_layout = context.device.create_pipeline_layout(
            &wgpu::PipelineLayoutDescriptor {
                label: Some("Figure Pipeline Layout"),
                bind_group_layouts: &[
                    camera_layout,
                    lighting_layout,
                    &model_layout,
                ],
                push_constant_ranges: &[],
            },
        );

        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: size_of::<FigureVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        };

        let pipeline = context.device.create_render_pipeline(
            &wgpu::RenderPipelineDescriptor {
                label: Some("Figure Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[vertex_layout],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: context.format(),
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: Some(wgpu::Face::Back),
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: wgpu::TextureFormat::Depth32Float,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            },
        );

        Self {
            pipeline,
            model_buffer,
            model_bind_group,
            meshes: Vec::new(),
        }
    }

    /// Install a freshly decoded figure with the given per-axis scale,
    /// replacing whatever was displayed.
    ///
    /// The previous figure's vertex and index buffers are released
    /// before the new ones are uploaded. Returns the number of meshes
    /// released, for leak accounting.
    pub fn install(
        &mut self,
        context: &RenderContext,
        figure: &FigureData,
        scale: Vec3,
    ) -> usize {
        let released = self.clear();

        for mesh in &figure.meshes {
            let vertices: Vec<FigureVertex> = mesh
                .positions
                .iter()
                .zip(&mesh.normals)
                .map(|(p, n)| FigureVertex {
                    position: *p,
                    normal: *n,
                })
                .collect();

            let vertex_buffer = context.device.create_buffer_init(
                &wgpu::util::BufferInitDescriptor {
                    label: Some("Figure Vertex Buffer"),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                },
            );
            let index_buffer = context.device.create_buffer_init(
                &wgpu::util::BufferInitDescriptor {
                    label: Some("Figure Index Buffer"),
                    contents: bytemuck::cast_slice(&mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                },
            );

            self.meshes.push(MeshBuffers {
                vertex_buffer,
                index_buffer,
                index_count: mesh.indices.len() as u32,
            });
        }

        context.queue.write_buffer(
            &self.model_buffer,
            0,
            bytemuck::cast_slice(&[ModelUniform::from_scale(scale)]),
        );

        released
    }

    /// Drop all installed mesh buffers. Returns how many meshes were
    /// released.
    pub fn clear(&mut self) -> usize {
        let released = self.meshes.len();
        self.meshes.clear();
        released
    }

    /// Number of meshes currently installed.
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Record draw calls for the installed figure. No-op when nothing is
    /// installed.
    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        camera_bind_group: &'a wgpu::BindGroup,
        lighting_bind_group: &'a wgpu::BindGroup,
    ) {
        if self.meshes.is_empty() {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, camera_bind_group, &[]);
        render_pass.set_bind_group(1, lighting_bind_group, &[]);
        render_pass.set_bind_group(2, &self.model_bind_group, &[]);
        for mesh in &self.meshes {
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(
                mesh.index_buffer.slice(..),
                wgpu::IndexFormat::Uint32,
            );
            render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }
}
