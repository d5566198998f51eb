//! 3D pass for the garden's world-space geometry.
//!
//! Everything 3D in the garden is pre-baked into world space with a color per
//! vertex, so the pass needs a single bind group: the camera's view-projection
//! matrix. Geometry is uploaded lazily through a [`MeshCache`].
//!
//! # Depth Buffer
//!
//! The pass owns its depth buffer. Call [`MeshPass::ensure_depth_size`] before
//! rendering if the window may have been resized.

use std::collections::HashMap;

use log::debug;

use crate::camera::Camera;
use crate::geometry::{Geometry, GeometryId};
use crate::gpu::GpuContext;
use crate::mesh::{Mesh, Vertex3d};

pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Camera uniforms for 3D rendering, uploaded once per frame.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniforms {
    /// Combined view-projection matrix for transforming world positions to clip space.
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniforms {
    pub fn new(camera: &Camera, aspect: f32) -> Self {
        Self {
            view_proj: camera.view_projection(aspect).to_cols_array_2d(),
        }
    }
}

/// GPU meshes keyed by the [`Geometry`] they were uploaded from.
///
/// A geometry is uploaded the first time it is drawn. Meshes that go a whole
/// frame without being drawn are dropped at the next [`MeshCache::end_frame`],
/// so a rebuilt scene releases the previous scene's buffers.
#[derive(Default)]
pub struct MeshCache {
    meshes: HashMap<GeometryId, Mesh>,
    drawn: Vec<GeometryId>,
}

impl MeshCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `geometry` has a mesh and mark it as drawn this frame.
    ///
    /// Empty geometry is ignored.
    pub fn prepare(&mut self, gpu: &GpuContext, geometry: &Geometry) {
        if geometry.is_empty() {
            return;
        }
        self.meshes
            .entry(geometry.id())
            .or_insert_with(|| Mesh::from_geometry(gpu, geometry));
        self.drawn.push(geometry.id());
    }

    /// Meshes drawn this frame, in draw order.
    pub fn drawn(&self) -> impl Iterator<Item = &Mesh> {
        self.drawn.iter().filter_map(|id| self.meshes.get(id))
    }

    /// Evict meshes not drawn since the last call and start a new frame.
    pub fn end_frame(&mut self) {
        let before = self.meshes.len();
        let drawn = std::mem::take(&mut self.drawn);
        self.meshes.retain(|id, _| drawn.contains(id));
        let evicted = before - self.meshes.len();
        if evicted > 0 {
            debug!("evicted {evicted} stale meshes, {} resident", self.meshes.len());
        }
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

/// Depth-tested pipeline for per-vertex colored triangles.
///
/// Culling is disabled: the y-flipped projection reverses winding, and sky
/// panels are seen from both sides while orbiting.
pub struct MeshPass {
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    pub(crate) depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl MeshPass {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Uniforms"),
            size: std::mem::size_of::<CameraUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
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
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[Vertex3d::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let depth_view = Self::create_depth_view(gpu);

        Self {
            pipeline,
            camera_buffer,
            camera_bind_group,
            depth_view,
            depth_size: (gpu.width(), gpu.height()),
        }
    }

    fn create_depth_view(gpu: &GpuContext) -> wgpu::TextureView {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Recreate the depth buffer if the surface size changed.
    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            self.depth_view = Self::create_depth_view(gpu);
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    /// Draw every mesh the cache marked as drawn this frame.
    pub fn render(
        &self,
        gpu: &GpuContext,
        render_pass: &mut wgpu::RenderPass,
        camera: &Camera,
        meshes: &MeshCache,
    ) {
        let uniforms = CameraUniforms::new(camera, gpu.aspect());
        gpu.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

        for mesh in meshes.drawn() {
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::ViewportState;

    #[test]
    fn camera_uniforms_are_one_matrix() {
        assert_eq!(std::mem::size_of::<CameraUniforms>(), 64);
    }

    #[test]
    fn uniforms_carry_view_projection() {
        let vp = ViewportState::new(800.0, 600.0).unwrap();
        let camera = Camera::for_viewport(&vp);
        let uniforms = CameraUniforms::new(&camera, vp.aspect());
        assert_eq!(
            uniforms.view_proj,
            camera.view_projection(vp.aspect()).to_cols_array_2d()
        );
    }
}
