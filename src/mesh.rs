//! GPU vertex format and mesh buffers.
//!
//! Everything the garden draws in 3D is baked into world-space triangles with
//! a color per vertex, so a single vertex layout covers the ground, the sky
//! gradients and every branch.
//!
//! # Vertex Layout
//!
//! The [`Vertex3d`] struct uses the following GPU layout (28 bytes per vertex):
//!
//! | Attribute | Format    | Offset | Shader Location |
//! |-----------|-----------|--------|-----------------|
//! | position  | Float32x3 | 0      | 0               |
//! | color     | Float32x4 | 12     | 1               |

use crate::color::Color;
use crate::geometry::Geometry;
use crate::gpu::GpuContext;
use glam::Vec3;

/// A world-space vertex with an RGBA color.
///
/// Uses `#[repr(C)]` and derives [`bytemuck::Pod`] so vertex slices can be
/// uploaded without copying field by field.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    /// Position in world space.
    pub position: [f32; 3],
    /// Linear-light RGBA color, interpolated across the triangle.
    pub color: [f32; 4],
}

impl Vertex3d {
    /// The wgpu vertex buffer layout descriptor for this vertex type.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex3d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // color
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x4,
            },
        ],
    };

    pub fn new(position: Vec3, color: Color) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_linear(),
        }
    }
}

/// GPU-resident geometry with vertex and index buffers.
///
/// Meshes are immutable after creation. To render different geometry,
/// upload a new [`Geometry`].
#[derive(Debug)]
pub struct Mesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
}

impl Mesh {
    /// Upload raw vertex and index data (u32 indices, 3 per triangle).
    pub fn new(gpu: &GpuContext, vertices: &[Vertex3d], indices: &[u32]) -> Self {
        use wgpu::util::DeviceExt;

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    /// Upload a CPU-side [`Geometry`].
    pub fn from_geometry(gpu: &GpuContext, geometry: &Geometry) -> Self {
        Self::new(gpu, geometry.vertices(), geometry.indices())
    }
}
