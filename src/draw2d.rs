use std::collections::HashMap;

use log::warn;

use crate::assets::{Assets, GlyphInfo};
use crate::color::Color;
use crate::gpu::GpuContext;
use crate::scene::FontStyle;

/// Vertex for screen-space glyph quads, in pixels.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex2d {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex2d {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex2d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            // uv
            wgpu::VertexAttribute {
                offset: 8,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x2,
            },
            // color
            wgpu::VertexAttribute {
                offset: 16,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x4,
            },
        ],
    };
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Draw2dUniforms {
    resolution: [f32; 2],
    _padding: [f32; 2],
}

const MAX_VERTICES: usize = 16384;

/// Append the quads for `text` with its baseline starting at `(x, baseline)`.
///
/// Glyph metrics come from an atlas rasterized at `atlas_size` pixels and are
/// scaled to `pixel_size`. Characters missing from the atlas advance the pen
/// by half an em.
#[allow(clippy::too_many_arguments)]
pub(crate) fn layout_text(
    out: &mut Vec<Vertex2d>,
    glyph: impl Fn(char) -> Option<GlyphInfo>,
    atlas_size: f32,
    x: f32,
    baseline: f32,
    text: &str,
    pixel_size: f32,
    color: Color,
) {
    let scale = pixel_size / atlas_size;
    let c = color.to_linear();
    let mut pen_x = x;

    for ch in text.chars() {
        let Some(glyph) = glyph(ch) else {
            pen_x += pixel_size * 0.5;
            continue;
        };

        if glyph.width > 0 && glyph.height > 0 {
            let gw = glyph.width as f32 * scale;
            let gh = glyph.height as f32 * scale;
            let gx = pen_x + glyph.offset_x * scale;
            // ymin is the distance from the baseline up to the glyph's bottom edge.
            let gy = baseline - glyph.offset_y * scale - gh;

            let u0 = glyph.uv[0];
            let v0 = glyph.uv[1];
            let u1 = u0 + glyph.uv[2];
            let v1 = v0 + glyph.uv[3];

            let vertex = |position, uv| Vertex2d {
                position,
                uv,
                color: c,
            };
            out.extend_from_slice(&[
                vertex([gx, gy], [u0, v0]),
                vertex([gx + gw, gy], [u1, v0]),
                vertex([gx, gy + gh], [u0, v1]),
                vertex([gx + gw, gy], [u1, v0]),
                vertex([gx + gw, gy + gh], [u1, v1]),
                vertex([gx, gy + gh], [u0, v1]),
            ]);
        }

        pen_x += glyph.advance * scale;
    }
}

/// Immediate-mode screen-space text.
///
/// All text is batched per font face and rendered in one pass at the end of
/// the frame, on top of the 3D scene.
pub struct Draw2d {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_bind_group_layout: wgpu::BindGroupLayout,
    font_bind_groups: HashMap<FontStyle, wgpu::BindGroup>,
    batches: Vec<(FontStyle, Vec<Vertex2d>)>,
}

impl Draw2d {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Draw2d Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/draw2d.wgsl").into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Draw2d Uniforms"),
            size: std::mem::size_of::<Draw2dUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Draw2d Uniform Layout"),
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

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Draw2d Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Draw2d Texture Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Draw2d Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout, &texture_bind_group_layout],
            push_constant_ranges: &[],
        });

        let blend_state = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                operation: wgpu::BlendOperation::Add,
            },
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Draw2d Text Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[Vertex2d::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_textured"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(blend_state),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            // Drawn in the same pass as the meshes; text never tests or writes depth.
            depth_stencil: Some(wgpu::DepthStencilState {
                format: crate::mesh_pass::DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Draw2d Vertex Buffer"),
            size: (MAX_VERTICES * std::mem::size_of::<Vertex2d>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            pipeline,
            vertex_buffer,
            uniform_buffer,
            uniform_bind_group,
            texture_bind_group_layout,
            font_bind_groups: HashMap::new(),
            batches: Vec::new(),
        }
    }

    /// Clear all draw calls for the new frame.
    pub fn clear(&mut self) {
        self.batches.clear();
    }

    /// Queue `text` at `pixel_size`, its baseline starting at `(x, baseline)`.
    ///
    /// Does nothing if `font` has not been loaded.
    #[allow(clippy::too_many_arguments)]
    pub fn text(
        &mut self,
        assets: &Assets,
        font: FontStyle,
        x: f32,
        baseline: f32,
        text: &str,
        pixel_size: f32,
        color: Color,
    ) {
        let Some(atlas) = assets.font(font) else {
            return;
        };

        let index = match self.batches.iter().position(|(style, _)| *style == font) {
            Some(index) => index,
            None => {
                self.batches.push((font, Vec::new()));
                self.batches.len() - 1
            }
        };
        layout_text(
            &mut self.batches[index].1,
            |c| atlas.glyph(c).copied(),
            atlas.size(),
            x,
            baseline,
            text,
            pixel_size,
            color,
        );
    }

    /// Ensure there is a bind group for every loaded font.
    pub(crate) fn update_font_bind_groups(&mut self, gpu: &GpuContext, assets: &Assets) {
        for (style, atlas) in assets.fonts() {
            self.font_bind_groups.entry(style).or_insert_with(|| {
                gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Font Bind Group"),
                    layout: &self.texture_bind_group_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(&atlas.view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(&atlas.sampler),
                        },
                    ],
                })
            });
        }
    }

    /// Render all batched text.
    pub fn render(&self, gpu: &GpuContext, render_pass: &mut wgpu::RenderPass) {
        let uniforms = Draw2dUniforms {
            resolution: [gpu.width() as f32, gpu.height() as f32],
            _padding: [0.0, 0.0],
        };
        gpu.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let mut offset = 0;
        for (style, vertices) in &self.batches {
            if vertices.is_empty() {
                continue;
            }
            let Some(bind_group) = self.font_bind_groups.get(style) else {
                continue;
            };
            if offset + vertices.len() > MAX_VERTICES {
                warn!("text vertex budget exhausted, dropping {style:?} text");
                break;
            }

            gpu.queue.write_buffer(
                &self.vertex_buffer,
                (offset * std::mem::size_of::<Vertex2d>()) as u64,
                bytemuck::cast_slice(vertices),
            );

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_bind_group(1, bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.draw(offset as u32..(offset + vertices.len()) as u32, 0..1);

            offset += vertices.len();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(c: char) -> Option<GlyphInfo> {
        match c {
            'a' => Some(GlyphInfo {
                uv: [0.0, 0.0, 0.25, 0.5],
                width: 10,
                height: 20,
                offset_x: 2.0,
                offset_y: -4.0,
                advance: 16.0,
            }),
            ' ' => Some(GlyphInfo {
                uv: [0.0; 4],
                width: 0,
                height: 0,
                offset_x: 0.0,
                offset_y: 0.0,
                advance: 8.0,
            }),
            _ => None,
        }
    }

    #[test]
    fn glyphs_scale_with_pixel_size() {
        let mut out = Vec::new();
        layout_text(&mut out, glyph, 32.0, 100.0, 50.0, "a", 64.0, Color::WHITE);

        assert_eq!(out.len(), 6);
        // Scale 2: 20x40 quad, 4 pixels right of the pen, descending 8 below the baseline.
        assert_eq!(out[0].position, [104.0, 18.0]);
        assert_eq!(out[4].position, [124.0, 58.0]);
        assert_eq!(out[4].uv, [0.25, 0.5]);
        assert_eq!(out[0].color, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn blank_and_missing_glyphs_only_advance() {
        let mut out = Vec::new();
        layout_text(&mut out, glyph, 32.0, 0.0, 0.0, " ?a", 32.0, Color::BLACK);

        // One quad for 'a', after an 8 pixel space and a 16 pixel fallback.
        assert_eq!(out.len(), 6);
        assert_eq!(out[0].position[0], 8.0 + 16.0 + 2.0);
    }

    #[test]
    fn vertex_layout_matches_struct() {
        assert_eq!(std::mem::size_of::<Vertex2d>(), 32);
        assert_eq!(Vertex2d::LAYOUT.array_stride, 32);
    }
}
