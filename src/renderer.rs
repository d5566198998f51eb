//! Frame rendering: the [`Canvas`] the scene draws into on the GPU.
//!
//! A frame runs in two halves. First the scene issues canvas commands through
//! a [`GpuCanvas`], which only records state: the clear color, camera motion,
//! which meshes to draw and the projected text quads. Then [`Renderer`] encodes
//! one render pass that clears, draws the meshes with depth testing and lays
//! the text on top.

use glam::{Vec2, Vec3};
use log::trace;

use crate::assets::Assets;
use crate::camera::Camera;
use crate::color::Color;
use crate::draw2d::Draw2d;
use crate::geometry::Geometry;
use crate::gpu::GpuContext;
use crate::input::Input;
use crate::mesh_pass::{MeshCache, MeshPass};
use crate::orbit_camera::OrbitCamera;
use crate::scene::{Canvas, TextStyle};
use crate::viewport::ViewportState;

/// Screen placement of text anchored at `anchor`: pixel position of the
/// baseline start and the pixel size for a `size` world-unit font.
///
/// `None` when the anchor is behind the camera.
pub fn project_text(
    camera: &Camera,
    viewport: &ViewportState,
    anchor: Vec3,
    size: f32,
) -> Option<(f32, f32, f32)> {
    let (x, y, depth) = camera.project(anchor, viewport)?;
    Some((x, y, size * camera.pixels_per_unit(depth, viewport)))
}

/// Owns the GPU passes and the camera the garden is viewed through.
pub struct Renderer {
    assets: Assets,
    draw_2d: Draw2d,
    mesh_pass: MeshPass,
    meshes: MeshCache,
    orbit: OrbitCamera,
    viewport: ViewportState,
}

impl Renderer {
    pub fn new(gpu: &GpuContext, viewport: ViewportState) -> Self {
        Self {
            assets: Assets::new(gpu),
            draw_2d: Draw2d::new(gpu),
            mesh_pass: MeshPass::new(gpu),
            meshes: MeshCache::new(),
            orbit: OrbitCamera::for_viewport(&viewport),
            viewport,
        }
    }

    /// Font storage, for loading faces before the first frame.
    pub fn assets_mut(&mut self) -> &mut Assets {
        &mut self.assets
    }

    pub fn camera(&self) -> Camera {
        self.orbit.camera()
    }

    /// Follow a new surface size.
    pub fn resize(&mut self, gpu: &GpuContext, viewport: ViewportState) {
        self.viewport = viewport;
        self.orbit.reframe(&viewport);
        self.mesh_pass.ensure_depth_size(gpu);
    }

    /// Record a frame with `draw` and present it.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        input: &Input,
        draw: impl FnOnce(&mut dyn Canvas),
    ) -> Result<(), wgpu::SurfaceError> {
        self.draw_2d.clear();
        self.draw_2d.update_font_bind_groups(gpu, &self.assets);

        let mut canvas = GpuCanvas {
            gpu,
            input,
            viewport: self.viewport,
            orbit: &mut self.orbit,
            meshes: &mut self.meshes,
            draw_2d: &mut self.draw_2d,
            assets: &self.assets,
            clear: Color::BLACK,
        };
        draw(&mut canvas);
        let clear = canvas.clear;

        let result = self.present(gpu, clear);
        self.meshes.end_frame();
        result
    }

    fn present(&mut self, gpu: &GpuContext, clear: Color) -> Result<(), wgpu::SurfaceError> {
        let output = gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.mesh_pass.ensure_depth_size(gpu);

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Garden Frame Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Garden Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.mesh_pass.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.mesh_pass
                .render(gpu, &mut render_pass, &self.orbit.camera(), &self.meshes);
            self.draw_2d.render(gpu, &mut render_pass);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

/// [`Canvas`] backed by the GPU passes of a [`Renderer`].
pub struct GpuCanvas<'a> {
    gpu: &'a GpuContext,
    input: &'a Input,
    viewport: ViewportState,
    orbit: &'a mut OrbitCamera,
    meshes: &'a mut MeshCache,
    draw_2d: &'a mut Draw2d,
    assets: &'a Assets,
    clear: Color,
}

impl Canvas for GpuCanvas<'_> {
    fn background(&mut self, color: Color) {
        self.clear = color;
    }

    fn orbit_control(&mut self, sensitivity: Vec2, damping: f32) {
        self.orbit.update(self.input, sensitivity, damping);
    }

    fn geometry(&mut self, geometry: &Geometry) {
        self.meshes.prepare(self.gpu, geometry);
    }

    fn text(&mut self, content: &str, anchor: Vec3, style: &TextStyle) {
        let camera = self.orbit.camera();
        let Some((x, y, pixel_size)) = project_text(&camera, &self.viewport, anchor, style.size)
        else {
            trace!("text '{content}' is behind the camera");
            return;
        };
        self.draw_2d
            .text(self.assets, style.font, x, y, content, pixel_size, style.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_view_draws_text_at_world_size() {
        let vp = ViewportState::new(800.0, 600.0).unwrap();
        let camera = Camera::for_viewport(&vp);

        let (x, y, px) = project_text(&camera, &vp, Vec3::new(-60.0, -240.0, 0.0), 30.0).unwrap();

        assert!((x - 340.0).abs() < 1e-2);
        assert!((y - 60.0).abs() < 1e-2);
        assert!((px - 30.0).abs() < 1e-3);
    }

    #[test]
    fn farther_text_is_smaller() {
        let vp = ViewportState::new(800.0, 600.0).unwrap();
        let camera = Camera::for_viewport(&vp);

        let (_, _, near) = project_text(&camera, &vp, Vec3::ZERO, 20.0).unwrap();
        let (_, _, far) = project_text(&camera, &vp, Vec3::new(0.0, 0.0, -500.0), 20.0).unwrap();
        assert!(far < near);
    }

    #[test]
    fn text_behind_camera_is_skipped() {
        let vp = ViewportState::new(800.0, 600.0).unwrap();
        let camera = Camera::for_viewport(&vp);
        let behind = camera.position + Vec3::new(0.0, 0.0, 100.0);

        assert!(project_text(&camera, &vp, behind, 20.0).is_none());
    }
}
