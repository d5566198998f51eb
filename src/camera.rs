use glam::{Mat4, Vec3, Vec4};

use crate::viewport::ViewportState;

/// Default vertical field of view: 60 degrees.
pub const DEFAULT_FOV: f32 = std::f32::consts::FRAC_PI_3;

/// A perspective camera for the garden's canvas-centered world.
///
/// The world origin sits at the center of the canvas and y grows downward,
/// so [`Camera::projection_matrix`] flips the y axis when going to clip space.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov: f32, // radians
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Camera distance at which one world unit on the z = 0 plane covers one pixel.
    pub fn default_distance(viewport: &ViewportState) -> f32 {
        (viewport.height / 2.0) / (DEFAULT_FOV / 2.0).tan()
    }

    /// The default view of a viewport: on the +z axis, looking at the origin,
    /// with the far plane pushed out past the skybox walls.
    pub fn for_viewport(viewport: &ViewportState) -> Self {
        let distance = Self::default_distance(viewport);
        Self {
            position: Vec3::new(0.0, 0.0, distance),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: DEFAULT_FOV,
            near: distance / 10.0,
            far: Self::far_plane(viewport, distance),
        }
    }

    /// Far plane covering the skybox corners seen from `distance` away.
    pub fn far_plane(viewport: &ViewportState, distance: f32) -> f32 {
        (distance * 10.0).max(distance + viewport.skybox_width())
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Perspective projection with the y axis flipped for the y-down world.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::from_scale(Vec3::new(1.0, -1.0, 1.0))
            * Mat4::perspective_rh(self.fov, aspect, self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Project a world point to pixel coordinates (origin top-left, y down).
    ///
    /// Returns the pixel position and the view-space depth, or `None` when
    /// the point is at or behind the near plane.
    pub fn project(&self, point: Vec3, viewport: &ViewportState) -> Option<(f32, f32, f32)> {
        let depth = (self.view_matrix() * point.extend(1.0)).z * -1.0;
        if depth < self.near {
            return None;
        }
        let clip: Vec4 = self.view_projection(viewport.aspect()) * point.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        let x = (ndc.x + 1.0) * 0.5 * viewport.width;
        let y = (1.0 - ndc.y) * 0.5 * viewport.height;
        Some((x, y, depth))
    }

    /// Pixels covered by one world unit at the given view-space depth.
    pub fn pixels_per_unit(&self, depth: f32, viewport: &ViewportState) -> f32 {
        viewport.height / (2.0 * depth * (self.fov / 2.0).tan())
    }
}
