use glam::{Vec2, Vec3};
use winit::event::MouseButton;

use crate::camera::{Camera, DEFAULT_FOV};
use crate::input::Input;
use crate::viewport::ViewportState;

const ELEVATION_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Velocities below this (radians per frame) snap to rest.
const REST_VELOCITY: f32 = 1e-5;

/// A camera controller that orbits around the garden's center.
///
/// Dragging with the left mouse button rotates the view; the angular velocity
/// of the drag carries on after release and decays by the damping factor every
/// frame. The scroll wheel zooms.
///
/// # Example
/// ```ignore
/// let mut orbit = OrbitCamera::for_viewport(&viewport);
///
/// // Once per frame:
/// orbit.update(&input, Vec2::new(5.0, 5.0), 0.05);
/// let camera = orbit.camera();
/// ```
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Distance from target.
    pub distance: f32,
    /// Horizontal angle in radians (yaw).
    pub azimuth: f32,
    /// Vertical angle in radians (pitch); positive looks down on the garden.
    pub elevation: f32,
    /// Field of view in radians.
    pub fov: f32,
    /// Fraction of the current distance covered by one scroll line.
    pub zoom_sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    velocity: Vec2,
    viewport: ViewportState,
}

impl OrbitCamera {
    /// Orbit controller starting from the default view of `viewport`.
    pub fn for_viewport(viewport: &ViewportState) -> Self {
        let distance = Camera::default_distance(viewport);
        Self {
            target: Vec3::ZERO,
            distance,
            azimuth: 0.0,
            elevation: 0.0,
            fov: DEFAULT_FOV,
            zoom_sensitivity: 0.1,
            min_distance: distance * 0.2,
            max_distance: distance * 8.0,
            velocity: Vec2::ZERO,
            viewport: *viewport,
        }
    }

    /// Adopt a new viewport, keeping the viewing angles but restoring the
    /// default distance for the new size.
    pub fn reframe(&mut self, viewport: &ViewportState) {
        let angles = (self.azimuth, self.elevation);
        *self = Self::for_viewport(viewport);
        (self.azimuth, self.elevation) = angles;
    }

    /// Current angular velocity (azimuth, elevation) in radians per frame.
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Apply one frame of interaction.
    ///
    /// `sensitivity` scales mouse motion (a drag across the shorter side of the
    /// viewport turns `sensitivity` radians); `damping` is the fraction of the
    /// angular velocity lost per frame once the button is released.
    pub fn update(&mut self, input: &Input, sensitivity: Vec2, damping: f32) {
        let scale = self.viewport.width.min(self.viewport.height);

        if input.mouse_down(MouseButton::Left) {
            let delta = input.mouse_delta();
            self.velocity = Vec2::new(
                -sensitivity.x * delta.x / scale,
                sensitivity.y * delta.y / scale,
            );
        } else {
            self.velocity *= 1.0 - damping.clamp(0.0, 1.0);
            if self.velocity.length() < REST_VELOCITY {
                self.velocity = Vec2::ZERO;
            }
        }

        self.azimuth += self.velocity.x;
        self.elevation = (self.elevation + self.velocity.y).clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);

        let scroll = input.scroll_delta();
        if scroll.y.abs() > 0.0 {
            self.distance *= 1.0 - scroll.y * self.zoom_sensitivity;
            self.distance = self.distance.clamp(self.min_distance, self.max_distance);
        }
    }

    /// Get the current camera state.
    pub fn camera(&self) -> Camera {
        // Spherical to Cartesian; y is negated because world y grows downward.
        let offset = Vec3::new(
            self.distance * self.elevation.cos() * self.azimuth.sin(),
            -self.distance * self.elevation.sin(),
            self.distance * self.elevation.cos() * self.azimuth.cos(),
        );

        Camera {
            position: self.target + offset,
            target: self.target,
            fov: self.fov,
            far: Camera::far_plane(&self.viewport, self.distance),
            ..Camera::for_viewport(&self.viewport)
        }
    }
}
