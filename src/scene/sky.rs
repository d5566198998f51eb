//! Skybox: gradient panels standing around the garden.
//!
//! Each panel is the same rectangle pushed back to the edge of the world and
//! turned about the vertical axis by a multiple of a quarter turn, so the four
//! of them face the center from every cardinal direction.

use glam::{Quat, Vec3};

use super::canvas::Canvas;
use crate::color::Color;
use crate::geometry::{Geometry, GeometryBuilder};
use crate::viewport::ViewportState;

/// Quarter-turn multiples of the four panels, in construction order.
pub const SKY_ORIENTATIONS: [i32; 4] = [2, 1, 0, -1];

/// Two-color gradient running down a panel, `top` at the upper edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gradient {
    pub top: Color,
    pub bottom: Color,
}

impl Gradient {
    pub fn vertical(top: Color, bottom: Color) -> Self {
        Self { top, bottom }
    }

    /// Corner colors for corners listed top-left, top-right, bottom-right, bottom-left.
    fn corner_colors(&self) -> [Color; 4] {
        [self.top, self.top, self.bottom, self.bottom]
    }
}

/// One wall of the skybox.
#[derive(Clone, Debug)]
pub struct SkyPanel {
    pub width: f32,
    pub height: f32,
    /// Distance the panel is pushed back from the origin before turning.
    pub offset: f32,
    /// Quarter turns about the vertical axis.
    pub orientation: i32,
    /// World y of the panel's lower edge.
    pub base_level: f32,
    pub gradient: Gradient,
    geometry: Geometry,
}

impl SkyPanel {
    pub fn new(
        width: f32,
        height: f32,
        offset: f32,
        orientation: i32,
        base_level: f32,
        gradient: Gradient,
    ) -> Self {
        let rotation = Quat::from_rotation_y(quarter_turns(orientation));
        let half = width / 2.0;
        let top = base_level - height;
        let corners = [
            Vec3::new(-half, top, -offset),
            Vec3::new(half, top, -offset),
            Vec3::new(half, base_level, -offset),
            Vec3::new(-half, base_level, -offset),
        ]
        .map(|corner| rotation * corner);

        let mut builder = GeometryBuilder::new();
        if width > 0.0 && height > 0.0 {
            builder.quad(corners, gradient.corner_colors());
        }

        Self {
            width,
            height,
            offset,
            orientation,
            base_level,
            gradient,
            geometry: builder.build(),
        }
    }

    /// Rotation about the vertical axis, in radians.
    pub fn rotation(&self) -> f32 {
        quarter_turns(self.orientation)
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.geometry(&self.geometry);
    }
}

fn quarter_turns(orientation: i32) -> f32 {
    orientation as f32 * std::f32::consts::FRAC_PI_2
}

/// The four skybox panels for `viewport`, fading from `background` to black.
pub fn skybox(viewport: &ViewportState, background: Color) -> Vec<SkyPanel> {
    let gradient = Gradient::vertical(background, Color::BLACK);
    SKY_ORIENTATIONS
        .iter()
        .map(|&orientation| {
            SkyPanel::new(
                viewport.skybox_width(),
                viewport.max_depth_offset() / 2.0,
                viewport.world_extent(),
                orientation,
                viewport.ground_level(),
                gradient,
            )
        })
        .collect()
}
