use glam::Vec3;

use super::canvas::Canvas;
use crate::color::Color;
use crate::geometry::{Geometry, GeometryBuilder};
use crate::viewport::ViewportState;

/// Thickness of the ground slab in world units.
pub const GROUND_THICKNESS: f32 = 100.0;

/// A flat-colored slab whose top face is the ground level.
#[derive(Clone, Debug)]
pub struct Ground {
    /// Extent along x.
    pub width: f32,
    /// Extent along z.
    pub length: f32,
    /// Extent along y, below the top face.
    pub thickness: f32,
    /// Center of the top face.
    pub translation: Vec3,
    pub color: Color,
    geometry: Geometry,
}

impl Ground {
    pub fn new(width: f32, length: f32, thickness: f32, translation: Vec3, color: Color) -> Self {
        let mut builder = GeometryBuilder::new();
        builder.cuboid(
            translation + Vec3::new(0.0, thickness / 2.0, 0.0),
            Vec3::new(width, thickness, length),
            color,
        );
        Self {
            width,
            length,
            thickness,
            translation,
            color,
            geometry: builder.build(),
        }
    }

    /// Ground covering the whole skybox floor of `viewport`.
    pub fn for_viewport(viewport: &ViewportState, color: Color) -> Self {
        let size = viewport.skybox_width();
        Self::new(
            size,
            size,
            GROUND_THICKNESS,
            Vec3::new(0.0, viewport.ground_level(), 0.0),
            color,
        )
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.length > 0.0 && self.thickness > 0.0)
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.geometry(&self.geometry);
    }
}
