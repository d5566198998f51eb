//! CPU-side triangle geometry and the primitive builders the scene is made of.
//!
//! A [`Geometry`] is a world-space triangle list with per-vertex colors. It is
//! built once when a drawable is created and replayed every frame; the GPU
//! side uploads it lazily and keys the upload by [`GeometryId`].
//!
//! ```
//! use garden::{Color, GeometryBuilder, Vec3};
//!
//! let mut builder = GeometryBuilder::new();
//! builder.cuboid(Vec3::ZERO, Vec3::new(2.0, 1.0, 2.0), Color::WHITE);
//! let slab = builder.build();
//! assert_eq!(slab.triangle_count(), 12);
//! ```

use crate::color::Color;
use crate::mesh::Vertex3d;
use glam::Vec3;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_GEOMETRY_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a built [`Geometry`].
///
/// Clones of a geometry share its id, since they share its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GeometryId(u64);

impl GeometryId {
    fn next() -> Self {
        Self(NEXT_GEOMETRY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// World-space triangle list with per-vertex colors.
#[derive(Clone, Debug)]
pub struct Geometry {
    id: GeometryId,
    vertices: Vec<Vertex3d>,
    indices: Vec<u32>,
}

impl Geometry {
    /// Wrap raw vertex and index data. Every three indices form a triangle.
    pub fn new(vertices: Vec<Vertex3d>, indices: Vec<u32>) -> Self {
        debug_assert!(indices.len() % 3 == 0, "index count must be a multiple of 3");
        Self {
            id: GeometryId::next(),
            vertices,
            indices,
        }
    }

    /// Geometry with nothing to draw.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn id(&self) -> GeometryId {
        self.id
    }

    pub fn vertices(&self) -> &[Vertex3d] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounding box (min, max), or `None` for empty geometry.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self.vertices.iter().map(|v| Vec3::from(v.position));
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }
}

/// Accumulates primitives into a single [`Geometry`].
///
/// Degenerate primitives (zero or negative extents, non-finite input) are
/// dropped silently, so whatever a drawable asks for is always safe to render.
#[derive(Default)]
pub struct GeometryBuilder {
    vertices: Vec<Vertex3d>,
    indices: Vec<u32>,
}

impl GeometryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Axis-aligned box centered at `center` with edge lengths `size`.
    pub fn cuboid(&mut self, center: Vec3, size: Vec3, color: Color) -> &mut Self {
        if !(size.cmpgt(Vec3::ZERO).all() && center.is_finite()) {
            return self;
        }
        let h = size * 0.5;
        #[rustfmt::skip]
        let corners = [
            center + Vec3::new(-h.x, -h.y, -h.z),
            center + Vec3::new( h.x, -h.y, -h.z),
            center + Vec3::new( h.x, -h.y,  h.z),
            center + Vec3::new(-h.x, -h.y,  h.z),
            center + Vec3::new(-h.x,  h.y, -h.z),
            center + Vec3::new( h.x,  h.y, -h.z),
            center + Vec3::new( h.x,  h.y,  h.z),
            center + Vec3::new(-h.x,  h.y,  h.z),
        ];
        self.hexahedron(corners, color);
        self
    }

    /// Square prism of half-width `radius` running from `start` to `end`.
    pub fn prism(&mut self, start: Vec3, end: Vec3, radius: f32, color: Color) -> &mut Self {
        let axis = end - start;
        if !(radius > 0.0 && axis.length_squared() > 0.0 && axis.is_finite() && start.is_finite())
        {
            return self;
        }
        let (u, v) = axis.normalize().any_orthonormal_pair();
        let (u, v) = (u * radius, v * radius);
        let ring = [u + v, -u + v, -u - v, u - v];
        let corners = [
            start + ring[0],
            start + ring[1],
            start + ring[2],
            start + ring[3],
            end + ring[0],
            end + ring[1],
            end + ring[2],
            end + ring[3],
        ];
        self.hexahedron(corners, color);
        self
    }

    /// Quad from four corners given in winding order, one color per corner.
    pub fn quad(&mut self, corners: [Vec3; 4], colors: [Color; 4]) -> &mut Self {
        if !corners.iter().all(|c| c.is_finite()) {
            return self;
        }
        let base = self.vertices.len() as u32;
        self.vertices.extend(
            corners
                .iter()
                .zip(colors.iter())
                .map(|(&p, &c)| Vertex3d::new(p, c)),
        );
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
        self
    }

    /// Eight corners: a bottom ring (0..4) and a matching top ring (4..8).
    fn hexahedron(&mut self, corners: [Vec3; 8], color: Color) {
        let base = self.vertices.len() as u32;
        self.vertices
            .extend(corners.iter().map(|&p| Vertex3d::new(p, color)));

        // Sides
        for i in 0..4u32 {
            let next = (i + 1) % 4;
            let (a, b, c, d) = (base + i, base + next, base + next + 4, base + i + 4);
            self.indices.extend_from_slice(&[a, b, c, c, d, a]);
        }
        // Caps
        self.indices
            .extend_from_slice(&[base, base + 2, base + 1, base + 2, base, base + 3]);
        self.indices.extend_from_slice(&[
            base + 4,
            base + 5,
            base + 6,
            base + 6,
            base + 7,
            base + 4,
        ]);
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn build(self) -> Geometry {
        Geometry::new(self.vertices, self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_shared_by_clones() {
        let a = Geometry::empty();
        let b = Geometry::empty();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
    }

    #[test]
    fn cuboid_bounds() {
        let mut builder = GeometryBuilder::new();
        builder.cuboid(Vec3::new(0.0, 50.0, 0.0), Vec3::new(10.0, 100.0, 20.0), Color::WHITE);
        let geom = builder.build();

        assert_eq!(geom.vertices().len(), 8);
        assert_eq!(geom.triangle_count(), 12);
        let (min, max) = geom.bounds().unwrap();
        assert_eq!(min, Vec3::new(-5.0, 0.0, -10.0));
        assert_eq!(max, Vec3::new(5.0, 100.0, 10.0));
    }

    #[test]
    fn degenerate_primitives_are_dropped() {
        let mut builder = GeometryBuilder::new();
        builder
            .cuboid(Vec3::ZERO, Vec3::new(0.0, 1.0, 1.0), Color::WHITE)
            .cuboid(Vec3::ZERO, Vec3::new(1.0, -1.0, 1.0), Color::WHITE)
            .prism(Vec3::ZERO, Vec3::ZERO, 1.0, Color::WHITE)
            .prism(Vec3::ZERO, Vec3::Y, 0.0, Color::WHITE)
            .quad([Vec3::NAN, Vec3::X, Vec3::Y, Vec3::Z], [Color::WHITE; 4]);
        assert!(builder.is_empty());
        let geom = builder.build();
        assert!(geom.is_empty());
        assert!(geom.bounds().is_none());
    }

    #[test]
    fn prism_spans_its_axis() {
        let mut builder = GeometryBuilder::new();
        builder.prism(Vec3::ZERO, Vec3::new(0.0, -10.0, 0.0), 1.0, Color::BLACK);
        let geom = builder.build();

        assert_eq!(geom.triangle_count(), 12);
        let (min, max) = geom.bounds().unwrap();
        assert!((min.y + 10.0).abs() < 1e-5);
        assert!(max.y.abs() < 1e-5);
        // The square cross-section reaches sqrt(2) * radius at its corners.
        assert!(max.x <= 2.0f32.sqrt() + 1e-5);
        assert!(min.x >= -(2.0f32.sqrt()) - 1e-5);
    }

    #[test]
    fn quad_keeps_corner_colors() {
        let mut builder = GeometryBuilder::new();
        let top = Color::WHITE;
        let bottom = Color::BLACK;
        builder.quad(
            [Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y],
            [top, top, bottom, bottom],
        );
        let geom = builder.build();

        assert_eq!(geom.triangle_count(), 2);
        assert_eq!(geom.vertices()[0].color, top.to_linear());
        assert_eq!(geom.vertices()[3].color, bottom.to_linear());
    }

    #[test]
    fn indices_stay_in_range_across_primitives() {
        let mut builder = GeometryBuilder::new();
        builder
            .cuboid(Vec3::ZERO, Vec3::ONE, Color::WHITE)
            .prism(Vec3::ZERO, Vec3::Y, 0.5, Color::WHITE)
            .quad([Vec3::ZERO, Vec3::X, Vec3::ONE, Vec3::Y], [Color::WHITE; 4]);
        let geom = builder.build();
        let count = geom.vertices().len() as u32;
        assert!(geom.indices().iter().all(|&i| i < count));
    }
}
