//! Recursive branch generator.
//!
//! A tree is grown once, when it is planted: starting from the trunk, every
//! branch either ends or splits into two thinner, shorter children that lean
//! away from each other. The resulting segments are baked into one
//! [`Geometry`] that is replayed every frame.

use glam::{Quat, Vec3};
use std::f32::consts::{FRAC_PI_2, PI};

use super::canvas::Canvas;
use crate::color::Color;
use crate::geometry::{Geometry, GeometryBuilder};
use crate::random::RandomSource;

/// Length multiplier from one branching level to the next.
pub const LENGTH_SHRINK: f32 = 2.0 / 3.0;
/// Radius multiplier from one branching level to the next.
pub const RADIUS_SHRINK: f32 = 2.0 / 3.0;

/// Growth never goes deeper than this many levels below the trunk.
pub const MAX_BRANCH_LEVELS: u32 = 16;

/// Appearance parameters of one tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BranchStyle {
    pub trunk_radius: f32,
    /// A branch whose children would be shorter than this does not split.
    pub min_length: f32,
    pub base_color: Color,
    pub accent_color: Color,
    /// Branches shorter than this use the accent color.
    pub accent_threshold: f32,
    pub length_shrink: f32,
    pub radius_shrink: f32,
}

impl BranchStyle {
    /// Draw the randomized appearance of a tree planted `base_depth` away with
    /// a trunk of `trunk_height`.
    ///
    /// Samples, in order: trunk radius, minimum length, accent red, green,
    /// blue, accent threshold. The minimum length grows with depth so distant
    /// trees are coarser, and never exceeds the trunk height.
    pub fn sample(
        rng: &mut impl RandomSource,
        base_depth: f32,
        trunk_height: f32,
        base_color: Color,
    ) -> Self {
        let trunk_radius = rng.range(4.0, 6.0);
        let min_length = rng.range(4.0, 4.0 + base_depth * 0.01).min(trunk_height);
        let accent_color = Color::rgb(
            rng.range(200.0, 255.0) / 255.0,
            rng.range(0.0, 80.0) / 255.0,
            rng.range(150.0, 255.0) / 255.0,
        );
        let accent_threshold = rng.range(10.0, 80.0);

        Self {
            trunk_radius,
            min_length,
            base_color,
            accent_color,
            accent_threshold,
            length_shrink: LENGTH_SHRINK,
            radius_shrink: RADIUS_SHRINK,
        }
    }

    fn color_for(&self, length: f32) -> Color {
        if length < self.accent_threshold {
            self.accent_color
        } else {
            self.base_color
        }
    }

    fn can_split(&self) -> bool {
        self.min_length > 0.0
            && (0.0..1.0).contains(&self.length_shrink)
            && self.length_shrink > 0.0
    }
}

/// Angle between a parent branch and each of its two children.
///
/// Lands in `(π/11, π/3]`: wide splits are common, narrow ones rarer.
pub fn split_angle(rng: &mut impl RandomSource) -> f32 {
    PI / (3.0 + rng.next_unit() * 8.0)
}

/// One straight piece of a tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BranchSegment {
    pub start: Vec3,
    pub end: Vec3,
    pub radius: f32,
    pub color: Color,
    /// 0 for the trunk.
    pub level: u32,
}

impl BranchSegment {
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// A planted tree: placement, appearance and its grown segments.
#[derive(Clone, Debug)]
pub struct Tree {
    /// Base of the trunk.
    pub position: Vec3,
    pub trunk_height: f32,
    /// Unsigned planting depth the appearance was derived from.
    pub base_depth: f32,
    pub style: BranchStyle,
    segments: Vec<BranchSegment>,
    geometry: Geometry,
}

impl Tree {
    /// Grow a tree upward from `position`, drawing one split angle per split.
    pub fn grow(
        position: Vec3,
        trunk_height: f32,
        base_depth: f32,
        style: BranchStyle,
        rng: &mut impl RandomSource,
    ) -> Self {
        let mut segments = Vec::new();
        if trunk_height > 0.0 && style.trunk_radius > 0.0 {
            grow_branch(
                &mut segments,
                &style,
                rng,
                position,
                Quat::IDENTITY,
                trunk_height,
                style.trunk_radius,
                0,
            );
        }

        let mut builder = GeometryBuilder::new();
        for segment in &segments {
            builder.prism(segment.start, segment.end, segment.radius, segment.color);
        }

        Self {
            position,
            trunk_height,
            base_depth,
            style,
            segments,
            geometry: builder.build(),
        }
    }

    pub fn segments(&self) -> &[BranchSegment] {
        &self.segments
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.trunk_height > 0.0 && self.style.trunk_radius > 0.0)
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.geometry(&self.geometry);
    }
}

#[allow(clippy::too_many_arguments)]
fn grow_branch(
    segments: &mut Vec<BranchSegment>,
    style: &BranchStyle,
    rng: &mut impl RandomSource,
    start: Vec3,
    orientation: Quat,
    length: f32,
    radius: f32,
    level: u32,
) {
    // Up is -y in the garden.
    let end = start + orientation * Vec3::new(0.0, -length, 0.0);
    segments.push(BranchSegment {
        start,
        end,
        radius,
        color: style.color_for(length),
        level,
    });

    let next_length = length * style.length_shrink;
    if !style.can_split() || next_length < style.min_length || level + 1 >= MAX_BRANCH_LEVELS {
        return;
    }

    let angle = split_angle(rng);
    // Alternate the splitting plane every level so the crown fills out in 3D.
    let twisted = orientation * Quat::from_rotation_y(FRAC_PI_2);
    let next_radius = radius * style.radius_shrink;
    for lean in [angle, -angle] {
        grow_branch(
            segments,
            style,
            rng,
            end,
            twisted * Quat::from_rotation_z(lean),
            next_length,
            next_radius,
            level + 1,
        );
    }
}
