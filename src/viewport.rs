/// Nearest depth (in world units from the origin) at which a tree may be planted.
///
/// Also the base of the ground and skybox extent.
pub const MIN_TREE_DEPTH: f32 = 200.0;

/// Current canvas size in pixels and the depth bounds derived from it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    pub width: f32,
    pub height: f32,
}

impl ViewportState {
    /// Returns `None` unless both dimensions are positive.
    pub fn new(width: f32, height: f32) -> Option<Self> {
        (width > 0.0 && height > 0.0).then_some(Self { width, height })
    }

    /// Physical window size, as reported by winit.
    pub fn from_physical(size: winit::dpi::PhysicalSize<u32>) -> Option<Self> {
        Self::new(size.width as f32, size.height as f32)
    }

    /// Farthest extra depth a tree may be planted beyond [`MIN_TREE_DEPTH`].
    pub fn max_depth_offset(&self) -> f32 {
        self.height * 6.0
    }

    /// Half-extent of the world: the distance from the origin to the skybox walls.
    pub fn world_extent(&self) -> f32 {
        MIN_TREE_DEPTH + self.max_depth_offset()
    }

    /// Edge length of the ground slab and of every skybox panel.
    pub fn skybox_width(&self) -> f32 {
        2.0 * self.world_extent()
    }

    /// World y of the ground surface. The origin sits at the viewport
    /// center and y grows downward, so this is the bottom edge of the view.
    pub fn ground_level(&self) -> f32 {
        self.height / 2.0
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}
