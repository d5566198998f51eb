//! # Garden
//!
//! **A procedurally composed 3D garden that regrows whenever its window changes.**
//!
//! Forty recursively branching trees are scattered over a ground slab, four
//! gradient panels close the horizon, and a heading floats above it all. Drag
//! to orbit, scroll to zoom, resize the window (or press `R`) to grow a new
//! garden.
//!
//! ## Quick Start
//!
//! ```no_run
//! use garden::*;
//!
//! fn main() -> Result<()> {
//!     run(AppConfig::new()
//!         .title("Garden")
//!         .size(1280, 720)
//!         .fonts("fonts/Bold.ttf", "fonts/Regular.ttf"))
//! }
//! ```
//!
//! ## Layout
//!
//! - [`scene`] composes the garden and replays it through a [`Canvas`]. It
//!   needs no GPU and is driven entirely by an injected [`RandomSource`].
//! - The rest of the crate is the host: a winit event loop, a wgpu renderer
//!   implementing [`Canvas`], and fontdue glyph atlases.

mod app;
mod assets;
mod camera;
mod color;
mod config;
mod draw2d;
mod error;
mod geometry;
mod gpu;
mod input;
mod mesh;
mod mesh_pass;
mod orbit_camera;
mod random;
mod renderer;
pub mod scene;
mod viewport;

pub use app::run;
pub use assets::{ATLAS_FONT_SIZE, Assets, FontAtlas, FontLoader, GlyphInfo};
pub use camera::{Camera, DEFAULT_FOV};
pub use color::Color;
pub use config::{AppConfig, FontPaths};
pub use draw2d::{Draw2d, Vertex2d};
pub use error::{GardenError, Result};
pub use geometry::{Geometry, GeometryBuilder, GeometryId};
pub use gpu::GpuContext;
pub use input::Input;
pub use mesh::{Mesh, Vertex3d};
pub use mesh_pass::{CameraUniforms, MeshCache, MeshPass};
pub use orbit_camera::OrbitCamera;
pub use random::RandomSource;
pub use renderer::{GpuCanvas, Renderer, project_text};
pub use scene::{
    Canvas, Drawable, DrawableKind, FontStyle, SceneComposer, SceneObjects, SceneStyle, TextStyle,
};
pub use viewport::{MIN_TREE_DEPTH, ViewportState};

// Re-export glam math types for convenience
pub use glam::{Quat, Vec2, Vec3};

// Re-export commonly used winit types for convenience
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;
