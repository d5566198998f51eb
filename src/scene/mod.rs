//! Procedural garden composition.
//!
//! A [`SceneComposer`] owns the scene: two lines of heading text, a ground
//! slab, four gradient sky panels and forty recursively grown trees. The
//! scene is rebuilt from scratch whenever the viewport changes and replayed
//! every frame through a [`Canvas`].
//!
//! World coordinates put the origin at the center of the view with y growing
//! downward, so "up" is negative y and the ground sits at `height / 2`.
//!
//! ```ignore
//! use garden::*;
//!
//! let mut composer = SceneComposer::new(SceneStyle::default(), fonts, rng);
//! composer.initialize(&mut assets, viewport)?;
//! composer.render_frame(&mut canvas);
//! ```

mod branch;
mod canvas;
mod composer;
mod drawable;
mod ground;
mod sky;
mod style;
mod text;

pub use branch::{
    BranchSegment, BranchStyle, LENGTH_SHRINK, MAX_BRANCH_LEVELS, RADIUS_SHRINK, Tree,
    split_angle,
};
pub use canvas::{Canvas, FontStyle, TextStyle};
pub use composer::{
    ORBIT_DAMPING, ORBIT_SENSITIVITY, ORIENTATIONS, Placement, PlacementSet, SceneComposer,
    SceneObjects, TREES_PER_QUADRANT, compose_scene, sample_placement,
};
pub use drawable::{Drawable, DrawableKind};
pub use ground::{GROUND_THICKNESS, Ground};
pub use sky::{Gradient, SKY_ORIENTATIONS, SkyPanel, skybox};
pub use style::SceneStyle;
pub use text::{SUBTITLE_GAP, TitleText, centered_start_x, heading};

