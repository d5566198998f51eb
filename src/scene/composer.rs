//! The garden's lifecycle: load fonts, compose the scene, rebuild it on
//! resize, and replay it every frame.

use glam::{Vec2, Vec3};
use log::{debug, info};

use super::branch::{BranchStyle, Tree};
use super::canvas::{Canvas, FontStyle};
use super::drawable::{Drawable, DrawableKind};
use super::ground::Ground;
use super::sky::skybox;
use super::style::SceneStyle;
use super::text::heading;
use crate::assets::FontLoader;
use crate::config::FontPaths;
use crate::error::{GardenError, Result};
use crate::random::RandomSource;
use crate::viewport::{MIN_TREE_DEPTH, ViewportState};

/// Trees planted in each front/back, left/right quadrant.
pub const TREES_PER_QUADRANT: usize = 10;

/// Depth and horizontal signs, in the order quadrants are filled.
pub const ORIENTATIONS: [f32; 2] = [-1.0, 1.0];

/// Orbit control requested every frame.
pub const ORBIT_SENSITIVITY: Vec2 = Vec2::new(5.0, 5.0);
pub const ORBIT_DAMPING: f32 = 0.05;

/// Ordered drawables of one composed scene. Order is draw order.
#[derive(Clone, Debug, Default)]
pub struct SceneObjects {
    drawables: Vec<Drawable>,
}

impl SceneObjects {
    pub fn push(&mut self, drawable: Drawable) {
        self.drawables.push(drawable);
    }

    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Drawable> {
        self.drawables.iter()
    }

    pub fn count(&self, kind: DrawableKind) -> usize {
        self.drawables.iter().filter(|d| d.kind() == kind).count()
    }

    pub fn trees(&self) -> impl Iterator<Item = &Tree> {
        self.drawables.iter().filter_map(Drawable::as_tree)
    }
}

impl<'a> IntoIterator for &'a SceneObjects {
    type Item = &'a Drawable;
    type IntoIter = std::slice::Iter<'a, Drawable>;

    fn into_iter(self) -> Self::IntoIter {
        self.drawables.iter()
    }
}

/// Positions accepted so far during one rebuild.
///
/// Only rejects positions that compare exactly equal; trees may still end up
/// arbitrarily close together.
#[derive(Clone, Debug, Default)]
pub struct PlacementSet {
    accepted: Vec<Vec3>,
    rejected: usize,
}

impl PlacementSet {
    pub fn contains(&self, position: Vec3) -> bool {
        self.accepted.contains(&position)
    }

    /// Returns false, and records a rejection, if `position` was already taken.
    pub fn insert(&mut self, position: Vec3) -> bool {
        if self.contains(position) {
            self.rejected += 1;
            return false;
        }
        self.accepted.push(position);
        true
    }

    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    /// Duplicate draws thrown away so far.
    pub fn rejected(&self) -> usize {
        self.rejected
    }
}

/// Where a tree goes and how tall its trunk is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    pub trunk_height: f32,
    /// Unsigned distance from the center plane.
    pub base_depth: f32,
}

/// Draw a tree placement in the quadrant given by the two signs, redrawing
/// until the position is not already in `placed`.
pub fn sample_placement(
    viewport: &ViewportState,
    depth_sign: f32,
    horizontal_sign: f32,
    rng: &mut impl RandomSource,
    placed: &mut PlacementSet,
) -> Placement {
    loop {
        let trunk_height = rng.range(100.0, 300.0);
        let base_depth = rng.range(MIN_TREE_DEPTH, MIN_TREE_DEPTH + viewport.max_depth_offset());
        let x = rng.range(0.0, 2.0 * viewport.width) * horizontal_sign;
        let position = Vec3::new(x, viewport.ground_level(), base_depth * depth_sign);

        if placed.insert(position) {
            return Placement {
                position,
                trunk_height,
                base_depth,
            };
        }
    }
}

/// Build a complete scene for `viewport`: heading, ground, skybox, then trees.
pub fn compose_scene(
    viewport: &ViewportState,
    style: &SceneStyle,
    rng: &mut impl RandomSource,
) -> SceneObjects {
    let mut objects = SceneObjects::default();

    for text in heading(viewport, style) {
        objects.push(Drawable::Text(text));
    }
    objects.push(Drawable::Ground(Ground::for_viewport(viewport, style.ground)));
    for panel in skybox(viewport, style.background) {
        objects.push(Drawable::SkyPanel(panel));
    }

    let mut placed = PlacementSet::default();
    let mut segments = 0;
    for depth_sign in ORIENTATIONS {
        for horizontal_sign in ORIENTATIONS {
            for _ in 0..TREES_PER_QUADRANT {
                let placement =
                    sample_placement(viewport, depth_sign, horizontal_sign, rng, &mut placed);
                let branch_style = BranchStyle::sample(
                    rng,
                    placement.base_depth,
                    placement.trunk_height,
                    style.trunk,
                );
                let tree = Tree::grow(
                    placement.position,
                    placement.trunk_height,
                    placement.base_depth,
                    branch_style,
                    rng,
                );
                segments += tree.segments().len();
                objects.push(Drawable::Branch(tree));
            }
        }
    }

    debug!(
        "composed {} drawables for {}x{}: {} trees, {} branch segments, {} rejected placements",
        objects.len(),
        viewport.width,
        viewport.height,
        placed.len(),
        segments,
        placed.rejected()
    );
    objects
}

/// Owns the garden scene and rebuilds it whenever the viewport changes.
pub struct SceneComposer<R> {
    style: SceneStyle,
    fonts: FontPaths,
    rng: R,
    /// Size the current scene was composed for; `None` until initialized.
    viewport: Option<ViewportState>,
    objects: SceneObjects,
}

impl<R: RandomSource> SceneComposer<R> {
    pub fn new(style: SceneStyle, fonts: FontPaths, rng: R) -> Self {
        Self {
            style,
            fonts,
            rng,
            viewport: None,
            objects: SceneObjects::default(),
        }
    }

    /// Load both font faces and build the first scene.
    ///
    /// On a font error nothing changes and the composer stays uninitialized.
    pub fn initialize(
        &mut self,
        loader: &mut impl FontLoader,
        viewport: ViewportState,
    ) -> Result<()> {
        loader.load_font(FontStyle::Bold, &self.fonts.bold)?;
        loader.load_font(FontStyle::Regular, &self.fonts.regular)?;

        self.rebuild(viewport);
        info!(
            "garden ready at {}x{} ({} drawables)",
            viewport.width,
            viewport.height,
            self.objects.len()
        );
        Ok(())
    }

    /// Throw away the current scene and compose a fresh one for `viewport`.
    pub fn on_viewport_resize(&mut self, viewport: ViewportState) -> Result<()> {
        if !self.is_ready() {
            return Err(GardenError::NotInitialized);
        }
        info!("viewport resized to {}x{}", viewport.width, viewport.height);
        self.rebuild(viewport);
        Ok(())
    }

    /// Recompose at the current size with new random draws.
    pub fn regenerate(&mut self) -> Result<()> {
        let viewport = self.viewport().ok_or(GardenError::NotInitialized)?;
        self.rebuild(viewport);
        Ok(())
    }

    /// Clear, request orbit control, then draw every entity in order.
    pub fn render_frame(&self, canvas: &mut dyn Canvas) {
        if !self.is_ready() {
            return;
        }
        canvas.background(self.style.background);
        canvas.orbit_control(ORBIT_SENSITIVITY, ORBIT_DAMPING);
        for drawable in &self.objects {
            drawable.draw(canvas);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.viewport.is_some()
    }

    pub fn viewport(&self) -> Option<ViewportState> {
        self.viewport
    }

    /// The current scene; empty before initialization.
    pub fn objects(&self) -> &SceneObjects {
        &self.objects
    }

    pub fn style(&self) -> &SceneStyle {
        &self.style
    }

    fn rebuild(&mut self, viewport: ViewportState) {
        self.objects = compose_scene(&viewport, &self.style, &mut self.rng);
        self.viewport = Some(viewport);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::random::SequenceSource;
    use crate::scene::canvas::{Command, RecordingCanvas};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::path::{Path, PathBuf};

    #[derive(Default)]
    struct FakeLoader {
        loaded: Vec<(FontStyle, PathBuf)>,
        fail_on: Option<FontStyle>,
    }

    impl FontLoader for FakeLoader {
        fn load_font(&mut self, style: FontStyle, path: &Path) -> Result<()> {
            if self.fail_on == Some(style) {
                return Err(GardenError::FontRead {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
                });
            }
            self.loaded.push((style, path.to_path_buf()));
            Ok(())
        }
    }

    fn fonts() -> FontPaths {
        FontPaths {
            bold: PathBuf::from("fonts/bold.ttf"),
            regular: PathBuf::from("fonts/regular.ttf"),
        }
    }

    fn vp(w: f32, h: f32) -> ViewportState {
        ViewportState::new(w, h).unwrap()
    }

    fn ready_composer(seed: u64, viewport: ViewportState) -> SceneComposer<StdRng> {
        let mut composer =
            SceneComposer::new(SceneStyle::default(), fonts(), StdRng::seed_from_u64(seed));
        composer
            .initialize(&mut FakeLoader::default(), viewport)
            .unwrap();
        composer
    }

    fn tree_positions(objects: &SceneObjects) -> Vec<Vec3> {
        objects.trees().map(|t| t.position).collect()
    }

    #[test]
    fn every_size_gets_the_same_inventory() {
        let mut rng = StdRng::seed_from_u64(1);
        for (w, h) in [(1.0, 1.0), (320.0, 200.0), (800.0, 600.0), (600.0, 1400.0)] {
            let objects = compose_scene(&vp(w, h), &SceneStyle::default(), &mut rng);
            assert_eq!(objects.len(), 47);
            assert_eq!(objects.count(DrawableKind::Text), 2);
            assert_eq!(objects.count(DrawableKind::Ground), 1);
            assert_eq!(objects.count(DrawableKind::SkyPanel), 4);
            assert_eq!(objects.count(DrawableKind::Branch), 40);
        }
    }

    #[test]
    fn insertion_order_is_text_ground_sky_trees() {
        let mut rng = StdRng::seed_from_u64(2);
        let objects = compose_scene(&vp(800.0, 600.0), &SceneStyle::default(), &mut rng);
        let kinds: Vec<DrawableKind> = objects.iter().map(Drawable::kind).collect();

        assert_eq!(&kinds[..2], &[DrawableKind::Text; 2]);
        assert_eq!(kinds[2], DrawableKind::Ground);
        assert_eq!(&kinds[3..7], &[DrawableKind::SkyPanel; 4]);
        assert!(kinds[7..].iter().all(|&k| k == DrawableKind::Branch));
    }

    #[test]
    fn tree_positions_are_unique() {
        let mut rng = StdRng::seed_from_u64(3);
        let objects = compose_scene(&vp(1280.0, 720.0), &SceneStyle::default(), &mut rng);
        let positions = tree_positions(&objects);
        for (i, a) in positions.iter().enumerate() {
            assert!(positions[i + 1..].iter().all(|b| a != b));
        }
    }

    #[test]
    fn trees_fill_quadrants_in_order() {
        let viewport = vp(800.0, 600.0);
        let mut rng = StdRng::seed_from_u64(4);
        let objects = compose_scene(&viewport, &SceneStyle::default(), &mut rng);
        let trees: Vec<&Tree> = objects.trees().collect();

        let quadrants = [(-1.0, -1.0), (-1.0, 1.0), (1.0, -1.0), (1.0, 1.0)];
        for (chunk, (depth_sign, horizontal_sign)) in trees.chunks(TREES_PER_QUADRANT).zip(quadrants) {
            for tree in chunk {
                let p = tree.position;
                assert!(p.z * depth_sign >= MIN_TREE_DEPTH);
                assert!(p.z * depth_sign < MIN_TREE_DEPTH + viewport.max_depth_offset());
                assert!(p.x * horizontal_sign >= 0.0);
                assert!(p.x.abs() < 2.0 * viewport.width);
                assert_eq!(p.y, viewport.ground_level());
                assert!((100.0..300.0).contains(&tree.trunk_height));
            }
        }
    }

    #[test]
    fn min_length_never_exceeds_trunk_height() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..3 {
            let objects = compose_scene(&vp(1920.0, 1080.0), &SceneStyle::default(), &mut rng);
            for tree in objects.trees() {
                assert!(tree.style.min_length <= tree.trunk_height);
                assert_eq!(tree.style.base_color, SceneStyle::default().trunk);
            }
        }
    }

    #[test]
    fn duplicate_positions_are_redrawn() {
        let viewport = vp(800.0, 600.0);
        // First triple lands on (400, 300, -2000), which is already taken.
        let mut rng = SequenceSource::new([0.5, 0.5, 0.25, 0.75, 0.75, 0.75]);
        let mut placed = PlacementSet::default();
        assert!(placed.insert(Vec3::new(400.0, 300.0, -2000.0)));

        let placement = sample_placement(&viewport, -1.0, 1.0, &mut rng, &mut placed);

        assert_eq!(placement.position, Vec3::new(1200.0, 300.0, -2900.0));
        assert_eq!(placement.trunk_height, 250.0);
        assert_eq!(placement.base_depth, 2900.0);
        assert_eq!(placed.len(), 2);
        assert_eq!(placed.rejected(), 1);
    }

    #[test]
    fn full_hd_scene_dimensions() {
        let viewport = vp(1920.0, 1080.0);
        let composer = ready_composer(6, viewport);
        let objects = composer.objects();

        assert_eq!(viewport.max_depth_offset(), 6480.0);
        let ground = objects
            .iter()
            .find_map(|d| match d {
                Drawable::Ground(g) => Some(g),
                _ => None,
            })
            .unwrap();
        assert_eq!(ground.width, 13360.0);
        assert_eq!(ground.length, 13360.0);

        let rotations: Vec<f32> = objects
            .iter()
            .filter_map(|d| match d {
                Drawable::SkyPanel(p) => Some(p.rotation()),
                _ => None,
            })
            .collect();
        use std::f32::consts::{FRAC_PI_2, PI};
        assert_eq!(rotations, vec![PI, FRAC_PI_2, 0.0, -FRAC_PI_2]);
    }

    #[test]
    fn resize_replaces_the_whole_scene() {
        let mut composer = ready_composer(7, vp(800.0, 600.0));
        let before = tree_positions(composer.objects());
        assert_eq!(composer.objects().len(), 47);

        composer.on_viewport_resize(vp(1024.0, 768.0)).unwrap();
        let after = tree_positions(composer.objects());

        assert_eq!(composer.objects().len(), 47);
        assert_eq!(composer.viewport(), Some(vp(1024.0, 768.0)));
        assert!(after.iter().all(|p| !before.contains(p)));
        assert!(after.iter().all(|p| p.y == 384.0));
    }

    #[test]
    fn same_size_resize_rerolls_positions() {
        let mut composer = ready_composer(8, vp(800.0, 600.0));
        let before = tree_positions(composer.objects());

        composer.on_viewport_resize(vp(800.0, 600.0)).unwrap();

        assert_ne!(tree_positions(composer.objects()), before);
    }

    #[test]
    fn regenerate_keeps_size() {
        let mut composer = ready_composer(9, vp(640.0, 480.0));
        let before = tree_positions(composer.objects());

        composer.regenerate().unwrap();

        assert_eq!(composer.viewport(), Some(vp(640.0, 480.0)));
        assert_eq!(composer.objects().len(), 47);
        assert_ne!(tree_positions(composer.objects()), before);
    }

    #[test]
    fn render_frame_order() {
        let composer = ready_composer(10, vp(800.0, 600.0));
        let mut canvas = RecordingCanvas::default();
        let before = tree_positions(composer.objects());

        composer.render_frame(&mut canvas);

        let commands = &canvas.commands;
        assert_eq!(commands[0], Command::Background(composer.style().background));
        assert_eq!(commands[1], Command::OrbitControl(Vec2::new(5.0, 5.0), 0.05));
        assert!(matches!(&commands[2], Command::Text(s, _, _) if s == "Garden"));
        assert!(matches!(&commands[3], Command::Text(_, _, _)));

        let mut expected_ids = Vec::new();
        for drawable in composer.objects().iter().skip(2) {
            let geometry = match drawable {
                Drawable::Ground(g) => g.geometry(),
                Drawable::SkyPanel(p) => p.geometry(),
                Drawable::Branch(t) => t.geometry(),
                Drawable::Text(_) => unreachable!(),
            };
            expected_ids.push(Command::Geometry(geometry.id()));
        }
        assert_eq!(&commands[4..], &expected_ids[..]);

        // Replaying does not touch the scene.
        composer.render_frame(&mut canvas);
        assert_eq!(canvas.commands.len(), 2 * (2 + 47));
        assert_eq!(tree_positions(composer.objects()), before);
    }

    #[test]
    fn custom_background_clears_frame() {
        let style = SceneStyle::new().background(Color::rgb(0.1, 0.2, 0.3));
        let mut composer = SceneComposer::new(style, fonts(), StdRng::seed_from_u64(11));
        composer
            .initialize(&mut FakeLoader::default(), vp(400.0, 300.0))
            .unwrap();

        let mut canvas = RecordingCanvas::default();
        composer.render_frame(&mut canvas);
        assert_eq!(canvas.commands[0], Command::Background(Color::rgb(0.1, 0.2, 0.3)));
    }

    #[test]
    fn initialize_loads_both_faces() {
        let mut loader = FakeLoader::default();
        let mut composer =
            SceneComposer::new(SceneStyle::default(), fonts(), StdRng::seed_from_u64(12));
        composer.initialize(&mut loader, vp(800.0, 600.0)).unwrap();

        assert!(composer.is_ready());
        assert_eq!(
            loader.loaded,
            vec![
                (FontStyle::Bold, PathBuf::from("fonts/bold.ttf")),
                (FontStyle::Regular, PathBuf::from("fonts/regular.ttf")),
            ]
        );
    }

    #[test]
    fn new_composer_holds_an_empty_scene() {
        let composer =
            SceneComposer::new(SceneStyle::default(), fonts(), StdRng::seed_from_u64(5));
        assert!(!composer.is_ready());
        assert!(composer.objects().is_empty());
        assert_eq!(composer.objects().iter().count(), 0);
    }

    #[test]
    fn font_failure_leaves_composer_uninitialized() {
        let mut loader = FakeLoader {
            fail_on: Some(FontStyle::Regular),
            ..Default::default()
        };
        let mut composer =
            SceneComposer::new(SceneStyle::default(), fonts(), StdRng::seed_from_u64(13));

        let err = composer.initialize(&mut loader, vp(800.0, 600.0)).unwrap_err();

        assert!(matches!(err, GardenError::FontRead { .. }));
        assert!(!composer.is_ready());
        assert!(composer.objects().is_empty());
        assert_eq!(composer.viewport(), None);

        let mut canvas = RecordingCanvas::default();
        composer.render_frame(&mut canvas);
        assert!(canvas.commands.is_empty());
    }

    #[test]
    fn resize_before_initialize_is_rejected() {
        let mut composer =
            SceneComposer::new(SceneStyle::default(), fonts(), StdRng::seed_from_u64(14));

        assert!(matches!(
            composer.on_viewport_resize(vp(800.0, 600.0)),
            Err(GardenError::NotInitialized)
        ));
        assert!(matches!(composer.regenerate(), Err(GardenError::NotInitialized)));
        assert!(!composer.is_ready());
    }
}
