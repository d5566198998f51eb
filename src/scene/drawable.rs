use super::branch::Tree;
use super::canvas::Canvas;
use super::ground::Ground;
use super::sky::SkyPanel;
use super::text::TitleText;

/// Everything the garden can put on screen.
#[derive(Clone, Debug)]
pub enum Drawable {
    Text(TitleText),
    Ground(Ground),
    SkyPanel(SkyPanel),
    Branch(Tree),
}

/// Variant tag of a [`Drawable`], without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrawableKind {
    Text,
    Ground,
    SkyPanel,
    Branch,
}

impl Drawable {
    pub fn kind(&self) -> DrawableKind {
        match self {
            Drawable::Text(_) => DrawableKind::Text,
            Drawable::Ground(_) => DrawableKind::Ground,
            Drawable::SkyPanel(_) => DrawableKind::SkyPanel,
            Drawable::Branch(_) => DrawableKind::Branch,
        }
    }

    /// True when the entity has nothing visible to draw.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Drawable::Text(text) => text.is_degenerate(),
            Drawable::Ground(ground) => ground.is_degenerate(),
            Drawable::SkyPanel(panel) => panel.is_degenerate(),
            Drawable::Branch(tree) => tree.is_degenerate(),
        }
    }

    /// Render into the current frame. Degenerate entities issue no commands.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        if self.is_degenerate() {
            return;
        }
        match self {
            Drawable::Text(text) => text.draw(canvas),
            Drawable::Ground(ground) => ground.draw(canvas),
            Drawable::SkyPanel(panel) => panel.draw(canvas),
            Drawable::Branch(tree) => tree.draw(canvas),
        }
    }

    /// The planted tree, if this is one.
    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Drawable::Branch(tree) => Some(tree),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::scene::canvas::{Command, FontStyle, RecordingCanvas, TextStyle};
    use glam::Vec3;

    #[test]
    fn degenerate_drawables_issue_no_commands() {
        let style = TextStyle {
            font: FontStyle::Bold,
            size: 0.0,
            color: Color::WHITE,
        };
        let drawables = [
            Drawable::Text(TitleText::new("hi", Vec3::ZERO, style)),
            Drawable::Ground(Ground::new(-1.0, 10.0, 10.0, Vec3::ZERO, Color::BLACK)),
        ];

        let mut canvas = RecordingCanvas::default();
        for d in &drawables {
            assert!(d.is_degenerate());
            d.draw(&mut canvas);
        }
        assert!(canvas.commands.is_empty());
    }

    #[test]
    fn draw_dispatches_to_variant() {
        let ground = Ground::new(10.0, 10.0, 1.0, Vec3::ZERO, Color::BLACK);
        let id = ground.geometry().id();
        let text_style = TextStyle {
            font: FontStyle::Regular,
            size: 12.0,
            color: Color::WHITE,
        };

        let mut canvas = RecordingCanvas::default();
        Drawable::Ground(ground).draw(&mut canvas);
        Drawable::Text(TitleText::new("hi", Vec3::X, text_style)).draw(&mut canvas);

        assert_eq!(
            canvas.commands,
            vec![
                Command::Geometry(id),
                Command::Text("hi".to_string(), Vec3::X, text_style),
            ]
        );
    }

    #[test]
    fn kind_matches_variant() {
        let ground = Drawable::Ground(Ground::new(1.0, 1.0, 1.0, Vec3::ZERO, Color::BLACK));
        assert_eq!(ground.kind(), DrawableKind::Ground);
        assert!(ground.as_tree().is_none());
    }
}
