//! Title and subtitle layout.

use glam::Vec3;

use super::canvas::{Canvas, FontStyle, TextStyle};
use super::style::SceneStyle;
use crate::viewport::ViewportState;

/// Vertical gap between the title and the subtitle, in world units.
pub const SUBTITLE_GAP: f32 = 12.0;

/// A run of label text anchored in the world.
#[derive(Clone, Debug, PartialEq)]
pub struct TitleText {
    pub content: String,
    /// Left end of the baseline.
    pub anchor: Vec3,
    pub style: TextStyle,
}

impl TitleText {
    pub fn new(content: impl Into<String>, anchor: Vec3, style: TextStyle) -> Self {
        Self {
            content: content.into(),
            anchor,
            style,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.content.is_empty() || !(self.style.size > 0.0)
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.text(&self.content, self.anchor, &self.style);
    }
}

/// Approximate left edge for centering `content` at `font_size`.
///
/// Assumes every glyph is half an em wide. It ignores real glyph metrics, so
/// long or wide text ends up off-center; the heading layout depends on this
/// exact value.
pub fn centered_start_x(content: &str, font_size: f32) -> f32 {
    -(content.chars().count() as f32) * font_size / 4.0
}

/// Title and subtitle near the top of the view, sized from the viewport height.
pub fn heading(viewport: &ViewportState, style: &SceneStyle) -> [TitleText; 2] {
    let title_size = viewport.height / 20.0;
    let subtitle_size = title_size / 2.0;

    let title_y = -viewport.height / 2.0 + viewport.height / 10.0;
    let subtitle_y = title_y + subtitle_size + SUBTITLE_GAP;

    let title = TitleText::new(
        style.title.clone(),
        Vec3::new(centered_start_x(&style.title, title_size), title_y, 0.0),
        TextStyle {
            font: FontStyle::Bold,
            size: title_size,
            color: style.text,
        },
    );
    let subtitle = TitleText::new(
        style.subtitle.clone(),
        Vec3::new(centered_start_x(&style.subtitle, subtitle_size), subtitle_y, 0.0),
        TextStyle {
            font: FontStyle::Regular,
            size: subtitle_size,
            color: style.text,
        },
    );

    [title, subtitle]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn start_x_is_quarter_em_per_char() {
        assert_eq!(centered_start_x("Garden", 40.0), -60.0);
        assert_eq!(centered_start_x("", 40.0), 0.0);
        // Counted in chars, not bytes.
        assert_eq!(centered_start_x("héllo", 8.0), -10.0);
    }

    #[test]
    fn heading_sizes_follow_height() {
        let vp = ViewportState::new(1920.0, 1080.0).unwrap();
        let style = SceneStyle::default();
        let [title, subtitle] = heading(&vp, &style);

        assert_eq!(title.style.size, 54.0);
        assert_eq!(subtitle.style.size, 27.0);
        assert_eq!(title.style.font, FontStyle::Bold);
        assert_eq!(subtitle.style.font, FontStyle::Regular);
    }

    #[test]
    fn subtitle_sits_below_title_with_gap() {
        let vp = ViewportState::new(800.0, 600.0).unwrap();
        let [title, subtitle] = heading(&vp, &SceneStyle::default());

        assert_eq!(title.anchor.y, -240.0);
        assert_eq!(subtitle.anchor.y, title.anchor.y + subtitle.style.size + SUBTITLE_GAP);
        assert!(title.anchor.y < 0.0, "heading is in the upper half");
        assert_eq!(title.anchor.z, 0.0);
    }

    #[test]
    fn heading_uses_style_text() {
        let vp = ViewportState::new(800.0, 600.0).unwrap();
        let style = SceneStyle::new().title("Hello").subtitle("world");
        let [title, subtitle] = heading(&vp, &style);

        assert_eq!(title.content, "Hello");
        assert_eq!(title.anchor.x, centered_start_x("Hello", 30.0));
        assert_eq!(subtitle.content, "world");
        assert_eq!(subtitle.style.color, Color::WHITE);
    }

    #[test]
    fn empty_or_sizeless_text_is_degenerate() {
        let style = TextStyle {
            font: FontStyle::Regular,
            size: 10.0,
            color: Color::WHITE,
        };
        assert!(TitleText::new("", Vec3::ZERO, style).is_degenerate());
        assert!(
            TitleText::new("x", Vec3::ZERO, TextStyle { size: 0.0, ..style }).is_degenerate()
        );
        assert!(!TitleText::new("x", Vec3::ZERO, style).is_degenerate());
    }
}
