use crate::color::Color;

/// Fixed text and palette of the garden.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneStyle {
    pub title: String,
    pub subtitle: String,
    /// Frame clear color; also the top color of the sky gradient.
    pub background: Color,
    pub ground: Color,
    /// Neutral color of the thicker parts of every tree.
    pub trunk: Color,
    pub text: Color,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            title: "Garden".to_string(),
            subtitle: "drag to look around, resize the window to regrow".to_string(),
            background: Color::rgb8(72, 104, 148),
            ground: Color::rgb8(18, 58, 24),
            trunk: Color::rgb8(128, 128, 128),
            text: Color::WHITE,
        }
    }
}

impl SceneStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }
}
