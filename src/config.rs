//! Application configuration.
//!
//! ```ignore
//! let config = AppConfig::new()
//!     .title("Garden")
//!     .size(1280, 720)
//!     .seed(42);
//! ```
//!
//! [`AppConfig::from_env`] starts from the defaults and applies overrides from
//! the environment:
//!
//! | Variable              | Effect                         |
//! |-----------------------|--------------------------------|
//! | `GARDEN_FONT_BOLD`    | path of the bold (title) face  |
//! | `GARDEN_FONT_REGULAR` | path of the regular face       |
//! | `GARDEN_SEED`         | `u64` seed for the first layout |

use std::path::PathBuf;

use log::debug;

use crate::error::{GardenError, Result};
use crate::scene::SceneStyle;

pub const FONT_BOLD_VAR: &str = "GARDEN_FONT_BOLD";
pub const FONT_REGULAR_VAR: &str = "GARDEN_FONT_REGULAR";
pub const SEED_VAR: &str = "GARDEN_SEED";

/// Locations of the two font faces the heading is set in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontPaths {
    pub bold: PathBuf,
    pub regular: PathBuf,
}

impl Default for FontPaths {
    fn default() -> Self {
        Self {
            bold: PathBuf::from("assets/fonts/Inconsolata-Bold.ttf"),
            regular: PathBuf::from("assets/fonts/Inconsolata-Regular.ttf"),
        }
    }
}

/// Configuration for the garden window and scene.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fonts: FontPaths,
    /// Seed for the random layout. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    pub scene: SceneStyle,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Garden".to_string(),
            width: 800,
            height: 600,
            fonts: FontPaths::default(),
            seed: None,
            scene: SceneStyle::default(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by the `GARDEN_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up by variable name.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(path) = lookup(FONT_BOLD_VAR) {
            self.fonts.bold = PathBuf::from(path);
        }
        if let Some(path) = lookup(FONT_REGULAR_VAR) {
            self.fonts.regular = PathBuf::from(path);
        }
        if let Some(value) = lookup(SEED_VAR) {
            let seed = value
                .trim()
                .parse::<u64>()
                .map_err(|_| GardenError::InvalidConfig {
                    key: SEED_VAR,
                    value: value.clone(),
                })?;
            self.seed = Some(seed);
        }
        debug!("configuration: {self:?}");
        Ok(self)
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn fonts(mut self, bold: impl Into<PathBuf>, regular: impl Into<PathBuf>) -> Self {
        self.fonts = FontPaths {
            bold: bold.into(),
            regular: regular.into(),
        };
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn scene(mut self, style: SceneStyle) -> Self {
        self.scene = style;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn builder_sets_fields() {
        let config = AppConfig::new()
            .title("Orchard")
            .size(1280, 720)
            .fonts("b.ttf", "r.ttf")
            .seed(7);

        assert_eq!(config.title, "Orchard");
        assert_eq!((config.width, config.height), (1280, 720));
        assert_eq!(config.fonts.bold, PathBuf::from("b.ttf"));
        assert_eq!(config.fonts.regular, PathBuf::from("r.ttf"));
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn no_overrides_keeps_defaults() {
        let config = AppConfig::default().with_overrides(env(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.seed, None);
    }

    #[test]
    fn overrides_fonts_and_seed() {
        let config = AppConfig::default()
            .with_overrides(env(&[
                (FONT_BOLD_VAR, "/fonts/b.otf"),
                (FONT_REGULAR_VAR, "/fonts/r.otf"),
                (SEED_VAR, " 1234 "),
            ]))
            .unwrap();

        assert_eq!(config.fonts.bold, PathBuf::from("/fonts/b.otf"));
        assert_eq!(config.fonts.regular, PathBuf::from("/fonts/r.otf"));
        assert_eq!(config.seed, Some(1234));
    }

    #[test]
    fn bad_seed_is_rejected() {
        let err = AppConfig::default()
            .with_overrides(env(&[(SEED_VAR, "tulips")]))
            .unwrap_err();

        match err {
            GardenError::InvalidConfig { key, value } => {
                assert_eq!(key, SEED_VAR);
                assert_eq!(value, "tulips");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
