use std::fs;
use std::path::Path;

use ratatui::style::Color;
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct Theme {
    pub scene_bg: Color,
    pub input_bg: Color,
    pub status_bg: Color,
    pub modal_bg: Color,
    pub text_fg: Color,
    pub muted_fg: Color,
    pub prompt_fg: Color,
    pub choice_fg: Color,
    pub item_fg: Color,
    pub npc_fg: Color,
    pub highlight_bg: Color,
    pub error_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            scene_bg: Color::Rgb(12, 18, 12),
            input_bg: Color::Rgb(20, 28, 20),
            status_bg: Color::Rgb(8, 12, 8),
            modal_bg: Color::Rgb(24, 34, 24),
            text_fg: Color::Rgb(190, 230, 190),
            muted_fg: Color::Rgb(110, 150, 110),
            prompt_fg: Color::Rgb(120, 255, 120),
            choice_fg: Color::Rgb(140, 200, 255),
            item_fg: Color::Rgb(255, 210, 110),
            npc_fg: Color::Rgb(230, 150, 255),
            highlight_bg: Color::Rgb(50, 90, 50),
            error_fg: Color::Rgb(255, 110, 110),
        }
    }
}

impl Theme {
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path_ref = path.as_ref();
        match fs::read_to_string(path_ref) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(theme) => theme,
                Err(err) => {
                    log::warn!(
                        "Failed to parse theme file '{}': {err}. Using defaults.",
                        path_ref.display()
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::debug!(
                    "No theme file at '{}' ({err}). Using defaults.",
                    path_ref.display()
                );
                Self::default()
            }
        }
    }

    /// Colors missing from the file keep their default values.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        let cfg: ThemeToml = toml::from_str(s)?;
        let defaults = Self::default();
        let pick = |value: Option<RgbToml>, fallback: Color| value.map_or(fallback, RgbToml::to_color);
        let colors = cfg.colors;
        Ok(Self {
            scene_bg: pick(colors.scene_bg, defaults.scene_bg),
            input_bg: pick(colors.input_bg, defaults.input_bg),
            status_bg: pick(colors.status_bg, defaults.status_bg),
            modal_bg: pick(colors.modal_bg, defaults.modal_bg),
            text_fg: pick(colors.text_fg, defaults.text_fg),
            muted_fg: pick(colors.muted_fg, defaults.muted_fg),
            prompt_fg: pick(colors.prompt_fg, defaults.prompt_fg),
            choice_fg: pick(colors.choice_fg, defaults.choice_fg),
            item_fg: pick(colors.item_fg, defaults.item_fg),
            npc_fg: pick(colors.npc_fg, defaults.npc_fg),
            highlight_bg: pick(colors.highlight_bg, defaults.highlight_bg),
            error_fg: pick(colors.error_fg, defaults.error_fg),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ThemeToml {
    #[serde(default)]
    colors: ThemeColorsToml,
}

#[derive(Debug, Default, Deserialize)]
struct ThemeColorsToml {
    scene_bg: Option<RgbToml>,
    input_bg: Option<RgbToml>,
    status_bg: Option<RgbToml>,
    modal_bg: Option<RgbToml>,
    text_fg: Option<RgbToml>,
    muted_fg: Option<RgbToml>,
    prompt_fg: Option<RgbToml>,
    choice_fg: Option<RgbToml>,
    item_fg: Option<RgbToml>,
    npc_fg: Option<RgbToml>,
    highlight_bg: Option<RgbToml>,
    error_fg: Option<RgbToml>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct RgbToml {
    r: u8,
    g: u8,
    b: u8,
}

impl RgbToml {
    fn to_color(self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}
