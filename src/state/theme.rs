use serde::{Deserialize, Serialize};

/// RGBA color, straight alpha.
pub type Color = [u8; 4];

pub const WHITE: Color = [255, 255, 255, 255];
pub const LIGHT_GRAY: Color = [192, 192, 192, 255];
pub const GRAY: Color = [128, 128, 128, 255];
pub const DARK_GRAY: Color = [64, 64, 64, 255];
pub const BLACK: Color = [0, 0, 0, 255];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn plot_bg(&self) -> Color {
        match self {
            Theme::Dark => [20, 20, 20, 255],
            Theme::Light => WHITE,
        }
    }

    /// Whiskers, box outlines, medians and the central band line.
    pub fn stroke(&self) -> Color {
        match self {
            Theme::Dark => LIGHT_GRAY,
            Theme::Light => DARK_GRAY,
        }
    }

    /// Box interior. Painted over the whiskers it overlaps.
    pub fn box_fill(&self) -> Color {
        match self {
            Theme::Dark => BLACK,
            Theme::Light => WHITE,
        }
    }

    /// Outermost bands: min/max and the standard deviation edges.
    pub fn band_outer(&self) -> Color {
        match self {
            Theme::Dark => DARK_GRAY,
            Theme::Light => LIGHT_GRAY,
        }
    }

    /// Quartile bands.
    pub fn band_inner(&self) -> Color {
        GRAY
    }

    pub fn origin_line(&self) -> Color {
        match self {
            Theme::Dark => GRAY,
            Theme::Light => LIGHT_GRAY,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Light
    }
}
