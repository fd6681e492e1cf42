//! The fixed catalog of light strand styles.

use egui::Color32;

/// How the bulbs of a strand are colored
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorSpec {
    /// Every bulb has the same color
    Solid(Color32),
    /// Bulbs cycle through `palette` along the strand
    Pattern {
        name: &'static str,
        palette: &'static [Color32],
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightStyle {
    pub id: &'static str,
    pub display_name: &'static str,
    pub color: ColorSpec,
    pub glow: Color32,
}

const RED: Color32 = Color32::from_rgb(0xef, 0x44, 0x44);
const BLUE: Color32 = Color32::from_rgb(0x3b, 0x82, 0xf6);
const GREEN: Color32 = Color32::from_rgb(0x22, 0xc5, 0x5e);
const YELLOW: Color32 = Color32::from_rgb(0xea, 0xb3, 0x08);

const MULTICOLOR_PALETTE: [Color32; 4] = [RED, BLUE, GREEN, YELLOW];
const FESTIVE_PALETTE: [Color32; 2] = [RED, GREEN];

// Glow colors are premultiplied: the source values at 60% / 40% alpha.
static LIGHT_STYLES: [LightStyle; 5] = [
    LightStyle {
        id: "warm-white",
        display_name: "Warm White",
        color: ColorSpec::Solid(Color32::from_rgb(0xfe, 0xf3, 0xc7)),
        glow: Color32::from_rgba_premultiplied(152, 146, 119, 153),
    },
    LightStyle {
        id: "cool-white",
        display_name: "Cool White",
        color: ColorSpec::Solid(Color32::from_rgb(0xf8, 0xfa, 0xfc)),
        glow: Color32::from_rgba_premultiplied(149, 150, 151, 153),
    },
    LightStyle {
        id: "multicolor",
        display_name: "Multi-Color",
        color: ColorSpec::Pattern {
            name: "multicolor",
            palette: &MULTICOLOR_PALETTE,
        },
        glow: Color32::from_rgba_premultiplied(102, 102, 102, 102),
    },
    LightStyle {
        id: "icy-blue",
        display_name: "Icy Blue",
        color: ColorSpec::Solid(BLUE),
        glow: Color32::from_rgba_premultiplied(35, 78, 148, 153),
    },
    LightStyle {
        id: "festive",
        display_name: "Festive",
        color: ColorSpec::Pattern {
            name: "festive",
            palette: &FESTIVE_PALETTE,
        },
        glow: Color32::from_rgba_premultiplied(96, 27, 27, 102),
    },
];

/// All styles, in display order
pub fn styles() -> &'static [LightStyle] {
    &LIGHT_STYLES
}

pub fn find_style(id: &str) -> Option<&'static LightStyle> {
    LIGHT_STYLES.iter().find(|style| style.id == id)
}

pub fn default_style() -> &'static LightStyle {
    &LIGHT_STYLES[0]
}

impl LightStyle {
    /// Color of the `index`-th bulb along a strand
    pub fn color_at(&self, index: usize) -> Color32 {
        match self.color {
            ColorSpec::Solid(color) => color,
            ColorSpec::Pattern { palette, .. } => palette[index % palette.len()],
        }
    }

    /// Swatch color for the selector
    pub fn primary_color(&self) -> Color32 {
        self.color_at(0)
    }

    pub fn palette(&self) -> &[Color32] {
        match &self.color {
            ColorSpec::Solid(color) => std::slice::from_ref(color),
            ColorSpec::Pattern { palette, .. } => palette,
        }
    }

    pub fn is_pattern(&self) -> bool {
        matches!(self.color, ColorSpec::Pattern { .. })
    }
}
