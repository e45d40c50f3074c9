//! The fixed catalog of render styles.
//!
//! Each [`DesignStyle`] pairs a human label (what a style picker shows) with a
//! prompt fragment that is injected verbatim into the generation request. The
//! set is closed: no caller introduces a style at runtime, so it is an enum
//! rather than a lookup table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A visual style for the generated render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DesignStyle {
    /// Studio product shot. Selected at startup.
    #[default]
    Photorealistic,
    /// Braun / Dieter Rams minimalism.
    Minimalist,
    /// Neon, dark, glossy.
    Cyberpunk,
    /// Alcohol-marker design sketch.
    MarkerSketch,
    /// Bent plywood and warm Scandinavian light.
    WoodNatural,
    /// See-through polycarbonate shell.
    TechTransparent,
}

impl DesignStyle {
    /// Every style, in picker order.
    pub const ALL: [DesignStyle; 6] = [
        DesignStyle::Photorealistic,
        DesignStyle::Minimalist,
        DesignStyle::Cyberpunk,
        DesignStyle::MarkerSketch,
        DesignStyle::WoodNatural,
        DesignStyle::TechTransparent,
    ];

    /// Label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Photorealistic => "Photorealistic",
            Self::Minimalist => "Minimalist (Braun)",
            Self::Cyberpunk => "Cyberpunk",
            Self::MarkerSketch => "Marker Sketch",
            Self::WoodNatural => "Wood & Natural",
            Self::TechTransparent => "Tech Transparent",
        }
    }

    /// Text injected into the prompt as the style details.
    pub fn prompt_fragment(&self) -> &'static str {
        match self {
            Self::Photorealistic => "Photorealistic, Studio Lighting, 4K, High Detail",
            Self::Minimalist => "Dieter Rams Style, Matte White, Clean Lines, Soft Shadows",
            Self::Cyberpunk => "Neon Lights, Dark Background, Glossy Tech Materials, Futuristic",
            Self::MarkerSketch => {
                "Marker Render Style, Alcohol Markers, Design Sketch, Dynamic Lines"
            }
            Self::WoodNatural => {
                "Bent Plywood, Scandinavian Design, Warm Lighting, Natural Textures"
            }
            Self::TechTransparent => {
                "Translucent Polycarbonate, Internal Components Visible, Tech Aesthetic"
            }
        }
    }

    /// Short machine name, used on the command line.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Photorealistic => "photorealistic",
            Self::Minimalist => "minimalist",
            Self::Cyberpunk => "cyberpunk",
            Self::MarkerSketch => "marker-sketch",
            Self::WoodNatural => "wood-natural",
            Self::TechTransparent => "tech-transparent",
        }
    }
}

impl fmt::Display for DesignStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string names no style.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown style '{0}' (expected one of: photorealistic, minimalist, cyberpunk, marker-sketch, wood-natural, tech-transparent)")]
pub struct UnknownStyle(pub String);

impl FromStr for DesignStyle {
    type Err = UnknownStyle;

    /// Accepts either the slug or the label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        DesignStyle::ALL
            .into_iter()
            .find(|style| {
                style.slug().eq_ignore_ascii_case(needle)
                    || style.label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| UnknownStyle(s.to_string()))
    }
}
