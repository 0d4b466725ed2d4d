use std::fmt;
use std::str::FromStr;

use crate::color::Color;
use crate::error::{PaletteError, Result};

/// Relationship used to derive a scheme from one base color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum SchemeKind {
    Complementary,
    Analogous,
    Triadic,
    Tetradic,
    Monochromatic,
}

impl SchemeKind {
    pub const ALL: [SchemeKind; 5] = [
        SchemeKind::Complementary,
        SchemeKind::Analogous,
        SchemeKind::Triadic,
        SchemeKind::Tetradic,
        SchemeKind::Monochromatic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SchemeKind::Complementary => "complementary",
            SchemeKind::Analogous => "analogous",
            SchemeKind::Triadic => "triadic",
            SchemeKind::Tetradic => "tetradic",
            SchemeKind::Monochromatic => "monochromatic",
        }
    }

    /// Short description for help text and previews.
    pub fn description(self) -> &'static str {
        match self {
            SchemeKind::Complementary => "Colors opposite each other on the color wheel.",
            SchemeKind::Analogous => "Colors adjacent to each other on the color wheel.",
            SchemeKind::Triadic => "Three colors evenly spaced on the color wheel.",
            SchemeKind::Tetradic => "Four colors forming a rectangle on the color wheel.",
            SchemeKind::Monochromatic => "One hue at darker and lighter shades.",
        }
    }

    /// The kind after this one, wrapping around. Used to cycle in the TUI.
    pub fn next(self) -> SchemeKind {
        let i = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// Hue offsets in degrees, first entry always the base.
    fn hue_offsets(self) -> &'static [i32] {
        match self {
            SchemeKind::Complementary => &[0, 180],
            SchemeKind::Analogous => &[0, 30, -30],
            SchemeKind::Triadic => &[0, 120, 240],
            SchemeKind::Tetradic => &[0, 90, 180, 270],
            SchemeKind::Monochromatic => &[0],
        }
    }
}

impl fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SchemeKind {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PaletteError::UnknownScheme(s.to_string()))
    }
}

/// A set of related colors derived from one base color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheme {
    pub kind: SchemeKind,
    pub colors: Vec<Color>,
}

impl Scheme {
    pub fn hexes(&self) -> Vec<String> {
        self.colors.iter().map(|c| c.to_hex()).collect()
    }
}

/// Lightness step for monochromatic shades, in percent.
const MONO_STEP: u8 = 20;

/// Derive a scheme of `kind` from `base`.
///
/// Saturation and lightness of the base are kept; only hue moves, except for
/// monochromatic which keeps hue and shifts lightness down and up.
pub fn derive_scheme(base: Color, kind: SchemeKind) -> Scheme {
    let hsl = base.to_hsl();
    let hue = i32::from(hsl.h);

    let mut colors: Vec<Color> = kind
        .hue_offsets()
        .iter()
        .map(|offset| Color::from_hsl(hue + offset, hsl.s, hsl.l))
        .collect();

    if kind == SchemeKind::Monochromatic {
        colors.push(Color::from_hsl(hue, hsl.s, hsl.l.saturating_sub(MONO_STEP)));
        colors.push(Color::from_hsl(hue, hsl.s, (hsl.l + MONO_STEP).min(100)));
    }

    Scheme { kind, colors }
}

/// Like [`derive_scheme`] but starting from a hex string.
pub fn derive_scheme_hex(base: &str, kind: SchemeKind) -> Result<Scheme> {
    Ok(derive_scheme(Color::from_hex(base)?, kind))
}
