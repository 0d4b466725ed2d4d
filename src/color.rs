use std::fmt;
use std::str::FromStr;

use palette::{FromColor, Hsl as PaletteHsl, Srgb};

use crate::error::{PaletteError, Result};

/// Core color type used throughout the engine.
/// Wraps sRGB u8 components; hex output is always canonical uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// HSL triple with integer degrees and percentages, as produced by
/// [`Color::to_hsl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsl {
    /// Hue in `[0, 360)`.
    pub h: u16,
    /// Saturation in `[0, 100]`.
    pub s: u8,
    /// Lightness in `[0, 100]`.
    pub l: u8,
}

/// Largest per-channel drift of hex -> HSL -> hex over the whole sRGB cube,
/// caused by quantizing HSL to whole degrees and percents.
pub const HSL_ROUND_TRIP_TOLERANCE: u16 = 5;

/// Luma threshold (scaled by 1000) at or above which text should be black.
const LUMA_THRESHOLD_MILLI: u32 = 128_000;

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color string like `#ff8800` or `#FF8800`.
    ///
    /// The leading `#` is required and exactly six hex digits must follow.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let invalid = || PaletteError::InvalidFormat(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Serialize to uppercase hex `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// CSS functional notation, e.g. `rgb(17, 34, 51)`.
    pub fn rgb_string(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    /// Bare comma-separated channels, e.g. `17, 34, 51`.
    pub fn rgb_components(self) -> String {
        format!("{}, {}, {}", self.r, self.g, self.b)
    }

    /// Convert to HSL with hue in whole degrees and saturation/lightness in
    /// whole percent.
    ///
    /// When several channels share the maximum, red wins over green and green
    /// over blue.
    pub fn to_hsl(self) -> Hsl {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        let (h, s) = if max == min {
            (0.0, 0.0)
        } else {
            let d = max - min;
            let s = if l > 0.5 {
                d / (2.0 - max - min)
            } else {
                d / (max + min)
            };
            let sector = if max == r {
                (g - b) / d + if g < b { 6.0 } else { 0.0 }
            } else if max == g {
                (b - r) / d + 2.0
            } else {
                (r - g) / d + 4.0
            };
            ((sector * 60.0).round(), s)
        };

        Hsl {
            h: (h as u16) % 360,
            s: (s * 100.0).round() as u8,
            l: (l * 100.0).round() as u8,
        }
    }

    /// Create from HSL. Hue wraps modulo 360 (negative values included);
    /// saturation and lightness are clamped to `[0, 100]`.
    pub fn from_hsl(h: i32, s: u8, l: u8) -> Self {
        let hue = f64::from(h.rem_euclid(360));
        let saturation = f64::from(s.min(100)) / 100.0;
        let lightness = f64::from(l.min(100)) / 100.0;
        let hsl = PaletteHsl::<palette::encoding::Srgb, f64>::new(hue, saturation, lightness);
        Self::from_srgb_clamped(Srgb::from_color(hsl))
    }

    /// Clamp an `Srgb<f64>` to [0, 1] and convert to Color.
    fn from_srgb_clamped(srgb: Srgb<f64>) -> Self {
        let r = (srgb.red.clamp(0.0, 1.0) * 255.0).round() as u8;
        let g = (srgb.green.clamp(0.0, 1.0) * 255.0).round() as u8;
        let b = (srgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { r, g, b }
    }

    /// Perceived brightness `0.299R + 0.587G + 0.114B`, in `[0, 255]`.
    pub fn luma(self) -> f64 {
        f64::from(self.luma_milli()) / 1000.0
    }

    fn luma_milli(self) -> u32 {
        299 * u32::from(self.r) + 587 * u32::from(self.g) + 114 * u32::from(self.b)
    }

    /// Black or white, whichever reads better on top of this color.
    ///
    /// A plain luma threshold at 128, not a WCAG contrast computation.
    pub fn contrasting_text_color(self) -> Color {
        if self.luma_milli() >= LUMA_THRESHOLD_MILLI {
            Color::BLACK
        } else {
            Color::WHITE
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.h, self.s, self.l)
    }
}
