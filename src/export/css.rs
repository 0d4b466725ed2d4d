use crate::error::{PaletteError, Result};
use crate::model::Palette;

use super::{Exporter, SOURCE_TAG};

/// Slots referenced by name in the semantic and dark-mode blocks.
pub const MIN_CSS_SLOTS: usize = 5;

/// CSS custom properties plus utility classes.
pub struct CssExporter;

impl Exporter for CssExporter {
    fn name(&self) -> &str {
        "CSS"
    }

    fn file_name(&self) -> &str {
        "palette.css"
    }

    fn render(&self, palette: &Palette) -> Result<Vec<u8>> {
        to_css(palette).map(String::into_bytes)
    }
}

/// Render `palette` as a stylesheet.
///
/// Slots 0 to 3 become primary, secondary, accent and background, with text
/// picked for contrast against the background; slot 4 is the dark-mode
/// background.
pub fn to_css(palette: &Palette) -> Result<String> {
    if palette.len() < MIN_CSS_SLOTS {
        return Err(PaletteError::InsufficientSlots {
            required: MIN_CSS_SLOTS,
            found: palette.len(),
        });
    }
    let slot = |i: usize| palette.slots()[i].color;

    let mut out = String::new();
    out.push_str(&format!("/* Palette generated by {SOURCE_TAG} */\n\n"));
    out.push_str(":root {\n");
    for (i, color) in palette.colors().enumerate() {
        let n = i + 1;
        out.push_str(&format!("  --color-{n}: {color};\n"));
        out.push_str(&format!("  --color-{n}-rgb: {};\n", color.rgb_components()));
    }

    out.push_str("\n  /* Semantic variables */\n");
    out.push_str(&format!("  --color-primary: {};\n", slot(0)));
    out.push_str(&format!("  --color-secondary: {};\n", slot(1)));
    out.push_str(&format!("  --color-accent: {};\n", slot(2)));
    out.push_str(&format!("  --color-background: {};\n", slot(3)));
    out.push_str(&format!(
        "  --color-text: {};\n",
        slot(3).contrasting_text_color()
    ));
    out.push_str("}\n\n");

    out.push_str("/* Dark mode variables */\n");
    out.push_str(".dark-mode {\n");
    out.push_str(&format!("  --color-background: {};\n", slot(4)));
    out.push_str(&format!(
        "  --color-text: {};\n",
        slot(4).contrasting_text_color()
    ));
    out.push_str("}\n\n");

    out.push_str("/* Utility classes */\n");
    for (i, color) in palette.colors().enumerate() {
        let n = i + 1;
        out.push_str(&format!(".bg-palette-{n} {{ background-color: {color}; }}\n"));
        out.push_str(&format!(".text-palette-{n} {{ color: {color}; }}\n"));
    }

    Ok(out)
}
