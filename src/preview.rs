//! Terminal swatches for the one-shot commands.

use std::io::Write;

use anyhow::Result;
use crossterm::queue;
use crossterm::style::{
    Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetBackgroundColor,
    SetForegroundColor,
};

use crate::color::Color;
use crate::model::Palette;
use crate::scheme::Scheme;

/// Width of a swatch cell, in columns.
const SWATCH_WIDTH: usize = 11;

fn term_color(c: Color) -> TermColor {
    TermColor::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

fn swatch<W: Write>(out: &mut W, color: Color, label: &str) -> Result<()> {
    queue!(
        out,
        SetBackgroundColor(term_color(color)),
        SetForegroundColor(term_color(color.contrasting_text_color())),
        Print(format!("{label:^SWATCH_WIDTH$}")),
        ResetColor,
        Print(" "),
    )?;
    Ok(())
}

/// One line per slot: `id  hex  rgb(...)` plus a lock marker.
pub fn write_plain<W: Write>(out: &mut W, palette: &Palette) -> Result<()> {
    for slot in palette.slots() {
        let lock = if slot.locked { "  locked" } else { "" };
        writeln!(
            out,
            "{}  {}  {}{lock}",
            slot.id,
            slot.hex(),
            slot.color.rgb_string()
        )?;
    }
    Ok(())
}

/// A row of colored swatches labeled with hex values, with a row of slot
/// numbers and lock markers below.
pub fn write_palette<W: Write>(out: &mut W, palette: &Palette) -> Result<()> {
    for slot in palette.slots() {
        swatch(out, slot.color, &slot.hex())?;
    }
    queue!(out, Print("\n"))?;

    for slot in palette.slots() {
        let label = if slot.locked {
            format!("{} [L]", slot.id)
        } else {
            slot.id.to_string()
        };
        let style = if slot.locked {
            Attribute::Bold
        } else {
            Attribute::Dim
        };
        queue!(
            out,
            SetAttribute(style),
            Print(format!("{label:^SWATCH_WIDTH$} ")),
            SetAttribute(Attribute::Reset),
        )?;
    }
    queue!(out, Print("\n"))?;
    out.flush()?;
    Ok(())
}

/// Scheme name and description followed by its swatches.
pub fn write_scheme<W: Write>(out: &mut W, scheme: &Scheme, plain: bool) -> Result<()> {
    if plain {
        writeln!(out, "{}", scheme.hexes().join(" "))?;
        return Ok(());
    }
    writeln!(out, "{}: {}", scheme.kind, scheme.kind.description())?;
    for color in &scheme.colors {
        swatch(out, *color, &color.to_hex())?;
    }
    queue!(out, Print("\n"))?;
    out.flush()?;
    Ok(())
}
