use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::color::Color as AppColor;
use crate::model::Palette;
use crate::scheme::Scheme;

/// Width of one swatch, in columns.
const SWATCH_WIDTH: usize = 10;

fn to_color(c: AppColor) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// Black or white foreground for readable text on the given background.
fn contrast_fg(c: AppColor) -> Color {
    to_color(c.contrasting_text_color())
}

fn swatch(c: AppColor, label: &str) -> Span<'static> {
    Span::styled(
        format!("{label:^SWATCH_WIDTH$}"),
        Style::default().bg(to_color(c)).fg(contrast_fg(c)),
    )
}

/// The palette as a row of swatches, one per slot. The selected slot is
/// bold and underlined; locked slots carry a lock marker under the swatch.
pub struct PaletteWidget<'a> {
    palette: &'a Palette,
    selected: usize,
}

impl<'a> PaletteWidget<'a> {
    pub fn new(palette: &'a Palette, selected: usize) -> Self {
        Self { palette, selected }
    }
}

fn build_swatch_row(palette: &Palette, selected: usize, label: bool) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    for (i, slot) in palette.slots().iter().enumerate() {
        let text = if label { slot.hex() } else { String::new() };
        let mut span = swatch(slot.color, &text);
        if label && i == selected {
            span.style = span.style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        spans.push(span);
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

/// Slot numbers under the swatches, with `[L]` on locked slots.
fn build_index_row(palette: &Palette, selected: usize) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    for (i, slot) in palette.slots().iter().enumerate() {
        let label = if slot.locked {
            format!("{i} [L]")
        } else {
            i.to_string()
        };
        let style = if i == selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else if slot.locked {
            Style::default().fg(Color::Gray)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("{label:^SWATCH_WIDTH$}"), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

impl Widget for PaletteWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered().title("Palette");
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![
            build_swatch_row(self.palette, self.selected, false),
            build_swatch_row(self.palette, self.selected, true),
            build_swatch_row(self.palette, self.selected, false),
            build_index_row(self.palette, self.selected),
        ];

        // Info line for the selected slot
        if let Some(slot) = self.palette.slots().get(self.selected) {
            let lock = if slot.locked { "  locked" } else { "" };
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    format!("  {}  ", slot.id),
                    Style::default()
                        .bg(to_color(slot.color))
                        .fg(contrast_fg(slot.color)),
                ),
                Span::raw(format!(
                    "  {}  {}  {}{lock}",
                    slot.hex(),
                    slot.color.rgb_string(),
                    slot.color.to_hsl(),
                )),
            ]));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

/// The named slot groupings of the palette, one line each.
pub struct CombinationsWidget<'a> {
    palette: &'a Palette,
}

impl<'a> CombinationsWidget<'a> {
    pub fn new(palette: &'a Palette) -> Self {
        Self { palette }
    }
}

impl Widget for CombinationsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered().title("Combinations");
        let inner = block.inner(area);
        block.render(area, buf);

        let lines: Vec<Line> = self
            .palette
            .slot_combinations()
            .into_iter()
            .map(|(kind, colors)| {
                let mut spans = vec![Span::raw(format!("  {:<15}", kind.name()))];
                for c in colors {
                    spans.push(swatch(c, ""));
                    spans.push(Span::raw(" "));
                }
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

/// A harmony scheme derived from the selected slot.
pub struct SchemeWidget<'a> {
    scheme: &'a Scheme,
}

impl<'a> SchemeWidget<'a> {
    pub fn new(scheme: &'a Scheme) -> Self {
        Self { scheme }
    }
}

impl Widget for SchemeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered().title(format!("Scheme: {}", self.scheme.kind));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut swatches = vec![Span::raw("  ")];
        for c in &self.scheme.colors {
            swatches.push(swatch(*c, &c.to_hex()));
            swatches.push(Span::raw(" "));
        }
        let lines = vec![
            Line::from(format!("  {}", self.scheme.kind.description())),
            Line::from(""),
            Line::from(swatches),
        ];

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
