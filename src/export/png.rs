use std::io::Cursor;

use image::{ImageFormat, Pixel, Rgba, RgbaImage};

use crate::color::Color;
use crate::error::Result;
use crate::model::Palette;

use super::font::{glyph, GLYPH_HEIGHT, GLYPH_WIDTH};
use super::{Exporter, SOURCE_TAG};

pub const DEFAULT_WIDTH: u32 = 1200;
pub const DEFAULT_HEIGHT: u32 = 300;

const HEX_STYLE: TextStyle = TextStyle {
    size_px: 24,
    bold: true,
    align: TextAlign::Center,
};
const RGB_STYLE: TextStyle = TextStyle {
    size_px: 16,
    bold: false,
    align: TextAlign::Center,
};
const WATERMARK_STYLE: TextStyle = TextStyle {
    size_px: 14,
    bold: false,
    align: TextAlign::Right,
};
/// White at 50% opacity.
const WATERMARK_COLOR: Rgba<u8> = Rgba([255, 255, 255, 128]);
/// Distance of the watermark anchor from the right and bottom edges.
const WATERMARK_MARGIN: i32 = 20;
/// Vertical distance of the hex and rgb labels from the middle line.
const LABEL_OFFSET: i32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub size_px: u32,
    pub bold: bool,
    pub align: TextAlign,
}

/// Minimal 2D raster capability the image export draws through.
pub trait Surface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Fill a rectangle, blending by the color's alpha. Parts outside the
    /// surface are clipped.
    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Rgba<u8>);

    /// Draw `text` with its baseline at `y`. `x` is the left edge, center or
    /// right edge depending on `style.align`.
    fn fill_text(&mut self, text: &str, x: i32, y: i32, style: TextStyle, color: Rgba<u8>);

    /// Encode the surface as an image file.
    fn encode(&self) -> Result<Vec<u8>>;
}

fn opaque(color: Color) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, 255])
}

/// Paint `palette` onto `surface`: one vertical band per slot with its hex and
/// rgb labels, plus the watermark in the bottom-right corner.
///
/// Bands are `width / N` wide; the last one takes the remainder.
pub fn draw_palette<S: Surface + ?Sized>(palette: &Palette, surface: &mut S) {
    let width = surface.width();
    let height = surface.height();
    let count = palette.len() as u32;
    if count == 0 {
        return;
    }
    let band = width / count;
    let middle = (height / 2) as i32;

    for (i, slot) in palette.slots().iter().enumerate() {
        let x = band * i as u32;
        let band_width = if i as u32 + 1 == count { width - x } else { band };
        surface.fill_rect(x, 0, band_width, height, opaque(slot.color));

        let text_color = opaque(slot.color.contrasting_text_color());
        let center = (x + band_width / 2) as i32;
        surface.fill_text(&slot.hex(), center, middle - LABEL_OFFSET, HEX_STYLE, text_color);
        surface.fill_text(
            &slot.color.rgb_string(),
            center,
            middle + LABEL_OFFSET,
            RGB_STYLE,
            text_color,
        );
    }

    surface.fill_text(
        &format!("Generated with {SOURCE_TAG}"),
        width as i32 - WATERMARK_MARGIN,
        height as i32 - WATERMARK_MARGIN,
        WATERMARK_STYLE,
        WATERMARK_COLOR,
    );
}

/// `image`-backed surface rendering text with the built-in bitmap font.
pub struct ImageSurface {
    image: RgbaImage,
}

impl ImageSurface {
    /// A fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    fn blend_pixel(&mut self, x: i64, y: i64, src: Rgba<u8>) {
        let (width, height) = self.image.dimensions();
        if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
            return;
        }
        self.image.get_pixel_mut(x as u32, y as u32).blend(&src);
    }

    /// Pixel scale for a nominal font size: one glyph row per 8px of size.
    fn scale(size_px: u32) -> u32 {
        (size_px / 8).max(1)
    }

    /// Rendered width of `text` at `scale`, in pixels.
    fn text_width(text: &str, scale: u32) -> u32 {
        let chars = text.chars().count() as u32;
        if chars == 0 {
            return 0;
        }
        chars * (GLYPH_WIDTH + 1) * scale - scale
    }
}

impl Surface for ImageSurface {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Rgba<u8>) {
        let x_end = x.saturating_add(width).min(self.image.width());
        let y_end = y.saturating_add(height).min(self.image.height());
        for py in y..y_end {
            for px in x..x_end {
                self.image.get_pixel_mut(px, py).blend(&color);
            }
        }
    }

    fn fill_text(&mut self, text: &str, x: i32, y: i32, style: TextStyle, color: Rgba<u8>) {
        let scale = Self::scale(style.size_px);
        let advance = i64::from((GLYPH_WIDTH + 1) * scale);
        let text_width = i64::from(Self::text_width(text, scale));
        let left = match style.align {
            TextAlign::Left => i64::from(x),
            TextAlign::Center => i64::from(x) - text_width / 2,
            TextAlign::Right => i64::from(x) - text_width,
        };
        let top = i64::from(y) - i64::from(GLYPH_HEIGHT * scale);
        // bold strokes are one extra pixel wide
        let stroke = i64::from(scale) + i64::from(style.bold);
        let scale = i64::from(scale);

        for (index, c) in text.chars().enumerate() {
            let Some(rows) = glyph(c) else { continue };
            let origin = left + index as i64 * advance;
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                        continue;
                    }
                    let px = origin + i64::from(col) * scale;
                    let py = top + row as i64 * scale;
                    // the next lit column already covers the bold extension
                    let next_lit =
                        col + 1 < GLYPH_WIDTH && bits & (1 << (GLYPH_WIDTH - 2 - col)) != 0;
                    let width = if next_lit { scale } else { stroke };
                    for dy in 0..scale {
                        for dx in 0..width {
                            self.blend_pixel(px + dx, py + dy, color);
                        }
                    }
                }
            }
        }
    }

    fn encode(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}

/// PNG image of the palette.
pub struct PngExporter {
    pub width: u32,
    pub height: u32,
}

impl Default for PngExporter {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Exporter for PngExporter {
    fn name(&self) -> &str {
        "PNG"
    }

    fn file_name(&self) -> &str {
        "palette.png"
    }

    fn render(&self, palette: &Palette) -> Result<Vec<u8>> {
        let mut surface = ImageSurface::new(self.width, self.height);
        draw_palette(palette, &mut surface);
        surface.encode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Rect(u32, u32, u32, u32, Rgba<u8>),
        Text(String, i32, i32, TextStyle, Rgba<u8>),
    }

    struct RecordingSurface {
        width: u32,
        height: u32,
        ops: Vec<Op>,
    }

    impl RecordingSurface {
        fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                ops: Vec::new(),
            }
        }

        fn rects(&self) -> Vec<(u32, u32, u32, u32)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Rect(x, y, w, h, _) => Some((*x, *y, *w, *h)),
                    Op::Text(..) => None,
                })
                .collect()
        }

        fn texts(&self) -> Vec<&Op> {
            self.ops.iter().filter(|op| matches!(op, Op::Text(..))).collect()
        }
    }

    impl Surface for RecordingSurface {
        fn width(&self) -> u32 {
            self.width
        }

        fn height(&self) -> u32 {
            self.height
        }

        fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Rgba<u8>) {
            self.ops.push(Op::Rect(x, y, width, height, color));
        }

        fn fill_text(&mut self, text: &str, x: i32, y: i32, style: TextStyle, color: Rgba<u8>) {
            self.ops.push(Op::Text(text.to_string(), x, y, style, color));
        }

        fn encode(&self) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }
    }

    fn palette() -> Palette {
        Palette::from_hexes(&["#112233", "#445566", "#778899", "#AABBCC", "#DDEEFF"]).unwrap()
    }

    #[test]
    fn bands_split_width_evenly() {
        let mut surface = RecordingSurface::new(1200, 300);
        draw_palette(&palette(), &mut surface);
        assert_eq!(
            surface.rects(),
            vec![
                (0, 0, 240, 300),
                (240, 0, 240, 300),
                (480, 0, 240, 300),
                (720, 0, 240, 300),
                (960, 0, 240, 300),
            ]
        );
    }

    #[test]
    fn last_band_absorbs_remainder() {
        let mut surface = RecordingSurface::new(1203, 10);
        draw_palette(&palette(), &mut surface);
        let rects = surface.rects();
        assert_eq!(rects[3], (720, 0, 240, 10));
        assert_eq!(rects[4], (960, 0, 243, 10));
    }

    #[test]
    fn labels_are_centered_in_contrast_color() {
        let mut surface = RecordingSurface::new(1200, 300);
        draw_palette(&palette(), &mut surface);
        let texts = surface.texts();

        assert_eq!(
            *texts[0],
            Op::Text(
                "#112233".to_string(),
                120,
                135,
                HEX_STYLE,
                Rgba([255, 255, 255, 255])
            )
        );
        assert_eq!(
            *texts[1],
            Op::Text(
                "rgb(17, 34, 51)".to_string(),
                120,
                165,
                RGB_STYLE,
                Rgba([255, 255, 255, 255])
            )
        );
        // light band gets black text
        assert!(matches!(
            texts[8],
            Op::Text(s, 1080, 135, _, c) if s == "#DDEEFF" && *c == Rgba([0, 0, 0, 255])
        ));
    }

    #[test]
    fn watermark_is_last_and_bottom_right() {
        let mut surface = RecordingSurface::new(1200, 300);
        draw_palette(&palette(), &mut surface);
        assert_eq!(
            surface.ops.last(),
            Some(&Op::Text(
                "Generated with Paletto".to_string(),
                1180,
                280,
                WATERMARK_STYLE,
                WATERMARK_COLOR
            ))
        );
    }

    #[test]
    fn image_surface_fills_bands() {
        let mut surface = ImageSurface::new(100, 200);
        let palette = Palette::from_hexes(&["#FF0000", "#00FF00"]).unwrap();
        draw_palette(&palette, &mut surface);
        let image = surface.image();
        assert_eq!(*image.get_pixel(2, 2), Rgba([255, 0, 0, 255]));
        assert_eq!(*image.get_pixel(97, 2), Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn image_surface_draws_text_in_contrast_color() {
        let mut surface = ImageSurface::new(300, 100);
        let palette = Palette::from_hexes(&["#000000"]).unwrap();
        draw_palette(&palette, &mut surface);
        let image = surface.image();

        // hex label baseline at 50 - 15, glyphs 21px tall above it
        let white_in_label = (14..35)
            .flat_map(|y| (0..300).map(move |x| (x, y)))
            .any(|(x, y)| *image.get_pixel(x, y) == Rgba([255, 255, 255, 255]));
        assert!(white_in_label);

        // the watermark is half-transparent white over black
        let watermark = (73..80)
            .flat_map(|y| (100..280).map(move |x| (x, y)))
            .any(|(x, y)| is_mid_gray(*image.get_pixel(x, y)));
        assert!(watermark);
    }

    #[test]
    fn text_outside_surface_is_clipped() {
        let mut surface = ImageSurface::new(10, 10);
        let style = TextStyle {
            size_px: 40,
            bold: true,
            align: TextAlign::Left,
        };
        surface.fill_text("#FFFFFF", -30, 500, style, Rgba([1, 2, 3, 255]));
        surface.fill_text("#FFFFFF", 0, 30, style, Rgba([1, 2, 3, 255]));
        assert!(surface.image().pixels().any(|p| *p == Rgba([1, 2, 3, 255])));
    }

    /// Half-transparent white over opaque black, allowing for the
    /// compositor's float rounding.
    fn is_mid_gray(p: Rgba<u8>) -> bool {
        p[0] == p[1] && p[1] == p[2] && (127..=128).contains(&p[0]) && p[3] >= 254
    }

    #[test]
    fn translucent_fill_mixes_with_background() {
        let mut surface = ImageSurface::new(4, 4);
        surface.fill_rect(0, 0, 4, 4, Rgba([0, 0, 0, 255]));
        surface.fill_rect(0, 0, 2, 4, WATERMARK_COLOR);
        assert!(is_mid_gray(*surface.image().get_pixel(0, 0)));
        assert_eq!(*surface.image().get_pixel(3, 0), Rgba([0, 0, 0, 255]));

        // opaque paint replaces what is underneath
        surface.fill_rect(0, 0, 4, 4, Rgba([1, 2, 3, 255]));
        assert_eq!(*surface.image().get_pixel(0, 0), Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn png_export_decodes_back() {
        let bytes = PngExporter {
            width: 200,
            height: 300,
        }
        .render(&palette())
        .unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (200, 300));
        assert_eq!(*decoded.get_pixel(1, 1), Rgba([0x11, 0x22, 0x33, 255]));
        assert_eq!(*decoded.get_pixel(198, 1), Rgba([0xDD, 0xEE, 0xFF, 255]));
    }
}
