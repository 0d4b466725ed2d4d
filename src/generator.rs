use rand::Rng;

use crate::color::Color;
use crate::model::{ColorSlot, Palette};

/// Draw a color with each channel picked uniformly from `0..=255`.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    Color::new(rng.random(), rng.random(), rng.random())
}

/// A random `#RRGGBB` from the thread-local generator.
pub fn random_hex() -> String {
    random_color(&mut rand::rng()).to_hex()
}

/// A fully random, unlocked palette of `len` slots.
pub fn random_palette<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Palette {
    Palette::from_colors((0..len).map(|_| random_color(rng)))
}

/// New palette with every unlocked slot redrawn. Locked slots, ids and lock
/// flags carry over unchanged.
pub fn regenerate<R: Rng + ?Sized>(palette: &Palette, rng: &mut R) -> Palette {
    let slots = palette
        .slots()
        .iter()
        .map(|slot| {
            if slot.locked {
                *slot
            } else {
                ColorSlot {
                    color: random_color(rng),
                    ..*slot
                }
            }
        })
        .collect();
    Palette::from_slots(slots)
}
