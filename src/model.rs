use crate::color::Color;
use crate::error::{PaletteError, Result};
use crate::scheme::SchemeKind;

/// Number of slots in a fresh palette.
pub const DEFAULT_SLOTS: usize = 5;

/// One position in a palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorSlot {
    /// Stable index, `0..N`.
    pub id: usize,
    pub color: Color,
    /// Locked slots survive regeneration untouched.
    pub locked: bool,
}

impl ColorSlot {
    pub fn new(id: usize, color: Color) -> Self {
        Self {
            id,
            color,
            locked: false,
        }
    }

    pub fn hex(&self) -> String {
        self.color.to_hex()
    }
}

/// An ordered, fixed-size set of slots.
///
/// Palettes are values: every edit returns a new `Palette` so snapshots held
/// in history never change underneath it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Palette {
    slots: Vec<ColorSlot>,
}

impl Palette {
    /// Build a palette from colors, assigning ids by position. All slots start
    /// unlocked.
    pub fn from_colors(colors: impl IntoIterator<Item = Color>) -> Self {
        Self {
            slots: colors
                .into_iter()
                .enumerate()
                .map(|(id, color)| ColorSlot::new(id, color))
                .collect(),
        }
    }

    /// Build a palette from already-formed slots, kept in the given order.
    pub fn from_slots(slots: Vec<ColorSlot>) -> Self {
        Self { slots }
    }

    /// Parse a list of hex strings into an unlocked palette.
    pub fn from_hexes<S: AsRef<str>>(hexes: &[S]) -> Result<Self> {
        let colors = hexes
            .iter()
            .map(|h| Color::from_hex(h.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_colors(colors))
    }

    pub fn slots(&self) -> &[ColorSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.slots.iter().map(|s| s.color)
    }

    pub fn slot(&self, id: usize) -> Result<&ColorSlot> {
        self.slots
            .iter()
            .find(|s| s.id == id)
            .ok_or(PaletteError::UnknownSlot(id))
    }

    /// Color at display position `index`, if the palette is that long.
    pub fn color_at(&self, index: usize) -> Option<Color> {
        self.slots.get(index).map(|s| s.color)
    }

    /// Copy of this palette with the lock on slot `id` flipped.
    pub fn with_lock_toggled(&self, id: usize) -> Result<Self> {
        self.map_slot(id, |slot| slot.locked = !slot.locked)
    }

    /// Copy of this palette with slot `id` set to `hex`.
    ///
    /// Malformed hex leaves `self` as it was and returns `InvalidFormat`.
    pub fn with_hex(&self, id: usize, hex: &str) -> Result<Self> {
        let color = Color::from_hex(hex)?;
        self.map_slot(id, |slot| slot.color = color)
    }

    fn map_slot(&self, id: usize, edit: impl FnOnce(&mut ColorSlot)) -> Result<Self> {
        let mut slots = self.slots.clone();
        let slot = slots
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(PaletteError::UnknownSlot(id))?;
        edit(slot);
        Ok(Self { slots })
    }

    /// Named groupings of existing slots, as shown under the palette:
    /// complementary (slots 0, 2), analogous (1, 2, 3) and triadic (0, 2, 4).
    /// Groupings that reference a missing slot are left out.
    pub fn slot_combinations(&self) -> Vec<(SchemeKind, Vec<Color>)> {
        const GROUPS: [(SchemeKind, &[usize]); 3] = [
            (SchemeKind::Complementary, &[0, 2]),
            (SchemeKind::Analogous, &[1, 2, 3]),
            (SchemeKind::Triadic, &[0, 2, 4]),
        ];

        GROUPS
            .iter()
            .filter_map(|(kind, indices)| {
                let colors = indices
                    .iter()
                    .map(|&i| self.color_at(i))
                    .collect::<Option<Vec<_>>>()?;
                Some((*kind, colors))
            })
            .collect()
    }
}
