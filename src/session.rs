//! The state a shell drives: current palette, its history and persistence.

use anyhow::Result as AnyResult;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::color::Color;
use crate::error::Result;
use crate::generator::{random_color, regenerate};
use crate::history::History;
use crate::model::{ColorSlot, Palette};
use crate::scheme::{derive_scheme, Scheme, SchemeKind};
use crate::storage::{color_key, locked_key, KeyValueStore, DARK_MODE_KEY};

/// A hex value the user asked to copy. The shell does the clipboard write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyEvent {
    pub slot: usize,
    pub hex: String,
}

pub struct Session<S: KeyValueStore> {
    store: S,
    palette: Palette,
    history: History<Palette>,
    dark_mode: bool,
    rng: StdRng,
}

impl<S: KeyValueStore> Session<S> {
    /// Start a session of `slots` slots seeded from `store`, using OS entropy
    /// for new colors.
    pub fn load(store: S, slots: usize) -> Self {
        Self::load_with_rng(store, slots, StdRng::from_os_rng())
    }

    /// Start a session with an explicit generator, for reproducible runs.
    ///
    /// Missing or malformed persisted colors are replaced by random ones and
    /// missing lock flags count as unlocked.
    pub fn load_with_rng(store: S, slots: usize, mut rng: StdRng) -> Self {
        let slots = slots.max(1);
        let palette = Palette::from_slots(
            (0..slots)
                .map(|id| seed_slot(&store, id, &mut rng))
                .collect(),
        );
        let dark_mode = store.get(DARK_MODE_KEY).as_deref() == Some("true");

        let mut session = Self {
            store,
            history: History::new(palette.clone()),
            palette,
            dark_mode,
            rng,
        };
        session.write_palette();
        session
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn history(&self) -> &History<Palette> {
        &self.history
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Redraw every unlocked slot. Returns whether a history entry was added;
    /// a result identical to the palette on screen (everything locked) adds
    /// none.
    pub fn regenerate(&mut self) -> bool {
        let next = regenerate(&self.palette, &mut self.rng);
        if next == self.palette {
            debug!("regenerate changed nothing");
            return false;
        }
        self.palette = next.clone();
        self.write_palette();
        let pushed = self.history.push(next);
        debug!(pushed, entries = self.history.len(), "palette regenerated");
        pushed
    }

    /// Flip the lock on slot `id`. Locks are not history entries.
    pub fn toggle_lock(&mut self, id: usize) -> Result<bool> {
        self.palette = self.palette.with_lock_toggled(id)?;
        self.write_palette();
        let locked = self.palette.slot(id)?.locked;
        debug!(slot = id, locked, "lock toggled");
        Ok(locked)
    }

    /// Set slot `id` from user-entered hex. On malformed input the palette is
    /// left as it was.
    pub fn set_hex(&mut self, id: usize, hex: &str) -> Result<bool> {
        let next = self.palette.with_hex(id, hex)?;
        self.palette = next.clone();
        self.write_palette();
        Ok(self.history.push(next))
    }

    pub fn undo(&mut self) -> Result<&Palette> {
        self.palette = self.history.undo()?.clone();
        self.write_palette();
        Ok(&self.palette)
    }

    pub fn redo(&mut self) -> Result<&Palette> {
        self.palette = self.history.redo()?.clone();
        self.write_palette();
        Ok(&self.palette)
    }

    /// Replace the whole palette, e.g. after an import. Recorded in history.
    pub fn replace(&mut self, palette: Palette) -> bool {
        self.palette = palette.clone();
        self.write_palette();
        self.history.push(palette)
    }

    pub fn copy(&self, id: usize) -> Result<CopyEvent> {
        let slot = self.palette.slot(id)?;
        Ok(CopyEvent {
            slot: id,
            hex: slot.hex(),
        })
    }

    /// Scheme of `kind` built on slot `id`.
    pub fn scheme(&self, id: usize, kind: SchemeKind) -> Result<Scheme> {
        Ok(derive_scheme(self.palette.slot(id)?.color, kind))
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.store.set(DARK_MODE_KEY, self.dark_mode.to_string());
        self.dark_mode
    }

    /// Flush pending writes to the store.
    pub fn save(&mut self) -> AnyResult<()> {
        self.store.flush()
    }

    fn write_palette(&mut self) {
        for slot in self.palette.slots() {
            self.store.set(&color_key(slot.id), slot.hex());
            self.store.set(&locked_key(slot.id), slot.locked.to_string());
        }
    }
}

fn seed_slot<S: KeyValueStore, R: Rng>(store: &S, id: usize, rng: &mut R) -> ColorSlot {
    let color = match store.get(&color_key(id)) {
        Some(hex) => Color::from_hex(&hex).unwrap_or_else(|err| {
            warn!(slot = id, %err, "ignoring persisted color");
            random_color(rng)
        }),
        None => {
            debug!(slot = id, "no persisted color");
            random_color(rng)
        }
    };
    let locked = match store.get(&locked_key(id)).as_deref() {
        Some("true") => true,
        Some("false") | None => false,
        Some(other) => {
            warn!(slot = id, value = other, "ignoring persisted lock flag");
            false
        }
    };
    ColorSlot { id, color, locked }
}
