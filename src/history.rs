//! Linear undo/redo history over immutable snapshots.
//!
//! The history is a list of snapshots plus a cursor pointing at the one on
//! screen. Pushing after an undo drops the redo branch; pushing a snapshot
//! equal to the current one does nothing.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{Direction, PaletteError, Result};

/// Append-only, truncate-on-branch snapshot history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History<T> {
    entries: Vec<T>,
    cursor: usize,
    limit: Option<usize>,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            limit: None,
        }
    }
}

impl<T: PartialEq + Clone> History<T> {
    /// A history holding only `initial`, with the cursor on it.
    pub fn new(initial: T) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
            limit: None,
        }
    }

    /// Like [`History::new`] but keeping at most `limit` entries; the oldest
    /// are evicted first. A limit of zero is treated as one.
    pub fn with_limit(initial: T, limit: usize) -> Self {
        Self {
            limit: Some(limit.max(1)),
            ..Self::new(initial)
        }
    }

    /// Record `snapshot` as the new current entry.
    ///
    /// Returns `false` without touching anything when `snapshot` equals the
    /// current entry.
    pub fn push(&mut self, snapshot: T) -> bool {
        if self.entries.get(self.cursor) == Some(&snapshot) {
            return false;
        }
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(snapshot);
        self.cursor = self.entries.len() - 1;

        if let Some(limit) = self.limit {
            let excess = self.entries.len().saturating_sub(limit);
            if excess > 0 {
                self.entries.drain(..excess);
                self.cursor -= excess;
            }
        }
        true
    }

    /// Step back one entry.
    pub fn undo(&mut self) -> Result<&T> {
        if self.cursor == 0 || self.entries.is_empty() {
            return Err(PaletteError::AtBoundary(Direction::Undo));
        }
        self.cursor -= 1;
        Ok(&self.entries[self.cursor])
    }

    /// Step forward one entry.
    pub fn redo(&mut self) -> Result<&T> {
        if self.cursor + 1 >= self.entries.len() {
            return Err(PaletteError::AtBoundary(Direction::Redo));
        }
        self.cursor += 1;
        Ok(&self.entries[self.cursor])
    }

    pub fn current(&self) -> Result<&T> {
        self.entries.get(self.cursor).ok_or(PaletteError::EmptyHistory)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }
}

/// A [`History`] behind a mutex, for callers that may push from several
/// threads (e.g. key repeat feeding a worker). Each operation holds the lock
/// for its whole duration, so every push sees a consistent cursor.
#[derive(Debug, Clone)]
pub struct SharedHistory<T> {
    inner: Arc<Mutex<History<T>>>,
}

impl<T: PartialEq + Clone> SharedHistory<T> {
    pub fn new(history: History<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(history)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, History<T>> {
        // every operation leaves the history consistent, so a poisoned lock
        // still guards valid data
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, snapshot: T) -> bool {
        self.lock().push(snapshot)
    }

    pub fn undo(&self) -> Result<T> {
        self.lock().undo().cloned()
    }

    pub fn redo(&self) -> Result<T> {
        self.lock().redo().cloned()
    }

    pub fn current(&self) -> Result<T> {
        self.lock().current().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the underlying history.
    pub fn snapshot(&self) -> History<T> {
        self.lock().clone()
    }
}
