use std::fmt;

use thiserror::Error;

/// Which end of the history an undo or redo ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Undo,
    Redo,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Undo => f.write_str("nothing to undo"),
            Direction::Redo => f.write_str("nothing to redo"),
        }
    }
}

/// Errors surfaced by the palette engine.
///
/// None of these are fatal: shells report them to the user and carry on.
#[derive(Debug, Error)]
pub enum PaletteError {
    /// A hex color did not match `#RRGGBB`.
    #[error("invalid hex color '{0}': expected '#' followed by 6 hex digits")]
    InvalidFormat(String),

    /// An export needs more slots than the palette has.
    #[error("palette has {found} slots, this export needs at least {required}")]
    InsufficientSlots { required: usize, found: usize },

    /// The history was queried before anything was pushed.
    #[error("history is empty")]
    EmptyHistory,

    /// Undo or redo at the edge of the history. Callers usually ignore it.
    #[error("{0}")]
    AtBoundary(Direction),

    #[error("no slot with id {0}")]
    UnknownSlot(usize),

    #[error(
        "unknown scheme '{0}': expected complementary, analogous, triadic, tetradic \
         or monochromatic"
    )]
    UnknownScheme(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, PaletteError>;
