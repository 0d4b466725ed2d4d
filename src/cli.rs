use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::export::png::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::export::ExportFormat;
use crate::model::DEFAULT_SLOTS;
use crate::scheme::SchemeKind;

/// Generate, lock, theme and export color palettes.
#[derive(Parser, Debug)]
#[command(name = "paletto", version, about)]
pub struct Args {
    /// State file (defaults to $XDG_CONFIG_HOME/paletto/state.json)
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    /// Number of color slots
    #[arg(long, global = true, default_value_t = DEFAULT_SLOTS)]
    pub slots: usize,

    /// Seed for the color generator, for reproducible palettes
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Print hex values only, without colored swatches
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the current palette (default)
    Show,

    /// Replace every unlocked slot with a random color
    Generate,

    /// Toggle the lock on a slot
    Lock {
        /// Slot index, starting at 0
        id: usize,
    },

    /// Set a slot to a hex color such as #1A2B3C
    Set {
        /// Slot index, starting at 0
        id: usize,
        hex: String,
    },

    /// Print a harmony scheme built on a base color
    Scheme {
        /// Base color as #RRGGBB
        hex: String,

        #[arg(short, long, value_enum, default_value_t = SchemeKind::Complementary)]
        kind: SchemeKind,
    },

    /// Write the palette as PNG, CSS or JSON
    Export {
        #[arg(short, long, value_enum)]
        format: ExportFormat,

        /// Output file (defaults to palette.<ext> in the working directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// PNG width in pixels
        #[arg(long, default_value_t = DEFAULT_WIDTH)]
        width: u32,

        /// PNG height in pixels
        #[arg(long, default_value_t = DEFAULT_HEIGHT)]
        height: u32,
    },

    /// Load a palette from a JSON export
    Import {
        file: PathBuf,
    },

    /// Launch the interactive TUI
    Tui,
}
