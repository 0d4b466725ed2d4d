use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{PaletteError, Result};
use crate::model::{ColorSlot, Palette};

use super::{Exporter, SOURCE_TAG};

/// Field order here is the order in the output document.
#[derive(Debug, Serialize, Deserialize)]
struct PaletteDocument {
    palette: Vec<SlotEntry>,
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    source: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct SlotEntry {
    hex: String,
    #[serde(default)]
    rgb: String,
    #[serde(default)]
    locked: bool,
}

/// Pretty-printed JSON document with a timestamp.
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn name(&self) -> &str {
        "JSON"
    }

    fn file_name(&self) -> &str {
        "palette.json"
    }

    fn render(&self, palette: &Palette) -> Result<Vec<u8>> {
        to_json(palette).map(String::into_bytes)
    }
}

/// Serialize `palette`, stamped with the current time.
pub fn to_json(palette: &Palette) -> Result<String> {
    to_json_at(palette, Utc::now())
}

/// Serialize `palette` with an explicit timestamp.
pub fn to_json_at(palette: &Palette, timestamp: DateTime<Utc>) -> Result<String> {
    let document = PaletteDocument {
        palette: palette
            .slots()
            .iter()
            .map(|slot| SlotEntry {
                hex: slot.hex(),
                rgb: slot.color.rgb_string(),
                locked: slot.locked,
            })
            .collect(),
        timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        source: SOURCE_TAG.to_string(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Read back a document written by [`to_json`]. Ids follow list order and
/// lock flags are kept; `rgb`, `timestamp` and `source` are ignored.
pub fn from_json(text: &str) -> Result<Palette> {
    let document: PaletteDocument = serde_json::from_str(text)?;
    if document.palette.is_empty() {
        return Err(PaletteError::InsufficientSlots {
            required: 1,
            found: 0,
        });
    }
    let slots = document
        .palette
        .iter()
        .enumerate()
        .map(|(id, entry)| {
            Ok(ColorSlot {
                id,
                color: Color::from_hex(&entry.hex)?,
                locked: entry.locked,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Palette::from_slots(slots))
}
