//! Nearest-name lookup against a fixed color dictionary.

use serde::Deserialize;

use crate::color::{Color, Hsl};
use crate::error::{PaletteError, Result};

/// Built-in `[{"hex": "#RRGGBB", "name": "..."}]` dictionary.
pub const EMBEDDED_DICTIONARY: &[u8] = include_bytes!("../assets/colors.json");

/// Weight of the HSL term relative to the RGB term when scoring a match.
const HSL_WEIGHT: f64 = 2.0;

/// A dictionary entry as it appears in the JSON source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedColor {
    pub hex: String,
    pub name: String,
}

#[derive(Debug, Clone)]
struct Entry {
    named: NamedColor,
    rgb: Color,
    hsl: Hsl,
}

/// Immutable nearest-name matcher. Build once and share freely.
#[derive(Debug, Clone)]
pub struct ColorMatcher {
    entries: Vec<Entry>,
}

impl ColorMatcher {
    /// Parse a JSON dictionary and precompute RGB/HSL for every entry.
    pub fn new(json: &[u8]) -> Result<Self> {
        let colors: Vec<NamedColor> =
            serde_json::from_slice(json).map_err(PaletteError::dictionary_parse)?;
        if colors.is_empty() {
            return Err(PaletteError::bad_dictionary("dictionary has no entries"));
        }

        let entries = colors
            .into_iter()
            .map(|named| {
                let rgb = Color::from_hex(&named.hex).map_err(|e| {
                    PaletteError::bad_dictionary(format!("entry {:?}: {e}", named.name))
                })?;
                Ok(Entry {
                    hsl: rgb.to_hsl(),
                    rgb,
                    named,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        log::debug!("color dictionary loaded with {} entries", entries.len());
        Ok(Self { entries })
    }

    /// Matcher over the built-in dictionary.
    pub fn embedded() -> Result<Self> {
        Self::new(EMBEDDED_DICTIONARY)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Closest dictionary entry to a hex color.
    pub fn nearest(&self, hex: &str) -> Result<&NamedColor> {
        let color = Color::from_hex(hex)?;
        Ok(self.nearest_color(color))
    }

    /// Closest dictionary entry to `color`.
    ///
    /// Score is the squared RGB distance plus twice the squared HSL distance,
    /// both unnormalized (hue in degrees, S/L in percent). Ties keep the
    /// earliest entry in dictionary order.
    pub fn nearest_color(&self, color: Color) -> &NamedColor {
        let hsl = color.to_hsl();

        let mut best = &self.entries[0];
        let mut best_score = f64::INFINITY;
        for entry in &self.entries {
            let score = color.distance_sq(entry.rgb) + HSL_WEIGHT * hsl_distance_sq(hsl, entry.hsl);
            if score < best_score {
                best_score = score;
                best = entry;
            }
        }
        &best.named
    }
}

fn hsl_distance_sq(a: Hsl, b: Hsl) -> f64 {
    let dh = a.h - b.h;
    let ds = a.s - b.s;
    let dl = a.l - b.l;
    dh * dh + ds * ds + dl * dl
}
