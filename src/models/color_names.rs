//! Named color table used to give mined colors a human-readable name.
//!
//! The table is embedded JSON. Lookup returns the exact entry when the hex
//! value is listed, otherwise the entry with the smallest combined RGB + HSL
//! distance (HSL weighted twice), ties resolved by table order.

use std::sync::OnceLock;

use serde::Deserialize;

use super::RgbColor;

/// Raw table schema from color_names.json.
#[derive(Debug, Clone, Deserialize)]
struct ColorNameDatabase {
    #[allow(dead_code)]
    version: String,
    colors: Vec<RawNamedColor>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawNamedColor {
    name: String,
    hex: String,
}

/// A single named color with precomputed HSL (scaled to 0-255).
#[derive(Debug, Clone)]
pub struct NamedColor {
    /// Display name (e.g., "Alice Blue").
    pub name: String,
    /// Color value.
    pub rgb: RgbColor,
    hsl: (f64, f64, f64),
}

/// Lookup table of named colors.
#[derive(Debug, Clone)]
pub struct ColorNameTable {
    colors: Vec<NamedColor>,
}

/// Name returned when the table is empty.
const UNKNOWN_NAME: &str = "Unknown";

impl ColorNameTable {
    /// Load the table from embedded JSON data.
    ///
    /// Entries whose hex value does not parse are dropped.
    ///
    /// # Errors
    /// Returns an error if the JSON data cannot be parsed.
    pub fn load() -> anyhow::Result<Self> {
        let json_data = include_str!("../data/color_names.json");
        let db: ColorNameDatabase = serde_json::from_str(json_data)?;
        Ok(Self::from_entries(
            db.colors
                .into_iter()
                .filter_map(|c| RgbColor::from_hex(&c.hex).ok().map(|rgb| (c.name, rgb))),
        ))
    }

    /// Builds a table from `(name, color)` pairs, keeping their order.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, RgbColor)>) -> Self {
        let colors = entries
            .into_iter()
            .map(|(name, rgb)| NamedColor {
                name,
                rgb,
                hsl: scaled_hsl(rgb),
            })
            .collect();
        Self { colors }
    }

    /// Number of named colors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Returns the name of the closest table entry.
    #[must_use]
    pub fn nearest(&self, color: RgbColor) -> &str {
        if let Some(exact) = self.colors.iter().find(|c| c.rgb == color) {
            return &exact.name;
        }

        let (h, s, l) = scaled_hsl(color);
        let mut best: Option<(&NamedColor, f64)> = None;
        for candidate in &self.colors {
            let rgb_distance = square(f64::from(color.r) - f64::from(candidate.rgb.r))
                + square(f64::from(color.g) - f64::from(candidate.rgb.g))
                + square(f64::from(color.b) - f64::from(candidate.rgb.b));
            let hsl_distance = square(h - candidate.hsl.0)
                + square(s - candidate.hsl.1)
                + square(l - candidate.hsl.2);
            let distance = rgb_distance + hsl_distance * 2.0;

            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((candidate, distance));
            }
        }

        best.map_or(UNKNOWN_NAME, |(c, _)| c.name.as_str())
    }
}

fn scaled_hsl(rgb: RgbColor) -> (f64, f64, f64) {
    let (h, s, l) = rgb.to_hsl();
    (h * 255.0, s * 255.0, l * 255.0)
}

fn square(v: f64) -> f64 {
    v * v
}

impl Default for ColorNameTable {
    fn default() -> Self {
        Self::load().unwrap_or_else(|_| Self { colors: Vec::new() })
    }
}

/// Process-wide table, loaded on first use.
pub fn named_colors() -> &'static ColorNameTable {
    static TABLE: OnceLock<ColorNameTable> = OnceLock::new();
    TABLE.get_or_init(ColorNameTable::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_table() {
        let table = ColorNameTable::load().expect("Failed to load color names");
        assert!(table.len() > 100);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_exact_match() {
        let table = named_colors();
        assert_eq!(table.nearest(RgbColor::new(255, 0, 0)), "Red");
        assert_eq!(table.nearest(RgbColor::new(255, 255, 255)), "White");
        assert_eq!(table.nearest(RgbColor::new(240, 248, 255)), "Alice Blue");
    }

    #[test]
    fn test_nearest_match() {
        let table = named_colors();
        assert_eq!(table.nearest(RgbColor::new(254, 0, 0)), "Red");
        assert_eq!(table.nearest(RgbColor::new(1, 1, 1)), "Black");
    }

    #[test]
    fn test_ties_resolve_by_table_order() {
        let table = ColorNameTable::from_entries(vec![
            ("First".to_string(), RgbColor::new(10, 10, 10)),
            ("Second".to_string(), RgbColor::new(10, 10, 10)),
        ]);
        assert_eq!(table.nearest(RgbColor::new(10, 10, 10)), "First");
        assert_eq!(table.nearest(RgbColor::new(12, 12, 12)), "First");
    }

    #[test]
    fn test_empty_table() {
        let table = ColorNameTable::from_entries(Vec::new());
        assert_eq!(table.nearest(RgbColor::new(1, 2, 3)), UNKNOWN_NAME);
    }
}
