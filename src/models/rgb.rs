//! RGB color handling: unit-float conversion, hex rendering and HSL.

// Allow intentional type casts for color math
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
// Allow float comparisons in HSL conversion (standard algorithms)
#![allow(clippy::float_cmp)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::color_names::named_colors;

/// 8-bit RGB color.
///
/// Rendered as a lower-case `#rrggbb` string, which is the form every token
/// record stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RgbColor {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl RgbColor {
    /// Creates a new `RgbColor` from individual channel values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Creates an `RgbColor` from unit floats (0.0-1.0 per channel).
    ///
    /// Each channel becomes `round(channel * 255)`. Values outside the unit
    /// range are clamped, NaN maps to 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketch_tokens::models::RgbColor;
    ///
    /// let color = RgbColor::from_unit(1.0, 0.5, 0.0);
    /// assert_eq!(color, RgbColor::new(255, 128, 0));
    /// ```
    #[must_use]
    pub fn from_unit(red: f64, green: f64, blue: f64) -> Self {
        Self {
            r: unit_to_byte(red),
            g: unit_to_byte(green),
            b: unit_to_byte(blue),
        }
    }

    /// Parses an `RgbColor` from a hex string.
    ///
    /// Supports formats: "#RRGGBB", "RRGGBB", "#rrggbb", "rrggbb"
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid hex color format.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);

        if hex.len() != 6 || !hex.is_ascii() {
            anyhow::bail!("Invalid hex color format '{hex}'. Expected 6 hex digits (RRGGBB)");
        }

        let r = u8::from_str_radix(&hex[0..2], 16)
            .context(format!("Invalid red channel in hex color '{hex}'"))?;
        let g = u8::from_str_radix(&hex[2..4], 16)
            .context(format!("Invalid green channel in hex color '{hex}'"))?;
        let b = u8::from_str_radix(&hex[4..6], 16)
            .context(format!("Invalid blue channel in hex color '{hex}'"))?;

        Ok(Self::new(r, g, b))
    }

    /// Converts the color to a hex string in the format "#rrggbb" (lower-case).
    ///
    /// # Examples
    ///
    /// ```
    /// use sketch_tokens::models::RgbColor;
    ///
    /// assert_eq!(RgbColor::new(255, 0, 0).to_hex(), "#ff0000");
    /// assert_eq!(RgbColor::new(0, 128, 5).to_hex(), "#008005");
    /// ```
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Returns the per-channel two-digit hex pairs (`["ff", "00", "00"]`).
    #[must_use]
    pub fn hex_pairs(&self) -> [String; 3] {
        [
            format!("{:02x}", self.r),
            format!("{:02x}", self.g),
            format!("{:02x}", self.b),
        ]
    }

    /// Converts the color to HSL.
    ///
    /// # Returns
    ///
    /// A tuple `(h, s, l)` where every component is in 0.0-1.0
    /// (hue is a fraction of a full turn, 0.0 for grayscale).
    #[must_use]
    #[allow(clippy::many_single_char_names)] // Standard RGB/HSL color model uses single-char names
    pub fn to_hsl(&self) -> (f64, f64, f64) {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let l = (max + min) / 2.0;

        let s = if delta == 0.0 {
            0.0
        } else if l < 0.5 {
            delta / (max + min)
        } else {
            delta / (2.0 - max - min)
        };

        let h = if delta == 0.0 {
            0.0
        } else if max == r {
            ((g - b) / delta).rem_euclid(6.0) / 6.0
        } else if max == g {
            (((b - r) / delta) + 2.0) / 6.0
        } else {
            (((r - g) / delta) + 4.0) / 6.0
        };

        (h, s, l)
    }
}

fn unit_to_byte(channel: f64) -> u8 {
    if channel.is_nan() {
        return 0;
    }
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Default for RgbColor {
    /// Default color is black (#000000).
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

/// A normalized color: 8-bit channels, CSS hex value, separate alpha and the
/// nearest human-readable name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorValue {
    /// 8-bit channels
    pub rgb: RgbColor,
    /// Alpha, carried as given (never part of `css`)
    pub alpha: f64,
    /// `#rrggbb`
    pub css: String,
    /// Name from the named color table (the "og name")
    pub name: String,
}

/// Normalizes a unit-float RGBA color into hex + name.
///
/// Pure and deterministic: identical input always yields identical output.
///
/// # Examples
///
/// ```
/// use sketch_tokens::models::color_from_rgba;
///
/// let color = color_from_rgba(1.0, 0.0, 0.0, 0.5);
/// assert_eq!(color.css, "#ff0000");
/// assert_eq!(color.name, "Red");
/// assert_eq!(color.alpha, 0.5);
/// ```
#[must_use]
pub fn color_from_rgba(red: f64, green: f64, blue: f64, alpha: f64) -> ColorValue {
    let rgb = RgbColor::from_unit(red, green, blue);
    let name = named_colors().nearest(rgb).to_string();
    ColorValue {
        rgb,
        alpha,
        css: rgb.to_hex(),
        name,
    }
}
