//! Data models for colors, design tokens and Sketch documents.
//!
//! Models are independent of extraction, mining and storage logic.

pub mod color_names;
pub mod document;
pub mod rgb;
pub mod tokens;

// Re-export all model types
pub use color_names::{named_colors, ColorNameTable, NamedColor};
pub use document::{RawColor, RawColorAsset, RawTextStyle, SketchDocument};
pub use rgb::{color_from_rgba, ColorValue, RgbColor};
pub use tokens::{ColorToken, ElementKey, ProjectId, TypographyToken};
