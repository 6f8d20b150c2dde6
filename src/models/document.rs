//! Shapes of the parts of a Sketch `document.json` the miners read.
//!
//! Lists are kept as raw JSON values so one malformed entry only discards
//! itself; entries are decoded individually with [`RawColorAsset::decode`]
//! and [`RawTextStyle::decode`].

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Top-level document. Unknown keys are ignored.
///
/// The two mined sections stay raw so a section with an unexpected shape
/// only empties itself instead of failing the whole document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SketchDocument {
    /// `assets` object (colors, gradients, images)
    #[serde(default)]
    pub assets: Option<Value>,
    /// `layerTextStyles` object
    #[serde(default)]
    pub layer_text_styles: Option<Value>,
}

impl SketchDocument {
    /// Raw `assets.colorAssets` entries, empty if missing or not a list.
    #[must_use]
    pub fn color_assets(&self) -> &[Value] {
        section_list(self.assets.as_ref(), "colorAssets")
    }

    /// Raw `layerTextStyles.objects` entries, empty if missing or not a list.
    #[must_use]
    pub fn text_styles(&self) -> &[Value] {
        section_list(self.layer_text_styles.as_ref(), "objects")
    }
}

fn section_list<'a>(section: Option<&'a Value>, key: &str) -> &'a [Value] {
    match section.and_then(|s| s.get(key)) {
        None | Some(Value::Null) => &[],
        Some(Value::Array(items)) => items,
        Some(_) => {
            debug!(section = key, "ignoring section that is not a list");
            &[]
        }
    }
}

/// Unit-float RGBA color as Sketch stores it.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RawColor {
    /// Red (0.0-1.0)
    pub red: f64,
    /// Green (0.0-1.0)
    pub green: f64,
    /// Blue (0.0-1.0)
    pub blue: f64,
    /// Alpha (0.0-1.0)
    #[serde(default = "opaque")]
    pub alpha: f64,
}

fn opaque() -> f64 {
    1.0
}

/// One entry of `assets.colorAssets`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawColorAsset {
    /// Declared swatch name
    #[serde(default)]
    pub name: Option<String>,
    /// Swatch color
    pub color: RawColor,
}

impl RawColorAsset {
    /// Decodes one raw entry.
    ///
    /// # Errors
    /// Returns an error if the entry does not have the color asset shape.
    pub fn decode(value: &Value) -> serde_json::Result<Self> {
        Self::deserialize(value)
    }

    /// Declared name, ignoring blank strings.
    #[must_use]
    pub fn declared_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }
}

/// One entry of `layerTextStyles.objects`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTextStyle {
    /// Slash-separated classification name, e.g. `H1/Mobile/Italic`
    pub name: String,
    /// Style payload
    #[serde(default)]
    pub value: Option<StyleValue>,
}

impl RawTextStyle {
    /// Decodes one raw entry.
    ///
    /// # Errors
    /// Returns an error if the entry does not have the text style shape.
    pub fn decode(value: &Value) -> serde_json::Result<Self> {
        Self::deserialize(value)
    }

    /// Encoded text attributes, if present.
    #[must_use]
    pub fn attributes(&self) -> Option<&EncodedAttributes> {
        self.value
            .as_ref()
            .and_then(|v| v.text_style.as_ref())
            .and_then(|t| t.encoded_attributes.as_ref())
    }
}

/// `value` of a shared style.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleValue {
    /// Text portion of the style
    #[serde(default)]
    pub text_style: Option<TextStyle>,
}

/// `textStyle` of a shared style.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    /// Attributed-string attributes
    #[serde(default)]
    pub encoded_attributes: Option<EncodedAttributes>,
}

/// `encodedAttributes` of a text style.
#[derive(Debug, Clone, Deserialize)]
pub struct EncodedAttributes {
    /// Font descriptor
    #[serde(default, rename = "MSAttributedStringFontAttribute")]
    pub font: Option<FontAttribute>,
    /// Text color
    #[serde(default, rename = "MSAttributedStringColorAttribute")]
    pub color: Option<RawColor>,
    /// Letter spacing
    #[serde(default)]
    pub kerning: Option<f64>,
    /// Paragraph settings
    #[serde(default, rename = "paragraphStyle")]
    pub paragraph: Option<ParagraphStyle>,
}

/// `MSAttributedStringFontAttribute`.
#[derive(Debug, Clone, Deserialize)]
pub struct FontAttribute {
    /// Font attributes
    #[serde(default)]
    pub attributes: Option<FontDescriptor>,
}

/// Font name and size, e.g. `Roboto-Bold` at 24.
#[derive(Debug, Clone, Deserialize)]
pub struct FontDescriptor {
    /// PostScript font name
    #[serde(default)]
    pub name: Option<String>,
    /// Point size
    #[serde(default)]
    pub size: Option<f64>,
}

/// `paragraphStyle`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    /// Maximum line height
    #[serde(default)]
    pub maximum_line_height: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_without_sections() {
        let doc: SketchDocument = serde_json::from_value(json!({"do_objectID": "x"})).unwrap();
        assert!(doc.color_assets().is_empty());
        assert!(doc.text_styles().is_empty());
    }

    #[test]
    fn test_misshapen_sections_are_empty() {
        let doc: SketchDocument = serde_json::from_value(json!({
            "assets": {"colorAssets": {"not": "a list"}},
            "layerTextStyles": "oops"
        }))
        .unwrap();
        assert!(doc.color_assets().is_empty());
        assert!(doc.text_styles().is_empty());
    }

    #[test]
    fn test_decode_color_asset() {
        let raw = json!({
            "_class": "MSImmutableColorAsset",
            "name": "Primary",
            "color": {"_class": "color", "red": 1, "green": 0.5, "blue": 0, "alpha": 1}
        });
        let asset = RawColorAsset::decode(&raw).unwrap();
        assert_eq!(asset.declared_name(), Some("Primary"));
        assert_eq!(asset.color.green, 0.5);
    }

    #[test]
    fn test_blank_name_is_not_declared() {
        let raw = json!({"name": "  ", "color": {"red": 0, "green": 0, "blue": 0}});
        let asset = RawColorAsset::decode(&raw).unwrap();
        assert_eq!(asset.declared_name(), None);
        assert_eq!(asset.color.alpha, 1.0);
    }

    #[test]
    fn test_decode_color_asset_wrong_shape() {
        assert!(RawColorAsset::decode(&json!({"name": "x"})).is_err());
        assert!(RawColorAsset::decode(&json!({"color": {"red": "1"}})).is_err());
    }

    #[test]
    fn test_decode_text_style_attributes() {
        let raw = json!({
            "name": "H1/Mobile",
            "value": {"textStyle": {"encodedAttributes": {
                "MSAttributedStringFontAttribute": {"attributes": {"name": "Roboto-Bold", "size": 24}},
                "MSAttributedStringColorAttribute": {"red": 0, "green": 0, "blue": 0, "alpha": 1},
                "kerning": 0.5,
                "paragraphStyle": {"maximumLineHeight": 32}
            }}}
        });
        let style = RawTextStyle::decode(&raw).unwrap();
        let attrs = style.attributes().unwrap();
        let font = attrs.font.as_ref().and_then(|f| f.attributes.as_ref()).unwrap();
        assert_eq!(font.name.as_deref(), Some("Roboto-Bold"));
        assert_eq!(font.size, Some(24.0));
        assert_eq!(attrs.kerning, Some(0.5));
        assert_eq!(attrs.paragraph.as_ref().unwrap().maximum_line_height, Some(32.0));
    }
}
