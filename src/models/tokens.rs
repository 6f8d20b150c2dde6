//! Design token records produced by the miners and kept in the token store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Project identifier assigned by the project registry.
pub type ProjectId = u64;

/// A color token.
///
/// `og_name` is derived from the value alone; `name` is the label declared in
/// the document, falling back to `og_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorToken {
    /// Owning project
    pub project_id: ProjectId,
    /// Display name
    pub name: String,
    /// Name derived from the color value
    pub og_name: String,
    /// `#rrggbb`
    pub value: String,
    /// Reviewed by a human
    pub checked: bool,
    /// Another value in the same batch resolved to the same `og_name`
    pub double_name: bool,
}

/// Semantic text element a typography style is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKey {
    /// Heading level 1
    H1,
    /// Heading level 2
    H2,
    /// Heading level 3
    H3,
    /// Heading level 4
    H4,
    /// Heading level 5
    H5,
    /// Heading level 6
    H6,
    /// Paragraph
    P,
}

impl ElementKey {
    /// All keys in document order.
    pub const ALL: [Self; 7] = [
        Self::H1,
        Self::H2,
        Self::H3,
        Self::H4,
        Self::H5,
        Self::H6,
        Self::P,
    ];

    /// Lower-case tag name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::H4 => "h4",
            Self::H5 => "h5",
            Self::H6 => "h6",
            Self::P => "p",
        }
    }

    /// Paragraph styles do not need a format tag.
    #[must_use]
    pub const fn is_paragraph(&self) -> bool {
        matches!(self, Self::P)
    }
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow::anyhow!("Unknown element key '{s}'"))
    }
}

/// A typography token: the aggregate of every style sharing one element key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographyToken {
    /// Owning project
    pub project_id: ProjectId,
    /// Element the token describes
    pub key: ElementKey,
    /// Distinct `#rrggbb` colors, first-seen order
    pub colors: Vec<String>,
    /// Smallest font size (None if no contributing style declared one)
    pub min_size: Option<f64>,
    /// Largest font size
    pub base_size: Option<f64>,
    /// Some contributing style is an italic variant
    pub has_italic: bool,
    /// Distinct weight names of the non-italic font variants
    pub weight: Vec<String>,
    /// Base font family name
    pub family: Option<String>,
    /// First kerning value seen
    #[serde(default)]
    pub kerning: Option<f64>,
    /// Largest maximum line height seen
    #[serde(default)]
    pub max_line_height: Option<f64>,
    /// Reviewed by a human; reset whenever the token is rewritten
    pub checked: bool,
}
