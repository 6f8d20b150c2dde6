//! Typography token mining.
//!
//! A shared text style is named with slash-separated tags, e.g.
//! `H1/Desktop/Italic` or `P/Body`. Classification lower-cases the tags and
//! takes out, in order:
//!
//! 1. the first element tag (`h1`..`h6`, `p`), required;
//! 2. the first format tag (breakpoint or device), required unless the
//!    element is `p`.
//!
//! An `italic` tag marks the style as an italic variant but stays among the
//! remaining free-form tags. Classified styles are then grouped per element
//! and folded into one [`TypographyToken`] each.

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;
use tracing::debug;

use super::LoadedDocument;
use crate::config::TypographyConfig;
use crate::models::{color_from_rgba, ElementKey, ProjectId, RawTextStyle, TypographyToken};

/// Weight used when a font name has no dash-separated weight.
const DEFAULT_WEIGHT: &str = "Regular";

/// Decides whether a name segment is a format tag.
#[derive(Debug, Clone)]
pub struct FormatMatcher {
    tokens: Vec<String>,
    numeric: Option<Regex>,
}

impl FormatMatcher {
    /// Builds a matcher from the typography configuration.
    #[must_use]
    pub fn new(config: &TypographyConfig) -> Self {
        let numeric = if config.numeric_breakpoints {
            Regex::new(r"^\d{2,5}(px)?$").ok()
        } else {
            None
        };
        Self {
            tokens: config
                .format_tokens
                .iter()
                .map(|t| t.trim().to_lowercase())
                .collect(),
            numeric,
        }
    }

    /// Whether `segment` (already lower-cased) names a format.
    #[must_use]
    pub fn matches(&self, segment: &str) -> bool {
        self.tokens.iter().any(|t| t == segment)
            || self.numeric.as_ref().is_some_and(|re| re.is_match(segment))
    }
}

impl Default for FormatMatcher {
    fn default() -> Self {
        Self::new(&TypographyConfig::default())
    }
}

/// Why a style did not classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// No element tag in the name
    NoElement,
    /// Heading without a format tag
    NoFormat,
}

impl fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoElement => write!(f, "no element tag"),
            Self::NoFormat => write!(f, "heading without format tag"),
        }
    }
}

/// A text style that passed classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedStyle {
    /// Original style name
    pub name: String,
    /// Element tag
    pub key: ElementKey,
    /// Format tag, if any
    pub format: Option<String>,
    /// Style name carries an `italic` tag
    pub has_italic_variant: bool,
    /// Unclassified tags, lower-cased
    pub variables: Vec<String>,
    /// Font size
    pub font_size: Option<f64>,
    /// PostScript font name, e.g. `Roboto-Bold`
    pub font_family: Option<String>,
    /// Text color as `#rrggbb`
    pub color: Option<String>,
    /// Letter spacing
    pub kerning: Option<f64>,
    /// Maximum line height
    pub line_height: Option<f64>,
}

/// Classifies one decoded style.
///
/// # Errors
///
/// Returns the [`DiscardReason`] when the name has no element tag, or names
/// a heading without a format tag.
pub fn divide_typo(
    style: &RawTextStyle,
    matcher: &FormatMatcher,
) -> Result<ClassifiedStyle, DiscardReason> {
    let mut segments: Vec<String> = style
        .name
        .split('/')
        .map(|s| s.trim().to_lowercase())
        .collect();

    let element_at = segments
        .iter()
        .position(|s| s.parse::<ElementKey>().is_ok())
        .ok_or(DiscardReason::NoElement)?;
    let key = segments
        .remove(element_at)
        .parse::<ElementKey>()
        .map_err(|_| DiscardReason::NoElement)?;

    let format = segments
        .iter()
        .position(|s| matcher.matches(s))
        .map(|at| segments.remove(at));
    if format.is_none() && !key.is_paragraph() {
        return Err(DiscardReason::NoFormat);
    }

    let has_italic_variant = segments.iter().any(|s| s == "italic");

    let attributes = style.attributes();
    let font = attributes
        .and_then(|a| a.font.as_ref())
        .and_then(|f| f.attributes.as_ref());

    Ok(ClassifiedStyle {
        name: style.name.clone(),
        key,
        format,
        has_italic_variant,
        variables: segments.into_iter().filter(|s| !s.is_empty()).collect(),
        font_size: font.and_then(|f| f.size),
        font_family: font.and_then(|f| f.name.clone()),
        color: attributes
            .and_then(|a| a.color)
            .map(|c| color_from_rgba(c.red, c.green, c.blue, c.alpha).css),
        kerning: attributes.and_then(|a| a.kerning),
        line_height: attributes
            .and_then(|a| a.paragraph.as_ref())
            .and_then(|p| p.maximum_line_height),
    })
}

/// Result of a typography mining pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypographyMining {
    /// One token per element key present, in key order
    pub tokens: Vec<TypographyToken>,
    /// Style entries looked at
    pub seen: usize,
    /// Entries that did not decode or classify
    pub discarded: usize,
}

/// Mines typography tokens for `project_id` from `documents`.
#[must_use]
pub fn mine_typography(
    project_id: ProjectId,
    documents: &[LoadedDocument],
    matcher: &FormatMatcher,
) -> TypographyMining {
    let mut seen = 0;
    let mut discarded = 0;
    let mut classified = Vec::new();

    for doc in documents {
        for raw in doc.document.text_styles() {
            seen += 1;

            let style = match RawTextStyle::decode(raw) {
                Ok(style) => style,
                Err(e) => {
                    debug!(document = %doc.path.display(), error = %e, "discarding text style");
                    discarded += 1;
                    continue;
                }
            };

            match divide_typo(&style, matcher) {
                Ok(c) => classified.push(c),
                Err(reason) => {
                    debug!(document = %doc.path.display(), style = %style.name, %reason, "discarding text style");
                    discarded += 1;
                }
            }
        }
    }

    TypographyMining {
        tokens: aggregate(project_id, &classified),
        seen,
        discarded,
    }
}

/// Folds classified styles into one token per element key.
#[must_use]
pub fn aggregate(project_id: ProjectId, styles: &[ClassifiedStyle]) -> Vec<TypographyToken> {
    let mut groups: BTreeMap<ElementKey, Vec<&ClassifiedStyle>> = BTreeMap::new();
    for style in styles {
        groups.entry(style.key).or_default().push(style);
    }

    groups
        .into_iter()
        .map(|(key, group)| aggregate_group(project_id, key, &group))
        .collect()
}

fn aggregate_group(
    project_id: ProjectId,
    key: ElementKey,
    group: &[&ClassifiedStyle],
) -> TypographyToken {
    let sizes = group.iter().filter_map(|s| s.font_size);
    let min_size = sizes.clone().reduce(f64::min);
    let base_size = sizes.reduce(f64::max);

    let colors = distinct(group.iter().filter_map(|s| s.color.as_deref()));
    let families = distinct(group.iter().filter_map(|s| s.font_family.as_deref()));

    let upright: Vec<&String> = families.iter().filter(|f| !is_italic_font(f)).collect();
    let family = match upright.first() {
        Some(first) => Some(font_base_name(first).to_string()),
        None => {
            if !families.is_empty() {
                debug!(%key, "only italic font variants, family taken from first variant");
            }
            families.first().map(|f| font_base_name(f).to_string())
        }
    };
    let weight = distinct(upright.iter().map(|f| font_weight(f)));

    TypographyToken {
        project_id,
        key,
        colors,
        min_size,
        base_size,
        has_italic: group.iter().any(|s| s.has_italic_variant),
        weight,
        family,
        kerning: group.iter().find_map(|s| s.kerning),
        max_line_height: group.iter().filter_map(|s| s.line_height).reduce(f64::max),
        checked: false,
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !out.iter().any(|v| v == value) {
            out.push(value.to_string());
        }
    }
    out
}

/// A font variant is italic when its style part (after the first `-`)
/// contains `ita`: `Roboto-Italic`, `Roboto-BoldItalic`.
#[must_use]
pub fn is_italic_font(font_name: &str) -> bool {
    font_name
        .split_once('-')
        .is_some_and(|(_, style)| style.to_lowercase().contains("ita"))
}

/// `Roboto-Bold` -> `Roboto`
#[must_use]
pub fn font_base_name(font_name: &str) -> &str {
    font_name.split('-').next().unwrap_or(font_name)
}

/// `Roboto-Bold` -> `Bold`, `Roboto` -> `Regular`
#[must_use]
pub fn font_weight(font_name: &str) -> &str {
    font_name
        .split('-')
        .nth(1)
        .filter(|w| !w.is_empty())
        .unwrap_or(DEFAULT_WEIGHT)
}
