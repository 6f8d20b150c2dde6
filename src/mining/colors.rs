//! Color token mining.
//!
//! Walks `assets.colorAssets` of every document in order, keeps the first
//! asset per hex value and flags every value whose derived name is shared
//! with another value in the batch.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::LoadedDocument;
use crate::models::{color_from_rgba, ColorToken, ProjectId, RawColorAsset};

/// Result of a color mining pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorMining {
    /// One candidate per distinct value, first-seen order
    pub tokens: Vec<ColorToken>,
    /// Asset entries looked at
    pub seen: usize,
    /// Entries dropped because the hex value was already taken
    pub duplicates: usize,
    /// Entries dropped because they did not decode
    pub discarded: usize,
}

/// Mines color token candidates for `project_id` from `documents`.
#[must_use]
pub fn mine_colors(project_id: ProjectId, documents: &[LoadedDocument]) -> ColorMining {
    let mut mining = ColorMining::default();
    let mut values: HashSet<String> = HashSet::new();
    // og_name -> index of the first token that used it
    let mut names: HashMap<String, usize> = HashMap::new();

    for doc in documents {
        for raw in doc.document.color_assets() {
            mining.seen += 1;

            let asset = match RawColorAsset::decode(raw) {
                Ok(asset) => asset,
                Err(e) => {
                    debug!(document = %doc.path.display(), error = %e, "discarding color asset");
                    mining.discarded += 1;
                    continue;
                }
            };

            let c = asset.color;
            let color = color_from_rgba(c.red, c.green, c.blue, c.alpha);
            if !values.insert(color.css.clone()) {
                mining.duplicates += 1;
                continue;
            }

            let double_name = match names.get(&color.name) {
                Some(&first) => {
                    mining.tokens[first].double_name = true;
                    true
                }
                None => {
                    names.insert(color.name.clone(), mining.tokens.len());
                    false
                }
            };

            mining.tokens.push(ColorToken {
                project_id,
                name: asset
                    .declared_name()
                    .map_or_else(|| color.name.clone(), ToString::to_string),
                og_name: color.name,
                value: color.css,
                checked: false,
                double_name,
            });
        }
    }

    mining
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SketchDocument;
    use serde_json::{json, Value};
    use std::path::PathBuf;

    fn doc(assets: Value) -> LoadedDocument {
        let document: SketchDocument =
            serde_json::from_value(json!({ "assets": { "colorAssets": assets } })).unwrap();
        LoadedDocument {
            path: PathBuf::from("doc/document.json"),
            document,
        }
    }

    fn asset(name: Option<&str>, r: f64, g: f64, b: f64) -> Value {
        match name {
            Some(n) => json!({"name": n, "color": {"red": r, "green": g, "blue": b, "alpha": 1}}),
            None => json!({"color": {"red": r, "green": g, "blue": b, "alpha": 1}}),
        }
    }

    #[test]
    fn test_dedup_by_value_keeps_first_name() {
        let docs = vec![doc(json!([
            asset(Some("Brand"), 1.0, 0.0, 0.0),
            asset(Some("Alert"), 1.0, 0.0, 0.0),
        ]))];

        let mining = mine_colors(1, &docs);

        assert_eq!(mining.tokens.len(), 1);
        assert_eq!(mining.tokens[0].name, "Brand");
        assert_eq!(mining.tokens[0].value, "#ff0000");
        assert_eq!(mining.tokens[0].og_name, "Red");
        assert_eq!(mining.duplicates, 1);
    }

    #[test]
    fn test_dedup_across_documents() {
        let docs = vec![
            doc(json!([asset(None, 0.0, 0.0, 0.0)])),
            doc(json!([asset(Some("Ink"), 0.0, 0.0, 0.0), asset(None, 1.0, 1.0, 1.0)])),
        ];

        let mining = mine_colors(1, &docs);

        let values: Vec<_> = mining.tokens.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["#000000", "#ffffff"]);
        assert_eq!(mining.tokens[0].name, "Black");
    }

    #[test]
    fn test_name_collision_flags_both() {
        // #ff0000 and #fe0000 both resolve to "Red"
        let docs = vec![doc(json!([
            asset(None, 1.0, 0.0, 0.0),
            asset(None, 0.0, 0.0, 1.0),
            asset(None, 254.0 / 255.0, 0.0, 0.0),
        ]))];

        let mining = mine_colors(1, &docs);

        assert_eq!(mining.tokens.len(), 3);
        assert!(mining.tokens[0].double_name);
        assert!(!mining.tokens[1].double_name);
        assert!(mining.tokens[2].double_name);
        assert_eq!(mining.tokens[2].og_name, "Red");
    }

    #[test]
    fn test_malformed_assets_are_discarded() {
        let docs = vec![doc(json!([
            {"name": "no color"},
            {"color": {"red": "high"}},
            asset(Some("Ok"), 0.0, 0.5, 0.0),
        ]))];

        let mining = mine_colors(3, &docs);

        assert_eq!(mining.seen, 3);
        assert_eq!(mining.discarded, 2);
        assert_eq!(mining.tokens.len(), 1);
        assert_eq!(mining.tokens[0].project_id, 3);
        assert!(!mining.tokens[0].checked);
    }

    #[test]
    fn test_document_without_assets() {
        let docs = vec![LoadedDocument {
            path: PathBuf::from("empty/document.json"),
            document: SketchDocument::default(),
        }];
        assert_eq!(mine_colors(1, &docs), ColorMining::default());
    }
}
