//! Design token mining over extracted Sketch documents.
//!
//! Documents are loaded from extraction directories, then handed to the
//! color and typography miners. Malformed entries are discarded and counted,
//! never reported as errors.

pub mod colors;
pub mod typography;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::warn;

use crate::constants::DOCUMENT_FILE;
use crate::models::{ColorToken, ProjectId, SketchDocument, TypographyToken};

pub use colors::{mine_colors, ColorMining};
pub use typography::{
    aggregate, divide_typo, mine_typography, ClassifiedStyle, DiscardReason, FormatMatcher,
    TypographyMining,
};

/// A parsed `document.json` and where it came from.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// Path of the document file
    pub path: PathBuf,
    /// Parsed document
    pub document: SketchDocument,
}

/// Reads and parses `<dir>/document.json`.
///
/// # Errors
///
/// Returns an error if the file is missing or is not a JSON object.
pub async fn load_document(dir: &Path) -> Result<LoadedDocument> {
    let path = dir.join(DOCUMENT_FILE);
    let content = tokio::fs::read(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document: SketchDocument = serde_json::from_slice(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(LoadedDocument { path, document })
}

/// Loads the documents of `dirs` in the given order.
///
/// Unreadable documents are logged and left out; the second value counts them.
pub async fn load_documents(dirs: &[PathBuf]) -> (Vec<LoadedDocument>, usize) {
    let mut documents = Vec::with_capacity(dirs.len());
    let mut failed = 0;
    for dir in dirs {
        match load_document(dir).await {
            Ok(doc) => documents.push(doc),
            Err(e) => {
                warn!(directory = %dir.display(), error = ?e, "skipping document");
                failed += 1;
            }
        }
    }
    (documents, failed)
}

/// Counters of one mining pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MiningReport {
    /// Documents mined
    pub documents: usize,
    /// Documents that could not be loaded
    pub unreadable_documents: usize,
    /// Color asset entries seen
    pub color_assets: usize,
    /// Color entries dropped as duplicate values
    pub duplicate_colors: usize,
    /// Color entries dropped as malformed
    pub discarded_colors: usize,
    /// Text style entries seen
    pub text_styles: usize,
    /// Text style entries dropped as malformed or unclassified
    pub discarded_styles: usize,
}

/// Everything mined from one batch of documents.
#[derive(Debug, Clone, Default)]
pub struct MinedTokens {
    /// Color candidates
    pub colors: Vec<ColorToken>,
    /// Typography tokens
    pub typography: Vec<TypographyToken>,
    /// Counters
    pub report: MiningReport,
}

/// Runs both miners over `documents`.
#[must_use]
pub fn mine(project_id: ProjectId, documents: &[LoadedDocument], matcher: &FormatMatcher) -> MinedTokens {
    let colors = mine_colors(project_id, documents);
    let typography = mine_typography(project_id, documents, matcher);

    MinedTokens {
        report: MiningReport {
            documents: documents.len(),
            unreadable_documents: 0,
            color_assets: colors.seen,
            duplicate_colors: colors.duplicates,
            discarded_colors: colors.discarded,
            text_styles: typography.seen,
            discarded_styles: typography.discarded,
        },
        colors: colors.tokens,
        typography: typography.tokens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_documents_skips_broken() {
        let temp = TempDir::new().unwrap();
        let good = temp.path().join("good");
        let broken = temp.path().join("broken");
        let missing = temp.path().join("missing");
        fs::create_dir_all(&good).unwrap();
        fs::create_dir_all(&broken).unwrap();
        fs::write(good.join(DOCUMENT_FILE), json!({"assets": {}}).to_string()).unwrap();
        fs::write(broken.join(DOCUMENT_FILE), "{ not json").unwrap();

        let (docs, failed) = load_documents(&[good.clone(), broken, missing]).await;

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].path, good.join(DOCUMENT_FILE));
        assert_eq!(failed, 2);
    }

    #[tokio::test]
    async fn test_bad_section_keeps_the_other_section() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("doc");
        fs::create_dir_all(&dir).unwrap();
        let body = json!({
            "assets": {"colorAssets": null},
            "layerTextStyles": {"objects": [{
                "name": "H1/Mobile",
                "value": {"textStyle": {"encodedAttributes": {
                    "MSAttributedStringFontAttribute": {"attributes": {"name": "Roboto-Bold", "size": 24}}
                }}}
            }]}
        });
        fs::write(dir.join(DOCUMENT_FILE), body.to_string()).unwrap();

        let (docs, failed) = load_documents(&[dir]).await;
        assert_eq!((docs.len(), failed), (1, 0));

        let mined = mine(1, &docs, &FormatMatcher::default());
        assert!(mined.colors.is_empty());
        assert_eq!(mined.typography.len(), 1);
        assert_eq!(mined.typography[0].key, crate::models::ElementKey::H1);
        assert_eq!(mined.typography[0].base_size, Some(24.0));
    }

    #[test]
    fn test_mine_fills_report() {
        let document: SketchDocument = serde_json::from_value(json!({
            "assets": {"colorAssets": [
                {"color": {"red": 1, "green": 1, "blue": 1, "alpha": 1}},
                {"color": {"red": 1, "green": 1, "blue": 1, "alpha": 0.5}},
                {"colour": {}}
            ]},
            "layerTextStyles": {"objects": [
                {"name": "P"},
                {"name": "Caption"}
            ]}
        }))
        .unwrap();
        let docs = vec![LoadedDocument {
            path: PathBuf::from("x/document.json"),
            document,
        }];

        let mined = mine(2, &docs, &FormatMatcher::default());

        assert_eq!(mined.colors.len(), 1);
        assert_eq!(mined.typography.len(), 1);
        assert_eq!(
            mined.report,
            MiningReport {
                documents: 1,
                unreadable_documents: 0,
                color_assets: 3,
                duplicate_colors: 1,
                discarded_colors: 1,
                text_styles: 2,
                discarded_styles: 1,
            }
        );
    }
}
