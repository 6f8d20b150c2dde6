//! Shared fixtures: Sketch document builders, zip archives and config files.
#![allow(dead_code)] // Not every test binary uses every fixture

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// A `colorAssets` entry. Channels are in `0..=1`.
pub fn color_asset(name: Option<&str>, red: f64, green: f64, blue: f64) -> Value {
    let color = json!({"red": red, "green": green, "blue": blue, "alpha": 1.0});
    match name {
        Some(name) => json!({"name": name, "color": color}),
        None => json!({"color": color}),
    }
}

/// A `layerTextStyles` entry with font, size and black text.
pub fn text_style(name: &str, font: &str, size: f64) -> Value {
    json!({
        "name": name,
        "value": {"textStyle": {"encodedAttributes": {
            "MSAttributedStringFontAttribute": {"attributes": {"name": font, "size": size}},
            "MSAttributedStringColorAttribute": {"red": 0, "green": 0, "blue": 0, "alpha": 1},
            "kerning": 0.5,
            "paragraphStyle": {"maximumLineHeight": size * 1.5}
        }}}
    })
}

/// A `document.json` body.
pub fn document(colors: Vec<Value>, styles: Vec<Value>) -> Value {
    json!({
        "_class": "document",
        "assets": {"_class": "assetCollection", "colorAssets": colors},
        "layerTextStyles": {"_class": "sharedTextStyleContainer", "objects": styles}
    })
}

/// Two brand colors and three styles: two H1 sizes and a paragraph.
pub fn sample_document() -> Value {
    document(
        vec![
            color_asset(Some("Brand Red"), 1.0, 0.0, 0.0),
            color_asset(None, 0.0, 0.0, 0.0),
            color_asset(Some("Also Red"), 1.0, 0.0, 0.0),
        ],
        vec![
            text_style("H1/Mobile", "Roboto-Bold", 24.0),
            text_style("H1/Desktop", "Roboto-Bold", 40.0),
            text_style("P", "Roboto-Regular", 16.0),
            text_style("Caption", "Roboto-Regular", 12.0),
        ],
    )
}

/// Writes a zip with the given `(name, bytes)` entries. Names ending in `/`
/// become directory entries.
pub fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut zip = ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default();
    for (name, bytes) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, options).unwrap();
        } else {
            zip.start_file(*name, options).unwrap();
            zip.write_all(bytes).unwrap();
        }
    }
    zip.finish().unwrap();
}

/// Writes a `.sketch` file holding `document` plus a page and a preview.
pub fn write_sketch(dir: &Path, file_name: &str, document: &Value) -> PathBuf {
    let path = dir.join(file_name);
    let body = serde_json::to_vec(document).unwrap();
    write_zip(
        &path,
        &[
            ("document.json", body.as_slice()),
            ("meta.json", b"{}"),
            ("pages/", b""),
            ("pages/page-1.json", b"{\"layers\": []}"),
            ("previews/preview.png", b"\x89PNG"),
        ],
    );
    path
}

/// Writes a config file pointing the uploads tree at `uploads_root`.
pub fn write_config(dir: &Path, uploads_root: &Path) -> PathBuf {
    let path = dir.join("config.toml");
    let content = format!(
        "[paths]\nuploads_root = {:?}\n\n[typography]\nformat_tokens = [\"mobile\", \"desktop\"]\n",
        uploads_root.display().to_string()
    );
    fs::write(&path, content).unwrap();
    path
}
