//! Application-wide constants.
//!
//! File names and directory names that make up the on-disk layout. The
//! layout is shared with other tools reading the uploads tree, so these
//! values must not change.

/// The display name of the application.
pub const APP_NAME: &str = "Sketch Tokens";

/// Directory name under the platform config dir.
pub const APP_DIR_NAME: &str = "sketch-tokens";

/// Config file name inside [`APP_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default root of the uploads tree.
pub const DEFAULT_UPLOADS_ROOT: &str = "./uploads";

/// Default token store file name inside the uploads root.
pub const DEFAULT_STORE_FILE: &str = "tokens.json";

/// Accepted upload extension (without the dot).
pub const SKETCH_EXTENSION: &str = "sketch";

/// Directory holding staged archives for one project version.
pub const SKETCH_DIR: &str = "sketch";

/// Directory holding extracted archives for one project version.
pub const UNZIP_DIR: &str = "unzip";

/// Document file mined in each extracted archive.
pub const DOCUMENT_FILE: &str = "document.json";

/// Marker written into an extraction directory once every entry is processed.
pub const EXTRACTION_MARKER: &str = ".extraction.json";
