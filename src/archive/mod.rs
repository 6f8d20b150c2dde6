//! Archive staging and extraction.
//!
//! [`layout`] decides where uploads and extracted documents live on disk,
//! [`extractor`] streams zip entries into that tree.

pub mod extractor;
pub mod layout;

pub use extractor::{
    extract_all, extract_archive, extract_archive_blocking, extraction_status,
    resolve_entry_path, ExtractionReport, ExtractionStatus,
};
pub use layout::{
    has_sketch_extension, normalize_archive_name, staged_archive_name, validate_filename,
    InvalidFileName, ProjectLayout,
};
