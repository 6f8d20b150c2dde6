//! Upload and scan orchestration.
//!
//! Services tie the archive layer, the miners and the synchronizer to the
//! persistence ports, and translate failures into [`PipelineError`] codes.

pub mod error;
pub mod scan;
pub mod upload;

pub use error::{PipelineError, StatusBody};
pub use scan::{ScanReport, ScanService};
pub use upload::{UploadOutcome, UploadService, UploadedFile};
