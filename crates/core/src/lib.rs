//! # sheetsift-core
//!
//! Request validation and the filter/export pipeline for sheetsift.
//!
//! This crate provides:
//! - Raw request parameters and their validation order
//! - Header discovery and the process pipeline (preview or export)
//! - The error taxonomy shared by every front end
//!
//! Each request is handled synchronously and independently; nothing is cached
//! between requests.

/// Error types and result aliases.
pub mod error;
/// Header discovery and the process pipeline.
pub mod pipeline;
/// Raw request parameters and validation.
pub mod request;

/// Re-export core error types.
pub use error::{ColumnRole, ErrorClass, ErrorKind, ProcessError, ProcessResult};
/// Re-export pipeline entry points and outcomes.
pub use pipeline::{
    discover_headers, export_filename, process, run, ExportFile, HeaderSummary, Preview,
    ProcessOutcome, PREVIEW_LIMIT,
};
/// Re-export request types.
pub use request::{ProcessRequest, Upload, ValidatedRequest, SUPPORTED_EXTENSIONS};

/// Re-export the sheet types that appear in this crate's API.
pub use sheetsift_sheet::{ExportFormat, ExportSpec, FilterSpec, MatchMode, Row};
