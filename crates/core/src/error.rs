//! Error types for the sheetsift pipeline.

use serde::Serialize;
use sheetsift_sheet::SheetError;
use std::fmt;
use thiserror::Error;

/// Result type for pipeline operations.
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Stable identifier for each failure a caller can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    InvalidInputType,
    InvalidParameters,
    MissingExportColumns,
    InvalidFormat,
    UnreadableDocument,
    NoSheets,
    EmptyData,
    NoHeaders,
    UnknownColumn,
    NoMatches,
    EncodingFailure,
    Unexpected,
}

/// Who is responsible for an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The request itself is malformed (wrong file type, bad parameters, unknown columns).
    Input,
    /// The request is well-formed but the document or filter result cannot be used.
    Content,
    /// Something failed on our side.
    Internal,
}

/// Which parameter list referenced a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    Filter,
    Export,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRole::Filter => f.write_str("Filter"),
            ColumnRole::Export => f.write_str("Export"),
        }
    }
}

/// Errors that can end a header-discovery or process request.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// No document was uploaded.
    #[error("No file provided.")]
    MissingUpload,

    /// The uploaded file name does not carry a supported extension.
    #[error("Invalid file type. Only .xlsx and .xls files are supported.")]
    InvalidInputType { filename: String },

    /// A column list parameter is not a JSON array of strings.
    #[error("Invalid column selection data: {0}")]
    InvalidParameters(String),

    #[error("No export columns selected.")]
    MissingExportColumns,

    #[error("Invalid export format '{0}'. Expected csv, xlsx or vcf.")]
    InvalidFormat(String),

    /// The bytes are not a readable workbook. The detail is logged, not shown.
    #[error("Could not parse the file. The file may be corrupted or in an unsupported format.")]
    UnreadableDocument { detail: String },

    #[error("The file contains no sheets.")]
    NoSheets,

    #[error("The sheet appears to be empty or has no data rows.")]
    EmptyData,

    #[error("No column headers could be detected.")]
    NoHeaders,

    #[error("{role} column(s) not found in file: {}", .columns.join(", "))]
    UnknownColumn {
        role: ColumnRole,
        columns: Vec<String>,
    },

    #[error("No rows matched the filter criteria.")]
    NoMatches,

    /// An encoder failed on valid rows. The detail is logged, not shown.
    #[error("Failed to generate the export file.")]
    EncodingFailure { detail: String },

    /// Anything not anticipated above. The detail is logged, not shown.
    #[error("An unexpected error occurred during processing.")]
    Unexpected { detail: String },
}

impl ProcessError {
    /// Create an unexpected error carrying a detail for the logs.
    pub fn unexpected(detail: impl Into<String>) -> Self {
        Self::Unexpected {
            detail: detail.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProcessError::MissingUpload | ProcessError::InvalidInputType { .. } => {
                ErrorKind::InvalidInputType
            }
            ProcessError::InvalidParameters(_) => ErrorKind::InvalidParameters,
            ProcessError::MissingExportColumns => ErrorKind::MissingExportColumns,
            ProcessError::InvalidFormat(_) => ErrorKind::InvalidFormat,
            ProcessError::UnreadableDocument { .. } => ErrorKind::UnreadableDocument,
            ProcessError::NoSheets => ErrorKind::NoSheets,
            ProcessError::EmptyData => ErrorKind::EmptyData,
            ProcessError::NoHeaders => ErrorKind::NoHeaders,
            ProcessError::UnknownColumn { .. } => ErrorKind::UnknownColumn,
            ProcessError::NoMatches => ErrorKind::NoMatches,
            ProcessError::EncodingFailure { .. } => ErrorKind::EncodingFailure,
            ProcessError::Unexpected { .. } => ErrorKind::Unexpected,
        }
    }

    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self.kind() {
            ErrorKind::InvalidInputType
            | ErrorKind::InvalidParameters
            | ErrorKind::MissingExportColumns
            | ErrorKind::InvalidFormat
            | ErrorKind::UnknownColumn => ErrorClass::Input,
            ErrorKind::UnreadableDocument
            | ErrorKind::NoSheets
            | ErrorKind::EmptyData
            | ErrorKind::NoHeaders
            | ErrorKind::NoMatches => ErrorClass::Content,
            ErrorKind::EncodingFailure | ErrorKind::Unexpected => ErrorClass::Internal,
        }
    }

    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.class() == ErrorClass::Internal
    }

    /// Detail kept out of the user-facing message, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            ProcessError::UnreadableDocument { detail }
            | ProcessError::EncodingFailure { detail }
            | ProcessError::Unexpected { detail } => Some(detail.as_str()),
            _ => None,
        }
    }
}

impl From<SheetError> for ProcessError {
    fn from(e: SheetError) -> Self {
        match e {
            SheetError::UnreadableDocument(detail) => ProcessError::UnreadableDocument { detail },
            SheetError::NoSheets => ProcessError::NoSheets,
            SheetError::EmptyData => ProcessError::EmptyData,
            SheetError::NoHeaders => ProcessError::NoHeaders,
            SheetError::Encoding(detail) => ProcessError::EncodingFailure { detail },
            SheetError::Csv(e) => ProcessError::EncodingFailure {
                detail: e.to_string(),
            },
        }
    }
}
