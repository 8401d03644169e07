use thiserror::Error;

/// Errors raised while loading a document or encoding an export.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Could not parse the document: {0}")]
    UnreadableDocument(String),

    #[error("The document contains no sheets")]
    NoSheets,

    #[error("The first sheet has no data rows")]
    EmptyData,

    #[error("No column headers could be detected")]
    NoHeaders,

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<rust_xlsxwriter::XlsxError> for SheetError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        SheetError::Encoding(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;
