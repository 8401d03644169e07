use crate::csv::DelimitedTextEncoder;
use crate::error::Result;
use crate::project::project_rows;
use crate::table::Row;
use crate::vcard::ContactCardEncoder;
use crate::xlsx::WorkbookEncoder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Serializes rows into an export payload.
pub trait RowEncoder {
    /// Encode `rows` using `columns` as the export column list.
    fn encode(&self, rows: &[Row], columns: &[String]) -> Result<Vec<u8>>;
}

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportFormat {
    #[serde(rename = "csv")]
    DelimitedText,
    #[serde(rename = "xlsx")]
    Workbook,
    #[serde(rename = "vcf")]
    ContactCard,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [
        ExportFormat::DelimitedText,
        ExportFormat::Workbook,
        ExportFormat::ContactCard,
    ];

    /// Parameter token for this format.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            ExportFormat::DelimitedText => "csv",
            ExportFormat::Workbook => "xlsx",
            ExportFormat::ContactCard => "vcf",
        }
    }

    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.token() == token)
    }

    #[must_use]
    pub fn media_type(self) -> &'static str {
        match self {
            ExportFormat::DelimitedText => "text/csv; charset=utf-8",
            ExportFormat::Workbook => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::ContactCard => "text/vcard; charset=utf-8",
        }
    }

    /// File extension of the produced payload.
    #[must_use]
    pub fn extension(self) -> &'static str {
        self.token()
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_token(s).ok_or_else(|| format!("unsupported export format: {s}"))
    }
}

/// What to export and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSpec {
    pub columns: Vec<String>,
    pub format: ExportFormat,
    pub contact_name_prefix: Option<String>,
    pub contact_name_suffix: Option<String>,
}

impl ExportSpec {
    #[must_use]
    pub fn new(columns: Vec<String>, format: ExportFormat) -> Self {
        ExportSpec {
            columns,
            format,
            contact_name_prefix: None,
            contact_name_suffix: None,
        }
    }
}

/// Encoded export bytes plus how to label them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    pub bytes: Vec<u8>,
    pub media_type: &'static str,
    pub extension: &'static str,
}

/// Encode filtered rows in the format named by `spec`.
///
/// Tabular formats receive the rows projected onto `spec.columns`. Contact
/// cards receive the full filtered rows so that a display name can be found
/// outside the exported phone columns.
pub fn encode(rows: &[Row], spec: &ExportSpec) -> Result<EncodedPayload> {
    let bytes = match spec.format {
        ExportFormat::DelimitedText => DelimitedTextEncoder::default()
            .encode(&project_rows(rows, &spec.columns), &spec.columns)?,
        ExportFormat::Workbook => {
            WorkbookEncoder.encode(&project_rows(rows, &spec.columns), &spec.columns)?
        }
        ExportFormat::ContactCard => ContactCardEncoder::new(
            spec.contact_name_prefix.as_deref(),
            spec.contact_name_suffix.as_deref(),
        )
        .encode(rows, &spec.columns)?,
    };

    Ok(EncodedPayload {
        bytes,
        media_type: spec.format.media_type(),
        extension: spec.format.extension(),
    })
}
