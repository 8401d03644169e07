//! Raw request parameters and their validation.
//!
//! Front ends hand over parameters the way a browser form sends them: column
//! lists as JSON text and flags as `"true"`/`"false"`. [`ProcessRequest::validate`]
//! turns them into typed [`FilterSpec`]/[`ExportSpec`] values, checking in a
//! fixed order so the first failure wins.

use crate::error::{ProcessError, ProcessResult};
use sheetsift_sheet::{ExportFormat, ExportSpec, FilterSpec, MatchMode};

/// Document extensions accepted for upload (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

/// An uploaded document and the name it was declared with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Upload {
            filename: filename.into(),
            bytes,
        }
    }

    /// Lower-cased text after the last `.` of the file name.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        match self.filename.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => Some(ext.to_ascii_lowercase()),
            _ => None,
        }
    }

    #[must_use]
    pub fn has_supported_extension(&self) -> bool {
        self.extension()
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
    }

    /// File name with its last extension removed.
    #[must_use]
    pub fn base_name(&self) -> &str {
        match self.filename.rsplit_once('.') {
            Some((base, ext)) if !ext.is_empty() => base,
            _ => &self.filename,
        }
    }

    /// Fail with `InvalidInputType` unless the declared name carries a supported extension.
    pub fn ensure_supported(&self) -> ProcessResult<()> {
        if self.has_supported_extension() {
            Ok(())
        } else {
            Err(ProcessError::InvalidInputType {
                filename: self.filename.clone(),
            })
        }
    }
}

/// Unvalidated parameters of a process request.
///
/// Text fields hold exactly what the caller sent; `None` or an empty string
/// means the default applies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessRequest {
    pub upload: Option<Upload>,
    /// JSON array of column names (default `[]`).
    pub filter_columns: Option<String>,
    /// JSON array of column names (default `[]`).
    pub export_columns: Option<String>,
    pub filter_value: Option<String>,
    /// `exact` or `contains` (default); unknown tokens mean `contains`.
    pub match_type: Option<String>,
    /// `"true"` enables case-sensitive matching.
    pub case_sensitive: Option<String>,
    /// `csv` (default), `xlsx` or `vcf`.
    pub format: Option<String>,
    pub vcf_prefix: Option<String>,
    pub vcf_suffix: Option<String>,
    /// `"true"` requests a preview instead of a download.
    pub preview_only: Option<String>,
}

impl ProcessRequest {
    #[must_use]
    pub fn new(upload: Upload) -> Self {
        ProcessRequest {
            upload: Some(upload),
            ..Default::default()
        }
    }

    /// Store a text form field by its wire name. Returns `false` for unknown names.
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "filterColumns" => &mut self.filter_columns,
            "exportColumns" => &mut self.export_columns,
            "filterValue" => &mut self.filter_value,
            "matchType" => &mut self.match_type,
            "caseSensitive" => &mut self.case_sensitive,
            "format" => &mut self.format,
            "vcfPrefix" => &mut self.vcf_prefix,
            "vcfSuffix" => &mut self.vcf_suffix,
            "previewOnly" => &mut self.preview_only,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Set filter columns from typed names.
    #[must_use]
    pub fn with_filter_columns(mut self, columns: &[String]) -> Self {
        self.filter_columns = Some(column_list_json(columns));
        self
    }

    /// Set export columns from typed names.
    #[must_use]
    pub fn with_export_columns(mut self, columns: &[String]) -> Self {
        self.export_columns = Some(column_list_json(columns));
        self
    }

    #[must_use]
    pub fn with_query(
        mut self,
        query: impl Into<String>,
        mode: MatchMode,
        case_sensitive: bool,
    ) -> Self {
        self.filter_value = Some(query.into());
        self.match_type = Some(mode.token().to_string());
        self.case_sensitive = Some(case_sensitive.to_string());
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = Some(format.token().to_string());
        self
    }

    #[must_use]
    pub fn with_affixes(mut self, prefix: Option<String>, suffix: Option<String>) -> Self {
        self.vcf_prefix = prefix;
        self.vcf_suffix = suffix;
        self
    }

    #[must_use]
    pub fn with_preview(mut self, preview_only: bool) -> Self {
        self.preview_only = Some(preview_only.to_string());
        self
    }

    /// Check the request shape before the document is touched.
    ///
    /// Order: upload and extension, column lists, export columns (unless
    /// preview), format.
    pub fn validate(self) -> ProcessResult<ValidatedRequest> {
        let upload = self.upload.ok_or(ProcessError::MissingUpload)?;
        upload.ensure_supported()?;

        let filter_columns = parse_column_list("filterColumns", self.filter_columns.as_deref())?;
        let export_columns = parse_column_list("exportColumns", self.export_columns.as_deref())?;

        let preview_only = is_true(self.preview_only.as_deref());
        if !preview_only && export_columns.is_empty() {
            return Err(ProcessError::MissingExportColumns);
        }

        let token = or_default(self.format.as_deref(), "csv");
        let format = ExportFormat::from_token(token)
            .ok_or_else(|| ProcessError::InvalidFormat(token.to_string()))?;

        Ok(ValidatedRequest {
            upload,
            filter: FilterSpec {
                columns: filter_columns,
                query: self.filter_value.unwrap_or_default(),
                mode: MatchMode::from_token(or_default(self.match_type.as_deref(), "contains")),
                case_sensitive: is_true(self.case_sensitive.as_deref()),
            },
            export: ExportSpec {
                columns: export_columns,
                format,
                contact_name_prefix: non_empty(self.vcf_prefix),
                contact_name_suffix: non_empty(self.vcf_suffix),
            },
            preview_only,
        })
    }
}

/// A request whose parameters are well-formed. Column names are not yet
/// checked against the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub upload: Upload,
    pub filter: FilterSpec,
    pub export: ExportSpec,
    pub preview_only: bool,
}

fn parse_column_list(field: &str, raw: Option<&str>) -> ProcessResult<Vec<String>> {
    let raw = or_default(raw, "[]");
    serde_json::from_str::<Vec<String>>(raw)
        .map_err(|e| ProcessError::InvalidParameters(format!("{field}: {e}")))
}

/// An absent or empty field takes its default.
fn or_default<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    value.filter(|v| !v.is_empty()).unwrap_or(default)
}

fn column_list_json(columns: &[String]) -> String {
    serde_json::Value::from(columns.to_vec()).to_string()
}

fn is_true(flag: Option<&str>) -> bool {
    flag == Some("true")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
