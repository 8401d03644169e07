//! Load → filter → project → preview/encode, one request at a time.

use crate::error::{ColumnRole, ProcessError, ProcessResult};
use crate::request::{ProcessRequest, Upload, ValidatedRequest};
use serde::{Deserialize, Serialize};
use sheetsift_sheet::heuristics::{is_phone_header, phone_columns};
use sheetsift_sheet::{
    encode, filter_rows, project_rows, ExportFormat, HeaderSet, Row, SheetError, Table,
};
use tracing::{debug, error, warn};

/// Maximum number of rows returned by a preview.
pub const PREVIEW_LIMIT: usize = 10;

/// Columns of an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderSummary {
    pub headers: Vec<String>,
    /// Headers that look like phone numbers, as contact-card export suggestions.
    pub phone_columns: Vec<String>,
}

/// First rows of the filtered set plus the size of the whole filtered set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preview {
    pub rows: Vec<Row>,
    pub total: usize,
}

/// A finished export ready to be downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub bytes: Vec<u8>,
    pub media_type: &'static str,
    pub filename: String,
}

/// Result of a successful process request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    Preview(Preview),
    Export(ExportFile),
}

/// Read the header row of an uploaded document.
pub fn discover_headers(upload: Option<&Upload>) -> ProcessResult<HeaderSummary> {
    let upload = upload.ok_or(ProcessError::MissingUpload)?;
    upload.ensure_supported()?;

    let table = Table::from_bytes(&upload.bytes)
        .map_err(ProcessError::from)
        .inspect_err(|e| log_failure(&upload.filename, e))?;
    debug!(
        filename = %upload.filename,
        columns = table.headers.len(),
        rows = table.row_count(),
        "discovered headers"
    );

    let suggested = phone_columns(table.headers.iter());
    Ok(HeaderSummary {
        headers: table.headers.into_vec(),
        phone_columns: suggested,
    })
}

/// Validate and run a process request.
pub fn process(request: ProcessRequest) -> ProcessResult<ProcessOutcome> {
    let filename = request
        .upload
        .as_ref()
        .map(|u| u.filename.clone())
        .unwrap_or_default();
    request
        .validate()
        .and_then(run)
        .inspect_err(|e| log_failure(&filename, e))
}

/// Run an already validated request against its document.
pub fn run(request: ValidatedRequest) -> ProcessResult<ProcessOutcome> {
    let ValidatedRequest {
        upload,
        filter,
        export,
        preview_only,
    } = request;

    let table = match Table::from_bytes(&upload.bytes) {
        Ok(table) => table,
        Err(SheetError::EmptyData) if preview_only => {
            debug!(filename = %upload.filename, "empty sheet, returning empty preview");
            return Ok(ProcessOutcome::Preview(Preview::default()));
        }
        Err(e) => return Err(e.into()),
    };

    check_columns(&table.headers, ColumnRole::Filter, &filter.columns)?;
    check_columns(&table.headers, ColumnRole::Export, &export.columns)?;

    let total_rows = table.row_count();
    let Table { headers, rows } = table;
    let filtered = filter_rows(rows, &filter);
    debug!(
        filename = %upload.filename,
        total_rows,
        matched = filtered.len(),
        active = filter.is_active(),
        "filtered rows"
    );

    if preview_only {
        let columns = if export.columns.is_empty() {
            headers.as_slice()
        } else {
            export.columns.as_slice()
        };
        let shown = filtered.len().min(PREVIEW_LIMIT);
        return Ok(ProcessOutcome::Preview(Preview {
            rows: project_rows(&filtered[..shown], columns),
            total: filtered.len(),
        }));
    }

    if filtered.is_empty() {
        return Err(ProcessError::NoMatches);
    }

    if export.format == ExportFormat::ContactCard
        && !export.columns.iter().any(|c| is_phone_header(c))
    {
        warn!(
            columns = ?export.columns,
            "none of the contact-card columns look like phone numbers"
        );
    }

    let payload = encode(&filtered, &export)?;
    debug!(
        format = %export.format,
        rows = filtered.len(),
        bytes = payload.bytes.len(),
        "encoded export"
    );

    Ok(ProcessOutcome::Export(ExportFile {
        bytes: payload.bytes,
        media_type: payload.media_type,
        filename: export_filename(&upload, export.format),
    }))
}

/// Suggested download name: `{base}_export.{ext}`.
#[must_use]
pub fn export_filename(upload: &Upload, format: ExportFormat) -> String {
    format!("{}_export.{}", upload.base_name(), format.extension())
}

fn check_columns(headers: &HeaderSet, role: ColumnRole, columns: &[String]) -> ProcessResult<()> {
    let missing = headers.missing(columns);
    if missing.is_empty() {
        return Ok(());
    }
    Err(ProcessError::UnknownColumn {
        role,
        columns: missing.into_iter().map(String::from).collect(),
    })
}

fn log_failure(filename: &str, e: &ProcessError) {
    if e.is_internal() {
        error!(filename, kind = ?e.kind(), detail = e.detail().unwrap_or_default(), "{e}");
    } else {
        debug!(filename, kind = ?e.kind(), detail = e.detail().unwrap_or_default(), "{e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_filename() {
        let upload = Upload::new("team.contacts.xlsx", Vec::new());
        assert_eq!(
            export_filename(&upload, ExportFormat::ContactCard),
            "team.contacts_export.vcf"
        );
        assert_eq!(
            export_filename(&upload, ExportFormat::DelimitedText),
            "team.contacts_export.csv"
        );
        assert_eq!(
            export_filename(&upload, ExportFormat::Workbook),
            "team.contacts_export.xlsx"
        );
    }

    #[test]
    fn test_check_columns_reports_every_missing_name() {
        let headers = HeaderSet::from_keys(&["Name", "Phone"]);
        let columns = vec!["Fax".to_string(), "Name".to_string(), "Pager".to_string()];

        let err = check_columns(&headers, ColumnRole::Filter, &columns).unwrap_err();
        assert_eq!(err.to_string(), "Filter column(s) not found in file: Fax, Pager");
        assert!(check_columns(&headers, ColumnRole::Export, &[]).is_ok());
    }

    #[test]
    fn test_preview_serializes_in_column_order() {
        let row: Row = [("Phone", "1"), ("Name", "Ann")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let preview = Preview {
            rows: vec![row],
            total: 37,
        };

        let json = serde_json::to_string(&preview).unwrap();
        assert_eq!(json, r#"{"rows":[{"Phone":"1","Name":"Ann"}],"total":37}"#);
    }
}
