//! Multipart handlers for `/api/headers` and `/api/process`.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sheetsift_core::{
    discover_headers, process, ErrorClass, ErrorKind, ExportFile, HeaderSummary, ProcessError,
    ProcessOutcome, ProcessRequest, ProcessResult, Upload,
};
use tracing::{debug, error};

/// Multipart field carrying the uploaded document.
pub const FILE_FIELD: &str = "file";

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    /// Absent when the request never reached the pipeline (oversized body).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

/// An error on its way to the client.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: Option<ErrorKind>,
    message: String,
}

impl ApiError {
    fn payload_too_large() -> Self {
        ApiError {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            kind: None,
            message: "File too large.".to_string(),
        }
    }
}

impl From<ProcessError> for ApiError {
    fn from(e: ProcessError) -> Self {
        let status = match e.class() {
            ErrorClass::Input => StatusCode::BAD_REQUEST,
            ErrorClass::Content => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError {
            status,
            kind: Some(e.kind()),
            message: e.to_string(),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::payload_too_large();
        }
        ProcessError::InvalidParameters(e.body_text()).into()
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(e: MultipartRejection) -> Self {
        ProcessError::InvalidParameters(e.body_text()).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
                kind: self.kind,
            }),
        )
            .into_response()
    }
}

/// A multipart body split into the upload and the text fields.
#[derive(Debug, Default)]
struct Form {
    upload: Option<Upload>,
    fields: Vec<(String, String)>,
}

async fn read_form(multipart: Result<Multipart, MultipartRejection>) -> Result<Form, ApiError> {
    let mut multipart = multipart?;
    let mut form = Form::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if name == FILE_FIELD {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await?;
            debug!(%filename, size = bytes.len(), "received upload");
            form.upload = Some(Upload::new(filename, bytes.to_vec()));
        } else {
            let value = field.text().await?;
            form.fields.push((name, value));
        }
    }

    Ok(form)
}

/// Run a pipeline call on the blocking pool.
async fn run_blocking<T, F>(f: F) -> ProcessResult<T>
where
    F: FnOnce() -> ProcessResult<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "pipeline task did not complete");
            Err(ProcessError::unexpected(e.to_string()))
        }
    }
}

/// `POST /api/headers`
pub async fn headers(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<HeaderSummary>, ApiError> {
    let form = read_form(multipart).await?;
    let summary = run_blocking(move || discover_headers(form.upload.as_ref())).await?;
    Ok(Json(summary))
}

/// `POST /api/process`
pub async fn process_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let form = read_form(multipart).await?;

    let mut request = ProcessRequest {
        upload: form.upload,
        ..ProcessRequest::default()
    };
    for (name, value) in form.fields {
        if !request.set_field(&name, value) {
            debug!(field = %name, "ignoring unknown form field");
        }
    }

    match run_blocking(move || process(request)).await? {
        ProcessOutcome::Preview(preview) => Ok(Json(preview).into_response()),
        ProcessOutcome::Export(file) => Ok(download(file)),
    }
}

fn download(file: ExportFile) -> Response {
    let disposition = format!(
        "attachment; filename=\"{}\"",
        header_safe_filename(&file.filename)
    );
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, file.media_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response()
}

/// Replace anything that cannot sit inside a quoted header parameter.
fn header_safe_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
