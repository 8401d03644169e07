//! # sheetsift-server
//!
//! HTTP server for sheetsift: upload a workbook, discover its headers,
//! preview a filtered selection or download it as CSV, XLSX or vCard.

mod api;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Upload limit applied when none is configured (20 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Server configuration, from flags or the environment.
#[derive(Parser, Debug, Clone)]
#[command(name = "sheetsift-server")]
#[command(author, version, about = "HTTP server for sheetsift", long_about = None)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "SHEETSIFT_ADDR", default_value = "0.0.0.0:3000")]
    pub addr: SocketAddr,

    /// Largest accepted request body in bytes
    #[arg(long, env = "SHEETSIFT_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,
}

/// Health check response.
#[derive(Serialize, Deserialize)]
pub struct Health {
    /// Server status ("ok" when healthy).
    pub status: String,
    /// Server version from Cargo.toml.
    pub version: String,
}

/// Health check endpoint handler.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Create the application router.
///
/// This is separated from `main()` to allow testing.
pub fn create_router(max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/headers", post(api::headers))
        .route("/api/process", post(api::process_upload))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let app = create_router(config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(
        addr = %config.addr,
        max_upload_bytes = config.max_upload_bytes,
        "sheetsift-server listening"
    );
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use rust_xlsxwriter::Workbook;
    use serde_json::Value;
    use tower::ServiceExt;

    const BOUNDARY: &str = "sheetsift-test-boundary";

    fn contacts_workbook() -> Vec<u8> {
        let rows = [
            ["Name", "Mobile", "City"],
            ["Ann", "555-1", "Oslo"],
            ["Bob", "555-2", "Bergen"],
            ["Cleo", "555-3", "Oslo"],
        ];
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, cells) in rows.iter().enumerate() {
            for (c, value) in cells.iter().enumerate() {
                sheet.write_string(r as u32, c as u16, *value).unwrap();
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    fn multipart_body(file: Option<(&str, &[u8])>, fields: &[(&str, &str)]) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some((filename, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
                     filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn multipart_request(uri: &str, body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(request: Request<Body>) -> Response {
        create_router(DEFAULT_MAX_UPLOAD_BYTES)
            .oneshot(request)
            .await
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    // ===== Health =====

    #[tokio::test]
    async fn test_health_endpoint_body() {
        let response = send(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_bytes(response).await;
        let health: Health = serde_json::from_slice(&body).unwrap();
        assert_eq!(health.status, "ok");
        assert!(!health.version.is_empty());
    }

    #[tokio::test]
    async fn test_not_found() {
        let response = send(
            Request::builder()
                .uri("/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_handler_directly() {
        let Json(health) = health().await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    }

    // ===== Headers =====

    #[tokio::test]
    async fn test_headers_endpoint() {
        let workbook = contacts_workbook();
        let body = multipart_body(Some(("contacts.xlsx", &workbook)), &[]);

        let response = send(multipart_request("/api/headers", body)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["headers"], serde_json::json!(["Name", "Mobile", "City"]));
        assert_eq!(json["phoneColumns"], serde_json::json!(["Mobile"]));
    }

    #[tokio::test]
    async fn test_headers_without_file() {
        let body = multipart_body(None, &[("format", "csv")]);

        let response = send(multipart_request("/api/headers", body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "No file provided.");
    }

    #[tokio::test]
    async fn test_headers_wrong_extension() {
        let body = multipart_body(Some(("contacts.csv", b"Name\nAnn\n")), &[]);

        let response = send(multipart_request("/api/headers", body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "Invalid file type. Only .xlsx and .xls files are supported."
        );
    }

    #[tokio::test]
    async fn test_headers_unreadable_document() {
        let body = multipart_body(Some(("broken.xlsx", b"definitely not a zip")), &[]);

        let response = send(multipart_request("/api/headers", body)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_not_multipart_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/headers")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let response = send(request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_upload_over_limit() {
        let workbook = contacts_workbook();
        let body = multipart_body(Some(("contacts.xlsx", &workbook)), &[]);

        let response = create_router(256)
            .oneshot(multipart_request("/api/headers", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    // ===== Process =====

    #[tokio::test]
    async fn test_process_preview() {
        let workbook = contacts_workbook();
        let body = multipart_body(
            Some(("contacts.xlsx", &workbook)),
            &[
                ("filterColumns", r#"["City"]"#),
                ("filterValue", "oslo"),
                ("exportColumns", r#"["Name"]"#),
                ("previewOnly", "true"),
            ],
        );

        let response = send(multipart_request("/api/process", body)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["total"], 2);
        assert_eq!(
            json["rows"],
            serde_json::json!([{ "Name": "Ann" }, { "Name": "Cleo" }])
        );
    }

    #[tokio::test]
    async fn test_process_csv_download() {
        let workbook = contacts_workbook();
        let body = multipart_body(
            Some(("contacts.xlsx", &workbook)),
            &[
                ("filterColumns", r#"["City"]"#),
                ("filterValue", "Bergen"),
                ("matchType", "exact"),
                ("caseSensitive", "true"),
                ("exportColumns", r#"["Name","Mobile"]"#),
                ("format", "csv"),
            ],
        );

        let response = send(multipart_request("/api/process", body)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"contacts_export.csv\""
        );
        assert_eq!(body_bytes(response).await, b"Name,Mobile\nBob,555-2\n");
    }

    #[tokio::test]
    async fn test_process_vcard_download() {
        let workbook = contacts_workbook();
        let body = multipart_body(
            Some(("contacts.xlsx", &workbook)),
            &[
                ("filterColumns", r#"["Name"]"#),
                ("filterValue", "Ann"),
                ("exportColumns", r#"["Mobile"]"#),
                ("format", "vcf"),
                ("vcfPrefix", "Dr."),
            ],
        );

        let response = send(multipart_request("/api/process", body)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"contacts_export.vcf\""
        );
        let text = String::from_utf8(body_bytes(response).await).unwrap();
        assert_eq!(
            text,
            "BEGIN:VCARD\r\nVERSION:3.0\r\nFN:Dr. Ann\r\nTEL;TYPE=CELL:555-1\r\nEND:VCARD"
        );
    }

    #[tokio::test]
    async fn test_process_no_matches() {
        let workbook = contacts_workbook();
        let body = multipart_body(
            Some(("contacts.xlsx", &workbook)),
            &[
                ("filterColumns", r#"["City"]"#),
                ("filterValue", "Trondheim"),
                ("exportColumns", r#"["Name"]"#),
            ],
        );

        let response = send(multipart_request("/api/process", body)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["error"], "No rows matched the filter criteria.");
        assert_eq!(json["kind"], "NoMatches");
    }

    #[tokio::test]
    async fn test_process_unknown_column() {
        let workbook = contacts_workbook();
        let body = multipart_body(
            Some(("contacts.xlsx", &workbook)),
            &[("exportColumns", r#"["Name","Fax"]"#)],
        );

        let response = send(multipart_request("/api/process", body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Export column(s) not found in file: Fax");
        assert_eq!(json["kind"], "UnknownColumn");
    }

    #[tokio::test]
    async fn test_process_requires_export_columns() {
        let workbook = contacts_workbook();
        let body = multipart_body(Some(("contacts.xlsx", &workbook)), &[]);

        let response = send(multipart_request("/api/process", body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_process_malformed_column_list() {
        let workbook = contacts_workbook();
        let body = multipart_body(
            Some(("contacts.xlsx", &workbook)),
            &[("exportColumns", "Name,Mobile")],
        );

        let response = send(multipart_request("/api/process", body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::parse_from(["sheetsift-server"]);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);

        let config = Config::parse_from([
            "sheetsift-server",
            "--addr",
            "127.0.0.1:8080",
            "--max-upload-bytes",
            "1024",
        ]);
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.max_upload_bytes, 1024);
    }
}
