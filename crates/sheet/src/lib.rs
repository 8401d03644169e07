//! Tabular loading, filtering, projection and export encoding for sheetsift
//!
//! A document's first sheet is decoded into a [`Table`]: an ordered
//! [`HeaderSet`] plus rows of cell text keyed by header. Rows then flow through
//! [`filter_rows`] and [`project_rows`] and are finally serialized by one of the
//! [`ExportFormat`] encoders.
//!
//! # Examples
//!
//! ## Filtering and exporting as CSV
//!
//! ```
//! use sheetsift_sheet::{encode, filter_rows, ExportFormat, ExportSpec, FilterSpec, MatchMode, Row};
//!
//! let rows: Vec<Row> = vec![
//!     [("Name", "Ann"), ("City", "Oslo")],
//!     [("Name", "Bob"), ("City", "Bergen")],
//! ]
//! .into_iter()
//! .map(|pairs| pairs.into_iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
//! .collect();
//!
//! let filter = FilterSpec {
//!     columns: vec!["City".to_string()],
//!     query: "oslo".to_string(),
//!     mode: MatchMode::Exact,
//!     case_sensitive: false,
//! };
//! let kept = filter_rows(rows, &filter);
//!
//! let spec = ExportSpec::new(vec!["Name".to_string()], ExportFormat::DelimitedText);
//! let payload = encode(&kept, &spec).unwrap();
//! assert_eq!(payload.bytes, b"Name\nAnn\n");
//! ```
//!
//! ## Loading a workbook
//!
//! ```no_run
//! use sheetsift_sheet::Table;
//!
//! let bytes = std::fs::read("contacts.xlsx").unwrap();
//! let table = Table::from_bytes(&bytes).unwrap();
//! println!("{:?}", table.headers);
//! ```

mod cell;
mod csv;
mod encode;
mod error;
mod filter;
pub mod heuristics;
mod project;
mod table;
mod vcard;
mod xlsx;

/// Re-export the delimited-text encoder.
pub use crate::csv::DelimitedTextEncoder;
/// Re-export the encoder seam and format dispatch.
pub use encode::{encode, EncodedPayload, ExportFormat, ExportSpec, RowEncoder};
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export row filtering.
pub use filter::{filter_rows, FilterSpec, MatchMode};
/// Re-export column projection.
pub use project::{project_row, project_rows};
/// Re-export table types.
pub use table::{HeaderSet, Row, Table, EMPTY_HEADER};
/// Re-export the contact-card encoder.
pub use vcard::{ContactCard, ContactCardEncoder};
/// Re-export the workbook encoder.
pub use xlsx::{WorkbookEncoder, EXPORT_SHEET_NAME};
