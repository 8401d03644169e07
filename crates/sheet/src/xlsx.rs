use crate::encode::RowEncoder;
use crate::error::{Result, SheetError};
use crate::table::{Row, Table};
use calamine::{open_workbook_auto_from_rs, Reader};
use rust_xlsxwriter::Workbook;
use std::io::Cursor;

/// Worksheet name used for workbook exports.
pub const EXPORT_SHEET_NAME: &str = "Export";

impl Table {
    /// Decode the first sheet of an `.xlsx` or `.xls` document held in memory.
    ///
    /// The container format is detected from the content, not from a file name.
    /// Sheets after the first one are never read.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::UnreadableDocument`] for bytes that are not a
    /// workbook, [`SheetError::NoSheets`] for a workbook without sheets, and the
    /// errors of [`Table::from_grid`] for an empty first sheet.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| SheetError::UnreadableDocument(e.to_string()))?;

        let sheet_names = workbook.sheet_names().to_vec();
        let Some(first) = sheet_names.first() else {
            return Err(SheetError::NoSheets);
        };

        let range = workbook
            .worksheet_range(first)
            .map_err(|e| SheetError::UnreadableDocument(e.to_string()))?;

        Table::from_grid(range.rows())
    }
}

/// Writes rows into a single-sheet workbook whose header row is the export columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkbookEncoder;

impl RowEncoder for WorkbookEncoder {
    fn encode(&self, rows: &[Row], columns: &[String]) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(EXPORT_SHEET_NAME)?;

        for (col_idx, name) in columns.iter().enumerate() {
            worksheet.write_string(0, column_number(col_idx)?, name)?;
        }

        for (row_idx, row) in rows.iter().enumerate() {
            let row_num = u32::try_from(row_idx + 1)
                .map_err(|_| SheetError::Encoding("Row index overflow".to_string()))?;

            for (col_idx, name) in columns.iter().enumerate() {
                let value = row.get(name).map_or("", String::as_str);
                if value.is_empty() {
                    continue;
                }
                // Values stay text so that leading zeros in phone numbers and IDs survive.
                worksheet.write_string(row_num, column_number(col_idx)?, value)?;
            }
        }

        Ok(workbook.save_to_buffer()?)
    }
}

fn column_number(col_idx: usize) -> Result<u16> {
    u16::try_from(col_idx).map_err(|_| SheetError::Encoding("Column index overflow".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_workbook_roundtrip_through_loader() {
        let columns = vec!["Phone".to_string(), "Name".to_string()];
        let rows = vec![
            row(&[("Phone", "0123"), ("Name", "Ann")]),
            row(&[("Phone", "555"), ("Name", "Bob, Jr.")]),
        ];

        let bytes = WorkbookEncoder.encode(&rows, &columns).unwrap();
        let table = Table::from_bytes(&bytes).unwrap();

        assert_eq!(table.headers.as_slice(), ["Phone", "Name"]);
        assert_eq!(table.rows, rows);
    }

    #[test]
    fn test_workbook_blank_cells_read_back_empty() {
        let columns = vec!["A".to_string(), "B".to_string()];
        let rows = vec![row(&[("A", "x"), ("B", "")]), row(&[("A", ""), ("B", "y")])];

        let bytes = WorkbookEncoder.encode(&rows, &columns).unwrap();
        let table = Table::from_bytes(&bytes).unwrap();

        assert_eq!(table.rows[0]["B"], "");
        assert_eq!(table.rows[1]["A"], "");
        assert_eq!(table.rows[1]["B"], "y");
    }

    #[test]
    fn test_unreadable_bytes() {
        let result = Table::from_bytes(b"definitely not a workbook");
        assert!(matches!(result, Err(SheetError::UnreadableDocument(_))));
    }

    #[test]
    fn test_only_first_sheet_is_read() {
        let mut workbook = Workbook::new();
        let first = workbook.add_worksheet();
        first.write_string(0, 0, "Name").unwrap();
        first.write_string(1, 0, "Ann").unwrap();
        let second = workbook.add_worksheet();
        second.write_string(0, 0, "Other").unwrap();
        second.write_string(1, 0, "ignored").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let table = Table::from_bytes(&bytes).unwrap();
        assert_eq!(table.headers.as_slice(), ["Name"]);
        assert_eq!(table.rows[0]["Name"], "Ann");
    }

    #[test]
    fn test_numbers_are_rendered_as_text() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Qty").unwrap();
        sheet.write_string(0, 1, "Price").unwrap();
        sheet.write_string(0, 2, "Active").unwrap();
        sheet.write_number(1, 0, 3.0).unwrap();
        sheet.write_number(1, 1, 9.75).unwrap();
        sheet.write_boolean(1, 2, true).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let table = Table::from_bytes(&bytes).unwrap();
        assert_eq!(table.rows[0]["Qty"], "3");
        assert_eq!(table.rows[0]["Price"], "9.75");
        assert_eq!(table.rows[0]["Active"], "true");
    }
}
