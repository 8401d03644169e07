use crate::cell::{cell_text, is_blank};
use crate::error::{Result, SheetError};
use calamine::Data;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One record of cell text keyed by header name, in column order.
pub type Row = IndexMap<String, String>;

/// Name given to a header cell that is blank. Later blanks get `__EMPTY_1`, `__EMPTY_2`, ...
pub const EMPTY_HEADER: &str = "__EMPTY";

/// Ordered, de-duplicated column names of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderSet(Vec<String>);

impl HeaderSet {
    /// Build a header set from per-column keys, keeping the first position of repeated names.
    #[must_use]
    pub fn from_keys<S: AsRef<str>>(keys: &[S]) -> Self {
        let mut names: Vec<String> = Vec::with_capacity(keys.len());
        for key in keys {
            let key = key.as_ref();
            if !names.iter().any(|n| n == key) {
                names.push(key.to_string());
            }
        }
        HeaderSet(names)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    /// The requested columns that are not part of this header set, in request order.
    #[must_use]
    pub fn missing<'a>(&self, columns: &'a [String]) -> Vec<&'a str> {
        columns
            .iter()
            .filter(|c| !self.contains(c))
            .map(String::as_str)
            .collect()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// Headers plus data rows decoded from the first sheet of a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: HeaderSet,
    pub rows: Vec<Row>,
}

impl Table {
    /// Build a table from a grid of workbook cells.
    ///
    /// The first non-blank row names the columns; a row of only whitespace
    /// names nothing and fails with [`SheetError::NoHeaders`]. Blank header
    /// cells become [`EMPTY_HEADER`]-style names. When two columns share a name, the later
    /// column's value wins while the name keeps the earlier column's position.
    /// Fully blank data rows are skipped; short rows are padded with `""`.
    pub fn from_grid<'a, I>(grid: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a [Data]>,
    {
        let mut lines = grid.into_iter().filter(|cells| !cells.iter().all(is_blank));

        let Some(header_cells) = lines.next() else {
            return Err(SheetError::EmptyData);
        };

        if header_cells
            .iter()
            .all(|cell| cell_text(cell).trim().is_empty())
        {
            return Err(SheetError::NoHeaders);
        }

        let keys = column_keys(header_cells);

        let rows: Vec<Row> = lines.map(|cells| build_row(&keys, cells)).collect();
        if rows.is_empty() {
            return Err(SheetError::EmptyData);
        }

        Ok(Table {
            headers: HeaderSet::from_keys(&keys),
            rows,
        })
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// One key per header cell, in column order. Repeated names are kept here and
/// collapse when rows are built.
fn column_keys(header_cells: &[Data]) -> Vec<String> {
    let mut blanks = 0usize;
    header_cells
        .iter()
        .map(|cell| {
            let text = cell_text(cell);
            if text.is_empty() {
                let name = if blanks == 0 {
                    EMPTY_HEADER.to_string()
                } else {
                    format!("{EMPTY_HEADER}_{blanks}")
                };
                blanks += 1;
                name
            } else {
                text
            }
        })
        .collect()
}

fn build_row(keys: &[String], cells: &[Data]) -> Row {
    let mut row = Row::with_capacity(keys.len());
    for (idx, key) in keys.iter().enumerate() {
        let text = cells.get(idx).map(cell_text).unwrap_or_default();
        // IndexMap keeps the first insertion position and takes the last value.
        row.insert(key.clone(), text);
    }
    row
}
