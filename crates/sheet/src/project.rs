use crate::table::Row;

/// Copy `columns` out of `row`, in `columns` order. Absent values become `""`.
#[must_use]
pub fn project_row(row: &Row, columns: &[String]) -> Row {
    columns
        .iter()
        .map(|name| (name.clone(), row.get(name).cloned().unwrap_or_default()))
        .collect()
}

/// Project every row onto `columns`.
#[must_use]
pub fn project_rows(rows: &[Row], columns: &[String]) -> Vec<Row> {
    rows.iter().map(|row| project_row(row, columns)).collect()
}
