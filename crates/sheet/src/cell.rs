use calamine::Data;

/// Render a workbook cell as the text the rest of the pipeline works with.
///
/// No rounding or date formatting is applied: numbers use Rust's shortest
/// round-trip rendering (`42.0` becomes `"42"`), dates stay as the workbook's
/// serial number.
pub(crate) fn cell_text(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}

/// A cell counts as blank when it is empty or holds only an empty string.
pub(crate) fn is_blank(data: &Data) -> bool {
    match data {
        Data::Empty => true,
        Data::String(s) => s.is_empty(),
        _ => false,
    }
}
