use crate::encode::RowEncoder;
use crate::error::{Result, SheetError};
use crate::table::Row;

/// Comma-separated export with RFC 4180 quoting and `\n` record terminators.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimitedTextEncoder;

impl RowEncoder for DelimitedTextEncoder {
    fn encode(&self, rows: &[Row], columns: &[String]) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b',')
            .quote_style(csv::QuoteStyle::Necessary)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(columns)?;
        for row in rows {
            writer.write_record(
                columns
                    .iter()
                    .map(|name| row.get(name).map_or("", String::as_str)),
            )?;
        }

        writer
            .into_inner()
            .map_err(|e| SheetError::Encoding(e.error().to_string()))
    }
}
