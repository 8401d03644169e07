use crate::encode::RowEncoder;
use crate::error::Result;
use crate::heuristics::is_name_header;
use crate::table::Row;

/// vCard line ending, also used between cards.
const CRLF: &str = "\r\n";

/// One phone number attributed to one display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactCard {
    pub name: String,
    pub phone: String,
}

impl ContactCard {
    /// Render as a vCard 3.0 block without a trailing line break.
    ///
    /// Name and phone are written exactly as composed.
    #[must_use]
    pub fn render(&self) -> String {
        [
            "BEGIN:VCARD".to_string(),
            "VERSION:3.0".to_string(),
            format!("FN:{}", self.name),
            format!("TEL;TYPE=CELL:{}", self.phone),
            "END:VCARD".to_string(),
        ]
        .join(CRLF)
    }
}

/// Exports one card per (row, phone column) pair with a non-blank phone.
///
/// Rows are expected to be filtered but not projected: the display name is
/// looked up across all of a row's columns, while the export columns are only
/// read as phone numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactCardEncoder {
    prefix: String,
    suffix: String,
}

impl ContactCardEncoder {
    #[must_use]
    pub fn new(prefix: Option<&str>, suffix: Option<&str>) -> Self {
        ContactCardEncoder {
            prefix: prefix.map(str::trim).unwrap_or_default().to_string(),
            suffix: suffix.map(str::trim).unwrap_or_default().to_string(),
        }
    }

    /// Display name for the row at `index` (0-based) of the filtered set.
    ///
    /// Uses the first name-like column in row order. A blank value there
    /// falls back to `Contact{index + 1}`; later name-like columns are not tried.
    #[must_use]
    pub fn display_name(&self, row: &Row, index: usize) -> String {
        let base = row
            .iter()
            .find(|(header, _)| is_name_header(header))
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
            .map_or_else(|| format!("Contact{}", index + 1), str::to_string);

        let mut name = String::new();
        if !self.prefix.is_empty() {
            name.push_str(&self.prefix);
            name.push(' ');
        }
        name.push_str(&base);
        if !self.suffix.is_empty() {
            name.push(' ');
            name.push_str(&self.suffix);
        }
        name
    }

    /// Expand rows into cards, row by row and then column by column.
    #[must_use]
    pub fn cards(&self, rows: &[Row], phone_columns: &[String]) -> Vec<ContactCard> {
        let mut cards = Vec::new();
        for (index, row) in rows.iter().enumerate() {
            let name = self.display_name(row, index);
            for column in phone_columns {
                let phone = row.get(column).map_or("", |v| v.trim());
                if phone.is_empty() {
                    continue;
                }
                cards.push(ContactCard {
                    name: name.clone(),
                    phone: phone.to_string(),
                });
            }
        }
        cards
    }
}

impl RowEncoder for ContactCardEncoder {
    fn encode(&self, rows: &[Row], columns: &[String]) -> Result<Vec<u8>> {
        let blocks: Vec<String> = self
            .cards(rows, columns)
            .iter()
            .map(ContactCard::render)
            .collect();
        Ok(blocks.join(CRLF).into_bytes())
    }
}
