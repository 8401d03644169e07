use crate::table::Row;
use serde::{Deserialize, Serialize};

/// How a cell is compared against the query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Cell text contains the query as a substring.
    #[default]
    Contains,
    /// Cell text equals the query.
    Exact,
}

impl MatchMode {
    /// Parse a match-type token. Only `exact` selects [`MatchMode::Exact`];
    /// every other token falls back to [`MatchMode::Contains`].
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        if token == "exact" {
            MatchMode::Exact
        } else {
            MatchMode::Contains
        }
    }

    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            MatchMode::Contains => "contains",
            MatchMode::Exact => "exact",
        }
    }
}

/// Which rows to keep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub columns: Vec<String>,
    pub query: String,
    pub mode: MatchMode,
    pub case_sensitive: bool,
}

impl FilterSpec {
    /// Filtering is opt-in: no columns or an empty query keeps every row.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.columns.is_empty() && !self.query.is_empty()
    }

    fn fold(&self, text: &str) -> String {
        if self.case_sensitive {
            text.to_string()
        } else {
            text.to_lowercase()
        }
    }
}

/// Keep the rows where at least one filter column matches the query.
///
/// Relative row order is preserved. A column missing from a row compares as `""`.
pub fn filter_rows(rows: Vec<Row>, spec: &FilterSpec) -> Vec<Row> {
    if !spec.is_active() {
        return rows;
    }

    let query = spec.fold(&spec.query);
    rows.into_iter()
        .filter(|row| {
            spec.columns.iter().any(|column| {
                let cell = spec.fold(row.get(column).map_or("", String::as_str));
                match spec.mode {
                    MatchMode::Contains => cell.contains(&query),
                    MatchMode::Exact => cell == query,
                }
            })
        })
        .collect()
}
