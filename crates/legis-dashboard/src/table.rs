//! Client-side table search and sort

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Value of one table cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    /// Numeric value
    Number(f64),
    /// Text value
    Text(String),
    /// No value
    Empty,
}

impl Cell {
    /// Text cell, empty for `None`
    #[must_use]
    pub fn text(value: Option<&str>) -> Self {
        value.map_or(Self::Empty, |s| Self::Text(s.to_string()))
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
            (Self::Empty, Self::Empty) => Ordering::Equal,
            (Self::Empty, _) => Ordering::Greater,
            (_, Self::Empty) => Ordering::Less,
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u64> for Cell {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: u64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Empty, Self::Number)
    }
}

/// Row that can be searched and sorted
pub trait TableRow {
    /// Sortable column names
    fn columns() -> &'static [&'static str];

    /// Cell under a column, `Cell::Empty` for unknown columns
    fn cell(&self, column: &str) -> Cell;

    /// Text matched by search
    fn search_text(&self) -> String;
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Asc,
    /// Largest first
    Desc,
}

impl SortDirection {
    /// The other direction
    #[inline]
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Sort column and direction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    /// Column name
    pub column: String,
    /// Direction
    pub direction: SortDirection,
}

impl SortSpec {
    /// Ascending sort on column
    #[must_use]
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Descending sort on column
    #[must_use]
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Search and sort state of a table view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableQuery {
    /// Case-insensitive substring filter, ignored when blank
    pub search: String,
    /// Active sort
    pub sort: Option<SortSpec>,
}

impl TableQuery {
    /// Create empty query
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With search text
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// With sort
    #[must_use]
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Click on a column header
    ///
    /// A new column sorts ascending; the active column flips direction.
    pub fn toggle_sort(&mut self, column: &str) {
        self.sort = Some(match self.sort.take() {
            Some(active) if active.column == column => SortSpec {
                direction: active.direction.reversed(),
                ..active
            },
            _ => SortSpec::asc(column),
        });
    }

    /// Whether the row passes the search filter
    #[must_use]
    pub fn matches<T: TableRow>(&self, row: &T) -> bool {
        let needle = self.search.trim();
        needle.is_empty()
            || row
                .search_text()
                .to_lowercase()
                .contains(&needle.to_lowercase())
    }

    /// Filter and sort rows
    ///
    /// Sorting is stable; empty cells sort last in either direction.
    #[must_use]
    pub fn apply<'a, T: TableRow>(&self, rows: &'a [T]) -> Vec<&'a T> {
        let mut out: Vec<&T> = rows.iter().filter(|row| self.matches(*row)).collect();
        if let Some(sort) = &self.sort {
            out.sort_by(|a, b| {
                let (a, b) = (a.cell(&sort.column), b.cell(&sort.column));
                match (&a, &b, sort.direction) {
                    (Cell::Empty, _, _) | (_, Cell::Empty, _) | (_, _, SortDirection::Asc) => {
                        a.compare(&b)
                    }
                    (_, _, SortDirection::Desc) => b.compare(&a),
                }
            });
        }
        out
    }
}
