// ============================================================
// COLUMN KIND ENUM
// ============================================================
// Storage type of a column, inferred from its values

use serde::{Deserialize, Serialize};

use super::Cell;

/// Inferred type of a table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Every present value parses as a whole number
    Integer,

    /// Every present value parses as a number, at least one is fractional.
    /// Columns with no present values at all also land here.
    Real,

    /// Anything else
    Text,
}

impl ColumnKind {
    /// Infer the kind from raw text values. `None` marks a missing value.
    pub fn infer_raw<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut seen_any = false;
        let mut all_integer = true;

        for value in values.into_iter().flatten() {
            seen_any = true;
            if value.parse::<i64>().is_ok() {
                continue;
            }
            if value.parse::<f64>().is_ok() {
                all_integer = false;
                continue;
            }
            return ColumnKind::Text;
        }

        if seen_any && all_integer {
            ColumnKind::Integer
        } else {
            ColumnKind::Real
        }
    }

    /// Infer the kind from cells that are already typed
    pub fn infer_cells<'a, I>(cells: I) -> Self
    where
        I: IntoIterator<Item = &'a Cell>,
    {
        let mut kind: Option<ColumnKind> = None;

        for cell in cells {
            let cell_kind = match cell {
                Cell::Missing => continue,
                Cell::Integer(_) => ColumnKind::Integer,
                Cell::Real(_) => ColumnKind::Real,
                Cell::Text(_) => return ColumnKind::Text,
            };
            kind = Some(match (kind, cell_kind) {
                (Some(ColumnKind::Real), _) | (_, ColumnKind::Real) => ColumnKind::Real,
                _ => ColumnKind::Integer,
            });
        }

        kind.unwrap_or(ColumnKind::Real)
    }

    /// SQLite column affinity for this kind
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnKind::Integer => "INTEGER",
            ColumnKind::Real => "REAL",
            ColumnKind::Text => "TEXT",
        }
    }

    /// Convert a raw value into a cell of this kind
    pub fn parse_cell(&self, raw: Option<&str>) -> Cell {
        let Some(raw) = raw else {
            return Cell::Missing;
        };

        match self {
            ColumnKind::Integer => raw
                .parse::<i64>()
                .map(Cell::Integer)
                .unwrap_or_else(|_| Cell::Text(raw.to_string())),
            ColumnKind::Real => raw
                .parse::<f64>()
                .map(Cell::Real)
                .unwrap_or_else(|_| Cell::Text(raw.to_string())),
            ColumnKind::Text => Cell::Text(raw.to_string()),
        }
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnKind::Integer => write!(f, "Integer"),
            ColumnKind::Real => write!(f, "Real"),
            ColumnKind::Text => write!(f, "Text"),
        }
    }
}
