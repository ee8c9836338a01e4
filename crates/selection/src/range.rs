//! Selections and the `SelectionRange` value they resolve to.

use gridveil_core::CellRange;
use serde::{Deserialize, Serialize};

/// Zero-based grid coordinate as reported by the rendered grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    pub col: usize,
    pub row: usize,
}

impl GridCoord {
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

/// Rendered sheet extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    pub rows: usize,
    pub cols: usize,
}

impl GridBounds {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Callers check `is_empty` first.
    pub fn clamp(&self, coord: GridCoord) -> GridCoord {
        GridCoord {
            col: coord.col.min(self.cols.saturating_sub(1)),
            row: coord.row.min(self.rows.saturating_sub(1)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionKind {
    Cells,
    Row,
    Column,
}

/// A live selection: where the drag started and where it is now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub kind: SelectionKind,
    pub anchor: GridCoord,
    pub cursor: GridCoord,
}

impl Selection {
    pub fn new(kind: SelectionKind, at: GridCoord) -> Self {
        Self {
            kind,
            anchor: at,
            cursor: at,
        }
    }

    /// Covered rectangle. Row selections span every column, column
    /// selections every row.
    pub fn rect(&self, bounds: GridBounds) -> CellRange {
        let (min_col, max_col) = (self.anchor.col.min(self.cursor.col), self.anchor.col.max(self.cursor.col));
        let (min_row, max_row) = (self.anchor.row.min(self.cursor.row), self.anchor.row.max(self.cursor.row));
        let last_col = bounds.cols.saturating_sub(1);
        let last_row = bounds.rows.saturating_sub(1);
        match self.kind {
            SelectionKind::Cells => CellRange::from_coords((min_col, min_row), (max_col, max_row)),
            SelectionKind::Row => CellRange::from_coords((0, min_row), (last_col, max_row)),
            SelectionKind::Column => CellRange::from_coords((min_col, 0), (max_col, last_row)),
        }
    }
}

/// What a finished selection hands to its consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRange {
    pub sheet_name: String,
    pub start_cell: String,
    pub end_cell: String,
    /// Every covered address, row-major.
    pub cells: Vec<String>,
    pub range_string: String,
    pub kind: SelectionKind,
}

impl SelectionRange {
    pub fn from_selection(sheet_name: &str, selection: &Selection, bounds: GridBounds) -> Self {
        let rect = selection.rect(bounds);
        Self {
            sheet_name: sheet_name.to_string(),
            start_cell: rect.start().to_string(),
            end_cell: rect.end().to_string(),
            cells: rect.addresses().map(|a| a.to_string()).collect(),
            range_string: range_string(selection.kind, &rect),
            kind: selection.kind,
        }
    }
}

/// "A1", "A1:B5", "Column A", "Columns A:C", "Row 1", "Rows 1:5".
pub fn range_string(kind: SelectionKind, rect: &CellRange) -> String {
    let (start, end) = (rect.start(), rect.end());
    match kind {
        SelectionKind::Cells => rect.to_string(),
        SelectionKind::Column if start.column() == end.column() => format!("Column {}", start.column()),
        SelectionKind::Column => format!("Columns {}:{}", start.column(), end.column()),
        SelectionKind::Row if start.row() == end.row() => format!("Row {}", start.row()),
        SelectionKind::Row => format!("Rows {}:{}", start.row(), end.row()),
    }
}
