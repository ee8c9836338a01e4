//! Human-readable summary of what a sheet keeps from the AI.

use gridveil_core::{column_index, parse_address};

use crate::state::SheetVisibility;

/// More hidden rows than this collapse into a span.
const MAX_LISTED_ROWS: usize = 10;

/// `[HIDDEN FROM AI: Columns B, C; Rows 2, 3; Cells A1]`, or `None` when
/// nothing is hidden. Whitelist entries are not mentioned.
pub fn visibility_summary(state: &SheetVisibility) -> Option<String> {
    let mut parts = Vec::new();

    if !state.hidden_columns.is_empty() {
        let mut cols: Vec<&str> = state.hidden_columns.iter().map(String::as_str).collect();
        cols.sort_by_key(|c| column_index(c).unwrap_or(usize::MAX));
        parts.push(format!("Columns {}", cols.join(", ")));
    }

    if !state.hidden_rows.is_empty() {
        let rows: Vec<u32> = state.hidden_rows.iter().copied().collect();
        if rows.len() > MAX_LISTED_ROWS {
            let (first, last) = (rows[0], rows[rows.len() - 1]);
            parts.push(format!("Rows {first}-{last} ({} rows)", rows.len()));
        } else {
            let rows: Vec<String> = rows.iter().map(u32::to_string).collect();
            parts.push(format!("Rows {}", rows.join(", ")));
        }
    }

    if !state.hidden_cells.is_empty() {
        let mut cells: Vec<&str> = state.hidden_cells.iter().map(String::as_str).collect();
        // Row-major; malformed entries trail in lexical order
        cells.sort_by_key(|c| parse_address(c).ok().map(|a| (a.row_index(), a.column_index())).unwrap_or((usize::MAX, usize::MAX)));
        parts.push(format!("Cells {}", cells.join(", ")));
    }

    if parts.is_empty() {
        None
    } else {
        Some(format!("[HIDDEN FROM AI: {}]", parts.join("; ")))
    }
}
