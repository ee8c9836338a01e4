//! Default-deny redaction policy and the override toggles.
//!
//! Numeric cells are redacted unless whitelisted; everything else is shown
//! unless hidden. Hidden entries beat whitelist entries at any granularity.
//! Toggles only ever record exceptions to that default.

use std::fmt;
use std::str::FromStr;

use gridveil_core::{column_index, parse_address, CellClass, Classify};
use serde::{Deserialize, Serialize};

use crate::state::{contains_ignore_case, SheetVisibility};

/// Outcome of resolving one cell against the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Redacted,
    Shown,
}

impl Resolution {
    pub fn is_redacted(&self) -> bool {
        matches!(self, Resolution::Redacted)
    }

    pub fn is_shown(&self) -> bool {
        matches!(self, Resolution::Shown)
    }
}

/// Direction of a bulk toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleDirection {
    Show,
    Hide,
}

impl fmt::Display for ToggleDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToggleDirection::Show => f.write_str("show"),
            ToggleDirection::Hide => f.write_str("hide"),
        }
    }
}

impl FromStr for ToggleDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "show" => Ok(ToggleDirection::Show),
            "hide" => Ok(ToggleDirection::Hide),
            other => Err(format!("unknown toggle direction '{other}' (expected show or hide)")),
        }
    }
}

/// Decide whether a cell may be exposed.
///
/// A malformed address can only match a cell-level entry; it is logged
/// because the grid never produces one.
pub fn resolve_cell(address: &str, class: CellClass, state: &SheetVisibility) -> Resolution {
    let addr = address.to_ascii_uppercase();

    let (is_hidden, is_whitelisted) = match parse_address(&addr) {
        Ok(parsed) => (state.is_hidden(&parsed), state.is_whitelisted(&parsed)),
        Err(e) => {
            log::warn!("resolve_cell: {e}");
            (
                contains_ignore_case(&state.hidden_cells, &addr),
                contains_ignore_case(&state.visible_cells, &addr),
            )
        }
    };

    if is_hidden {
        Resolution::Redacted
    } else if class.is_numeric() {
        if is_whitelisted {
            Resolution::Shown
        } else {
            Resolution::Redacted
        }
    } else {
        Resolution::Shown
    }
}

/// Return a copy of `state` with the given cells shown or hidden.
///
/// Hide: drop any whitelist entry; record a hidden entry only for
/// non-numeric cells (numeric ones are already redacted by default).
/// Show: drop any hidden entry; record a whitelist entry only for numeric
/// cells (everything else is already shown by default).
pub fn toggle_cells<I, A, C>(
    state: &SheetVisibility,
    addresses: I,
    direction: ToggleDirection,
    classifier: &C,
) -> SheetVisibility
where
    I: IntoIterator<Item = A>,
    A: AsRef<str>,
    C: Classify + ?Sized,
{
    let mut next = state.clone();
    for address in addresses {
        let addr = address.as_ref().to_ascii_uppercase();
        if let Err(e) = parse_address(&addr) {
            log::warn!("toggle_cells: skipping {e}");
            continue;
        }
        let numeric = classifier.classify(&addr).is_numeric();
        match direction {
            ToggleDirection::Hide => {
                next.visible_cells.remove(&addr);
                if !numeric {
                    next.hidden_cells.insert(addr);
                }
            }
            ToggleDirection::Show => {
                next.hidden_cells.remove(&addr);
                if numeric {
                    next.visible_cells.insert(addr);
                }
            }
        }
    }
    next
}

/// Return a copy of `state` with whole columns shown or hidden.
///
/// Cell-level entries of the opposite kind inside those columns are
/// dropped, so the column override is the only one left standing.
pub fn toggle_columns<I, A>(state: &SheetVisibility, columns: I, direction: ToggleDirection) -> SheetVisibility
where
    I: IntoIterator<Item = A>,
    A: AsRef<str>,
{
    let mut next = state.clone();
    for column in columns {
        let column = column.as_ref().to_ascii_uppercase();
        if let Err(e) = column_index(&column) {
            log::warn!("toggle_columns: skipping {e}");
            continue;
        }
        let in_column = |cell: &String| matches!(parse_address(cell), Ok(a) if a.column() == column);
        match direction {
            ToggleDirection::Hide => {
                next.visible_columns.remove(&column);
                next.visible_cells.retain(|c| !in_column(c));
                next.hidden_columns.insert(column);
            }
            ToggleDirection::Show => {
                next.hidden_columns.remove(&column);
                next.hidden_cells.retain(|c| !in_column(c));
                next.visible_columns.insert(column);
            }
        }
    }
    next
}

/// Return a copy of `state` with whole rows (1-based) shown or hidden.
pub fn toggle_rows<I>(state: &SheetVisibility, rows: I, direction: ToggleDirection) -> SheetVisibility
where
    I: IntoIterator<Item = u32>,
{
    let mut next = state.clone();
    for row in rows {
        if row == 0 {
            log::warn!("toggle_rows: skipping row 0 (rows are 1-based)");
            continue;
        }
        let in_row = |cell: &String| matches!(parse_address(cell), Ok(a) if a.row() == row);
        match direction {
            ToggleDirection::Hide => {
                next.visible_rows.remove(&row);
                next.visible_cells.retain(|c| !in_row(c));
                next.hidden_rows.insert(row);
            }
            ToggleDirection::Show => {
                next.hidden_rows.remove(&row);
                next.hidden_cells.retain(|c| !in_row(c));
                next.visible_rows.insert(row);
            }
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric_b3(addr: &str) -> CellClass {
        if addr == "B3" {
            CellClass::Numeric
        } else {
            CellClass::Text
        }
    }

    #[test]
    fn numeric_is_default_deny() {
        let s = SheetVisibility::new();
        assert_eq!(resolve_cell("B3", CellClass::Numeric, &s), Resolution::Redacted);
        assert_eq!(resolve_cell("B3", CellClass::Text, &s), Resolution::Shown);
        assert_eq!(resolve_cell("B3", CellClass::Empty, &s), Resolution::Shown);
    }

    #[test]
    fn whitelist_then_hidden_column_wins() {
        let s = SheetVisibility::new().show_cell("B3");
        assert_eq!(resolve_cell("B3", CellClass::Numeric, &s), Resolution::Shown);

        let s = s.hide_column("B");
        assert_eq!(resolve_cell("B3", CellClass::Numeric, &s), Resolution::Redacted);
    }

    #[test]
    fn lowercase_hidden_column_from_json_still_wins() {
        let s: SheetVisibility = serde_json::from_str(
            r#"{"hiddenColumns": ["b"], "hiddenRows": [], "hiddenCells": [], "visibleCells": ["B3"]}"#,
        )
        .unwrap();
        assert_eq!(resolve_cell("B3", CellClass::Numeric, &s), Resolution::Redacted);
        assert_eq!(resolve_cell("b3", CellClass::Numeric, &s), Resolution::Redacted);
    }

    #[test]
    fn whitelist_row_and_column_granularity() {
        let by_row = SheetVisibility::new().show_row(3);
        assert!(resolve_cell("B3", CellClass::Numeric, &by_row).is_shown());
        assert!(resolve_cell("B4", CellClass::Numeric, &by_row).is_redacted());

        let by_col = SheetVisibility::new().show_column("B");
        assert!(resolve_cell("B99", CellClass::Numeric, &by_col).is_shown());
    }

    #[test]
    fn whitelist_is_inert_on_non_numeric() {
        let s = SheetVisibility::new().show_cell("A1");
        assert!(resolve_cell("A1", CellClass::Header, &s).is_shown());
        let s = s.hide_row(1);
        assert!(resolve_cell("A1", CellClass::Header, &s).is_redacted());
    }

    #[test]
    fn resolve_accepts_lowercase() {
        let s = SheetVisibility::new().hide_cell("C2");
        assert!(resolve_cell("c2", CellClass::Text, &s).is_redacted());
    }

    #[test]
    fn malformed_address_only_matches_cell_sets() {
        let mut s = SheetVisibility::new().hide_column("B");
        assert!(resolve_cell("B", CellClass::Text, &s).is_shown());
        s.hidden_cells.insert("B".into());
        assert!(resolve_cell("B", CellClass::Text, &s).is_redacted());
    }

    #[test]
    fn hide_numeric_leaves_hidden_set_alone() {
        let s = SheetVisibility::new().show_cell("B3");
        let next = toggle_cells(&s, ["B3"], ToggleDirection::Hide, &numeric_b3);
        assert!(next.hidden_cells.is_empty());
        assert!(next.visible_cells.is_empty());
        assert!(resolve_cell("B3", CellClass::Numeric, &next).is_redacted());
    }

    #[test]
    fn hide_text_adds_one_entry() {
        let next = toggle_cells(&SheetVisibility::new(), ["A1"], ToggleDirection::Hide, &numeric_b3);
        assert_eq!(next.hidden_cells.len(), 1);
        assert!(next.hidden_cells.contains("A1"));
    }

    #[test]
    fn show_is_asymmetric() {
        let s = SheetVisibility::new().hide_cell("A1");
        let next = toggle_cells(&s, ["A1", "B3"], ToggleDirection::Show, &numeric_b3);
        assert!(next.hidden_cells.is_empty());
        assert_eq!(next.visible_cells.len(), 1);
        assert!(next.visible_cells.contains("B3"));
    }

    #[test]
    fn hide_twice_is_idempotent() {
        let once = toggle_cells(&SheetVisibility::new(), ["A1", "B3", "C7"], ToggleDirection::Hide, &numeric_b3);
        let twice = toggle_cells(&once, ["A1", "B3", "C7"], ToggleDirection::Hide, &numeric_b3);
        assert_eq!(once, twice);
    }

    #[test]
    fn toggle_skips_malformed() {
        let next = toggle_cells(&SheetVisibility::new(), ["A1", "nope", "1A"], ToggleDirection::Hide, &numeric_b3);
        assert_eq!(next.hidden_cells.len(), 1);
    }

    #[test]
    fn toggle_does_not_mutate_input() {
        let s = SheetVisibility::new();
        let _ = toggle_cells(&s, ["A1"], ToggleDirection::Hide, &numeric_b3);
        assert!(s.is_empty());
    }

    #[test]
    fn column_toggles_clear_conflicting_cells() {
        let s = SheetVisibility::new().show_cell("B3").show_cell("C3");
        let hidden = toggle_columns(&s, ["b"], ToggleDirection::Hide);
        assert!(hidden.hidden_columns.contains("B"));
        assert_eq!(hidden.visible_cells.iter().collect::<Vec<_>>(), vec!["C3"]);

        let s = SheetVisibility::new().hide_cell("B2").hide_column("B");
        let shown = toggle_columns(&s, ["B"], ToggleDirection::Show);
        assert!(shown.hidden_columns.is_empty());
        assert!(shown.hidden_cells.is_empty());
        assert!(shown.visible_columns.contains("B"));
        assert!(resolve_cell("B2", CellClass::Numeric, &shown).is_shown());
    }

    #[test]
    fn row_toggles() {
        let s = SheetVisibility::new().hide_cell("A2").show_cell("B2");
        let hidden = toggle_rows(&s, [2], ToggleDirection::Hide);
        assert!(hidden.hidden_rows.contains(&2));
        assert!(hidden.visible_cells.is_empty());
        assert!(hidden.hidden_cells.contains("A2"));

        let shown = toggle_rows(&hidden, [2, 0], ToggleDirection::Show);
        assert!(shown.hidden_rows.is_empty());
        assert!(shown.hidden_cells.is_empty());
        assert_eq!(shown.visible_rows.iter().copied().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn direction_parses() {
        assert_eq!("HIDE".parse::<ToggleDirection>(), Ok(ToggleDirection::Hide));
        assert!("flip".parse::<ToggleDirection>().is_err());
        assert_eq!(ToggleDirection::Show.to_string(), "show");
    }
}
