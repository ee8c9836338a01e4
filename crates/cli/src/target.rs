// Command-line targets: what `hide` and `show` act on.
//
//   B3       one cell
//   A1:C4    a cell rectangle
//   B:D      whole columns (C:C for one)
//   2:5      whole rows (3:3 for one)

use gridveil_core::{column_index, column_letter, CellRange};

/// Largest number of cells, rows or columns one target may expand to.
pub const MAX_TARGET_ENTRIES: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Cells(Vec<String>),
    Columns(Vec<String>),
    Rows(Vec<u32>),
}

pub fn parse_target(raw: &str) -> Result<Target, String> {
    let s = raw.trim().to_ascii_uppercase();
    let bad = || format!("invalid target {raw:?} (expected B3, A1:C4, B:D or 2:5)");

    if let Some((a, b)) = s.split_once(':') {
        if is_letters(a) && is_letters(b) {
            let (a, b) = (column_index(a).map_err(|_| bad())?, column_index(b).map_err(|_| bad())?);
            check_size(raw, (a.max(b) - a.min(b)) as u64 + 1)?;
            return Ok(Target::Columns((a.min(b)..=a.max(b)).map(column_letter).collect()));
        }
        if is_digits(a) && is_digits(b) {
            let a: u32 = a.parse().map_err(|_| bad())?;
            let b: u32 = b.parse().map_err(|_| bad())?;
            if a == 0 || b == 0 {
                return Err(format!("invalid target {raw:?}: rows start at 1"));
            }
            check_size(raw, u64::from(a.max(b) - a.min(b)) + 1)?;
            return Ok(Target::Rows((a.min(b)..=a.max(b)).collect()));
        }
    }

    let range = CellRange::parse(&s).map_err(|_| bad())?;
    let (start, end) = (range.start(), range.end());
    let width = (end.column_index() - start.column_index()) as u64 + 1;
    let height = u64::from(end.row() - start.row()) + 1;
    check_size(raw, width.saturating_mul(height))?;
    Ok(Target::Cells(range.addresses().map(|a| a.to_string()).collect()))
}

fn check_size(raw: &str, entries: u64) -> Result<(), String> {
    if entries > MAX_TARGET_ENTRIES {
        return Err(format!(
            "target {raw:?} covers {entries} entries (limit {MAX_TARGET_ENTRIES})"
        ));
    }
    Ok(())
}

fn is_letters(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_uppercase())
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
