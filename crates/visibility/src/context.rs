//! Markdown description of uploaded workbooks for the AI prompt.
//!
//! Structure only: headers, labels, formulas and counts. A raw number
//! appears only when its cell resolves to `Shown`, and every listed cell
//! goes through [`resolve_cell`](crate::policy::resolve_cell).

use std::collections::BTreeMap;

use gridveil_core::{parse_address, CellAddress, SheetStructure, WorkbookStructure};

use crate::policy::resolve_cell;
use crate::state::SheetVisibility;
use crate::storage::Storage;
use crate::store::VisibilityStore;
use crate::summary::visibility_summary;

/// Caps on how much of each sheet is listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextLimits {
    pub max_row_labels: usize,
    pub max_formulas: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            max_row_labels: 25,
            max_formulas: 15,
        }
    }
}

/// Render every file and sheet. Empty when there are no files.
pub fn build_ai_context<S: Storage>(
    files: &[WorkbookStructure],
    store: &VisibilityStore<S>,
    limits: ContextLimits,
) -> String {
    if files.is_empty() {
        return String::new();
    }

    let mut out = vec![
        "# Uploaded spreadsheets".to_string(),
        "Reference cells directly by address (e.g., C5, D4:D9).".to_string(),
        String::new(),
    ];

    for file in files {
        out.push(format!("## File: {}", file.filename));
        for sheet in &file.sheets {
            let state = store.sheet_visibility(&file.filename, &sheet.name);
            render_sheet(&mut out, sheet, &state, limits);
        }
        out.push(String::new());
    }

    out.join("\n")
}

fn render_sheet(out: &mut Vec<String>, sheet: &SheetStructure, state: &SheetVisibility, limits: ContextLimits) {
    out.push(format!("\n### Sheet: {}", sheet.name));
    out.push(format!("Size: {} rows × {} columns", sheet.rows, sheet.cols));
    if let Some(summary) = visibility_summary(state) {
        out.push(summary);
    }
    out.push(String::new());

    let shown = |addr: &str| resolve_cell(addr, sheet.classification(addr), state).is_shown();

    let headers = visible_entries(&sheet.headers, &shown);
    if !headers.is_empty() {
        out.push("**Column Headers:**".to_string());
        for (addr, text) in &headers {
            out.push(format!("  {addr}: {text}"));
        }
    }

    let labels = visible_entries(&sheet.row_labels, &shown);
    push_capped(out, "\n**Row Labels (column A):**", &labels, limits.max_row_labels, "rows");

    if let Some(header_row) = sorted_keys(&sheet.headers).first().map(CellAddress::row) {
        out.push(format!(
            "\n**Data Range:** Row {} to ~Row {}",
            header_row + 1,
            sheet.rows
        ));
    }

    let formulas = visible_entries(&sheet.formulas, &shown);
    push_capped(out, "\n**Existing Formulas:**", &formulas, limits.max_formulas, "formulas");

    let numbers: Vec<(CellAddress, String)> = sheet
        .numeric_values
        .keys()
        .filter_map(|addr| parse_address(addr).ok())
        .filter(|addr| shown(&addr.to_string()))
        .filter_map(|addr| {
            let value = sheet.display_value(&addr.to_string())?;
            Some((addr, value))
        })
        .collect();
    if !numbers.is_empty() {
        out.push("\n**Shared Values:**".to_string());
        for (addr, value) in sorted(numbers) {
            out.push(format!("  {addr}: {value}"));
        }
    }

    let counts = serde_json::to_string(&sheet.type_counts()).unwrap_or_else(|_| "{}".to_string());
    out.push(format!("\n**Cell Types:** {counts}"));
}

fn push_capped(out: &mut Vec<String>, title: &str, entries: &[(CellAddress, String)], cap: usize, noun: &str) {
    if entries.is_empty() {
        return;
    }
    out.push(title.to_string());
    for (addr, text) in entries.iter().take(cap) {
        out.push(format!("  {addr}: {text}"));
    }
    if entries.len() > cap {
        out.push(format!("  ... and {} more {noun}", entries.len() - cap));
    }
}

/// Entries whose cell resolves to `Shown`, row-major. Keys that are not
/// cell addresses are skipped.
fn visible_entries<F>(entries: &BTreeMap<String, String>, shown: &F) -> Vec<(CellAddress, String)>
where
    F: Fn(&str) -> bool,
{
    let kept = entries
        .iter()
        .filter(|(addr, _)| shown(addr))
        .filter_map(|(addr, text)| Some((parse_address(&addr.to_ascii_uppercase()).ok()?, text.clone())))
        .collect();
    sorted(kept)
}

fn sorted_keys(entries: &BTreeMap<String, String>) -> Vec<CellAddress> {
    let mut keys: Vec<CellAddress> = entries
        .keys()
        .filter_map(|addr| parse_address(&addr.to_ascii_uppercase()).ok())
        .collect();
    keys.sort();
    keys
}

fn sorted(mut entries: Vec<(CellAddress, String)>) -> Vec<(CellAddress, String)> {
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::ToggleDirection;
    use crate::storage::MemoryStorage;
    use gridveil_core::CellClass;

    fn budget() -> WorkbookStructure {
        let mut sheet = SheetStructure::new("Budget", 4, 3);
        sheet.headers.insert("A1".into(), "Item".into());
        sheet.headers.insert("B1".into(), "Q1".into());
        sheet.headers.insert("C1".into(), "Q2".into());
        sheet.row_labels.insert("A2".into(), "Rent".into());
        sheet.row_labels.insert("A3".into(), "Salaries".into());
        sheet.formulas.insert("C4".into(), "=SUM(C2:C3)".into());
        sheet.numeric_values.insert("B2".into(), 1200.0);
        sheet.numeric_values.insert("B3".into(), 98000.5);
        for addr in ["A1", "B1", "C1", "A2", "A3"] {
            sheet.cell_types.insert(addr.into(), CellClass::Text);
        }
        sheet.cell_types.insert("B2".into(), CellClass::Numeric);
        sheet.cell_types.insert("B3".into(), CellClass::Numeric);
        sheet.cell_types.insert("C4".into(), CellClass::Formula);
        WorkbookStructure {
            filename: "budget.xlsx".into(),
            sheets: vec![sheet],
        }
    }

    #[test]
    fn no_files_no_context() {
        let store = VisibilityStore::open(MemoryStorage::new());
        assert_eq!(build_ai_context(&[], &store, ContextLimits::default()), "");
    }

    #[test]
    fn numbers_stay_out_by_default() {
        let store = VisibilityStore::open(MemoryStorage::new());
        let ctx = build_ai_context(&[budget()], &store, ContextLimits::default());

        assert!(ctx.contains("## File: budget.xlsx"));
        assert!(ctx.contains("### Sheet: Budget"));
        assert!(ctx.contains("Size: 4 rows × 3 columns"));
        assert!(ctx.contains("  B1: Q1"));
        assert!(ctx.contains("  A3: Salaries"));
        assert!(ctx.contains("**Data Range:** Row 2 to ~Row 4"));
        assert!(ctx.contains("  C4: =SUM(C2:C3)"));
        assert!(ctx.contains(r#"**Cell Types:** {"formula":1,"numeric":2,"text":5}"#));
        assert!(!ctx.contains("1200"));
        assert!(!ctx.contains("98000"));
        assert!(!ctx.contains("HIDDEN FROM AI"));
    }

    #[test]
    fn hidden_cells_are_omitted_and_summarised() {
        let mut store = VisibilityStore::open(MemoryStorage::new());
        store.toggle_rows("budget.xlsx", "Budget", [3], ToggleDirection::Hide).unwrap();
        store.toggle_columns("budget.xlsx", "Budget", ["C"], ToggleDirection::Hide).unwrap();

        let ctx = build_ai_context(&[budget()], &store, ContextLimits::default());
        assert!(ctx.contains("[HIDDEN FROM AI: Columns C; Rows 3]"));
        assert!(!ctx.contains("Salaries"));
        assert!(!ctx.contains("Q2"));
        assert!(!ctx.contains("=SUM"));
        assert!(ctx.contains("  A2: Rent"));
    }

    #[test]
    fn whitelisted_numbers_are_shared() {
        let mut store = VisibilityStore::open(MemoryStorage::new());
        let wb = budget();
        store
            .toggle_cells("budget.xlsx", "Budget", ["B2"], ToggleDirection::Show, &wb.sheets[0])
            .unwrap();

        let ctx = build_ai_context(&[wb], &store, ContextLimits::default());
        assert!(ctx.contains("**Shared Values:**"));
        assert!(ctx.contains("  B2: 1200"));
        assert!(!ctx.contains("98000"));
    }

    #[test]
    fn labels_are_capped() {
        let mut wb = budget();
        let sheet = &mut wb.sheets[0];
        for row in 2..=40 {
            sheet.row_labels.insert(format!("A{row}"), format!("Line {row}"));
        }
        let store = VisibilityStore::open(MemoryStorage::new());
        let limits = ContextLimits {
            max_row_labels: 5,
            ..ContextLimits::default()
        };

        let ctx = build_ai_context(&[wb], &store, limits);
        assert!(ctx.contains("  A6: Line 6"));
        assert!(!ctx.contains("  A7: Line 7"));
        assert!(ctx.contains("  ... and 34 more rows"));
    }
}
