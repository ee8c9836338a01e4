//! Per-sheet override sets and the nested file/sheet maps around them.

use std::collections::{BTreeMap, BTreeSet};

use gridveil_core::CellAddress;
use serde::{Deserialize, Deserializer, Serialize};

/// Sheet name -> overrides, for one uploaded file.
pub type FileVisibility = BTreeMap<String, SheetVisibility>;

/// Filename -> sheets. Two uploads with the same filename share an entry.
pub type VisibilityMap = BTreeMap<String, FileVisibility>;

/// Redaction overrides for a single sheet.
///
/// `hidden_*` entries redact unconditionally. `visible_*` entries only
/// matter for numeric cells, which are redacted unless whitelisted.
/// Hidden always wins over visible.
///
/// The JSON shape is the persisted and transported one: hidden sets are
/// always written, visible sets only when non-empty. Column letters and
/// cell addresses are uppercased as they are read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetVisibility {
    #[serde(default, deserialize_with = "upper_set")]
    pub hidden_columns: BTreeSet<String>,
    #[serde(default)]
    pub hidden_rows: BTreeSet<u32>,
    #[serde(default, deserialize_with = "upper_set")]
    pub hidden_cells: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty", deserialize_with = "upper_set")]
    pub visible_columns: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub visible_rows: BTreeSet<u32>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty", deserialize_with = "upper_set")]
    pub visible_cells: BTreeSet<String>,
}

impl SheetVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no override of any kind is recorded.
    pub fn is_empty(&self) -> bool {
        !self.has_hidden() && !self.has_whitelist()
    }

    pub fn has_hidden(&self) -> bool {
        !self.hidden_columns.is_empty() || !self.hidden_rows.is_empty() || !self.hidden_cells.is_empty()
    }

    pub fn has_whitelist(&self) -> bool {
        !self.visible_columns.is_empty() || !self.visible_rows.is_empty() || !self.visible_cells.is_empty()
    }

    /// Covered by any hidden entry (cell, column or row).
    pub fn is_hidden(&self, addr: &CellAddress) -> bool {
        contains_ignore_case(&self.hidden_cells, &addr.to_string())
            || contains_ignore_case(&self.hidden_columns, addr.column())
            || self.hidden_rows.contains(&addr.row())
    }

    /// Covered by any whitelist entry (cell, column or row).
    pub fn is_whitelisted(&self, addr: &CellAddress) -> bool {
        contains_ignore_case(&self.visible_cells, &addr.to_string())
            || contains_ignore_case(&self.visible_columns, addr.column())
            || self.visible_rows.contains(&addr.row())
    }

    pub fn hide_cell(mut self, addr: &str) -> Self {
        self.hidden_cells.insert(addr.to_ascii_uppercase());
        self
    }

    pub fn hide_column(mut self, column: &str) -> Self {
        self.hidden_columns.insert(column.to_ascii_uppercase());
        self
    }

    pub fn hide_row(mut self, row: u32) -> Self {
        self.hidden_rows.insert(row);
        self
    }

    pub fn show_cell(mut self, addr: &str) -> Self {
        self.visible_cells.insert(addr.to_ascii_uppercase());
        self
    }

    pub fn show_column(mut self, column: &str) -> Self {
        self.visible_columns.insert(column.to_ascii_uppercase());
        self
    }

    pub fn show_row(mut self, row: u32) -> Self {
        self.visible_rows.insert(row);
        self
    }

    /// Uppercase column letters and cell addresses in every set.
    pub fn normalize(&mut self) {
        for set in [
            &mut self.hidden_columns,
            &mut self.hidden_cells,
            &mut self.visible_columns,
            &mut self.visible_cells,
        ] {
            if set.iter().any(|s| s.bytes().any(|b| b.is_ascii_lowercase())) {
                *set = set.iter().map(|s| s.to_ascii_uppercase()).collect();
            }
        }
    }
}

fn upper_set<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeSet::<String>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|s| s.to_ascii_uppercase()).collect())
}

/// Sets filled through the public fields may still hold lowercase entries.
pub(crate) fn contains_ignore_case(set: &BTreeSet<String>, key: &str) -> bool {
    set.contains(key) || set.iter().any(|s| s.eq_ignore_ascii_case(key))
}

/// Normalise every sheet and drop empty sheets and files.
pub fn prune(map: &mut VisibilityMap) {
    for file in map.values_mut() {
        for sheet in file.values_mut() {
            sheet.normalize();
        }
        file.retain(|_, sheet| !sheet.is_empty());
    }
    map.retain(|_, file| !file.is_empty());
}
