//! Parsed sheet structure, as handed over by the upload/parsing side.
//!
//! Read-only here: the only thing the rest of the workspace asks of it is
//! "what kind of cell lives at this address".

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Classification of a single cell.
///
/// `Numeric` is the privacy-sensitive one: raw numbers are what leaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellClass {
    Header,
    #[serde(alias = "label")]
    RowLabel,
    Formula,
    Text,
    Numeric,
    Empty,
}

impl CellClass {
    pub fn is_numeric(&self) -> bool {
        matches!(self, CellClass::Numeric)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CellClass::Header => "header",
            CellClass::RowLabel => "row_label",
            CellClass::Formula => "formula",
            CellClass::Text => "text",
            CellClass::Numeric => "numeric",
            CellClass::Empty => "empty",
        }
    }
}

/// Anything that can classify a cell address.
///
/// Implemented by [`SheetStructure`] and by plain closures, so callers
/// that only know classifications (tests, UIs with their own models) can
/// drive the visibility store without building a full structure.
pub trait Classify {
    fn classify(&self, address: &str) -> CellClass;
}

impl<F> Classify for F
where
    F: Fn(&str) -> CellClass,
{
    fn classify(&self, address: &str) -> CellClass {
        self(address)
    }
}

/// Structural representation of one sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetStructure {
    pub name: String,
    pub rows: usize,
    pub cols: usize,
    pub headers: BTreeMap<String, String>,
    pub row_labels: BTreeMap<String, String>,
    pub formulas: BTreeMap<String, String>,
    pub text_values: BTreeMap<String, String>,
    pub numeric_values: BTreeMap<String, f64>,
    pub cell_types: BTreeMap<String, CellClass>,
}

impl SheetStructure {
    pub fn new(name: impl Into<String>, rows: usize, cols: usize) -> Self {
        Self {
            name: name.into(),
            rows,
            cols,
            ..Self::default()
        }
    }

    /// Classify a cell. Headers and row labels take precedence over the
    /// raw `cell_types` entry, which in turn beats the value maps.
    pub fn classification(&self, address: &str) -> CellClass {
        let upper;
        let addr = if address.bytes().any(|b| b.is_ascii_lowercase()) {
            upper = address.to_ascii_uppercase();
            upper.as_str()
        } else {
            address
        };

        if self.headers.contains_key(addr) {
            CellClass::Header
        } else if self.row_labels.contains_key(addr) {
            CellClass::RowLabel
        } else if self.formulas.contains_key(addr) {
            CellClass::Formula
        } else if let Some(class) = self.cell_types.get(addr) {
            *class
        } else if self.numeric_values.contains_key(addr) {
            CellClass::Numeric
        } else if self.text_values.contains_key(addr) {
            CellClass::Text
        } else {
            CellClass::Empty
        }
    }

    /// Display text for a cell, if the structure carries any.
    pub fn display_value(&self, address: &str) -> Option<String> {
        if let Some(s) = self.headers.get(address) {
            return Some(s.clone());
        }
        if let Some(s) = self.row_labels.get(address) {
            return Some(s.clone());
        }
        if let Some(s) = self.formulas.get(address) {
            return Some(s.clone());
        }
        if let Some(n) = self.numeric_values.get(address) {
            return Some(format_number(*n));
        }
        self.text_values.get(address).cloned()
    }

    /// Count of cells per classification, over `cell_types`.
    pub fn type_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for class in self.cell_types.values() {
            *counts.entry(class.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

impl Classify for SheetStructure {
    fn classify(&self, address: &str) -> CellClass {
        self.classification(address)
    }
}

/// All sheets of one uploaded file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkbookStructure {
    pub filename: String,
    #[serde(default)]
    pub sheets: Vec<SheetStructure>,
}

impl WorkbookStructure {
    pub fn sheet(&self, name: &str) -> Option<&SheetStructure> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

// Avoid ".0" suffix for whole numbers
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}
