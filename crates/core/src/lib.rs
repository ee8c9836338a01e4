//! `gridveil-core`: cell addressing and the parsed sheet model.
//!
//! Pure data crate: no IO, no state.

pub mod address;
pub mod structure;

pub use address::{
    build_address, column_index, column_letter, parse_address, AddressError, CellAddress,
    CellRange,
};
pub use structure::{CellClass, Classify, SheetStructure, WorkbookStructure};
