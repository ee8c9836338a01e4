//! `gridveil-selection`: drag a range on the grid, then ask about it,
//! hide it, or show it.

pub mod dispatch;
pub mod machine;
pub mod menu;
pub mod range;

pub use dispatch::dispatch;
pub use machine::{
    transition, PointerButton, PointerTarget, SelectionContext, SelectionController, SelectionEffect,
    SelectionEvent, SelectionState,
};
pub use menu::{clamp_to_viewport, ActionMenu, MenuAction, MenuLayout, Point, Size};
pub use range::{range_string, GridBounds, GridCoord, Selection, SelectionKind, SelectionRange};
