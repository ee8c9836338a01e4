//! Apply a chosen menu action to the visibility store.

use gridveil_core::Classify;
use gridveil_visibility::{Storage, StoreError, ToggleDirection, VisibilityStore};

use crate::machine::SelectionEffect;
use crate::range::SelectionRange;

/// Hide/Show toggle every covered cell, whatever the selection kind, so
/// only exceptions to the default policy are recorded. Ask-AI leaves the
/// store alone and hands the range back.
pub fn dispatch<S, C>(
    effect: SelectionEffect,
    store: &mut VisibilityStore<S>,
    filename: &str,
    classifier: &C,
) -> Result<Option<SelectionRange>, StoreError>
where
    S: Storage,
    C: Classify + ?Sized,
{
    let (range, direction) = match effect {
        SelectionEffect::AskAi(range) => return Ok(Some(range)),
        SelectionEffect::Hide(range) => (range, ToggleDirection::Hide),
        SelectionEffect::Show(range) => (range, ToggleDirection::Show),
    };

    log::debug!("{direction} {} on {filename}/{}", range.range_string, range.sheet_name);
    store.toggle_cells(filename, &range.sheet_name, &range.cells, direction, classifier)?;
    Ok(None)
}
