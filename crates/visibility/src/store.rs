//! The visibility store: one per application session.
//!
//! Constructed at startup over a [`Storage`], passed by `&mut` to whoever
//! mutates it. Every mutation that changes something re-serializes the
//! whole map and overwrites the durable record before returning.

use std::sync::Arc;

use gridveil_core::{CellClass, Classify};

use crate::error::StoreError;
use crate::history::{History, DEFAULT_MAX_ENTRIES};
use crate::migration::migrate_legacy;
use crate::policy::{self, Resolution, ToggleDirection};
use crate::state::{prune, FileVisibility, SheetVisibility, VisibilityMap};
use crate::storage::{FileStorage, Storage};
use crate::transport::TransportPayload;

/// Storage key of the current record format.
pub const STORAGE_KEY: &str = "visibility.v2";

/// Storage key of the previous format, migrated on first load.
pub const LEGACY_STORAGE_KEY: &str = "visibility.v1";

pub struct VisibilityStore<S: Storage = FileStorage> {
    storage: S,
    map: Arc<VisibilityMap>,
    history: History<VisibilityMap>,
}

impl<S: Storage> VisibilityStore<S> {
    /// Load from storage, migrating the legacy record when needed.
    ///
    /// Never fails: unreadable or corrupt data means an empty store.
    pub fn open(storage: S) -> Self {
        Self::with_history_limit(storage, DEFAULT_MAX_ENTRIES)
    }

    pub fn with_history_limit(mut storage: S, max_entries: usize) -> Self {
        let map = load_map(&mut storage);
        log::debug!("Visibility store opened with {} file(s)", map.len());
        Self {
            storage,
            map: Arc::new(map),
            history: History::with_max_entries(max_entries),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Shared, immutable view of the whole map.
    pub fn snapshot(&self) -> Arc<VisibilityMap> {
        Arc::clone(&self.map)
    }

    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Overrides for one sheet; all-empty if none are recorded.
    pub fn sheet_visibility(&self, filename: &str, sheet: &str) -> SheetVisibility {
        self.map
            .get(filename)
            .and_then(|file| file.get(sheet))
            .cloned()
            .unwrap_or_default()
    }

    pub fn file_visibility(&self, filename: &str) -> FileVisibility {
        self.map.get(filename).cloned().unwrap_or_default()
    }

    /// Resolve one cell against the recorded overrides.
    pub fn resolve(&self, filename: &str, sheet: &str, address: &str, class: CellClass) -> Resolution {
        let empty = SheetVisibility::default();
        let state = self
            .map
            .get(filename)
            .and_then(|file| file.get(sheet))
            .unwrap_or(&empty);
        policy::resolve_cell(address, class, state)
    }

    pub fn serialize_for_transport(&self) -> TransportPayload {
        TransportPayload::from_map(&self.map)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub fn set_sheet_visibility(
        &mut self,
        filename: &str,
        sheet: &str,
        state: SheetVisibility,
    ) -> Result<(), StoreError> {
        self.update(|map| {
            map.entry(filename.to_string())
                .or_default()
                .insert(sheet.to_string(), state);
        })
    }

    pub fn set_file_visibility(&mut self, filename: &str, state: FileVisibility) -> Result<(), StoreError> {
        self.update(|map| {
            map.insert(filename.to_string(), state);
        })
    }

    pub fn clear_visibility(&mut self, filename: &str) -> Result<(), StoreError> {
        self.update(|map| {
            map.remove(filename);
        })
    }

    pub fn clear_all(&mut self) -> Result<(), StoreError> {
        self.update(|map| map.clear())
    }

    /// Show or hide individual cells, recording only exceptions to the
    /// default policy.
    pub fn toggle_cells<I, A, C>(
        &mut self,
        filename: &str,
        sheet: &str,
        addresses: I,
        direction: ToggleDirection,
        classifier: &C,
    ) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = A>,
        A: AsRef<str>,
        C: Classify + ?Sized,
    {
        let next = policy::toggle_cells(&self.sheet_visibility(filename, sheet), addresses, direction, classifier);
        self.set_sheet_visibility(filename, sheet, next)
    }

    pub fn toggle_columns<I, A>(
        &mut self,
        filename: &str,
        sheet: &str,
        columns: I,
        direction: ToggleDirection,
    ) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = A>,
        A: AsRef<str>,
    {
        let next = policy::toggle_columns(&self.sheet_visibility(filename, sheet), columns, direction);
        self.set_sheet_visibility(filename, sheet, next)
    }

    pub fn toggle_rows<I>(
        &mut self,
        filename: &str,
        sheet: &str,
        rows: I,
        direction: ToggleDirection,
    ) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = u32>,
    {
        let next = policy::toggle_rows(&self.sheet_visibility(filename, sheet), rows, direction);
        self.set_sheet_visibility(filename, sheet, next)
    }

    // =========================================================================
    // History
    // =========================================================================

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Returns `Ok(false)` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool, StoreError> {
        match self.history.undo(Arc::clone(&self.map)) {
            Some(previous) => {
                self.map = previous;
                self.persist()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Returns `Ok(false)` when there is nothing to redo.
    pub fn redo(&mut self) -> Result<bool, StoreError> {
        match self.history.redo(Arc::clone(&self.map)) {
            Some(next) => {
                self.map = next;
                self.persist()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Apply `f` to a copy of the map. Unchanged results are dropped without
    /// touching history or storage.
    fn update<F>(&mut self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut VisibilityMap),
    {
        let mut next = VisibilityMap::clone(&self.map);
        f(&mut next);
        prune(&mut next);
        if next == *self.map {
            return Ok(());
        }
        let previous = std::mem::replace(&mut self.map, Arc::new(next));
        self.history.record(previous);
        self.persist()
    }

    /// Overwrite the durable record. The in-memory map is kept on failure.
    fn persist(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&*self.map)?;
        self.storage.write(STORAGE_KEY, &json).map_err(|e| {
            log::warn!("Failed to persist visibility record: {e}");
            StoreError::from(e)
        })?;
        log::debug!("Persisted visibility record ({} bytes)", json.len());
        Ok(())
    }
}

impl VisibilityStore<FileStorage> {
    /// Store backed by the platform data directory.
    pub fn open_default() -> Self {
        Self::open(FileStorage::open_default())
    }
}

fn load_map<S: Storage>(storage: &mut S) -> VisibilityMap {
    match storage.read(STORAGE_KEY) {
        Ok(Some(raw)) => match serde_json::from_str::<VisibilityMap>(&raw) {
            Ok(mut map) => {
                prune(&mut map);
                map
            }
            Err(e) => {
                // Left on disk; the next successful write replaces it.
                log::warn!("Visibility record is corrupt ({e}); starting empty");
                VisibilityMap::new()
            }
        },
        Ok(None) => migrate_legacy(storage),
        Err(e) => {
            log::warn!("Could not read visibility record: {e}; starting empty");
            VisibilityMap::new()
        }
    }
}
