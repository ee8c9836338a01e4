//! `gridveil-visibility`: what the AI is allowed to see.
//!
//! Numeric cells are redacted unless whitelisted, everything else is shown
//! unless hidden, and hidden always wins. [`VisibilityStore`] holds the
//! per-file, per-sheet overrides, persists them through a [`Storage`], and
//! hands them to the chat transport as a [`TransportPayload`].

pub mod context;
pub mod error;
pub mod history;
pub mod migration;
pub mod policy;
pub mod state;
pub mod storage;
pub mod store;
pub mod summary;
pub mod transport;

pub use context::{build_ai_context, ContextLimits};
pub use error::StoreError;
pub use history::{History, DEFAULT_MAX_ENTRIES};
pub use migration::{migrate_legacy, upgrade_v1};
pub use policy::{resolve_cell, toggle_cells, toggle_columns, toggle_rows, Resolution, ToggleDirection};
pub use state::{prune, FileVisibility, SheetVisibility, VisibilityMap};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{VisibilityStore, LEGACY_STORAGE_KEY, STORAGE_KEY};
pub use summary::visibility_summary;
pub use transport::TransportPayload;
