//! One-shot upgrade from the v1 visibility record.
//!
//! v1 predates whitelists and came in two shapes per file:
//!
//! - sheet-scoped: `{ "Sheet1": { hiddenColumns, hiddenRows, hiddenCells } }`
//! - flat:         `{ hiddenColumns, hiddenRows, hiddenCells }`
//!
//! Sheet-scoped entries carry over field by field. Flat entries name no
//! sheet, so there is nothing to attach them to; they are dropped rather
//! than guessed at. Anything else that does not fit is dropped too.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::state::{prune, FileVisibility, SheetVisibility, VisibilityMap};
use crate::storage::Storage;
use crate::store::{LEGACY_STORAGE_KEY, STORAGE_KEY};

const V1_FIELDS: [&str; 3] = ["hiddenColumns", "hiddenRows", "hiddenCells"];
const V2_FIELDS: [&str; 3] = ["visibleColumns", "visibleRows", "visibleCells"];

/// Migrate the legacy record if present.
///
/// The v2 record is written before the v1 key is removed; if that write
/// fails the legacy key stays so the next start can try again.
pub fn migrate_legacy<S: Storage>(storage: &mut S) -> VisibilityMap {
    let raw = match storage.read(LEGACY_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return VisibilityMap::new(),
        Err(e) => {
            log::warn!("Could not read legacy visibility record: {e}");
            return VisibilityMap::new();
        }
    };

    let map = upgrade_v1(&raw);

    let written = serde_json::to_string(&map)
        .map_err(|e| e.to_string())
        .and_then(|json| storage.write(STORAGE_KEY, &json).map_err(|e| e.to_string()));
    if let Err(e) = written {
        log::warn!("Could not write migrated visibility record: {e}");
        return map;
    }

    if let Err(e) = storage.remove(LEGACY_STORAGE_KEY) {
        log::warn!("Could not remove legacy visibility record: {e}");
    }
    log::info!("Migrated visibility record v1 -> v2 ({} file(s) kept)", map.len());
    map
}

/// Convert a raw v1 record. Never fails: unmappable parts are discarded.
pub fn upgrade_v1(raw: &str) -> VisibilityMap {
    let mut map = VisibilityMap::new();

    let files = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(files)) => files,
        Ok(_) => {
            log::warn!("Legacy visibility record is not an object; discarding");
            return map;
        }
        Err(e) => {
            log::warn!("Legacy visibility record is not valid JSON ({e}); discarding");
            return map;
        }
    };

    for (filename, entry) in files {
        let Value::Object(entry) = entry else {
            log::warn!("Legacy visibility for '{filename}' is not an object; discarding");
            continue;
        };
        if looks_like_sheet(&entry) {
            log::warn!("Legacy visibility for '{filename}' is not sheet-scoped; discarding");
            continue;
        }

        let mut file = FileVisibility::new();
        for (sheet_name, sheet) in entry {
            match sheet_from_v1(&sheet) {
                Some(state) => {
                    file.insert(sheet_name, state);
                }
                None => log::warn!("Legacy visibility for '{filename}'/'{sheet_name}' is unreadable; discarding"),
            }
        }
        map.insert(filename, file);
    }

    prune(&mut map);
    map
}

fn looks_like_sheet(obj: &Map<String, Value>) -> bool {
    V1_FIELDS.iter().chain(V2_FIELDS.iter()).any(|k| obj.contains_key(*k))
}

fn sheet_from_v1(value: &Value) -> Option<SheetVisibility> {
    let obj = value.as_object()?;
    if !looks_like_sheet(obj) {
        return None;
    }
    Some(SheetVisibility {
        hidden_columns: strings(obj.get("hiddenColumns"))?,
        hidden_rows: rows(obj.get("hiddenRows"))?,
        hidden_cells: strings(obj.get("hiddenCells"))?,
        visible_columns: strings(obj.get("visibleColumns"))?,
        visible_rows: rows(obj.get("visibleRows"))?,
        visible_cells: strings(obj.get("visibleCells"))?,
    })
}

fn strings(value: Option<&Value>) -> Option<BTreeSet<String>> {
    match value {
        None | Some(Value::Null) => Some(BTreeSet::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| v.as_str().map(|s| s.trim().to_ascii_uppercase()))
            .collect(),
        Some(_) => None,
    }
}

// Old clients sometimes wrote rows as strings.
fn rows(value: Option<&Value>) -> Option<BTreeSet<u32>> {
    match value {
        None | Some(Value::Null) => Some(BTreeSet::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| match v {
                Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
                Value::String(s) => s.trim().parse::<u32>().ok(),
                _ => None,
            })
            .map(|row| row.filter(|r| *r > 0))
            .collect(),
        Some(_) => None,
    }
}
