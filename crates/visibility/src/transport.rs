//! Payload handed to the chat transport with each outgoing request.

use serde::{Deserialize, Serialize};

use crate::state::{FileVisibility, VisibilityMap};

/// `filename -> sheet -> overrides`, only for sheets that carry at least
/// one override. The backend never sees data the user redacted because it
/// applies exactly this map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransportPayload(VisibilityMap);

impl TransportPayload {
    pub fn from_map(map: &VisibilityMap) -> Self {
        let filtered = map
            .iter()
            .filter_map(|(filename, sheets)| {
                let sheets: FileVisibility = sheets
                    .iter()
                    .filter(|(_, s)| !s.is_empty())
                    .map(|(name, s)| (name.clone(), s.clone()))
                    .collect();
                (!sheets.is_empty()).then(|| (filename.clone(), sheets))
            })
            .collect();
        Self(filtered)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `None` when there is nothing to send; requests omit the field then.
    pub fn into_option(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }

    pub fn files(&self) -> &VisibilityMap {
        &self.0
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SheetVisibility;

    #[test]
    fn only_sheets_with_overrides_are_emitted() {
        let mut file = FileVisibility::new();
        file.insert("Clean".into(), SheetVisibility::new());
        file.insert("Redacted".into(), SheetVisibility::new().hide_column("C"));
        let mut map = VisibilityMap::new();
        map.insert("book.xlsx".into(), file);
        map.insert("other.xlsx".into(), FileVisibility::new());

        let payload = TransportPayload::from_map(&map);
        let json: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "book.xlsx": {
                    "Redacted": {"hiddenColumns": ["C"], "hiddenRows": [], "hiddenCells": []}
                }
            })
        );
    }

    #[test]
    fn whitelist_only_sheet_is_emitted() {
        let mut file = FileVisibility::new();
        file.insert("S".into(), SheetVisibility::new().show_row(4));
        let mut map = VisibilityMap::new();
        map.insert("f.csv".into(), file);

        let payload = TransportPayload::from_map(&map);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["f.csv"]["S"]["visibleRows"], serde_json::json!([4]));
        assert_eq!(json["f.csv"]["S"]["hiddenRows"], serde_json::json!([]));
    }

    #[test]
    fn empty_payload_is_omitted() {
        let payload = TransportPayload::from_map(&VisibilityMap::new());
        assert!(payload.is_empty());
        assert!(payload.into_option().is_none());
    }
}
