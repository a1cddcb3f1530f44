//! JSON file item store.
//!
//! Layout: a single JSON object mapping each learner key to an array of item
//! records, pretty-printed with four-space indentation:
//!
//! ```text
//! {
//!     "learner@example.com": [
//!         { "type": "Vocabulary", "title": "Das Buch", ... }
//!     ]
//! }
//! ```

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{KarteiError, KarteiResult};
use crate::traits::ItemStore;
use crate::types::Item;

type Document = Map<String, Value>;

/// Item store backed by one JSON document on disk.
///
/// Other learners' records are carried through rewrites as raw JSON with
/// their key order intact, so a write for one learner never reshapes anyone
/// else's data. A learner written for the first time is appended at the end.
/// Writes are serialized through an internal mutex and land via temp file +
/// rename.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Create a store for the document at `path`. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }


    fn load_document(&self) -> KarteiResult<Document> {
        if !self.path.exists() {
            return Ok(Document::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Document::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            KarteiError::store_corrupted(
                format!("'{}' is not a learner item document", self.path.display()),
                e,
            )
        })
    }

    fn save_document(&self, doc: &Document) -> KarteiResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        doc.serialize(&mut ser)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &buf)?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            KarteiError::store_write(format!(
                "failed to replace '{}': {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(())
    }
}

impl ItemStore for JsonFileStore {
    fn read_items(&self, learner: &str) -> KarteiResult<Vec<Item>> {
        let mut doc = self.load_document()?;
        let Some(raw) = doc.remove(learner) else {
            return Ok(Vec::new());
        };

        let items: Vec<Item> = serde_json::from_value(raw).map_err(|e| {
            KarteiError::store_corrupted(format!("malformed items for learner '{}'", learner), e)
        })?;
        debug!(learner, count = items.len(), "Read items from JSON store");
        Ok(items)
    }

    fn write_items(&self, learner: &str, items: &[Item]) -> KarteiResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| KarteiError::store_write(e.to_string()))?;

        let mut doc = self.load_document()?;
        doc.insert(learner.to_string(), serde_json::to_value(items)?);
        self.save_document(&doc)?;

        debug!(learner, count = items.len(), "Wrote items to JSON store");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ItemKind;
    use chrono::NaiveDate;

    fn item(title: &str) -> Item {
        let now = NaiveDate::from_ymd_opt(2025, 3, 26)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        Item::new(ItemKind::Vocabulary, title, now)
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("user_data.json"));
        assert!(store.read_items("nobody").unwrap().is_empty());
    }

    #[test]
    fn test_write_then_read_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("user_data.json"));

        let items = vec![item("Das Buch"), item("Der Hund"), item("Die Katze")];
        store.write_items("u1", &items).unwrap();

        let read = store.read_items("u1").unwrap();
        let titles: Vec<&str> = read.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Das Buch", "Der Hund", "Die Katze"]);
    }

    #[test]
    fn test_write_keeps_other_learners() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user_data.json");
        fs::write(
            &path,
            r#"{"other@example.com": [{"type": "Grammar", "title": "Dativ", "extra": 1}]}"#,
        )
        .unwrap();

        let store = JsonFileStore::new(&path);
        store.write_items("u1", &[item("Das Buch")]).unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["other@example.com"][0]["extra"], 1);
        assert_eq!(raw["u1"][0]["title"], "Das Buch");
    }

    #[test]
    fn test_write_keeps_key_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user_data.json");
        fs::write(
            &path,
            r#"{"zed": [{"type": "Grammar", "title": "Dativ", "visit_count": 2, "answer": "dem"}], "abe": []}"#,
        )
        .unwrap();

        let store = JsonFileStore::new(&path);
        store.write_items("u1", &[]).unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let learners: Vec<&str> = raw.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(learners, vec!["zed", "abe", "u1"]);

        let fields: Vec<&str> = raw["zed"][0]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(fields, vec!["type", "title", "visit_count", "answer"]);

        // rewriting an existing learner keeps its position
        store.write_items("zed", &[]).unwrap();
        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let learners: Vec<&str> = raw.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(learners, vec!["zed", "abe", "u1"]);
    }

    #[test]
    fn test_non_string_timestamp_survives_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user_data.json");
        fs::write(
            &path,
            r#"{"u1": [
                {"type": "Vocabulary", "title": "bad", "available_timedate": null, "visit_count": 0},
                {"type": "Vocabulary", "title": "ok", "available_timedate": "2020-01-01 00:00:00", "visit_count": 0}
            ]}"#,
        )
        .unwrap();

        let store = JsonFileStore::new(&path);
        let items = store.read_items("u1").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].available_at(), None);

        store.write_items("u1", &items).unwrap();
        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw["u1"][0]["available_timedate"].is_null());
        assert_eq!(raw["u1"][1]["available_timedate"], "2020-01-01 00:00:00");
    }

    #[test]
    fn test_pretty_printed_with_four_spaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user_data.json");
        let store = JsonFileStore::new(&path);
        store.write_items("u1", &[item("Das Buch")]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("{\n    \"u1\": [\n        {"));
        assert!(content.contains("\"available_timedate\": \"2025-03-26 10:00:00\""));
    }

    #[test]
    fn test_corrupted_document_is_store_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user_data.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(&path);
        let err = store.read_items("u1").unwrap_err();
        assert!(err.is_store_failure());
    }
}
