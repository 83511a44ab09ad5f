//! History persistence.
//!
//! The history file is the only state carried between runs. A missing file
//! means no prior draws. Individual malformed years are skipped on load but
//! stay in the file: recording a year rewrites only that year's key. A file
//! that is not a JSON object at all is an error, since saving over it would
//! destroy whatever it holds.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use pollyanna_core::{History, Year, YearRecord};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::Result;

/// Reads the draw history and records new years into it.
pub trait HistoryStore: Send + Sync {
    /// Load every well-formed recorded year.
    fn load(&self) -> Result<History>;

    /// Add or replace one year, leaving every other entry as stored.
    fn record_year(&self, year: Year, record: &YearRecord) -> Result<()>;
}

/// Parse a history document, skipping years that do not fit the schema.
pub fn parse_history(raw: &str) -> Result<History> {
    parse_document(raw).map(|document| history_from_document(&document))
}

/// Parse the raw year-keyed object without interpreting its entries.
fn parse_document(raw: &str) -> Result<Map<String, Value>> {
    if raw.trim().is_empty() {
        return Ok(Map::new());
    }

    let value: Value =
        serde_json::from_str(raw).map_err(|e| StoreError::MalformedHistory(e.to_string()))?;
    match value {
        Value::Object(years) => Ok(years),
        _ => Err(StoreError::MalformedHistory(
            "expected an object keyed by year".to_string(),
        )),
    }
}

fn history_from_document(document: &Map<String, Value>) -> History {
    let mut history = History::new();
    for (key, record) in document {
        let Some(year) = parse_year_key(key) else {
            warn!(year = %key, "Skipping history entry with non-numeric year");
            continue;
        };
        match YearRecord::deserialize(record) {
            Ok(record) => {
                history.insert_year(year, record);
            }
            Err(e) => warn!(year = year, error = %e, "Skipping malformed history year"),
        }
    }
    history
}

fn parse_year_key(key: &str) -> Option<Year> {
    key.trim().parse::<Year>().ok()
}

/// Add `record` under `year`, dropping any other spelling of the same year key.
fn amend_document(
    document: &mut Map<String, Value>,
    year: Year,
    record: &YearRecord,
) -> Result<()> {
    document.retain(|key, _| parse_year_key(key) != Some(year));
    document.insert(year.to_string(), serde_json::to_value(record)?);
    Ok(())
}

/// Render history the way it is stored on disk (4-space indented JSON).
pub fn render_history(history: &History) -> Result<Vec<u8>> {
    render_pretty(history)
}

fn render_pretty<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

/// History kept in a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Option<Map<String, Value>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        parse_document(&raw).map(Some)
    }

    fn write_document(&self, document: &Map<String, Value>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let bytes = render_pretty(document)?;

        // Atomic write: temp file in the same directory, then rename.
        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| StoreError::io(&dir, e))?;
        tmp.write_all(&bytes)
            .map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::io(&self.path, e.error))?;
        Ok(())
    }
}

impl HistoryStore for JsonHistoryStore {
    fn load(&self) -> Result<History> {
        let Some(document) = self.read_document()? else {
            info!(path = %self.path.display(), "No prior year results");
            return Ok(History::new());
        };

        let history = history_from_document(&document);
        info!(
            path = %self.path.display(),
            years = history.len(),
            "Prior year results loaded"
        );
        Ok(history)
    }

    fn record_year(&self, year: Year, record: &YearRecord) -> Result<()> {
        let mut document = self.read_document()?.unwrap_or_default();
        amend_document(&mut document, year, record)?;
        self.write_document(&document)?;

        debug!(
            path = %self.path.display(),
            year = year,
            entries = document.len(),
            "History saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollyanna_core::YearlyAssignment;

    fn sample_record() -> YearRecord {
        let mut regular = YearlyAssignment::new();
        regular.insert("Alice", "Bob");
        regular.insert("Bob", "Alice");
        let mut gag = YearlyAssignment::new();
        gag.insert("Alice", "Carol");
        YearRecord { regular, gag }
    }

    #[test]
    fn empty_document_is_empty_history() {
        assert!(parse_history("").unwrap().is_empty());
        assert!(parse_history("{}").unwrap().is_empty());
    }

    #[test]
    fn malformed_years_are_skipped() {
        let raw = r#"{
            "2022": {"regular": {"Alice": "Bob"}, "gag": {"Alice": "Carol"}},
            "last-year": {"regular": {"Alice": "Dave"}},
            "2023": "not a record",
            "2021": {"regular": {"Alice": 7}}
        }"#;
        let history = parse_history(raw).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(
            history.year(2022).unwrap().regular.recipient("Alice"),
            Some("Bob")
        );
    }

    #[test]
    fn non_object_document_is_an_error() {
        assert!(matches!(
            parse_history("[1, 2]"),
            Err(StoreError::MalformedHistory(_))
        ));
        assert!(matches!(
            parse_history("{oops"),
            Err(StoreError::MalformedHistory(_))
        ));
    }

    #[test]
    fn rendered_history_uses_string_year_keys_and_four_spaces() {
        let history: History = [(2024, sample_record())].into_iter().collect();
        let text = String::from_utf8(render_history(&history).unwrap()).unwrap();
        assert!(text.contains("\"2024\": {"));
        assert!(text.contains("\n    \"2024\""));
        assert!(text.contains("\"regular\""));
        assert!(text.contains("\"gag\""));
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonHistoryStore::new(dir.path().join("results.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn record_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonHistoryStore::new(dir.path().join("nested/results.json"));

        store.record_year(2023, &sample_record()).unwrap();
        let expected: History = [(2023, sample_record())].into_iter().collect();
        assert_eq!(store.load().unwrap(), expected);
    }

    #[test]
    fn record_overwrites_existing_year() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonHistoryStore::new(dir.path().join("results.json"));
        store.record_year(2024, &YearRecord::default()).unwrap();

        store.record_year(2024, &sample_record()).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.year(2024), Some(&sample_record()));
    }

    #[test]
    fn malformed_years_survive_recording_a_new_year() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        std::fs::write(
            &path,
            r#"{
                "2019": {"regular": {"A": 7}, "gag": {}},
                "someday": {"regular": {"A": "B"}},
                "2023": {"regular": {"Alice": "Bob"}, "gag": {"Alice": "Carol"}}
            }"#,
        )
        .unwrap();
        let store = JsonHistoryStore::new(&path);
        assert_eq!(store.load().unwrap().len(), 1);

        store.record_year(2024, &sample_record()).unwrap();

        let after: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(after["2019"]["regular"]["A"], 7);
        assert_eq!(after["someday"]["regular"]["A"], "B");
        assert_eq!(after["2023"]["regular"]["Alice"], "Bob");
        assert_eq!(after["2024"]["gag"]["Alice"], "Carol");
        assert_eq!(store.load().unwrap().len(), 2);
    }

    #[test]
    fn amending_replaces_other_spellings_of_the_year() {
        let mut document = parse_document(r#"{" 2024": {"regular": {}, "gag": {}}}"#).unwrap();
        amend_document(&mut document, 2024, &sample_record()).unwrap();

        assert_eq!(document.len(), 1);
        assert!(document.contains_key("2024"));
    }

    #[test]
    fn recording_into_a_non_object_file_fails_and_keeps_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        let store = JsonHistoryStore::new(&path);

        assert!(matches!(
            store.record_year(2024, &sample_record()),
            Err(StoreError::MalformedHistory(_))
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[1, 2]");
    }
}
