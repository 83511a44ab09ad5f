//! In-memory history store (testing only)

use std::sync::Mutex;

use pollyanna_core::{History, Year, YearRecord};

use crate::error::StoreError;
use crate::history::HistoryStore;
use crate::Result;

/// History held in a `Mutex`, with a counter of saves for assertions.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    history: Mutex<History>,
    saves: Mutex<usize>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(history: History) -> Self {
        Self {
            history: Mutex::new(history),
            saves: Mutex::new(0),
        }
    }

    /// Number of times `record_year` has been called.
    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|n| *n).unwrap_or(0)
    }

    /// Current contents.
    pub fn snapshot(&self) -> History {
        self.history
            .lock()
            .map(|h| h.clone())
            .unwrap_or_default()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> Result<History> {
        self.history
            .lock()
            .map(|h| h.clone())
            .map_err(|_| StoreError::MalformedHistory("history lock poisoned".to_string()))
    }

    fn record_year(&self, year: Year, record: &YearRecord) -> Result<()> {
        let mut stored = self
            .history
            .lock()
            .map_err(|_| StoreError::MalformedHistory("history lock poisoned".to_string()))?;
        stored.insert_year(year, record.clone());
        if let Ok(mut saves) = self.saves.lock() {
            *saves += 1;
        }
        Ok(())
    }
}
