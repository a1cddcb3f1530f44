//! In-process item store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::{KarteiError, KarteiResult};
use crate::traits::ItemStore;
use crate::types::Item;

/// Volatile item store kept in a `HashMap`.
#[derive(Default)]
pub struct InMemoryStore {
    learners: Mutex<HashMap<String, Vec<Item>>>,
    writes: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a learner's collection without counting it as a write.
    pub fn with_items(self, learner: impl Into<String>, items: Vec<Item>) -> Self {
        if let Ok(mut learners) = self.learners.lock() {
            learners.insert(learner.into(), items);
        }
        self
    }

    /// Number of `write_items` calls served so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl ItemStore for InMemoryStore {
    fn read_items(&self, learner: &str) -> KarteiResult<Vec<Item>> {
        let learners = self
            .learners
            .lock()
            .map_err(|e| KarteiError::store_read(e.to_string()))?;
        Ok(learners.get(learner).cloned().unwrap_or_default())
    }

    fn write_items(&self, learner: &str, items: &[Item]) -> KarteiResult<()> {
        let mut learners = self
            .learners
            .lock()
            .map_err(|e| KarteiError::store_write(e.to_string()))?;
        learners.insert(learner.to_string(), items.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
