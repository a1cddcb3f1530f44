//! Per-learner write serialization.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{KarteiError, KarteiResult};

/// Registry handing out one mutex per learner key.
///
/// Holding a learner's mutex across read-modify-write keeps concurrent
/// updates for the same learner from overwriting each other. Different
/// learners never contend. An entry lives only while some caller holds or
/// waits on it, so the registry stays as small as the set of active learners.
#[derive(Default)]
pub(crate) struct LearnerLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl LearnerLocks {
    /// Run `f` while holding `learner`'s lock.
    pub(crate) fn with_lock<T>(
        &self,
        learner: &str,
        f: impl FnOnce() -> KarteiResult<T>,
    ) -> KarteiResult<T> {
        let lock = {
            let mut locks = self.registry()?;
            Arc::clone(locks.entry(learner.to_string()).or_default())
        };

        let result = match lock.lock() {
            Ok(_guard) => f(),
            Err(e) => Err(KarteiError::Internal(format!("learner lock poisoned: {}", e))),
        };

        self.release(learner, &lock)?;
        result
    }

    fn registry(&self) -> KarteiResult<MutexGuard<'_, HashMap<String, Arc<Mutex<()>>>>> {
        self.locks
            .lock()
            .map_err(|e| KarteiError::Internal(format!("learner lock registry poisoned: {}", e)))
    }

    // Clones are only taken under the registry lock, so a count of two
    // (map + ours) means nobody else is holding or waiting.
    fn release(&self, learner: &str, lock: &Arc<Mutex<()>>) -> KarteiResult<()> {
        let mut locks = self.registry()?;
        if Arc::strong_count(lock) == 2
            && locks.get(learner).is_some_and(|held| Arc::ptr_eq(held, lock))
        {
            locks.remove(learner);
        }
        Ok(())
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or_default()
    }
}
