//! Learner item store trait.

use std::sync::Arc;

use crate::error::KarteiResult;
use crate::types::Item;

/// Persistence collaborator keyed by learner identity.
///
/// The contract is whole-collection read-modify-write: there is no partial
/// update. Implementations must not lose data belonging to other learners
/// when one learner's collection is overwritten.
pub trait ItemStore: Send + Sync {
    /// List every item for `learner`, in stored order.
    ///
    /// An unknown learner yields an empty vector, not an error.
    fn read_items(&self, learner: &str) -> KarteiResult<Vec<Item>>;

    /// Replace the whole collection for `learner`.
    fn write_items(&self, learner: &str, items: &[Item]) -> KarteiResult<()>;

    /// Short backend name for logs and health output.
    fn name(&self) -> &'static str;
}

impl<T: ItemStore + ?Sized> ItemStore for Arc<T> {
    fn read_items(&self, learner: &str) -> KarteiResult<Vec<Item>> {
        (**self).read_items(learner)
    }

    fn write_items(&self, learner: &str, items: &[Item]) -> KarteiResult<()> {
        (**self).write_items(learner, items)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
