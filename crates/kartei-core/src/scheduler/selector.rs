//! Due-item selection.

use chrono::NaiveDateTime;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use crate::types::Item;

/// Result of scanning a learner's collection for the next card.
///
/// The two absence variants are ordinary outcomes, not failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    /// An item whose availability has passed.
    Due(&'a Item),
    /// The learner has no items at all.
    NoLearnedData,
    /// The learner has items but none is due yet.
    NoAvailableCards,
}

impl<'a> Selection<'a> {
    /// The selected item, if any.
    pub fn item(&self) -> Option<&'a Item> {
        match self {
            Selection::Due(item) => Some(item),
            _ => None,
        }
    }
}

/// Pick the first item, in stored order, that is due at `now`.
///
/// Items whose timestamp cannot be parsed are skipped as if they were never
/// due; they do not abort the scan.
pub fn pick_due_item(items: &[Item], now: NaiveDateTime) -> Selection<'_> {
    if items.is_empty() {
        return Selection::NoLearnedData;
    }

    due_items(items, now)
        .next()
        .map_or(Selection::NoAvailableCards, Selection::Due)
}

/// Pick a uniformly random item among those due at `now`.
pub fn pick_random_due_item<'a, R: Rng + ?Sized>(
    items: &'a [Item],
    now: NaiveDateTime,
    rng: &mut R,
) -> Selection<'a> {
    if items.is_empty() {
        return Selection::NoLearnedData;
    }

    let due: Vec<&Item> = due_items(items, now).collect();
    due.choose(rng)
        .copied()
        .map_or(Selection::NoAvailableCards, Selection::Due)
}

/// Count items due at `now`.
pub fn count_due(items: &[Item], now: NaiveDateTime) -> usize {
    due_items(items, now).count()
}

fn due_items(items: &[Item], now: NaiveDateTime) -> impl Iterator<Item = &Item> {
    items.iter().filter(move |item| match item.available_at() {
        Some(at) => at <= now,
        None => {
            warn!(
                title = %item.title,
                available_timedate = %item.available_time,
                "Skipping item with malformed availability timestamp"
            );
            false
        }
    })
}
