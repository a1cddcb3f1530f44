//! Review scheduling.
//!
//! [`Scheduler`] ties the pure selection and interval policy to a learner
//! item store. Every call performs a fresh read of the learner's collection;
//! nothing is cached between calls.

mod locks;
mod policy;
mod selector;

pub use policy::{apply_review, Review};
pub use selector::{count_due, pick_due_item, pick_random_due_item, Selection};

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{KarteiConfig, PracticeThresholds, SelectionPolicy};
use crate::error::{KarteiError, KarteiResult};
use crate::store::create_store;
use crate::traits::{Clock, ItemStore, SystemClock};
use crate::types::{Item, ItemKind, Judgment, NewItem};

use locks::LearnerLocks;

/// Outcome of asking for the next card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextCard {
    Due(Item),
    NoLearnedData,
    NoAvailableCards,
}

impl From<Selection<'_>> for NextCard {
    fn from(selection: Selection<'_>) -> Self {
        match selection {
            Selection::Due(item) => NextCard::Due(item.clone()),
            Selection::NoLearnedData => NextCard::NoLearnedData,
            Selection::NoAvailableCards => NextCard::NoAvailableCards,
        }
    }
}

/// Outcome of recording a review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The item was rescheduled and the collection persisted.
    Success(Review),
    /// The learner has no items; nothing was written.
    NoLearnedData,
    /// No item has exactly this title; nothing was written.
    ItemNotFound,
}

/// Result of appending generated cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddReport {
    /// Titles appended, in order.
    pub added: Vec<String>,
    /// Titles dropped because the learner already had them.
    pub skipped: Vec<String>,
}

/// A learner's titles grouped by kind, in stored order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KnownTitles {
    pub vocabulary: Vec<String>,
    pub grammar: Vec<String>,
}

/// Collection statistics for one learner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeckSummary {
    pub total: usize,
    pub due: usize,
    pub vocabulary: usize,
    pub grammar: usize,
    /// Both kinds meet the configured practice minimums.
    pub ready_for_practice: bool,
}

/// Review scheduler over a learner item store.
pub struct Scheduler {
    store: Arc<dyn ItemStore>,
    clock: Arc<dyn Clock>,
    selection: SelectionPolicy,
    practice: PracticeThresholds,
    locks: LearnerLocks,
}

impl Scheduler {
    /// Create a scheduler with the system clock and default policies.
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            selection: SelectionPolicy::default(),
            practice: PracticeThresholds::default(),
            locks: LearnerLocks::default(),
        }
    }

    /// Create a scheduler and its store from configuration.
    pub fn from_config(config: &KarteiConfig) -> KarteiResult<Self> {
        let store = create_store(&config.store)?;
        Ok(Self::new(store)
            .with_selection(config.selection)
            .with_practice(config.practice))
    }

    /// Use a different time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use a different selection policy.
    pub fn with_selection(mut self, selection: SelectionPolicy) -> Self {
        self.selection = selection;
        self
    }

    /// Use different practice thresholds.
    pub fn with_practice(mut self, practice: PracticeThresholds) -> Self {
        self.practice = practice;
        self
    }

    /// Name of the backing store.
    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    /// Pick the learner's next due card.
    pub fn next_card(&self, learner: &str) -> KarteiResult<NextCard> {
        validate_learner(learner)?;
        let items = self.store.read_items(learner)?;
        let now = self.clock.now();

        let next: NextCard = match self.selection {
            SelectionPolicy::FirstDue => pick_due_item(&items, now).into(),
            SelectionPolicy::RandomDue => {
                pick_random_due_item(&items, now, &mut rand::thread_rng()).into()
            }
        };

        match &next {
            NextCard::Due(item) => debug!(learner, title = %item.title, "Selected due item"),
            NextCard::NoLearnedData => debug!(learner, "Learner has no items"),
            NextCard::NoAvailableCards => {
                debug!(learner, total = items.len(), "No item is due yet")
            }
        }
        Ok(next)
    }

    /// Record a review given the raw judgment string.
    ///
    /// Unrecognised judgments are treated as `AGAIN`.
    pub fn update_item_schedule(
        &self,
        learner: &str,
        title: &str,
        judgment: &str,
    ) -> KarteiResult<UpdateOutcome> {
        self.review(learner, title, Judgment::parse_lenient(judgment))
    }

    /// Record a review of the item titled `title`.
    ///
    /// Performs exactly one read and, on a match, one write of the learner's
    /// whole collection while holding the learner's lock.
    pub fn review(
        &self,
        learner: &str,
        title: &str,
        judgment: Judgment,
    ) -> KarteiResult<UpdateOutcome> {
        validate_learner(learner)?;

        self.locks.with_lock(learner, || {
            let mut items = self.store.read_items(learner)?;
            if items.is_empty() {
                return Ok(UpdateOutcome::NoLearnedData);
            }

            let Some(item) = items.iter_mut().find(|item| item.title == title) else {
                debug!(learner, title, "No item with this title");
                return Ok(UpdateOutcome::ItemNotFound);
            };

            let review = apply_review(item, judgment, self.clock.now())?;
            self.store.write_items(learner, &items)?;

            info!(
                learner,
                title,
                judgment = %review.judgment,
                visit_count = review.visit_count,
                available_timedate = %review.available_time,
                "Rescheduled item"
            );
            Ok(UpdateOutcome::Success(review))
        })
    }

    /// Every item of the learner, in stored order.
    pub fn list_items(&self, learner: &str) -> KarteiResult<Vec<Item>> {
        validate_learner(learner)?;
        self.store.read_items(learner)
    }

    /// Append newly generated cards to the learner's collection.
    ///
    /// New cards are unvisited and available immediately. Titles the learner
    /// already has, or that repeat within `new_items`, are skipped.
    pub fn add_items(&self, learner: &str, new_items: Vec<NewItem>) -> KarteiResult<AddReport> {
        validate_learner(learner)?;
        if new_items.iter().any(|item| item.title.trim().is_empty()) {
            return Err(KarteiError::missing_field("title"));
        }

        self.locks.with_lock(learner, || {
            let mut items = self.store.read_items(learner)?;
            let mut titles: HashSet<String> = items.iter().map(|i| i.title.clone()).collect();
            let now = self.clock.now();
            let mut report = AddReport::default();

            for new_item in new_items {
                if titles.insert(new_item.title.clone()) {
                    report.added.push(new_item.title.clone());
                    items.push(new_item.into_item(now));
                } else {
                    report.skipped.push(new_item.title);
                }
            }

            if !report.added.is_empty() {
                self.store.write_items(learner, &items)?;
            }

            info!(
                learner,
                added = report.added.len(),
                skipped = report.skipped.len(),
                "Added items"
            );
            Ok(report)
        })
    }

    /// The learner's titles split by kind.
    pub fn known_titles(&self, learner: &str) -> KarteiResult<KnownTitles> {
        let items = self.list_items(learner)?;
        let mut titles = KnownTitles::default();
        for item in items {
            match item.kind {
                ItemKind::Vocabulary => titles.vocabulary.push(item.title),
                ItemKind::Grammar => titles.grammar.push(item.title),
            }
        }
        Ok(titles)
    }

    /// Collection statistics and practice readiness.
    pub fn summary(&self, learner: &str) -> KarteiResult<DeckSummary> {
        let items = self.list_items(learner)?;
        let vocabulary = items
            .iter()
            .filter(|i| i.kind == ItemKind::Vocabulary)
            .count();
        let grammar = items.len() - vocabulary;

        Ok(DeckSummary {
            total: items.len(),
            due: count_due(&items, self.clock.now()),
            vocabulary,
            grammar,
            ready_for_practice: vocabulary >= self.practice.min_vocabulary
                && grammar >= self.practice.min_grammar,
        })
    }
}

fn validate_learner(learner: &str) -> KarteiResult<()> {
    if learner.trim().is_empty() {
        return Err(KarteiError::missing_field("learner"));
    }
    Ok(())
}
