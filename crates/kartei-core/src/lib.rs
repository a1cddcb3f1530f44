//! kartei-core - Core library for kartei.
//!
//! This crate provides the item types, stores, and review scheduler for the
//! kartei spaced-repetition flashcard service.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use kartei_core::{InMemoryStore, NextCard, Scheduler};
//!
//! let scheduler = Scheduler::new(Arc::new(InMemoryStore::new()));
//!
//! // Show the next due card
//! if let NextCard::Due(item) = scheduler.next_card("learner@example.com")? {
//!     // Record the learner's judgment
//!     scheduler.update_item_schedule("learner@example.com", &item.title, "GOOD")?;
//! }
//! ```

pub mod config;
pub mod error;
pub mod scheduler;
pub mod store;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{KarteiConfig, SelectionPolicy, StoreBackend};
pub use error::{ErrorCode, KarteiError, KarteiResult};
pub use scheduler::{
    AddReport, DeckSummary, KnownTitles, NextCard, Review, Scheduler, UpdateOutcome,
};
pub use store::{create_store, InMemoryStore, JsonFileStore, SqliteItemStore};
pub use traits::{Clock, FixedClock, ItemStore, SystemClock};
pub use types::{Item, ItemKind, Judgment, NewItem};
