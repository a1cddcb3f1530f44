//! Learner item types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

use super::timestamp;

/// Kind of learnable unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum ItemKind {
    Vocabulary,
    Grammar,
}

/// A vocabulary or grammar flashcard owned by one learner.
///
/// Field names on the wire match the item store's record layout, so the
/// availability timestamp is serialized as `available_timedate`. The
/// timestamp is kept as raw text: a record with an unparseable value must
/// still round-trip through the store untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ItemRecord", into = "ItemRecord")]
pub struct Item {
    /// Vocabulary or grammar.
    pub kind: ItemKind,
    /// Identity key, unique within a learner's collection.
    pub title: String,
    pub description: String,
    pub question: String,
    pub answer: String,
    /// Earliest moment the item may be selected again (`YYYY-MM-DD HH:MM:SS`).
    pub available_time: String,
    /// Number of completed reviews.
    pub visit_count: u32,
    /// Non-string `available_timedate` read from the store, kept until the
    /// item is rescheduled.
    pub(crate) unparsed_available: Option<Value>,
}

impl Item {
    /// Create a fresh item that is available at `now` and has never been reviewed.
    pub fn new(kind: ItemKind, title: impl Into<String>, now: NaiveDateTime) -> Self {
        Self {
            kind,
            title: title.into(),
            description: String::new(),
            question: String::new(),
            answer: String::new(),
            available_time: timestamp::format(now),
            visit_count: 0,
            unparsed_available: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the question and answer.
    pub fn with_card(mut self, question: impl Into<String>, answer: impl Into<String>) -> Self {
        self.question = question.into();
        self.answer = answer.into();
        self
    }

    /// Set the visit count.
    pub fn with_visit_count(mut self, visit_count: u32) -> Self {
        self.visit_count = visit_count;
        self
    }

    /// Move the availability to `at`, replacing whatever was stored.
    pub fn set_available_at(&mut self, at: NaiveDateTime) {
        self.available_time = timestamp::format(at);
        self.unparsed_available = None;
    }

    /// Parsed availability, or `None` if the stored value is malformed.
    pub fn available_at(&self) -> Option<NaiveDateTime> {
        timestamp::parse(&self.available_time)
    }
}

/// Item as laid out in the store.
#[derive(Serialize, Deserialize)]
struct ItemRecord {
    #[serde(rename = "type")]
    kind: ItemKind,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    question: String,
    #[serde(default)]
    answer: String,
    #[serde(default, deserialize_with = "any_value")]
    available_timedate: Option<Value>,
    #[serde(default)]
    visit_count: u32,
}

// `null` must stay distinguishable from an absent field
fn any_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl From<ItemRecord> for Item {
    fn from(record: ItemRecord) -> Self {
        let (available_time, unparsed_available) = match record.available_timedate {
            Some(Value::String(text)) => (text, None),
            Some(other) => (String::new(), Some(other)),
            None => (String::new(), None),
        };
        Self {
            kind: record.kind,
            title: record.title,
            description: record.description,
            question: record.question,
            answer: record.answer,
            available_time,
            visit_count: record.visit_count,
            unparsed_available,
        }
    }
}

impl From<Item> for ItemRecord {
    fn from(item: Item) -> Self {
        let available_timedate = match item.unparsed_available {
            Some(raw) if item.available_time.is_empty() => raw,
            _ => Value::String(item.available_time),
        };
        Self {
            kind: item.kind,
            title: item.title,
            description: item.description,
            question: item.question,
            answer: item.answer,
            available_timedate: Some(available_timedate),
            visit_count: item.visit_count,
        }
    }
}

/// A freshly generated card, before it has any scheduling state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

impl NewItem {
    /// Create a new card with empty display text.
    pub fn new(kind: ItemKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            description: String::new(),
            question: String::new(),
            answer: String::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the question and answer.
    pub fn with_card(mut self, question: impl Into<String>, answer: impl Into<String>) -> Self {
        self.question = question.into();
        self.answer = answer.into();
        self
    }

    /// Stamp scheduling state: unvisited and available from `now`.
    pub fn into_item(self, now: NaiveDateTime) -> Item {
        Item {
            kind: self.kind,
            title: self.title,
            description: self.description,
            question: self.question,
            answer: self.answer,
            available_time: timestamp::format(now),
            visit_count: 0,
            unparsed_available: None,
        }
    }
}
