//! Recall-quality judgments and their review intervals.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Learner's self-reported recall quality for a reviewed item.
///
/// Each judgment carries a fixed base interval in minutes. The delay before
/// an item comes due again is that base multiplied by the item's visit count
/// after the review, so intervals grow linearly with both.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    Default,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Judgment {
    /// Failed to recall. 1 minute base.
    #[default]
    Again,
    /// Recalled with effort. 10 minute base.
    Hard,
    /// Normal recall. 100 minute base.
    Good,
    /// Effortless recall. 1000 minute base.
    Easy,
}

impl Judgment {
    /// Base interval in minutes for this judgment.
    pub fn base_minutes(self) -> i64 {
        match self {
            Judgment::Again => 1,
            Judgment::Hard => 10,
            Judgment::Good => 100,
            Judgment::Easy => 1000,
        }
    }

    /// Parse a judgment string, falling back to [`Judgment::Again`].
    ///
    /// Matching is ASCII case-insensitive and exact: `"good"` and `"GOOD"`
    /// are `Good`, while `"MAYBE"`, `""` or `" good"` all become `Again`.
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or(Judgment::Again)
    }

    /// Delay until the item is due again, given the visit count after the review.
    pub fn interval(self, visit_count: u32) -> Duration {
        Duration::minutes(self.base_minutes() * i64::from(visit_count))
    }
}
