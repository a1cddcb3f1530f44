//! Review interval policy.
//!
//! The next delay is `base_minutes(judgment) * visit_count`, where
//! `visit_count` already includes the review being recorded. Growth is
//! linear in both factors.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::{KarteiError, KarteiResult};
use crate::types::{timestamp, Item, Judgment};

/// Scheduling change produced by one review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    pub judgment: Judgment,
    /// Visit count after this review.
    pub visit_count: u32,
    /// Delay until the item is due again, in minutes.
    pub interval_minutes: i64,
    /// New availability in store format.
    pub available_time: String,
}

/// Record a review of `item` at `now`, mutating only its scheduling fields.
///
/// Fails without touching `item` when the visit count or the resulting
/// availability cannot be represented.
pub fn apply_review(
    item: &mut Item,
    judgment: Judgment,
    now: NaiveDateTime,
) -> KarteiResult<Review> {
    let visit_count = item.visit_count.checked_add(1).ok_or_else(|| {
        KarteiError::out_of_range(
            "visit_count",
            format!("visit count of '{}' cannot be incremented", item.title),
        )
    })?;
    let interval = judgment.interval(visit_count);
    let available_at = now.checked_add_signed(interval).ok_or_else(|| {
        KarteiError::out_of_range(
            "available_timedate",
            format!(
                "next review of '{}' after {} minutes is past the supported date range",
                item.title,
                interval.num_minutes()
            ),
        )
    })?;

    item.visit_count = visit_count;
    item.set_available_at(available_at);

    Ok(Review {
        judgment,
        visit_count,
        interval_minutes: interval.num_minutes(),
        available_time: item.available_time.clone(),
    })
}
