//! Integration tests for the review scheduler.
//!
//! Runs the same flows against every store backend and checks that store
//! failures surface unchanged.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use kartei_core::{
    FixedClock, InMemoryStore, Item, ItemKind, ItemStore, JsonFileStore, KarteiError,
    KarteiResult, NextCard, Scheduler, SqliteItemStore, UpdateOutcome,
};
use mockall::mock;
use std::sync::Arc;

const LEARNER: &str = "learner@example.com";

fn ten_am() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

fn seed() -> Vec<Item> {
    vec![
        Item::new(ItemKind::Vocabulary, "Der Hund", ten_am() + Duration::hours(2)),
        Item::new(ItemKind::Vocabulary, "Das Buch", ten_am() - Duration::days(1))
            .with_description("the book")
            .with_card("The book is red.", "Das Buch ist rot.")
            .with_visit_count(2),
        Item::new(ItemKind::Grammar, "Dativ", ten_am() - Duration::minutes(5)),
    ]
}

/// Shared flow: select, review, select again.
fn exercise(store: Arc<dyn ItemStore>) {
    store.write_items(LEARNER, &seed()).unwrap();

    let clock = Arc::new(FixedClock::new(ten_am()));
    let scheduler = Scheduler::new(store.clone()).with_clock(clock.clone());

    let NextCard::Due(card) = scheduler.next_card(LEARNER).unwrap() else {
        panic!("expected a due card from {}", scheduler.store_name());
    };
    assert_eq!(card.title, "Das Buch");
    assert_eq!(card.answer, "Das Buch ist rot.");

    let outcome = scheduler
        .update_item_schedule(LEARNER, "Das Buch", "good")
        .unwrap();
    assert!(matches!(outcome, UpdateOutcome::Success(_)));

    let items = store.read_items(LEARNER).unwrap();
    let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["Der Hund", "Das Buch", "Dativ"]);
    assert_eq!(items[1].visit_count, 3);
    assert_eq!(items[1].available_time, "2025-01-01 15:00:00");
    assert_eq!(items[1].description, "the book");

    let NextCard::Due(card) = scheduler.next_card(LEARNER).unwrap() else {
        panic!("expected Dativ to be due");
    };
    assert_eq!(card.title, "Dativ");

    scheduler.update_item_schedule(LEARNER, "Dativ", "EASY").unwrap();
    assert_eq!(
        scheduler.next_card(LEARNER).unwrap(),
        NextCard::NoAvailableCards
    );

    clock.advance(Duration::hours(2));
    let NextCard::Due(card) = scheduler.next_card(LEARNER).unwrap() else {
        panic!("expected Der Hund to be due");
    };
    assert_eq!(card.title, "Der Hund");
}

#[test]
fn test_flow_memory_store() {
    exercise(Arc::new(InMemoryStore::new()));
}

#[test]
fn test_flow_json_store() {
    let dir = tempfile::tempdir().unwrap();
    exercise(Arc::new(JsonFileStore::new(dir.path().join("user_data.json"))));
}

#[test]
fn test_flow_sqlite_store() {
    exercise(Arc::new(SqliteItemStore::in_memory().unwrap()));
}

#[test]
fn test_unknown_learner_has_no_learned_data() {
    let dir = tempfile::tempdir().unwrap();
    let scheduler = Scheduler::new(Arc::new(JsonFileStore::new(
        dir.path().join("user_data.json"),
    )));

    assert_eq!(
        scheduler.next_card("nobody@example.com").unwrap(),
        NextCard::NoLearnedData
    );
    assert_eq!(
        scheduler
            .update_item_schedule("nobody@example.com", "Das Buch", "GOOD")
            .unwrap(),
        UpdateOutcome::NoLearnedData
    );
    assert!(!dir.path().join("user_data.json").exists());
}

#[test]
fn test_unknown_title_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("user_data.json");
    let store = Arc::new(JsonFileStore::new(&path));
    store.write_items(LEARNER, &seed()).unwrap();
    let before = std::fs::read(&path).unwrap();

    let scheduler =
        Scheduler::new(store).with_clock(Arc::new(FixedClock::new(ten_am())));
    assert_eq!(
        scheduler
            .update_item_schedule(LEARNER, "das buch", "GOOD")
            .unwrap(),
        UpdateOutcome::ItemNotFound
    );

    assert_eq!(std::fs::read(&path).unwrap(), before);
}

#[test]
fn test_null_timestamp_is_skipped_and_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("user_data.json");
    std::fs::write(
        &path,
        r#"{"u1": [
            {"type": "Vocabulary", "title": "bad", "available_timedate": null, "visit_count": 0},
            {"type": "Vocabulary", "title": "ok", "available_timedate": "2020-01-01 00:00:00", "visit_count": 0}
        ]}"#,
    )
    .unwrap();

    let scheduler = Scheduler::new(Arc::new(JsonFileStore::new(&path)))
        .with_clock(Arc::new(FixedClock::new(ten_am())));
    let NextCard::Due(card) = scheduler.next_card("u1").unwrap() else {
        panic!("expected a due card");
    };
    assert_eq!(card.title, "ok");

    let outcome = scheduler.update_item_schedule("u1", "ok", "GOOD").unwrap();
    assert!(matches!(outcome, UpdateOutcome::Success(_)));

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(raw["u1"][0]["available_timedate"].is_null());
    assert_eq!(raw["u1"][1]["visit_count"], 1);
    assert_eq!(raw["u1"][1]["available_timedate"], "2025-01-01 11:40:00");
}

#[test]
fn test_unknown_judgment_behaves_like_again() {
    let again = Arc::new(InMemoryStore::new().with_items(LEARNER, seed()));
    let maybe = Arc::new(InMemoryStore::new().with_items(LEARNER, seed()));
    let clock = Arc::new(FixedClock::new(ten_am()));

    Scheduler::new(again.clone())
        .with_clock(clock.clone())
        .update_item_schedule(LEARNER, "Dativ", "AGAIN")
        .unwrap();
    Scheduler::new(maybe.clone())
        .with_clock(clock)
        .update_item_schedule(LEARNER, "Dativ", "MAYBE")
        .unwrap();

    assert_eq!(again.read_items(LEARNER).unwrap(), maybe.read_items(LEARNER).unwrap());
    assert_eq!(
        maybe.read_items(LEARNER).unwrap()[2].available_time,
        "2025-01-01 10:01:00"
    );
}

#[test]
fn test_each_judgment_interval() {
    let cases = [("AGAIN", 1), ("Hard", 10), ("good", 100), ("EASY", 1000)];

    for (judgment, minutes) in cases {
        let store = Arc::new(InMemoryStore::new().with_items(LEARNER, seed()));
        let scheduler =
            Scheduler::new(store.clone()).with_clock(Arc::new(FixedClock::new(ten_am())));

        // Dativ starts unvisited, so the multiplier is 1
        let UpdateOutcome::Success(review) = scheduler
            .update_item_schedule(LEARNER, "Dativ", judgment)
            .unwrap()
        else {
            panic!("expected success for {}", judgment);
        };
        assert_eq!(review.interval_minutes, minutes, "judgment {}", judgment);
        assert_eq!(store.write_count(), 1);
    }
}

#[test]
fn test_concurrent_reviews_are_not_lost() {
    let store = Arc::new(InMemoryStore::new().with_items(LEARNER, seed()));
    let scheduler = Arc::new(
        Scheduler::new(store.clone()).with_clock(Arc::new(FixedClock::new(ten_am()))),
    );

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let scheduler = Arc::clone(&scheduler);
            std::thread::spawn(move || {
                scheduler
                    .update_item_schedule(LEARNER, "Der Hund", "HARD")
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let items = store.read_items(LEARNER).unwrap();
    assert_eq!(items[0].visit_count, 16);
    assert_eq!(store.write_count(), 16);
}

mock! {
    pub Store {}

    impl ItemStore for Store {
        fn read_items(&self, learner: &str) -> KarteiResult<Vec<Item>>;
        fn write_items(&self, learner: &str, items: &[Item]) -> KarteiResult<()>;
        fn name(&self) -> &'static str;
    }
}

#[test]
fn test_read_failure_propagates() {
    let mut store = MockStore::new();
    store
        .expect_read_items()
        .returning(|_| Err(KarteiError::store_read("disk gone")));
    store.expect_write_items().never();

    let scheduler = Scheduler::new(Arc::new(store));
    let err = scheduler.next_card(LEARNER).unwrap_err();
    assert!(err.is_store_failure());

    let err = scheduler
        .update_item_schedule(LEARNER, "Das Buch", "GOOD")
        .unwrap_err();
    assert!(err.is_store_failure());
}

#[test]
fn test_write_failure_propagates() {
    let mut store = MockStore::new();
    store.expect_read_items().times(1).returning(|_| Ok(seed()));
    store
        .expect_write_items()
        .times(1)
        .returning(|_, _| Err(KarteiError::store_write("read-only filesystem")));

    let scheduler = Scheduler::new(Arc::new(store)).with_clock(Arc::new(FixedClock::new(ten_am())));
    let err = scheduler
        .update_item_schedule(LEARNER, "Das Buch", "GOOD")
        .unwrap_err();
    assert!(err.is_store_failure());
}

#[test]
fn test_written_collection_has_single_change() {
    let mut store = MockStore::new();
    store.expect_read_items().returning(|_| Ok(seed()));
    store
        .expect_write_items()
        .withf(|learner, items| {
            let original = seed();
            learner.to_string() == LEARNER
                && items.len() == original.len()
                && items[0] == original[0]
                && items[2] == original[2]
                && items[1].visit_count == 3
                && items[1].title == "Das Buch"
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let scheduler = Scheduler::new(Arc::new(store)).with_clock(Arc::new(FixedClock::new(ten_am())));
    assert!(matches!(
        scheduler
            .update_item_schedule(LEARNER, "Das Buch", "GOOD")
            .unwrap(),
        UpdateOutcome::Success(_)
    ));
}
