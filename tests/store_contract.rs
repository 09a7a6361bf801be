//! Store contract properties.
//!
//! Written against the `StatusStore` facade so they hold for whichever
//! backend is selected; run here against the degraded mode, which must
//! honor every contract except persistence across restart.

use status_monitor::model::{Observation, ServiceObservation, Status};
use status_monitor::store::{StatusStore, StoreMode, LIST_LIMIT};

fn service(name: &str, status: Status, ts: Option<&str>) -> Observation {
    Observation::Service(ServiceObservation {
        service_name: name.to_string(),
        service_status: status,
        host_name: Some("h1".to_string()),
        timestamp: ts.map(str::to_string),
    })
}

fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[tokio::test]
async fn absent_names_are_absent_and_count_as_down() {
    let store = StatusStore::in_memory();

    assert!(store.find_latest_by_name("httpd").await.unwrap().is_none());

    let health = store
        .application_status("app1", &names(&["httpd"]))
        .await
        .unwrap();
    assert_eq!(health.application_status, Status::Down);
    assert_eq!(health.down_services, vec!["httpd"]);
}

#[tokio::test]
async fn reads_are_idempotent() {
    let store = StatusStore::in_memory();
    for ts in ["2026-01-01T00:00:01Z", "2026-01-01T00:00:02Z"] {
        store
            .put(service("httpd", Status::Up, Some(ts)))
            .await
            .unwrap();
    }

    let first = store.list_all().await.unwrap();
    let second = store.list_all().await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn listing_is_newest_first_whatever_the_insertion_order() {
    let store = StatusStore::in_memory();
    // T2, T1, T3
    for ts in [
        "2026-01-01T00:00:02Z",
        "2026-01-01T00:00:01Z",
        "2026-01-01T00:00:03Z",
    ] {
        store
            .put(service("httpd", Status::Up, Some(ts)))
            .await
            .unwrap();
    }

    let stamps: Vec<String> = store
        .list_all()
        .await
        .unwrap()
        .iter()
        .map(|o| o.timestamp().unwrap().to_string())
        .collect();
    assert_eq!(
        stamps,
        vec![
            "2026-01-01T00:00:03Z",
            "2026-01-01T00:00:02Z",
            "2026-01-01T00:00:01Z"
        ]
    );
}

#[tokio::test]
async fn aggregation_rule_matches_the_down_set() {
    let store = StatusStore::in_memory();
    store
        .put(service("a", Status::Up, Some("2026-01-01T00:00:01Z")))
        .await
        .unwrap();
    store
        .put(service("b", Status::Down, Some("2026-01-01T00:00:01Z")))
        .await
        .unwrap();
    store
        .put(service("c", Status::Up, Some("2026-01-01T00:00:01Z")))
        .await
        .unwrap();

    let health = store
        .application_status("app1", &names(&["a", "b", "c"]))
        .await
        .unwrap();
    assert_eq!(health.application_status, Status::Down);
    assert_eq!(health.down_services, vec!["b"]);

    store
        .put(service("b", Status::Up, Some("2026-01-01T00:00:02Z")))
        .await
        .unwrap();
    let health = store
        .application_status("app1", &names(&["a", "b", "c"]))
        .await
        .unwrap();
    assert_eq!(health.application_status, Status::Up);
    assert!(health.down_services.is_empty());
}

#[tokio::test]
async fn put_then_find_round_trips_the_fields() {
    let store = StatusStore::in_memory();
    let submitted = service("httpd", Status::Up, Some("2026-01-29T10:30:00Z"));
    let receipt = store.put(submitted.clone()).await.unwrap();
    assert!(!receipt.id.is_empty());

    let found = store.find_latest_by_name("httpd").await.unwrap().unwrap();
    assert_eq!(found, submitted);
}

#[tokio::test]
async fn store_stamps_missing_timestamps() {
    let store = StatusStore::in_memory();
    store.put(service("httpd", Status::Up, None)).await.unwrap();

    let found = store.find_latest_by_name("httpd").await.unwrap().unwrap();
    let ts = found.timestamp().expect("store should assign a timestamp");
    assert!(ts.ends_with('Z'));
}

#[tokio::test]
async fn listing_is_capped() {
    let store = StatusStore::in_memory();
    for i in 0..(LIST_LIMIT + 20) {
        store
            .put(service(&format!("svc-{i}"), Status::Up, None))
            .await
            .unwrap();
    }

    assert_eq!(store.list_all().await.unwrap().len(), LIST_LIMIT);
}

#[tokio::test]
async fn degraded_mode_is_visible_only_on_the_receipt() {
    let store = StatusStore::in_memory();
    assert_eq!(store.mode(), StoreMode::Degraded);

    let receipt = store.put(service("httpd", Status::Up, None)).await.unwrap();
    assert_eq!(receipt.mode, StoreMode::Degraded);
    assert_eq!(receipt.result, "created");
}
