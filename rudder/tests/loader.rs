use std::sync::{Arc, Mutex};
use std::time::Duration;

use rudder::prelude::*;
use serde_json::json;
use tokio::time::sleep;

/// Two overlapping loads where the first response arrives last: the slow,
/// stale payload must not overwrite the fresh one.
#[tokio::test]
async fn test_slow_stale_response_does_not_clobber_fresh_data() {
    let table = Arc::new(Mutex::new(TableState::new(TableOptions::new(vec![
        Column::new("name", "Name"),
    ]))));
    let sequencer = LoadSequencer::new();

    let first = sequencer.begin();
    let second = sequencer.begin();

    let slow_table = table.clone();
    let slow = tokio::spawn(async move {
        sleep(Duration::from_millis(40)).await;
        first.apply(|| {
            slow_table
                .lock()
                .unwrap()
                .set_data(vec![Record::new(json!({"id": 1, "name": "stale"}))]);
        })
    });

    let fast_table = table.clone();
    let fast = tokio::spawn(async move {
        sleep(Duration::from_millis(5)).await;
        second.apply(|| {
            fast_table
                .lock()
                .unwrap()
                .set_data(vec![Record::new(json!({"id": 1, "name": "fresh"}))]);
        })
    });

    assert!(fast.await.unwrap());
    assert!(!slow.await.unwrap());

    let table = table.lock().unwrap();
    assert_eq!(
        table.visible_records()[0].get_text("name").as_deref(),
        Some("fresh")
    );
}

/// Tearing a view down (dropping its sequencer) discards loads still in
/// flight, so nothing lands after the view is gone.
#[tokio::test]
async fn test_teardown_discards_in_flight_loads() {
    let sequencer = LoadSequencer::new();
    let ticket = sequencer.begin();

    let task = tokio::spawn(async move {
        sleep(Duration::from_millis(20)).await;
        ticket.apply(|| panic!("load applied after teardown"))
    });

    drop(sequencer);
    assert!(!task.await.unwrap());
}
