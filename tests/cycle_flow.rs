//! End-to-end cycle flow: scripted feed in, recording sink out.

use anyhow::Result;
use async_trait::async_trait;
use odds_tracker::feed::OddsFeed;
use odds_tracker::publish::Publisher;
use odds_tracker::tracker::{Tracker, TrackerReport};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// Feed that replays a fixed sequence of responses, one per cycle.
struct ScriptedFeed {
    responses: Mutex<Vec<Result<Value, String>>>,
}

impl ScriptedFeed {
    fn new(responses: Vec<Result<Value, String>>) -> Self {
        Self {
            responses: Mutex::new(responses),
        }
    }
}

#[async_trait]
impl OddsFeed for ScriptedFeed {
    async fn fetch_screen(&self) -> Result<Value> {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            anyhow::bail!("scripted feed exhausted");
        }
        responses.remove(0).map_err(|e| anyhow::anyhow!(e))
    }
}

/// Publisher that records every report it receives.
struct RecordingSink {
    reports: Arc<Mutex<Vec<TrackerReport>>>,
}

#[async_trait]
impl Publisher for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    async fn publish(&self, report: &TrackerReport) -> Result<()> {
        self.reports.lock().unwrap().push(report.clone());
        Ok(())
    }
}

/// Publisher that always fails, standing in for a broken remote sink.
struct FailingSink;

#[async_trait]
impl Publisher for FailingSink {
    fn name(&self) -> &str {
        "failing"
    }

    async fn publish(&self, _report: &TrackerReport) -> Result<()> {
        anyhow::bail!("sink unavailable")
    }
}

/// Minimal one-game, one-book screen body with the given home price.
fn screen(price: i64) -> Value {
    json!({
        "data": [
            {
                "game_id": "1",
                "rows": [
                    {
                        "display": { "Moneyline": { "team_name": "Yankees" } },
                        "home_or_away": "home",
                        "odds": {
                            "BookA": [
                                { "price": price, "market_name": "Moneyline", "bet_name": "Yankees" }
                            ]
                        }
                    }
                ]
            }
        ]
    })
}

#[tokio::test]
async fn two_cycles_detect_a_price_move() {
    let reports = Arc::new(Mutex::new(Vec::new()));
    let feed = ScriptedFeed::new(vec![Ok(screen(150)), Ok(screen(160))]);
    let mut tracker = Tracker::new(
        Box::new(feed),
        vec![Box::new(RecordingSink {
            reports: reports.clone(),
        })],
        50,
    );

    let first = tracker.run_cycle().await.unwrap();
    assert_eq!(first.records, 1);
    assert_eq!(first.changes, 0, "cold start must not produce changes");

    let second = tracker.run_cycle().await.unwrap();
    assert_eq!(second.changes, 1);

    assert_eq!(tracker.update_count(), 2);
    assert_eq!(tracker.history().len(), 2);
    let change = &tracker.price_changes()[0];
    assert_eq!(change.old_price, 150.0);
    assert_eq!(change.new_price, 160.0);
    assert_eq!(change.change, 10.0);
    assert_eq!(change.team_name, "Yankees");

    let reports = reports.lock().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].summary.total_updates, 1);
    assert_eq!(reports[0].summary.total_changes, 0);
    assert_eq!(reports[1].summary.total_updates, 2);
    assert_eq!(reports[1].summary.total_changes, 1);
    assert_eq!(reports[1].summary.total_records, 2);
}

#[tokio::test]
async fn failed_fetch_leaves_state_unchanged() {
    let feed = ScriptedFeed::new(vec![
        Ok(screen(150)),
        Err("upstream returned HTTP 500".to_string()),
    ]);
    let mut tracker = Tracker::new(Box::new(feed), Vec::new(), 50);

    tracker.run_cycle().await.unwrap();
    let err = tracker.run_cycle().await.unwrap_err();
    assert!(err.to_string().contains("500"));

    assert_eq!(tracker.update_count(), 1);
    assert_eq!(tracker.history().len(), 1);
    assert!(tracker.price_changes().is_empty());
}

#[tokio::test]
async fn empty_screen_aborts_the_cycle() {
    let feed = ScriptedFeed::new(vec![Ok(json!({ "data": [] }))]);
    let mut tracker = Tracker::new(Box::new(feed), Vec::new(), 50);

    let err = tracker.run_cycle().await.unwrap_err();
    assert!(err.to_string().contains("no records"));
    assert_eq!(tracker.update_count(), 0);
    assert!(tracker.history().is_empty());
}

#[tokio::test]
async fn publish_failure_does_not_abort_the_cycle() {
    let reports = Arc::new(Mutex::new(Vec::new()));
    let feed = ScriptedFeed::new(vec![Ok(screen(150))]);
    let mut tracker = Tracker::new(
        Box::new(feed),
        vec![
            Box::new(FailingSink),
            Box::new(RecordingSink {
                reports: reports.clone(),
            }),
        ],
        50,
    );

    tracker.run_cycle().await.unwrap();
    assert_eq!(tracker.update_count(), 1);
    // The sink after the failing one still receives the report.
    assert_eq!(reports.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn history_capacity_is_enforced_across_cycles() {
    let feed = ScriptedFeed::new(vec![Ok(screen(150)), Ok(screen(155)), Ok(screen(160))]);
    let mut tracker = Tracker::new(Box::new(feed), Vec::new(), 2);

    for _ in 0..3 {
        tracker.run_cycle().await.unwrap();
    }

    assert_eq!(tracker.history().len(), 2);
    // Change log is unbounded: both moves are retained even after eviction.
    assert_eq!(tracker.price_changes().len(), 2);
    let latest = tracker.history().latest().unwrap();
    assert_eq!(latest.data[0].price, Some(160.0));
}
