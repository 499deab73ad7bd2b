//! Cycle runner and the single owned state behind it.
//!
//! Both the scheduled poll loop and the on-demand HTTP handler drive
//! `Tracker::run_cycle` through one `Arc<tokio::sync::Mutex<_>>`, so cycles
//! are fully serialized and no partially-applied state is ever observable.

use crate::engine::detector::detect_price_changes;
use crate::engine::history::History;
use crate::feed::oddsjam::parse_screen;
use crate::feed::types::{PriceChange, Snapshot};
use crate::feed::OddsFeed;
use crate::publish::Publisher;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type SharedTracker = Arc<Mutex<Tracker>>;

/// Rolling counters over the retained state.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_updates: u64,
    pub total_records: usize,
    pub total_changes: usize,
}

/// Full aggregate state written to the publishers each cycle.
#[derive(Debug, Clone, Serialize)]
pub struct TrackerReport {
    pub timestamp: DateTime<Utc>,
    pub odds_data: Vec<Snapshot>,
    pub price_changes: Vec<PriceChange>,
    pub summary: Summary,
}

/// What one successful cycle produced.
#[derive(Debug)]
pub struct CycleOutcome {
    /// Raw upstream body, served verbatim by the on-demand endpoint.
    pub raw: Value,
    pub records: usize,
    pub changes: usize,
}

pub struct Tracker {
    feed: Box<dyn OddsFeed>,
    publishers: Vec<Box<dyn Publisher>>,
    history: History,
    price_changes: Vec<PriceChange>,
    update_count: u64,
}

impl Tracker {
    pub fn new(
        feed: Box<dyn OddsFeed>,
        publishers: Vec<Box<dyn Publisher>>,
        history_capacity: usize,
    ) -> Self {
        Self {
            feed,
            publishers,
            history: History::new(history_capacity),
            price_changes: Vec::new(),
            update_count: 0,
        }
    }

    /// Run one fetch -> parse -> detect -> append -> publish cycle.
    ///
    /// A failed fetch or a screen that parses to zero records aborts the cycle
    /// with no state mutated; the error is the caller's to log or surface.
    /// Publish failures are logged here and never abort the cycle.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome> {
        let raw = self.feed.fetch_screen().await?;

        let captured_at = Utc::now();
        let records = parse_screen(&raw, captured_at);
        if records.is_empty() {
            anyhow::bail!("no records parsed from odds screen");
        }
        let record_count = records.len();

        let changes = match self.history.latest() {
            Some(prev) => detect_price_changes(&prev.data, &records, Utc::now()),
            None => Vec::new(),
        };
        let change_count = changes.len();

        self.history.append(Snapshot {
            timestamp: captured_at,
            data: records,
        });
        self.price_changes.extend(changes);
        self.update_count += 1;

        let report = self.report(Utc::now());
        for publisher in &self.publishers {
            if let Err(e) = publisher.publish(&report).await {
                tracing::error!(sink = publisher.name(), error = %e, "publish failed");
            }
        }

        tracing::info!(
            records = record_count,
            changes = change_count,
            updates = self.update_count,
            "cycle complete"
        );

        Ok(CycleOutcome {
            raw,
            records: record_count,
            changes: change_count,
        })
    }

    pub fn summary(&self) -> Summary {
        Summary {
            total_updates: self.update_count,
            total_records: self.history.total_records(),
            total_changes: self.price_changes.len(),
        }
    }

    /// Snapshot the aggregate state for publishing.
    pub fn report(&self, timestamp: DateTime<Utc>) -> TrackerReport {
        TrackerReport {
            timestamp,
            odds_data: self.history.iter().cloned().collect(),
            price_changes: self.price_changes.clone(),
            summary: self.summary(),
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn price_changes(&self) -> &[PriceChange] {
        &self.price_changes
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }
}
