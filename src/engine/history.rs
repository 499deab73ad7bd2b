//! Bounded FIFO store of retained snapshots.

use crate::feed::types::Snapshot;
use std::collections::VecDeque;

/// Ordered sequence of snapshots, capacity-bounded. Appends go to the tail;
/// once the capacity is exceeded, the oldest snapshots are evicted from the
/// head. No other removal path exists.
#[derive(Debug)]
pub struct History {
    snapshots: VecDeque<Snapshot>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            snapshots: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn append(&mut self, snapshot: Snapshot) {
        self.snapshots.push_back(snapshot);
        while self.snapshots.len() > self.capacity {
            self.snapshots.pop_front();
        }
    }

    /// The most recently appended snapshot, if any.
    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.back()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Record count summed across all retained snapshots.
    pub fn total_records(&self) -> usize {
        self.snapshots.iter().map(|s| s.data.len()).sum()
    }

    /// Oldest-to-newest iteration over the retained snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::types::OddsRecord;
    use chrono::{TimeZone, Utc};

    fn snapshot(t: i64, records: usize) -> Snapshot {
        let timestamp = Utc.timestamp_opt(t, 0).unwrap();
        Snapshot {
            timestamp,
            data: (0..records)
                .map(|i| OddsRecord {
                    game_id: format!("g{}", i),
                    team_name: "Yankees".to_string(),
                    home_or_away: "home".to_string(),
                    sportsbook: "BookA".to_string(),
                    price: Some(150.0),
                    market_name: None,
                    bet_name: None,
                    timestamp,
                })
                .collect(),
        }
    }

    #[test]
    fn test_append_and_latest() {
        let mut history = History::new(5);
        assert!(history.latest().is_none());
        history.append(snapshot(1, 2));
        history.append(snapshot(2, 3));
        assert_eq!(history.len(), 2);
        assert_eq!(history.latest().unwrap().data.len(), 3);
    }

    #[test]
    fn test_eviction_keeps_last_capacity_snapshots() {
        let mut history = History::new(2);
        history.append(snapshot(1, 1));
        history.append(snapshot(2, 1));
        history.append(snapshot(3, 1));
        assert_eq!(history.len(), 2);
        let retained: Vec<i64> = history.iter().map(|s| s.timestamp.timestamp()).collect();
        assert_eq!(retained, vec![2, 3]);
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut history = History::new(3);
        for t in 0..10 {
            history.append(snapshot(t, 1));
            assert!(history.len() <= 3);
        }
        let retained: Vec<i64> = history.iter().map(|s| s.timestamp.timestamp()).collect();
        assert_eq!(retained, vec![7, 8, 9]);
    }

    #[test]
    fn test_total_records_across_snapshots() {
        let mut history = History::new(5);
        history.append(snapshot(1, 2));
        history.append(snapshot(2, 4));
        assert_eq!(history.total_records(), 6);
    }

    #[test]
    fn test_total_records_after_eviction() {
        let mut history = History::new(2);
        history.append(snapshot(1, 10));
        history.append(snapshot(2, 2));
        history.append(snapshot(3, 3));
        assert_eq!(history.total_records(), 5);
    }
}
