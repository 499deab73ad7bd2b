//! Price change detection between two consecutive snapshots.

use crate::feed::types::{OddsRecord, PriceChange};
use chrono::{DateTime, Utc};

/// Compare a new record sequence against the previous snapshot's records and
/// emit one `PriceChange` per identity key whose numeric price moved.
///
/// Linear scan per new record against the full previous snapshot — O(n*m) per
/// cycle, fine at the tens-to-hundreds of records a screen produces. When a
/// key appears more than once in the previous snapshot, the first match wins.
/// Records with a missing price on either side are skipped. An empty previous
/// snapshot (cold start) yields no changes.
pub fn detect_price_changes(
    prev: &[OddsRecord],
    next: &[OddsRecord],
    detected_at: DateTime<Utc>,
) -> Vec<PriceChange> {
    if prev.is_empty() {
        return Vec::new();
    }

    let mut changes = Vec::new();
    for new_record in next {
        let old_record = prev
            .iter()
            .find(|r| r.identity() == new_record.identity());
        let Some(old_record) = old_record else { continue };

        let (Some(old_price), Some(new_price)) = (old_record.price, new_record.price) else {
            continue;
        };
        if old_price == new_price {
            continue;
        }

        changes.push(PriceChange {
            timestamp: detected_at,
            game_id: new_record.game_id.clone(),
            team_name: new_record.team_name.clone(),
            sportsbook: new_record.sportsbook.clone(),
            home_or_away: new_record.home_or_away.clone(),
            old_price,
            new_price,
            change: new_price - old_price,
        });
    }

    if !changes.is_empty() {
        tracing::info!(count = changes.len(), "detected price changes");
    }
    changes
}
