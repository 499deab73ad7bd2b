use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Normalized internal types used by the tracker (provider-agnostic).
///
/// Missing upstream fields stay `None` internally so change detection can
/// distinguish "missing" from "zero"; the display sentinels ("N/A") appear
/// only when a record is serialized.

/// One flattened odds quote captured from the screen.
#[derive(Debug, Clone, Serialize)]
pub struct OddsRecord {
    pub game_id: String,
    pub team_name: String,
    pub home_or_away: String,
    pub sportsbook: String,
    #[serde(serialize_with = "price_or_na")]
    pub price: Option<f64>,
    #[serde(serialize_with = "string_or_na")]
    pub market_name: Option<String>,
    #[serde(serialize_with = "string_or_na")]
    pub bet_name: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl OddsRecord {
    /// Tuple used to match a record across two snapshots. Uniqueness within a
    /// snapshot is assumed, not enforced; duplicate keys resolve to the first
    /// match during detection.
    pub fn identity(&self) -> (&str, &str, &str, &str) {
        (
            &self.game_id,
            &self.team_name,
            &self.sportsbook,
            &self.home_or_away,
        )
    }
}

/// One parsed capture of all observed odds records at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub data: Vec<OddsRecord>,
}

/// A detected price movement for one identity key between two snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceChange {
    pub timestamp: DateTime<Utc>,
    pub game_id: String,
    pub team_name: String,
    pub sportsbook: String,
    pub home_or_away: String,
    pub old_price: f64,
    pub new_price: f64,
    pub change: f64,
}

fn price_or_na<S: Serializer>(price: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
    match price {
        Some(p) => s.serialize_f64(*p),
        None => s.serialize_str("N/A"),
    }
}

fn string_or_na<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => s.serialize_str(v),
        None => s.serialize_str("N/A"),
    }
}

/// OddsJam oddscreen v2 response: games, each with per-team rows whose odds
/// map sportsbook name to a list of quotes.

#[derive(Debug, Default, Deserialize)]
pub struct ScreenResponse {
    #[serde(default)]
    pub data: Vec<ScreenGame>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScreenGame {
    #[serde(default)]
    pub game_id: Option<String>,
    #[serde(default)]
    pub rows: Vec<ScreenRow>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScreenRow {
    /// Keyed by market name ("Moneyline") — carries the team display info.
    #[serde(default)]
    pub display: BTreeMap<String, ScreenDisplay>,
    #[serde(default)]
    pub home_or_away: Option<String>,
    /// Sportsbook name -> quoted prices.
    #[serde(default)]
    pub odds: BTreeMap<String, Vec<ScreenQuote>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScreenDisplay {
    #[serde(default)]
    pub team_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScreenQuote {
    /// Arrives as a JSON number or a string ("+150", "-110"); normalized later.
    #[serde(default)]
    pub price: Option<serde_json::Value>,
    #[serde(default)]
    pub market_name: Option<String>,
    #[serde(default)]
    pub bet_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(price: Option<f64>) -> OddsRecord {
        OddsRecord {
            game_id: "1".to_string(),
            team_name: "Yankees".to_string(),
            home_or_away: "home".to_string(),
            sportsbook: "BookA".to_string(),
            price,
            market_name: None,
            bet_name: Some("Yankees".to_string()),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_missing_price_serializes_as_sentinel() {
        let json = serde_json::to_value(record(None)).unwrap();
        assert_eq!(json["price"], "N/A");
        assert_eq!(json["market_name"], "N/A");
        assert_eq!(json["bet_name"], "Yankees");
    }

    #[test]
    fn test_numeric_price_serializes_as_number() {
        let json = serde_json::to_value(record(Some(-110.0))).unwrap();
        assert_eq!(json["price"], -110.0);
    }

    #[test]
    fn test_identity_ignores_price_fields() {
        let a = record(Some(150.0));
        let b = record(Some(160.0));
        assert_eq!(a.identity(), b.identity());
    }
}
