//! OddsJam oddscreen feed via their public JSON API.
//!
//! One GET against a fixed endpoint with a fixed query set. Responses are
//! nested game -> row -> sportsbook -> quote structures, flattened here into
//! `OddsRecord`s for change detection.

use super::types::*;
use super::OddsFeed;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::config::ApiConfig;

pub struct OddsJamFeed {
    client: Client,
    base_url: String,
    query: Vec<(&'static str, String)>,
}

impl OddsJamFeed {
    pub fn new(config: &ApiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .build()
            .expect("failed to build reqwest client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            query: config.query_params(),
        }
    }
}

#[async_trait]
impl OddsFeed for OddsJamFeed {
    async fn fetch_screen(&self) -> Result<Value> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&self.query)
            .header("Accept", "application/json")
            .send()
            .await
            .context("odds screen request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("odds screen request failed ({}): {}", status, body);
        }

        resp.json()
            .await
            .context("failed to decode odds screen response")
    }
}

// ── Parsing ───────────────────────────────────────────────────────────

/// Normalize a quoted price to a numeric American odds value.
/// Accepts JSON numbers and strings like "+150", "-110", "EVEN" (= +100).
pub fn parse_price(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.eq_ignore_ascii_case("EVEN") {
                return Some(100.0);
            }
            s.parse::<f64>().ok()
        }
        _ => None,
    }
}

/// Flatten a raw odds screen body into per-book odds records.
/// Public for unit testing with fixtures.
///
/// Missing display fields fall back to the "Unknown" sentinel so the identity
/// key stays comparable across snapshots; a missing or non-numeric price is
/// kept as `None`. An empty or malformed body yields no records, never an
/// error.
pub fn parse_screen(raw: &Value, captured_at: DateTime<Utc>) -> Vec<OddsRecord> {
    let screen: ScreenResponse = match serde_json::from_value(raw.clone()) {
        Ok(screen) => screen,
        Err(e) => {
            tracing::warn!(error = %e, "malformed odds screen body");
            return Vec::new();
        }
    };

    if screen.data.is_empty() {
        tracing::warn!("no data found in odds screen response");
        return Vec::new();
    }

    let mut records = Vec::new();
    for game in &screen.data {
        let game_id = game
            .game_id
            .clone()
            .unwrap_or_else(|| "Unknown".to_string());
        for row in &game.rows {
            let team_name = row
                .display
                .get("Moneyline")
                .and_then(|d| d.team_name.clone())
                .unwrap_or_else(|| "Unknown".to_string());
            let home_or_away = row
                .home_or_away
                .clone()
                .unwrap_or_else(|| "Unknown".to_string());

            for (sportsbook, quotes) in &row.odds {
                for quote in quotes {
                    records.push(OddsRecord {
                        game_id: game_id.clone(),
                        team_name: team_name.clone(),
                        home_or_away: home_or_away.clone(),
                        sportsbook: sportsbook.clone(),
                        price: quote.price.as_ref().and_then(parse_price),
                        market_name: quote.market_name.clone(),
                        bet_name: quote.bet_name.clone(),
                        timestamp: captured_at,
                    });
                }
            }
        }
    }

    tracing::info!(count = records.len(), "parsed odds records");
    records
}
