pub mod github;
pub mod local;

use crate::tracker::TrackerReport;
use anyhow::Result;
use async_trait::async_trait;

/// Side-effecting sink for the per-cycle aggregate report. Implementations
/// never block the cycle on failure; the tracker logs and moves on.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Short sink name used in log lines.
    fn name(&self) -> &str;

    async fn publish(&self, report: &TrackerReport) -> Result<()>;
}

/// Timestamp-derived filename shared by both sinks, one file per cycle.
pub fn report_filename(report: &TrackerReport) -> String {
    format!(
        "mlb_odds_{}.json",
        report.timestamp.format("%Y%m%d_%H%M%S")
    )
}
