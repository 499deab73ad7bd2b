use super::{report_filename, Publisher};
use crate::tracker::TrackerReport;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;

/// Writes each cycle's aggregate report as pretty JSON to a timestamp-named
/// file. Files accumulate; nothing is updated in place.
pub struct LocalJsonSink {
    dir: PathBuf,
}

impl LocalJsonSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl Publisher for LocalJsonSink {
    fn name(&self) -> &str {
        "local"
    }

    async fn publish(&self, report: &TrackerReport) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create output dir: {}", self.dir.display()))?;

        let path = self.dir.join(report_filename(report));
        let json = serde_json::to_string_pretty(report)
            .context("failed to serialize odds report")?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;

        tracing::info!(path = %path.display(), "saved odds report");
        Ok(())
    }
}
