pub mod oddsjam;
pub mod types;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait OddsFeed: Send + Sync {
    /// Fetch one raw odds screen body from the upstream API.
    async fn fetch_screen(&self) -> Result<Value>;
}
