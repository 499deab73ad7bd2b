//! Remote sink: one new file per cycle in a GitHub repository, created via
//! the contents API with a bearer token.

use super::{report_filename, Publisher};
use crate::config::GithubSinkConfig;
use crate::tracker::TrackerReport;
use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine as _;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

const GITHUB_API: &str = "https://api.github.com";

pub struct GithubContentSink {
    client: Client,
    owner: String,
    repo: String,
    committer_name: String,
    committer_email: String,
    token: Option<String>,
}

#[derive(Serialize)]
struct CreateFileRequest<'a> {
    message: String,
    content: String,
    committer: Committer<'a>,
}

#[derive(Serialize)]
struct Committer<'a> {
    name: &'a str,
    email: &'a str,
}

impl GithubContentSink {
    pub fn new(config: &GithubSinkConfig, token: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("odds-tracker/0.1")
            .build()
            .expect("failed to build reqwest client");

        Self {
            client,
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            committer_name: config.committer_name.clone(),
            committer_email: config.committer_email.clone(),
            token,
        }
    }

    fn contents_url(&self, filename: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            GITHUB_API, self.owner, self.repo, filename
        )
    }

    fn build_request(&self, report: &TrackerReport) -> Result<CreateFileRequest<'_>> {
        let body = serde_json::to_string_pretty(report)
            .context("failed to serialize odds report")?;
        Ok(CreateFileRequest {
            message: format!(
                "Update MLB odds data - {}",
                report.timestamp.format("%Y-%m-%d %H:%M:%S")
            ),
            content: base64::engine::general_purpose::STANDARD.encode(body.as_bytes()),
            committer: Committer {
                name: &self.committer_name,
                email: &self.committer_email,
            },
        })
    }
}

#[async_trait]
impl Publisher for GithubContentSink {
    fn name(&self) -> &str {
        "github"
    }

    async fn publish(&self, report: &TrackerReport) -> Result<()> {
        let token = self
            .token
            .as_deref()
            .context("GITHUB_TOKEN not set")?;

        let filename = report_filename(report);
        let payload = self.build_request(report)?;

        let resp = self
            .client
            .put(self.contents_url(&filename))
            .bearer_auth(token)
            .header("Accept", "application/vnd.github+json")
            .json(&payload)
            .send()
            .await
            .context("GitHub contents request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("GitHub sync failed ({}): {}", status, body);
        }

        tracing::info!(file = %filename, "synced odds report to GitHub");
        Ok(())
    }
}
