use anyhow::Result;
use odds_tracker::config::Config;
use odds_tracker::feed::oddsjam::OddsJamFeed;
use odds_tracker::publish::{github::GithubContentSink, local::LocalJsonSink, Publisher};
use odds_tracker::server;
use odds_tracker::tracker::{SharedTracker, Tracker};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

#[actix_web::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load saved vars from .env (real env vars take precedence)
    Config::load_env_file();
    let config = Config::load(Path::new("config.toml"))?;

    let feed = OddsJamFeed::new(&config.api);

    let mut publishers: Vec<Box<dyn Publisher>> =
        vec![Box::new(LocalJsonSink::new(&config.local_sink.dir))];
    if let Some(github) = &config.github_sink {
        let token = Config::github_token();
        if token.is_none() {
            tracing::warn!("GITHUB_TOKEN not set; GitHub sync will fail until it is provided");
        }
        publishers.push(Box::new(GithubContentSink::new(github, token)));
    }

    let tracker: SharedTracker = Arc::new(Mutex::new(Tracker::new(
        Box::new(feed),
        publishers,
        config.tracker.history_capacity,
    )));

    // Background poll loop. The first tick fires immediately; a tick that
    // lands while a cycle is still running is skipped, not queued.
    let poll_tracker = tracker.clone();
    let poll_interval = Duration::from_secs(config.tracker.poll_interval_s);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            tracing::info!("fetching new odds data");
            let mut tracker = poll_tracker.lock().await;
            match tracker.run_cycle().await {
                Ok(outcome) => {
                    tracing::info!(
                        records = outcome.records,
                        changes = outcome.changes,
                        "update successful"
                    );
                }
                Err(e) => {
                    tracing::warn!(error = %e, "scheduled cycle failed");
                }
            }
        }
    });

    tracing::info!(port = config.server.port, "starting odds tracker server");
    server::run(tracker, config.server.port, config.server.cors_origin.clone()).await?;

    Ok(())
}
