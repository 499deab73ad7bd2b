//! Minimal HTTP surface: on-demand odds cycle plus a liveness probe.

use crate::tracker::SharedTracker;
use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use serde_json::json;

/// `GET /odds` — run one full cycle and return the raw upstream body.
/// Failures surface as a 500 with a generic error body; details go to logs.
pub async fn get_odds(tracker: web::Data<SharedTracker>) -> HttpResponse {
    let mut tracker = tracker.lock().await;
    match tracker.run_cycle().await {
        Ok(outcome) => HttpResponse::Ok().json(outcome.raw),
        Err(e) => {
            tracing::error!(error = %e, "on-demand cycle failed");
            HttpResponse::InternalServerError().json(json!({ "error": "failed to fetch odds data" }))
        }
    }
}

/// `GET /summary` — current counters without triggering a cycle.
pub async fn get_summary(tracker: web::Data<SharedTracker>) -> HttpResponse {
    let tracker = tracker.lock().await;
    HttpResponse::Ok().json(tracker.summary())
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Bind and run the server. Cross-origin access is limited to the single
/// configured origin.
pub async fn run(tracker: SharedTracker, port: u16, cors_origin: String) -> std::io::Result<()> {
    let data = web::Data::new(tracker);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&cors_origin)
            .allowed_methods(vec!["GET"]);
        App::new()
            .app_data(data.clone())
            .wrap(cors)
            .route("/odds", web::get().to(get_odds))
            .route("/summary", web::get().to(get_summary))
            .route("/health", web::get().to(health))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
