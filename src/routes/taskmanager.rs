use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use garde::Validate;
use serde::Serialize;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::models::job::{ScrapingStatusResponse, StartScrapingRequest, StartScrapingResponse};
use crate::services::orchestrator;

/// Error body shape: `{"detail": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

fn error(status: StatusCode, detail: &str) -> (StatusCode, Json<ErrorDetail>) {
    (
        status,
        Json(ErrorDetail {
            detail: detail.to_string(),
        }),
    )
}

/// POST /api/taskmanager/start_scraping — submit a batch of coins.
///
/// Responds as soon as the job id is minted; the scrape loop runs as a
/// background task. An empty coin list is rejected.
pub async fn start_scraping(
    State(state): State<AppState>,
    Json(request): Json<StartScrapingRequest>,
) -> Result<Json<StartScrapingResponse>, (StatusCode, Json<ErrorDetail>)> {
    if let Err(report) = request.validate() {
        return Err(error(
            StatusCode::UNPROCESSABLE_ENTITY,
            &report.to_string(),
        ));
    }

    let job_id = Uuid::new_v4();
    metrics::counter!("scrape_jobs_total").increment(1);
    tracing::info!(job_id = %job_id, coins = request.coins.len(), "job submitted");

    let store = state.store.clone();
    let client = state.coinmarket.clone();
    let coins = request.coins;
    tokio::spawn(async move {
        if let Err(e) = orchestrator::run_job(&store, &client, &coins, job_id).await {
            // The status flag was never set, so pollers will see "not found".
            tracing::error!(job_id = %job_id, error = %e, "background job failed");
        }
    });

    Ok(Json(StartScrapingResponse { job_id }))
}

/// GET /api/taskmanager/scraping_status/{job_id} — poll a job's results.
pub async fn scraping_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<ScrapingStatusResponse>, (StatusCode, Json<ErrorDetail>)> {
    // Job ids are always UUIDs, so anything else cannot name a stored job.
    let Ok(job_id) = job_id.parse::<Uuid>() else {
        return Err(error(StatusCode::NOT_FOUND, "Job ID not found"));
    };

    match orchestrator::resolve_status(&state.store, job_id).await {
        Ok(Some(status)) => Ok(Json(status)),
        Ok(None) => Err(error(StatusCode::NOT_FOUND, "Job ID not found")),
        Err(e) => {
            tracing::error!(job_id = %job_id, error = %e, "status lookup failed");
            Err(error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "job store unavailable",
            ))
        }
    }
}
