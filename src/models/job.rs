use garde::Validate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::coin::CoinOutput;

/// Request to start a scraping job over a batch of coins.
///
/// Coins are reported back in submission order, duplicates included.
#[derive(Debug, Deserialize, Validate)]
pub struct StartScrapingRequest {
    #[garde(length(min = 1))]
    pub coins: Vec<String>,
}

/// Response after submitting a job.
#[derive(Debug, Serialize)]
pub struct StartScrapingResponse {
    pub job_id: Uuid,
}

/// One `{coin, job_id}` pair, recorded once per requested coin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskEntry {
    pub coin: String,
    pub job_id: Uuid,
}

/// A task joined with its scraped output for status reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskWithOutput {
    pub coin: String,
    pub output: CoinOutput,
}

/// Response for querying job status.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScrapingStatusResponse {
    pub job_id: Uuid,
    pub tasks: Vec<TaskWithOutput>,
}
