//! Job orchestration over the store.
//!
//! [`run_job`] drives the per-coin scrape loop for one submitted job;
//! [`resolve_status`] reads a job back out of the store for the status
//! endpoint.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::coin::{CoinOutput, OutputRecord};
use crate::models::job::{ScrapingStatusResponse, TaskEntry, TaskWithOutput};
use crate::services::coinmarket::CoinMarketClient;
use crate::services::store::{JobStore, StoreError};

/// Run one job's scrape loop to completion.
///
/// Coins are scraped strictly in submission order, one at a time; a coin
/// whose fetch fails still yields an (empty) record, so a single bad coin
/// never aborts the loop. Coins are not deduplicated. After the loop the
/// task list is written and the status flag set, so a poller only ever
/// observes "not found" or "completed".
pub async fn run_job(
    store: &JobStore,
    client: &CoinMarketClient,
    coins: &[String],
    job_id: Uuid,
) -> Result<(), StoreError> {
    let start = std::time::Instant::now();
    let mut tasks = Vec::with_capacity(coins.len());

    for coin in coins {
        tasks.push(TaskEntry {
            coin: coin.clone(),
            job_id,
        });
        client.scrape(coin, job_id, store).await?;
        metrics::counter!("scrape_coins_total").increment(1);
    }

    store.push_tasks(job_id, &tasks).await?;
    store.set_completed(job_id).await?;

    metrics::counter!("scrape_jobs_completed").increment(1);
    metrics::histogram!("scrape_job_seconds").record(start.elapsed().as_secs_f64());
    tracing::info!(job_id = %job_id, coins = coins.len(), "job completed");
    Ok(())
}

/// Resolve a job's status. `None` means the job id is unknown or its keys
/// have expired from the store.
pub async fn resolve_status(
    store: &JobStore,
    job_id: Uuid,
) -> Result<Option<ScrapingStatusResponse>, StoreError> {
    if store.status(job_id).await?.is_none() {
        return Ok(None);
    }

    let tasks = store.tasks(job_id).await?;
    let records = store.records(job_id).await?;

    Ok(Some(ScrapingStatusResponse {
        job_id,
        tasks: join_tasks(&tasks, records),
    }))
}

/// Join task entries with their scraped outputs.
///
/// Output order follows task order. A coin with no record gets an empty
/// output; a coin recorded more than once resolves to its last record.
pub fn join_tasks(tasks: &[TaskEntry], records: Vec<OutputRecord>) -> Vec<TaskWithOutput> {
    let mut by_coin: HashMap<String, CoinOutput> = HashMap::new();
    for record in records {
        by_coin.insert(record.coin, record.output);
    }

    tasks
        .iter()
        .map(|task| TaskWithOutput {
            coin: task.coin.clone(),
            output: by_coin.get(&task.coin).cloned().unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(coin: &str, price: Option<f64>) -> OutputRecord {
        OutputRecord {
            coin: coin.to_string(),
            output: CoinOutput {
                price,
                ..CoinOutput::default()
            },
        }
    }

    fn task(coin: &str, job_id: Uuid) -> TaskEntry {
        TaskEntry {
            coin: coin.to_string(),
            job_id,
        }
    }

    #[test]
    fn test_join_preserves_task_order() {
        let job_id = Uuid::new_v4();
        let tasks = vec![task("bitcoin", job_id), task("ethereum", job_id)];
        // Records arrive in scrape-completion order, which need not matter.
        let records = vec![record("ethereum", Some(3000.0)), record("bitcoin", Some(64000.0))];

        let joined = join_tasks(&tasks, records);
        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].coin, "bitcoin");
        assert_eq!(joined[0].output.price, Some(64000.0));
        assert_eq!(joined[1].coin, "ethereum");
        assert_eq!(joined[1].output.price, Some(3000.0));
    }

    #[test]
    fn test_missing_record_yields_empty_output() {
        let job_id = Uuid::new_v4();
        let tasks = vec![task("bitcoin", job_id), task("dogecoin", job_id)];
        let records = vec![record("bitcoin", Some(64000.0))];

        let joined = join_tasks(&tasks, records);
        assert_eq!(joined[1].coin, "dogecoin");
        assert_eq!(joined[1].output, CoinOutput::default());
    }

    #[test]
    fn test_duplicate_coins_keep_duplicate_tasks_last_record_wins() {
        let job_id = Uuid::new_v4();
        let tasks = vec![task("bitcoin", job_id), task("bitcoin", job_id)];
        let records = vec![record("bitcoin", Some(1.0)), record("bitcoin", Some(2.0))];

        let joined = join_tasks(&tasks, records);
        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].output.price, Some(2.0));
        assert_eq!(joined[1].output.price, Some(2.0));
    }

    #[test]
    fn test_empty_tasks_join_to_empty() {
        let joined = join_tasks(&[], vec![record("bitcoin", None)]);
        assert!(joined.is_empty());
    }
}
