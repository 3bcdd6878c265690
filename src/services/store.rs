use redis::AsyncCommands;
use uuid::Uuid;

use crate::models::coin::OutputRecord;
use crate::models::job::TaskEntry;

/// Retention window for all job-scoped keys, renewed on every write.
pub const JOB_TTL_SECS: i64 = 3600;

/// Narrow Redis wrapper holding all job state.
///
/// Key layout, namespaced by job id `J`:
/// - `J`        — list of serialized [`OutputRecord`]s, in scrape order
/// - `J_tasks`  — list of serialized [`TaskEntry`]s, in submission order
/// - `J_status` — flag set to `"completed"` once the job's scrape loop finishes
///
/// Jobs never share keys, so no locking is needed around any of these writes.
pub struct JobStore {
    client: redis::Client,
}

impl JobStore {
    pub fn new(redis_url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url).map_err(StoreError::Redis)?;
        Ok(Self { client })
    }

    async fn conn(&self) -> Result<redis::aio::MultiplexedConnection, StoreError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(StoreError::Redis)
    }

    fn tasks_key(job_id: Uuid) -> String {
        format!("{job_id}_tasks")
    }

    fn status_key(job_id: Uuid) -> String {
        format!("{job_id}_status")
    }

    /// Append a scraped record to the job's record list and renew its expiry.
    pub async fn push_record(&self, job_id: Uuid, record: &OutputRecord) -> Result<(), StoreError> {
        let mut conn = self.conn().await?;
        let key = job_id.to_string();
        let payload = serde_json::to_string(record).map_err(StoreError::Serialize)?;
        conn.rpush::<_, _, ()>(&key, &payload)
            .await
            .map_err(StoreError::Redis)?;
        conn.expire::<_, ()>(&key, JOB_TTL_SECS)
            .await
            .map_err(StoreError::Redis)?;
        Ok(())
    }

    /// Append the job's task entries and renew the task list's expiry.
    pub async fn push_tasks(&self, job_id: Uuid, tasks: &[TaskEntry]) -> Result<(), StoreError> {
        let mut conn = self.conn().await?;
        let key = Self::tasks_key(job_id);
        for task in tasks {
            let payload = serde_json::to_string(task).map_err(StoreError::Serialize)?;
            conn.rpush::<_, _, ()>(&key, &payload)
                .await
                .map_err(StoreError::Redis)?;
        }
        conn.expire::<_, ()>(&key, JOB_TTL_SECS)
            .await
            .map_err(StoreError::Redis)?;
        Ok(())
    }

    /// Mark the job's scrape loop as finished.
    pub async fn set_completed(&self, job_id: Uuid) -> Result<(), StoreError> {
        let mut conn = self.conn().await?;
        let key = Self::status_key(job_id);
        conn.set::<_, _, ()>(&key, "completed")
            .await
            .map_err(StoreError::Redis)?;
        conn.expire::<_, ()>(&key, JOB_TTL_SECS)
            .await
            .map_err(StoreError::Redis)?;
        Ok(())
    }

    /// Read the job's status flag. `None` means unknown or already expired.
    pub async fn status(&self, job_id: Uuid) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn().await?;
        conn.get(Self::status_key(job_id))
            .await
            .map_err(StoreError::Redis)
    }

    /// Read back all task entries, in submission order.
    pub async fn tasks(&self, job_id: Uuid) -> Result<Vec<TaskEntry>, StoreError> {
        let mut conn = self.conn().await?;
        let raw: Vec<String> = conn
            .lrange(Self::tasks_key(job_id), 0, -1)
            .await
            .map_err(StoreError::Redis)?;
        raw.iter()
            .map(|entry| serde_json::from_str(entry).map_err(StoreError::Serialize))
            .collect()
    }

    /// Read back all scraped records, in append order.
    pub async fn records(&self, job_id: Uuid) -> Result<Vec<OutputRecord>, StoreError> {
        let mut conn = self.conn().await?;
        let raw: Vec<String> = conn
            .lrange(job_id.to_string(), 0, -1)
            .await
            .map_err(StoreError::Redis)?;
        raw.iter()
            .map(|entry| serde_json::from_str(entry).map_err(StoreError::Serialize))
            .collect()
    }

    /// Check Redis connectivity (for health checks).
    pub async fn health_check(&self) -> Result<(), StoreError> {
        let mut conn = self.conn().await?;
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(StoreError::Redis)?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
