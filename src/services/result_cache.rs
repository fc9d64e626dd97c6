//! Job Result Cache
//!
//! In-memory store for estimate job results. Jobs are registered as
//! processing when submitted, flip to a terminal state exactly once when the
//! engine calls back, and are retained for a TTL so pollers can fetch the
//! outcome. A background sweeper drops entries that stayed past their TTL.

use crate::models::{JobResult, JobStatus};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Default retention for job results (30 minutes)
const DEFAULT_RESULT_TTL_SECONDS: u64 = 1800;

struct CacheEntry {
    result: JobResult,
    expires_at: Instant,
}

pub struct ResultCache {
    ttl: Duration,
    entries: RwLock<HashMap<Uuid, CacheEntry>>,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Records a freshly submitted job as processing.
    pub async fn register(&self, job_id: Uuid) {
        let expires_at = Instant::now() + self.ttl;
        let mut entries = self.entries.write().await;
        entries.insert(
            job_id,
            CacheEntry {
                result: JobResult::processing(),
                expires_at,
            },
        );
    }

    /// Stores a terminal result. The first terminal write for a job wins;
    /// returns `false` when the job already holds a live terminal result so
    /// the caller can reject the duplicate.
    pub async fn store(&self, job_id: Uuid, result: JobResult) -> bool {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(&job_id) {
            if entry.expires_at > now && entry.result.status.is_terminal() {
                return false;
            }
        }
        entries.insert(
            job_id,
            CacheEntry {
                result,
                expires_at: now + self.ttl,
            },
        );
        true
    }

    /// What a poller sees for `job_id`. A job this cache has never heard of
    /// reports as processing, since results may simply not have arrived yet.
    /// Entries past their TTL report as expired until the sweeper drops them.
    pub async fn lookup(&self, job_id: &Uuid) -> JobResult {
        let now = Instant::now();
        let entries = self.entries.read().await;
        match entries.get(job_id) {
            Some(entry) if entry.expires_at > now => entry.result.clone(),
            Some(_) => JobResult::expired(),
            None => JobResult::processing(),
        }
    }

    /// Removes entries that have been expired for longer than `linger`.
    /// Keeping them around for one sweep period lets late pollers observe a
    /// definite expired answer instead of an open-ended processing one.
    /// Returns how many entries were dropped.
    pub async fn sweep(&self, linger: Duration) -> usize {
        let deadline = match Instant::now().checked_sub(linger) {
            Some(deadline) => deadline,
            None => return 0,
        };
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > deadline);
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_RESULT_TTL_SECONDS))
    }
}

/// Periodically evicts stale results for the lifetime of the server.
pub fn spawn_sweeper(cache: Arc<ResultCache>, interval: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let removed = cache.sweep(interval).await;
            if removed > 0 {
                tracing::debug!(removed = removed, "Swept expired job results");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(text: &str) -> JobResult {
        JobResult {
            status: JobStatus::Completed,
            response: Some(text.to_string()),
            error: None,
            pdf_url: None,
        }
    }

    #[tokio::test]
    async fn unknown_job_reports_processing() {
        let cache = ResultCache::default();
        let result = cache.lookup(&Uuid::new_v4()).await;
        assert_eq!(result.status, JobStatus::Processing);
    }

    #[tokio::test]
    async fn registered_job_reports_processing_until_result_arrives() {
        let cache = ResultCache::default();
        let job_id = Uuid::new_v4();
        cache.register(job_id).await;
        assert_eq!(cache.lookup(&job_id).await.status, JobStatus::Processing);

        assert!(cache.store(job_id, completed("done")).await);
        let result = cache.lookup(&job_id).await;
        assert_eq!(result.status, JobStatus::Completed);
        assert_eq!(result.response.as_deref(), Some("done"));
    }

    #[tokio::test]
    async fn second_terminal_write_is_rejected() {
        let cache = ResultCache::default();
        let job_id = Uuid::new_v4();
        cache.register(job_id).await;

        assert!(cache.store(job_id, completed("first")).await);
        let error = JobResult {
            status: JobStatus::Error,
            response: None,
            error: Some("late failure".to_string()),
            pdf_url: None,
        };
        assert!(!cache.store(job_id, error).await);

        // the original result is untouched
        let result = cache.lookup(&job_id).await;
        assert_eq!(result.status, JobStatus::Completed);
        assert_eq!(result.response.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn results_survive_repeated_lookups() {
        let cache = ResultCache::default();
        let job_id = Uuid::new_v4();
        cache.store(job_id, completed("kept")).await;
        for _ in 0..3 {
            assert_eq!(cache.lookup(&job_id).await.status, JobStatus::Completed);
        }
    }

    #[tokio::test]
    async fn stale_entry_reports_expired_then_gets_swept() {
        let cache = ResultCache::new(Duration::from_millis(10));
        let job_id = Uuid::new_v4();
        cache.store(job_id, completed("short-lived")).await;

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cache.lookup(&job_id).await.status, JobStatus::Expired);

        // expired long enough ago to be collected
        let removed = cache.sweep(Duration::from_millis(5)).await;
        assert_eq!(removed, 1);
        assert_eq!(cache.len().await, 0);

        // once swept, the job is indistinguishable from an unknown one
        assert_eq!(cache.lookup(&job_id).await.status, JobStatus::Processing);
    }

    #[tokio::test]
    async fn sweep_keeps_recently_expired_entries() {
        let cache = ResultCache::new(Duration::from_millis(10));
        let job_id = Uuid::new_v4();
        cache.store(job_id, completed("lingering")).await;

        tokio::time::sleep(Duration::from_millis(20)).await;
        let removed = cache.sweep(Duration::from_secs(60)).await;
        assert_eq!(removed, 0);
        assert_eq!(cache.lookup(&job_id).await.status, JobStatus::Expired);
    }

    #[tokio::test]
    async fn terminal_write_after_expiry_is_accepted() {
        let cache = ResultCache::new(Duration::from_millis(10));
        let job_id = Uuid::new_v4();
        cache.register(job_id).await;
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert!(cache.store(job_id, completed("late but first")).await);
        assert_eq!(cache.lookup(&job_id).await.status, JobStatus::Completed);
    }
}
