//! In-memory [`JobStore`] backed by sharded concurrent maps.
//!
//! The idempotency-key index entry is the serialization point for racing
//! creates: exactly one caller wins the vacant entry, inserts the job while
//! holding it, and every loser reads the winner's record. Status updates
//! mutate under the job entry's shard lock, so same-job updates are
//! serializable while distinct jobs never contend.

use super::{JobStore, StoreError, StoreResult};
use crate::models::{JobId, JobStatusUpdate, TranscriptionJob};
use crate::state_machine::JobStatus;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;

#[derive(Debug)]
pub struct InMemoryJobStore {
    jobs: DashMap<String, TranscriptionJob>,
    key_index: DashMap<String, String>,
    last_write: Mutex<DateTime<Utc>>,
}

impl Default for InMemoryJobStore {
    fn default() -> Self {
        Self {
            jobs: DashMap::new(),
            key_index: DashMap::new(),
            last_write: Mutex::new(DateTime::<Utc>::MIN_UTC),
        }
    }
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored jobs
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Next mutation timestamp, strictly greater than both the job's previous
    /// `updated_at` and any timestamp this store has handed out before. Keeps
    /// the monotonicity invariant even when the wall clock stalls between
    /// mutations.
    fn next_timestamp(&self, previous: DateTime<Utc>) -> DateTime<Utc> {
        let mut last = self.last_write.lock();
        let floor = (*last).max(previous);
        let mut now = Utc::now();
        if now <= floor {
            now = floor + Duration::microseconds(1);
        }
        *last = now;
        now
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn create_job(&self, job: TranscriptionJob) -> StoreResult<TranscriptionJob> {
        if let Some(key) = job.idempotency_key.clone() {
            return match self.key_index.entry(key) {
                Entry::Occupied(existing) => {
                    let winner_id = existing.get().clone();
                    drop(existing);
                    self.jobs
                        .get(&winner_id)
                        .map(|stored| stored.clone())
                        .ok_or_else(|| {
                            StoreError::repository(
                                "create_job",
                                format!("idempotency index references missing job {winner_id}"),
                            )
                        })
                }
                Entry::Vacant(slot) => {
                    // Insert the job before the index entry lock is released,
                    // so losers that saw this key occupied always find it.
                    let guard = slot.insert(job.id.as_str().to_string());
                    self.jobs.insert(job.id.as_str().to_string(), job.clone());
                    drop(guard);
                    Ok(job)
                }
            };
        }

        if self.jobs.contains_key(job.id.as_str()) {
            return Err(StoreError::repository(
                "create_job",
                format!("job id already exists: {}", job.id),
            ));
        }
        self.jobs.insert(job.id.as_str().to_string(), job.clone());
        Ok(job)
    }

    async fn find_job_by_id(&self, id: &JobId) -> StoreResult<Option<TranscriptionJob>> {
        Ok(self.jobs.get(id.as_str()).map(|job| job.clone()))
    }

    async fn find_job_by_idempotency_key(
        &self,
        key: &str,
    ) -> StoreResult<Option<TranscriptionJob>> {
        let Some(job_id) = self.key_index.get(key).map(|id| id.clone()) else {
            return Ok(None);
        };
        Ok(self.jobs.get(&job_id).map(|job| job.clone()))
    }

    async fn update_job_status(
        &self,
        id: &JobId,
        update: JobStatusUpdate,
    ) -> StoreResult<TranscriptionJob> {
        let mut entry = self
            .jobs
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::job_not_found(id))?;

        // Validate before touching anything so a rejected update leaves the
        // job byte-identical.
        if !entry.status.is_valid_transition(update.status) {
            return Err(StoreError::invalid_transition(entry.status, update.status));
        }

        let now = self.next_timestamp(entry.updated_at);
        entry.status = update.status;
        entry.updated_at = now;
        // Auxiliary fields are bound to their statuses: an error message only
        // lands on Failed and a transcript id only on Completed. Anything else
        // is ignored, never persisted onto the wrong state.
        if update.status == JobStatus::Failed {
            if let Some(error) = update.error {
                entry.error = Some(error);
            }
        }
        if update.status == JobStatus::Completed {
            if let Some(transcript_id) = update.transcript_id {
                entry.transcript_id = Some(transcript_id);
            }
        }
        Ok(entry.clone())
    }
}
