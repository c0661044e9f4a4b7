//! # Job Store Contract
//!
//! Persistence seam for transcription jobs. Anything that can provide
//! idempotency-collision detection on create, point lookups, and validated
//! atomic status transitions can sit behind [`JobStore`]; the crate ships an
//! in-memory implementation and treats real backends as external collaborators.

use crate::models::{JobId, JobStatusUpdate, TranscriptionJob};
use crate::state_machine::JobStatus;
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;

pub use memory::InMemoryJobStore;

/// Failure taxonomy for store operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Storage-layer failure (connectivity, constraint violation). Retryable.
    #[error("repository error in {operation}: {message}")]
    Repository { operation: String, message: String },

    /// The referenced job does not exist. Not retryable until it does.
    #[error("job not found: {job_id}")]
    JobNotFound { job_id: String },

    /// The requested status change violates the transition table.
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition { from: JobStatus, to: JobStatus },
}

impl StoreError {
    /// Create a repository error tagged with the failing operation
    pub fn repository(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Repository {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a not-found error for the given job id
    pub fn job_not_found(job_id: &JobId) -> Self {
        Self::JobNotFound {
            job_id: job_id.as_str().to_string(),
        }
    }

    /// Create an invalid-transition error
    pub fn invalid_transition(from: JobStatus, to: JobStatus) -> Self {
        Self::InvalidTransition { from, to }
    }

    /// Whether the caller should retry the operation.
    ///
    /// Repository failures are transient by default; a missing job or an
    /// illegal transition describes a logically impossible request and is
    /// dead-letter material instead.
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Repository { .. })
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence contract for transcription jobs.
///
/// `update_job_status` is the sole mutation path after creation; it validates
/// the transition against the status table before any write, so illegal
/// transitions are unrepresentable in storage regardless of caller.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Persist a new job, idempotently.
    ///
    /// If the job carries an idempotency key that an existing record already
    /// holds, the existing job is returned unchanged and nothing is written.
    /// Concurrent callers racing on one key serialize to a single insert;
    /// every loser observes the winner's stored job.
    async fn create_job(&self, job: TranscriptionJob) -> StoreResult<TranscriptionJob>;

    /// Point lookup by job id; absence is not an error
    async fn find_job_by_id(&self, id: &JobId) -> StoreResult<Option<TranscriptionJob>>;

    /// Point lookup on the idempotency-key index; absence is not an error
    async fn find_job_by_idempotency_key(
        &self,
        key: &str,
    ) -> StoreResult<Option<TranscriptionJob>>;

    /// Transition a job to a new status.
    ///
    /// Fails with [`StoreError::JobNotFound`] for unknown ids and
    /// [`StoreError::InvalidTransition`] for illegal edges. On success the
    /// returned job has the new status and a strictly increased `updated_at`;
    /// `error` is written only on transition into `Failed` and
    /// `transcript_id` only on transition into `Completed`, and only when the
    /// update provides them.
    async fn update_job_status(
        &self,
        id: &JobId,
        update: JobStatusUpdate,
    ) -> StoreResult<TranscriptionJob>;
}
