//! # Domain Event Catalog
//!
//! Closed set of facts about transcription jobs, decoded from the transport
//! and consumed by the dispatcher. Only some event kinds imply a status
//! transition; the rest are observational or routing-only and never mutate a
//! job.

use crate::models::{JobId, RequestId, Transcript, TranscriptionJob};
use crate::state_machine::JobStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod dispatcher;
pub mod publisher;

pub use dispatcher::{DispatchError, EventDispatcher};
pub use publisher::{JobEventPublisher, PublishedEvent};

/// Events that drive the transcription job lifecycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A job was created and queued. Informational: the job snapshot is
    /// already persisted by whoever emitted this, so it triggers no mutation.
    JobQueued {
        job: TranscriptionJob,
        occurred_at: DateTime<Utc>,
    },
    /// Instructs a transition of `job_id` to `to`
    JobStatusChanged {
        job_id: JobId,
        request_id: RequestId,
        from: JobStatus,
        to: JobStatus,
        occurred_at: DateTime<Utc>,
    },
    /// Transcription finished; moves the job to `Completed` and records the
    /// transcript id
    TranscriptComplete {
        job_id: JobId,
        request_id: RequestId,
        transcript: Transcript,
        occurred_at: DateTime<Utc>,
    },
    /// Processing failed; moves the job to `Failed` with the error message
    JobFailed {
        job_id: JobId,
        request_id: RequestId,
        error: String,
        attempts: u32,
        occurred_at: DateTime<Utc>,
    },
    /// Routing-only work-item envelope; accepted and ignored
    WorkItemEnqueued {
        job_id: JobId,
        queue: String,
        occurred_at: DateTime<Utc>,
    },
}

impl DomainEvent {
    /// String tag of the event kind for logging and envelope attributes
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::JobQueued { .. } => "job_queued",
            Self::JobStatusChanged { .. } => "job_status_changed",
            Self::TranscriptComplete { .. } => "transcript_complete",
            Self::JobFailed { .. } => "job_failed",
            Self::WorkItemEnqueued { .. } => "work_item_enqueued",
        }
    }

    /// The job this event refers to
    pub fn job_id(&self) -> &JobId {
        match self {
            Self::JobQueued { job, .. } => &job.id,
            Self::JobStatusChanged { job_id, .. }
            | Self::TranscriptComplete { job_id, .. }
            | Self::JobFailed { job_id, .. }
            | Self::WorkItemEnqueued { job_id, .. } => job_id,
        }
    }

    /// When the fact occurred at the producer
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::JobQueued { occurred_at, .. }
            | Self::JobStatusChanged { occurred_at, .. }
            | Self::TranscriptComplete { occurred_at, .. }
            | Self::JobFailed { occurred_at, .. }
            | Self::WorkItemEnqueued { occurred_at, .. } => *occurred_at,
        }
    }

    /// Whether dispatching this event performs a store mutation
    pub fn implies_transition(&self) -> bool {
        matches!(
            self,
            Self::JobStatusChanged { .. } | Self::TranscriptComplete { .. } | Self::JobFailed { .. }
        )
    }
}
