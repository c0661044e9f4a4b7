//! # Transcription Job Model
//!
//! The `TranscriptionJob` aggregate and its supporting value types. Jobs are
//! created once (idempotently, keyed by an idempotency key when present) and
//! mutated only through the store's status-update path until they reach a
//! terminal status. Identifier kinds are distinct newtypes so a job id can
//! never be passed where a request or transcript id is expected.

use crate::state_machine::JobStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Raised when an identifier fails construction-time validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} identifier must be a non-empty string")]
pub struct InvalidIdError {
    kind: &'static str,
}

macro_rules! branded_id {
    ($(#[$doc:meta])* $name:ident, $kind:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Validate and wrap a raw identifier string
            pub fn new(raw: impl Into<String>) -> Result<Self, InvalidIdError> {
                let raw = raw.into();
                if raw.trim().is_empty() {
                    return Err(InvalidIdError { kind: $kind });
                }
                Ok(Self(raw))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }
    };
}

branded_id!(
    /// Opaque unique job identifier, assigned at creation
    JobId,
    "job"
);
branded_id!(
    /// Identifier of the originating request
    RequestId,
    "request"
);
branded_id!(
    /// Identifier of a finished transcript
    TranscriptId,
    "transcript"
);

/// Source media a job transcribes, tagged by provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum MediaSource {
    /// A YouTube video, identified by its video id
    Youtube {
        video_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    /// Any provider this core does not model; kept verbatim for forwarding
    Other(serde_json::Value),
}

impl MediaSource {
    /// Provider tag for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Youtube { .. } => "youtube",
            Self::Other(_) => "other",
        }
    }
}

/// Transcript payload carried by completion events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub id: TranscriptId,
}

/// Explicit options for a status update.
///
/// `error` and `transcript_id` are only written when provided, so "field not
/// passed" is distinguishable from "field cleared" at the call site.
#[derive(Debug, Clone, PartialEq)]
pub struct JobStatusUpdate {
    pub status: JobStatus,
    pub error: Option<String>,
    pub transcript_id: Option<TranscriptId>,
}

impl JobStatusUpdate {
    /// Plain transition to `status` with no auxiliary fields
    pub fn to(status: JobStatus) -> Self {
        Self {
            status,
            error: None,
            transcript_id: None,
        }
    }

    /// Transition to `Completed`, recording the transcript id
    pub fn completed(transcript_id: TranscriptId) -> Self {
        Self {
            status: JobStatus::Completed,
            error: None,
            transcript_id: Some(transcript_id),
        }
    }

    /// Transition to `Failed`, recording the error message
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Failed,
            error: Some(error.into()),
            transcript_id: None,
        }
    }
}

/// The transcription job aggregate.
///
/// Everything except `status`, `updated_at`, `error` and `transcript_id` is
/// immutable after creation. `updated_at` strictly increases on every
/// successful mutation; `idempotency_key`, when present, is the collision
/// lookup key for duplicate-create suppression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionJob {
    pub id: JobId,
    pub request_id: RequestId,
    pub media: MediaSource,
    pub status: JobStatus,
    pub attempts: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript_id: Option<TranscriptId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
}

impl TranscriptionJob {
    /// Build a freshly queued job
    pub fn new(
        id: JobId,
        request_id: RequestId,
        media: MediaSource,
        idempotency_key: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            request_id,
            media,
            status: JobStatus::default(),
            attempts: 0,
            created_at: now,
            updated_at: now,
            transcript_id: None,
            error: None,
            idempotency_key,
        }
    }

    /// Check if the job can still move to another status
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
