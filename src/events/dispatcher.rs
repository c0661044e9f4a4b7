//! # Event Dispatcher
//!
//! Maps decoded domain events onto job-store mutations with deterministic,
//! at-most-once effects: an event that implies a transition makes exactly one
//! store call, every other event makes none. Failures are returned typed to
//! the caller; retry policy belongs to the transport.

use super::publisher::JobEventPublisher;
use super::DomainEvent;
use crate::messaging::DecodeError;
use crate::models::{JobStatusUpdate, TranscriptionJob};
use crate::store::{JobStore, StoreError};
use std::sync::Arc;
use thiserror::Error;

/// Failures surfaced by event dispatch
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Decode failures from the message adapter, passed through unchanged
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl DispatchError {
    /// Whether the transport should nack-and-retry (true) or dead-letter
    /// (false) the originating message
    pub fn retryable(&self) -> bool {
        match self {
            Self::Store(err) => err.retryable(),
            Self::Decode(_) => false,
        }
    }
}

/// Dispatches domain events against a job store
pub struct EventDispatcher<S: JobStore> {
    store: Arc<S>,
    publisher: JobEventPublisher,
}

impl<S: JobStore> EventDispatcher<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            publisher: JobEventPublisher::default(),
        }
    }

    /// Attach a shared publisher so observers see lifecycle events
    pub fn with_publisher(store: Arc<S>, publisher: JobEventPublisher) -> Self {
        Self { store, publisher }
    }

    pub fn publisher(&self) -> &JobEventPublisher {
        &self.publisher
    }

    /// Process one decoded domain event.
    ///
    /// Returns the updated job for transition-implying events, `None` for the
    /// explicitly no-op kinds. Store failures propagate typed and unswallowed.
    pub async fn process_event(
        &self,
        event: DomainEvent,
    ) -> Result<Option<TranscriptionJob>, DispatchError> {
        let event_type = event.event_type();
        let job_id = event.job_id().clone();
        tracing::debug!(event_type, job_id = %job_id, "dispatching domain event");

        let update = match event {
            DomainEvent::JobQueued { job, .. } => {
                // Creation already happened upstream; observe and move on.
                self.publisher.publish_job("job.queued", &job);
                return Ok(None);
            }
            DomainEvent::WorkItemEnqueued { queue, .. } => {
                tracing::debug!(event_type, job_id = %job_id, queue, "routing-only event ignored");
                return Ok(None);
            }
            DomainEvent::JobStatusChanged { to, .. } => JobStatusUpdate::to(to),
            DomainEvent::TranscriptComplete { transcript, .. } => {
                JobStatusUpdate::completed(transcript.id)
            }
            DomainEvent::JobFailed { error, .. } => JobStatusUpdate::failed(error),
        };

        let target = update.status;
        let job = self.store.update_job_status(&job_id, update).await?;
        tracing::info!(
            event_type,
            job_id = %job_id,
            status = %target,
            "job transitioned"
        );
        self.publisher.publish_job("job.status_changed", &job);
        Ok(Some(job))
    }
}
