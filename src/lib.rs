#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Transcription Core
//!
//! Lifecycle engine for transcription jobs: a unit of work created from a
//! media reference (e.g. a YouTube video) and advanced through a small set of
//! named states as asynchronous processing stages complete.
//!
//! ## Guarantees
//!
//! - **Exactly-once creation**: job creation is idempotent under retries and
//!   message redelivery, keyed by a composite idempotency key whose media
//!   hash fingerprints the source resource.
//! - **Legal transitions only**: the status state machine defines the legal
//!   edges; the store validates every status write against it, so illegal
//!   transitions are rejected, never clamped.
//! - **At-most-once effects**: the event dispatcher makes exactly one store
//!   mutation per transition-implying event and zero for the rest.
//!
//! ## Module Organization
//!
//! - [`models`] - The `TranscriptionJob` aggregate and its value types
//! - [`state_machine`] - Job status table: legal edges and terminality
//! - [`idempotency`] - Key generation, serialization, hashing, expiry
//! - [`store`] - The `JobStore` contract and in-memory implementation
//! - [`events`] - Domain event catalog, dispatcher, observability publisher
//! - [`messaging`] - Transport envelope and domain-event codec
//! - [`config`] - Environment-driven configuration
//! - [`error`] - Top-level error taxonomy with retryability classification
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use transcription_core::events::EventDispatcher;
//! use transcription_core::idempotency::IdempotencyKey;
//! use transcription_core::models::{JobId, MediaSource, RequestId, TranscriptionJob};
//! use transcription_core::store::{InMemoryJobStore, JobStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryJobStore::new());
//! let dispatcher = EventDispatcher::new(store.clone());
//!
//! let media = MediaSource::Youtube {
//!     video_id: "dQw4w9WgXcQ".to_string(),
//!     url: None,
//! };
//! let key = IdempotencyKey::generate("/jobs", &media);
//! let job = TranscriptionJob::new(
//!     JobId::new("job_1")?,
//!     RequestId::new("req_1")?,
//!     media,
//!     Some(key.to_string()),
//! );
//!
//! // Retried creations with the same key return the original job.
//! let _created = store.create_job(job).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod idempotency;
pub mod logging;
pub mod messaging;
pub mod models;
pub mod state_machine;
pub mod store;

pub use config::TranscriberConfig;
pub use error::{Result, TranscriberError};
pub use events::{DispatchError, DomainEvent, EventDispatcher, JobEventPublisher};
pub use idempotency::{
    extract_media_url, generate_media_hash, is_idempotency_expired, IdempotencyKey,
};
pub use messaging::{DecodeError, MessageAdapter, TransportMessage};
pub use models::{
    JobId, JobStatusUpdate, MediaSource, RequestId, Transcript, TranscriptId, TranscriptionJob,
};
pub use state_machine::JobStatus;
pub use store::{InMemoryJobStore, JobStore, StoreError};
