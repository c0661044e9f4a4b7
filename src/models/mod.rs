// Data model for the transcription job core

pub mod job;

pub use job::{
    InvalidIdError, JobId, JobStatusUpdate, MediaSource, RequestId, Transcript, TranscriptId,
    TranscriptionJob,
};
