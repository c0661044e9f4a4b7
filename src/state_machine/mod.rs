// State machine module for the transcription job lifecycle
//
// The status table is pure: it defines the legal edges between job statuses
// and terminality, and is consulted by the store before any status write.

pub mod states;

pub use states::JobStatus;
