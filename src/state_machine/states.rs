use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle states for a transcription job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Initial state when the job is created
    Queued,
    /// Source metadata has been fetched and validated
    MetadataReady,
    /// Transcription is currently running
    Processing,
    /// Job completed successfully with a transcript
    Completed,
    /// Job failed with an error
    Failed,
    /// Job was cancelled
    Cancelled,
}

impl JobStatus {
    /// All statuses a job may legally move to from this one.
    ///
    /// The table is the single source of truth for transition legality;
    /// the store consults it before every status write.
    pub fn allowed_next(&self) -> &'static [JobStatus] {
        match self {
            Self::Queued => &[Self::MetadataReady, Self::Failed, Self::Cancelled],
            Self::MetadataReady => &[Self::Processing, Self::Failed, Self::Cancelled],
            Self::Processing => &[Self::Completed, Self::Failed, Self::Cancelled],
            Self::Completed | Self::Failed | Self::Cancelled => &[],
        }
    }

    /// Check if a transition from this status to `to` is legal
    pub fn is_valid_transition(&self, to: JobStatus) -> bool {
        self.allowed_next().contains(&to)
    }

    /// Check if this is a terminal status (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        self.allowed_next().is_empty()
    }

    /// Check if this is an active status (job is being worked on)
    pub fn is_active(&self) -> bool {
        matches!(self, Self::MetadataReady | Self::Processing)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::MetadataReady => write!(f, "metadata_ready"),
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(Self::Queued),
            "metadata_ready" => Ok(Self::MetadataReady),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Invalid job status: {s}")),
        }
    }
}

/// Default status for new jobs
impl Default for JobStatus {
    fn default() -> Self {
        Self::Queued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [JobStatus; 6] = [
        JobStatus::Queued,
        JobStatus::MetadataReady,
        JobStatus::Processing,
        JobStatus::Completed,
        JobStatus::Failed,
        JobStatus::Cancelled,
    ];

    #[test]
    fn test_terminal_statuses() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::MetadataReady.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
    }

    #[test]
    fn test_happy_path_transitions() {
        assert!(JobStatus::Queued.is_valid_transition(JobStatus::MetadataReady));
        assert!(JobStatus::MetadataReady.is_valid_transition(JobStatus::Processing));
        assert!(JobStatus::Processing.is_valid_transition(JobStatus::Completed));
    }

    #[test]
    fn test_failure_and_cancellation_reachable_from_every_non_terminal() {
        for status in [
            JobStatus::Queued,
            JobStatus::MetadataReady,
            JobStatus::Processing,
        ] {
            assert!(status.is_valid_transition(JobStatus::Failed));
            assert!(status.is_valid_transition(JobStatus::Cancelled));
        }
    }

    #[test]
    fn test_skipping_stages_is_illegal() {
        assert!(!JobStatus::Queued.is_valid_transition(JobStatus::Processing));
        assert!(!JobStatus::Queued.is_valid_transition(JobStatus::Completed));
        assert!(!JobStatus::MetadataReady.is_valid_transition(JobStatus::Completed));
    }

    #[test]
    fn test_no_transition_out_of_terminal() {
        for from in [JobStatus::Completed, JobStatus::Failed, JobStatus::Cancelled] {
            for to in ALL {
                assert!(!from.is_valid_transition(to));
            }
        }
    }

    #[test]
    fn test_no_self_transitions() {
        for status in ALL {
            assert!(!status.is_valid_transition(status));
        }
    }

    #[test]
    fn test_status_string_conversion() {
        assert_eq!(JobStatus::MetadataReady.to_string(), "metadata_ready");
        assert_eq!(
            "processing".parse::<JobStatus>().unwrap(),
            JobStatus::Processing
        );
        assert!("unknown".parse::<JobStatus>().is_err());
    }

    #[test]
    fn test_status_serde() {
        let status = JobStatus::MetadataReady;
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, "\"metadata_ready\"");

        let parsed: JobStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, status);
    }
}
