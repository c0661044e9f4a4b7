use crate::events::DispatchError;
use crate::messaging::DecodeError;
use crate::models::InvalidIdError;
use crate::store::StoreError;
use thiserror::Error;

/// Top-level error for the transcription core, funnelling subsystem errors
/// into one type for callers that sit above the store and dispatcher.
#[derive(Error, Debug)]
pub enum TranscriberError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    InvalidId(#[from] InvalidIdError),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl TranscriberError {
    /// Ack policy hint for the transport: retryable errors should be nacked
    /// and redelivered, the rest dead-lettered.
    pub fn retryable(&self) -> bool {
        match self {
            Self::Store(err) => err.retryable(),
            Self::Dispatch(err) => err.retryable(),
            Self::Decode(_) | Self::InvalidId(_) | Self::Configuration(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, TranscriberError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_follows_subsystem_classification() {
        let err: TranscriberError = StoreError::repository("create_job", "connection reset").into();
        assert!(err.retryable());

        let err = TranscriberError::Configuration("bad capacity".to_string());
        assert!(!err.retryable());
    }
}
