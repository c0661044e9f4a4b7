use crate::error::{Result, TranscriberError};

/// Runtime configuration for the transcription core
#[derive(Debug, Clone)]
pub struct TranscriberConfig {
    /// Deployment environment name, drives log verbosity
    pub environment: String,
    /// Capacity of the observability broadcast channel
    pub event_channel_capacity: usize,
    /// Hours before an idempotency key stops being honoured
    pub idempotency_ttl_hours: u32,
    /// Logical endpoint idempotency keys are scoped to by default
    pub default_endpoint: String,
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            event_channel_capacity: 1000,
            idempotency_ttl_hours: 24,
            default_endpoint: "/jobs".to_string(),
        }
    }
}

impl TranscriberConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(environment) = std::env::var("TRANSCRIBER_ENV") {
            config.environment = environment;
        }

        if let Ok(capacity) = std::env::var("TRANSCRIBER_EVENT_CHANNEL_CAPACITY") {
            config.event_channel_capacity = capacity.parse().map_err(|e| {
                TranscriberError::Configuration(format!("Invalid event_channel_capacity: {e}"))
            })?;
        }

        if let Ok(ttl) = std::env::var("TRANSCRIBER_IDEMPOTENCY_TTL_HOURS") {
            config.idempotency_ttl_hours = ttl.parse().map_err(|e| {
                TranscriberError::Configuration(format!("Invalid idempotency_ttl_hours: {e}"))
            })?;
        }

        if let Ok(endpoint) = std::env::var("TRANSCRIBER_DEFAULT_ENDPOINT") {
            config.default_endpoint = endpoint;
        }

        Ok(config)
    }
}
