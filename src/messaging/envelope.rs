//! # Transport Envelope & Message Adapter
//!
//! Opaque message envelope delivered by the pub/sub transport, and the codec
//! between envelopes and [`DomainEvent`]s. Decode failures are a typed error
//! distinct from store errors so the transport can dead-letter undecodable
//! messages instead of retrying them.

use crate::events::DomainEvent;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// Content type attribute stamped on every encoded envelope
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Failures at the envelope/event boundary
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("message payload is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),

    #[error("message deserialization error: {0}")]
    Deserialization(String),

    #[error("message serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() || err.is_eof() {
            Self::Deserialization(err.to_string())
        } else {
            Self::Serialization(err.to_string())
        }
    }
}

/// Opaque transport message: an id, a byte payload, and producer-set string
/// attributes (event type, job id, content type, timestamp)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportMessage {
    pub id: String,
    pub payload: Vec<u8>,
    pub attributes: HashMap<String, String>,
}

/// Codec between transport envelopes and domain events.
///
/// Decode is deterministic: the same payload always yields the same event.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageAdapter;

impl MessageAdapter {
    /// Decode an envelope payload into a domain event
    pub fn decode_domain_event(&self, message: &TransportMessage) -> Result<DomainEvent, DecodeError> {
        let payload = std::str::from_utf8(&message.payload)?;
        Ok(serde_json::from_str(payload)?)
    }

    /// Encode a domain event into an envelope with routing attributes
    pub fn encode_domain_event(&self, event: &DomainEvent) -> Result<TransportMessage, DecodeError> {
        let payload = serde_json::to_vec(event)?;
        let mut attributes = HashMap::new();
        attributes.insert("event_type".to_string(), event.event_type().to_string());
        attributes.insert("job_id".to_string(), event.job_id().as_str().to_string());
        attributes.insert("content_type".to_string(), CONTENT_TYPE_JSON.to_string());
        attributes.insert(
            "occurred_at".to_string(),
            event.occurred_at().to_rfc3339(),
        );
        Ok(TransportMessage {
            id: Uuid::new_v4().to_string(),
            payload,
            attributes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobId, RequestId};
    use crate::state_machine::JobStatus;
    use chrono::Utc;

    fn status_changed() -> DomainEvent {
        DomainEvent::JobStatusChanged {
            job_id: JobId::new("job_1").unwrap(),
            request_id: RequestId::new("req_1").unwrap(),
            from: JobStatus::Queued,
            to: JobStatus::MetadataReady,
            occurred_at: Utc::now(),
        }
    }

    #[test]
    fn test_encode_sets_routing_attributes() {
        let adapter = MessageAdapter;
        let message = adapter.encode_domain_event(&status_changed()).unwrap();

        assert_eq!(
            message.attributes.get("event_type").map(String::as_str),
            Some("job_status_changed")
        );
        assert_eq!(
            message.attributes.get("job_id").map(String::as_str),
            Some("job_1")
        );
        assert_eq!(
            message.attributes.get("content_type").map(String::as_str),
            Some(CONTENT_TYPE_JSON)
        );
        assert!(message.attributes.contains_key("occurred_at"));
        assert!(!message.id.is_empty());
    }

    #[test]
    fn test_decode_is_deterministic() {
        let adapter = MessageAdapter;
        let event = status_changed();
        let message = adapter.encode_domain_event(&event).unwrap();

        let first = adapter.decode_domain_event(&message).unwrap();
        let second = adapter.decode_domain_event(&message).unwrap();
        assert_eq!(first, event);
        assert_eq!(first, second);
    }

    #[test]
    fn test_undecodable_payload_is_typed_error() {
        let adapter = MessageAdapter;
        let message = TransportMessage {
            id: "msg_1".to_string(),
            payload: b"{not json".to_vec(),
            attributes: HashMap::new(),
        };
        assert!(matches!(
            adapter.decode_domain_event(&message),
            Err(DecodeError::Deserialization(_))
        ));

        let message = TransportMessage {
            id: "msg_2".to_string(),
            payload: vec![0xff, 0xfe],
            attributes: HashMap::new(),
        };
        assert!(matches!(
            adapter.decode_domain_event(&message),
            Err(DecodeError::InvalidEncoding(_))
        ));
    }
}
