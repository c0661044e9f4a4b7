//! # Idempotency Key Scheme
//!
//! Duplicate-create suppression for job creation under retries and message
//! redelivery. A key is the composite `{request_key, endpoint, media_hash}`:
//! the media hash is a deterministic fingerprint of the source resource, the
//! endpoint scopes the key to one logical operation, and the request key is a
//! fresh random token per call. The store deduplicates on the serialized key;
//! the media hash is what makes two retries of the same logical request
//! collide.

use crate::models::MediaSource;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;
use uuid::Uuid;

/// Keys older than this are no longer honoured for collision lookup
const IDEMPOTENCY_TTL_HOURS: i64 = 24;

/// Raised when a serialized idempotency key cannot be parsed back
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("expected 3 colon-delimited parts, found {found}")]
    WrongPartCount { found: usize },
    #[error("empty {part} component")]
    EmptyComponent { part: &'static str },
}

/// Composite idempotency key for a job-creation request.
///
/// Equality, hashing and serialization cover the identity triple only;
/// `issued_at` is bookkeeping for expiry and is assigned at generation (or
/// re-assigned at parse time, since the wire form does not carry it).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdempotencyKey {
    /// Fresh random token, unique per call
    pub request_key: String,
    /// Logical route/operation the key is scoped to, e.g. `/jobs`
    pub endpoint: String,
    /// Deterministic fingerprint of the media resource
    pub media_hash: String,
    /// Issuance timestamp, RFC 3339 at the storage boundary
    pub issued_at: DateTime<Utc>,
}

impl PartialEq for IdempotencyKey {
    fn eq(&self, other: &Self) -> bool {
        self.request_key == other.request_key
            && self.endpoint == other.endpoint
            && self.media_hash == other.media_hash
    }
}

impl Eq for IdempotencyKey {}

impl IdempotencyKey {
    /// Generate a key for `media` scoped to `endpoint`.
    ///
    /// Two calls with the same arguments produce different `request_key`
    /// tokens but identical `endpoint` and `media_hash`.
    pub fn generate(endpoint: impl Into<String>, media: &MediaSource) -> Self {
        Self {
            request_key: Uuid::new_v4().simple().to_string(),
            endpoint: endpoint.into(),
            media_hash: generate_media_hash(media),
            issued_at: Utc::now(),
        }
    }

    /// Deterministic storage lookup hash over the composite key.
    ///
    /// Same key value hashes identically across calls and restarts; keys
    /// differing only in `endpoint` hash differently. Async to match the
    /// store's suspension points, the computation itself never blocks.
    pub async fn hash(&self) -> String {
        let mut hasher = DefaultHasher::new();
        self.request_key.hash(&mut hasher);
        self.endpoint.hash(&mut hasher);
        self.media_hash.hash(&mut hasher);
        format!("{:x}", hasher.finish())
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.request_key, self.endpoint, self.media_hash
        )
    }
}

impl std::str::FromStr for IdempotencyKey {
    type Err = KeyParseError;

    /// Parse the wire form back into a key.
    ///
    /// The outer components are colon-free by construction (`request_key` is a
    /// UUID simple token, `media_hash` is hex), so they are taken from the
    /// outermost delimiters and any embedded colons belong to the endpoint.
    /// Every generated key therefore round-trips, whatever its endpoint.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (request_key, rest) = s
            .split_once(':')
            .ok_or(KeyParseError::WrongPartCount { found: 1 })?;
        let (endpoint, media_hash) = rest
            .rsplit_once(':')
            .ok_or(KeyParseError::WrongPartCount { found: 2 })?;

        for (part, name) in [
            (request_key, "request_key"),
            (endpoint, "endpoint"),
            (media_hash, "media_hash"),
        ] {
            if part.is_empty() {
                return Err(KeyParseError::EmptyComponent { part: name });
            }
        }
        Ok(Self {
            request_key: request_key.to_string(),
            endpoint: endpoint.to_string(),
            media_hash: media_hash.to_string(),
            issued_at: Utc::now(),
        })
    }
}

/// Deterministic fingerprint of a media resource's identifying fields.
///
/// Same logical media always yields the same hash, independent of call count
/// or process restart; distinct resources diverge with overwhelming
/// probability. Output is lowercase hex, at most 16 characters.
pub fn generate_media_hash(media: &MediaSource) -> String {
    let mut hasher = DefaultHasher::new();
    match media {
        MediaSource::Youtube { video_id, .. } => {
            "youtube".hash(&mut hasher);
            video_id.hash(&mut hasher);
        }
        MediaSource::Other(value) => {
            "other".hash(&mut hasher);
            value.to_string().hash(&mut hasher);
        }
    }
    format!("{:x}", hasher.finish())
}

/// Check whether a key issued at `issued_at_iso` (RFC 3339) has expired.
///
/// Strictly older than 24 hours is expired; exactly 24 hours is not.
/// Unparseable timestamps are treated as expired (fail-closed): a key whose
/// age cannot be established must never suppress new work indefinitely.
pub fn is_idempotency_expired(issued_at_iso: &str) -> bool {
    match DateTime::parse_from_rfc3339(issued_at_iso) {
        Ok(issued_at) => is_expired_at(issued_at.with_timezone(&Utc), Utc::now()),
        Err(_) => true,
    }
}

fn is_expired_at(issued_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - issued_at > Duration::hours(IDEMPOTENCY_TTL_HOURS)
}

/// Canonical URL for a media resource; falls back to a JSON rendering for
/// providers this core does not model. Never fails.
pub fn extract_media_url(media: &MediaSource) -> String {
    match media {
        MediaSource::Youtube {
            url: Some(url), ..
        } => url.clone(),
        MediaSource::Youtube { video_id, .. } => {
            format!("https://www.youtube.com/watch?v={video_id}")
        }
        MediaSource::Other(value) => value.to_string(),
    }
}
