use crate::models::TranscriptionJob;
use serde_json::Value;
use tokio::sync::broadcast;

/// Broadcast publisher for observability events around the job lifecycle.
///
/// Subscribers are optional; publishing with nobody listening succeeds so the
/// dispatcher never depends on an observer being attached.
#[derive(Debug, Clone)]
pub struct JobEventPublisher {
    sender: broadcast::Sender<PublishedEvent>,
}

/// Event that has been published
#[derive(Debug, Clone)]
pub struct PublishedEvent {
    pub name: String,
    pub context: Value,
    pub published_at: chrono::DateTime<chrono::Utc>,
}

impl JobEventPublisher {
    /// Create a new publisher with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event with the given name and context
    pub fn publish(&self, event_name: impl Into<String>, context: Value) {
        let event = PublishedEvent {
            name: event_name.into(),
            context,
            published_at: chrono::Utc::now(),
        };

        // send() errors only when there are no subscribers, which is fine
        let _ = self.sender.send(event);
    }

    /// Publish a lifecycle observation for a job snapshot
    pub fn publish_job(&self, event_name: impl Into<String>, job: &TranscriptionJob) {
        self.publish(
            event_name,
            serde_json::json!({
                "job_id": job.id.as_str(),
                "request_id": job.request_id.as_str(),
                "status": job.status.to_string(),
                "media": job.media.kind(),
                "attempts": job.attempts,
            }),
        );
    }

    /// Subscribe to published events
    pub fn subscribe(&self) -> broadcast::Receiver<PublishedEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for JobEventPublisher {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobId, MediaSource, RequestId};

    #[test]
    fn test_publish_without_subscribers_is_ok() {
        let publisher = JobEventPublisher::new(8);
        publisher.publish("job.queued", serde_json::json!({"job_id": "job_1"}));
        assert_eq!(publisher.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_subscriber_receives_job_observation() {
        let publisher = JobEventPublisher::new(8);
        let mut rx = publisher.subscribe();

        let job = TranscriptionJob::new(
            JobId::new("job_1").unwrap(),
            RequestId::new("req_1").unwrap(),
            MediaSource::Youtube {
                video_id: "abc".to_string(),
                url: None,
            },
            None,
        );
        publisher.publish_job("job.queued", &job);

        let received = rx.recv().await.unwrap();
        assert_eq!(received.name, "job.queued");
        assert_eq!(received.context["job_id"], "job_1");
        assert_eq!(received.context["status"], "queued");
    }
}
