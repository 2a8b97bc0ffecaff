use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{Announcement, Feedback};
use crate::error::Result;

pub mod webhook;

/// Domain events fanned out to sinks on mutations. Delivery is best-effort;
/// a sink failure never fails the request that produced the event.
#[derive(Debug, Clone)]
pub enum PortalEvent {
    AnnouncementCreated(Announcement),
    AnnouncementUpdated(Announcement),
    AnnouncementDeleted(Announcement),
    FeedbackCreated(Feedback),
}

impl PortalEvent {
    pub fn topic(&self) -> &'static str {
        match self {
            Self::AnnouncementCreated(_) => "announcement.created",
            Self::AnnouncementUpdated(_) => "announcement.updated",
            Self::AnnouncementDeleted(_) => "announcement.deleted",
            Self::FeedbackCreated(_) => "feedback.created",
        }
    }

    pub fn payload(&self) -> serde_json::Value {
        match self {
            Self::AnnouncementCreated(a)
            | Self::AnnouncementUpdated(a)
            | Self::AnnouncementDeleted(a) => serde_json::json!({
                "id": a.id,
                "title": a.title,
                "publisher": a.publisher,
            }),
            Self::FeedbackCreated(f) => serde_json::json!({
                "id": f.id,
                "summary": f.summary,
                "project_id": f.project_id,
            }),
        }
    }
}

#[async_trait]
pub trait EventSink: Send + Sync {
    fn name(&self) -> &str;
    fn is_enabled(&self) -> bool;
    async fn health_check(&self) -> Result<()>;
    async fn handle_event(&self, event: &PortalEvent) -> Result<()>;
}

pub struct EventBus {
    sinks: RwLock<Vec<Arc<dyn EventSink>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { sinks: RwLock::new(Vec::new()) }
    }

    pub async fn register(&self, sink: Arc<dyn EventSink>) {
        if sink.is_enabled() {
            let mut sinks = self.sinks.write().await;
            tracing::info!("Registered event sink: {}", sink.name());
            sinks.push(sink);
        }
    }

    pub async fn publish(&self, event: PortalEvent) {
        let sinks = self.sinks.read().await;

        for sink in sinks.iter() {
            if !sink.is_enabled() {
                continue;
            }

            match sink.handle_event(&event).await {
                Ok(_) => {
                    tracing::debug!("Sink {} handled {}", sink.name(), event.topic());
                }
                Err(e) => {
                    tracing::error!(
                        "Sink {} failed to handle {}: {:?}",
                        sink.name(),
                        event.topic(),
                        e
                    );
                    // Continue delivering to the remaining sinks.
                }
            }
        }
    }

    pub async fn health_check_all(&self) -> Vec<(String, Result<()>)> {
        let sinks = self.sinks.read().await;
        let mut results = Vec::new();

        for sink in sinks.iter() {
            let name = sink.name().to_string();
            let result = sink.health_check().await;
            results.push((name, result));
        }

        results
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
