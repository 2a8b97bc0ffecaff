use std::sync::Arc;

use uuid::Uuid;

use crate::{
    clients::JiraClient,
    domain::{Feedback, FeedbackFilters, FeedbackPage, FeedbackType},
    error::Result,
    integrations::{EventBus, PortalEvent},
    repository::FeedbackRepository,
};

pub struct FeedbackService {
    feedback: Arc<dyn FeedbackRepository>,
    jira: Option<Arc<JiraClient>>,
    event_bus: Arc<EventBus>,
}

impl FeedbackService {
    pub fn new(
        feedback: Arc<dyn FeedbackRepository>,
        jira: Option<Arc<JiraClient>>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self { feedback, jira, event_bus }
    }

    /// Create a feedback record. Bug reports open a ticket first when the
    /// ticketing integration is configured; a ticketing failure fails the
    /// request rather than persisting a report with no ticket.
    pub async fn create(&self, mut feedback: Feedback) -> Result<Feedback> {
        if feedback.feedback_type == FeedbackType::Bug {
            if let Some(jira) = &self.jira {
                let url = jira.create_issue(&feedback.summary, &feedback.description).await?;
                feedback.ticket_url = Some(url);
            }
        }

        let created = self.feedback.create(feedback).await?;
        self.event_bus.publish(PortalEvent::FeedbackCreated(created.clone())).await;
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Feedback>> {
        self.feedback.find_by_id(id).await
    }

    pub async fn list(&self, filters: &FeedbackFilters) -> Result<FeedbackPage> {
        self.feedback.list(filters).await
    }
}
