pub mod announcement_service;
pub mod feedback_service;
pub mod taxonomy_service;

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::PermissionService;
use crate::clients::JiraClient;
use crate::config::TaxonomyConfig;
use crate::integrations::EventBus;
use crate::repository::*;

pub use announcement_service::AnnouncementService;
pub use feedback_service::FeedbackService;
pub use taxonomy_service::TaxonomyService;

pub struct ServiceContext {
    pub announcements: Arc<AnnouncementService>,
    pub taxonomy: Arc<TaxonomyService>,
    pub feedback: Arc<FeedbackService>,
    pub permissions: Arc<dyn PermissionService>,
    pub event_bus: Arc<EventBus>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        announcement_repo: Arc<dyn AnnouncementRepository>,
        category_repo: Arc<dyn CategoryRepository>,
        tag_repo: Arc<dyn TagRepository>,
        feedback_repo: Arc<dyn FeedbackRepository>,
        permissions: Arc<dyn PermissionService>,
        event_bus: Arc<EventBus>,
        jira: Option<Arc<JiraClient>>,
        taxonomy_config: TaxonomyConfig,
        db_pool: SqlitePool,
    ) -> Self {
        let announcements = Arc::new(AnnouncementService::new(
            announcement_repo,
            category_repo.clone(),
            tag_repo.clone(),
            event_bus.clone(),
        ));
        let taxonomy = Arc::new(TaxonomyService::new(category_repo, tag_repo, taxonomy_config));
        let feedback = Arc::new(FeedbackService::new(feedback_repo, jira, event_bus.clone()));

        Self {
            announcements,
            taxonomy,
            feedback,
            permissions,
            event_bus,
            db_pool,
        }
    }
}
