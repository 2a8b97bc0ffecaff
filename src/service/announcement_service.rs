use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    domain::{slugify, Announcement, AnnouncementFilters, AnnouncementPage, Tag},
    error::{AppError, Result},
    integrations::{EventBus, PortalEvent},
    repository::{AnnouncementRepository, CategoryRepository, TagRepository},
};

pub struct AnnouncementService {
    announcements: Arc<dyn AnnouncementRepository>,
    categories: Arc<dyn CategoryRepository>,
    tags: Arc<dyn TagRepository>,
    event_bus: Arc<EventBus>,
}

impl AnnouncementService {
    pub fn new(
        announcements: Arc<dyn AnnouncementRepository>,
        categories: Arc<dyn CategoryRepository>,
        tags: Arc<dyn TagRepository>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self { announcements, categories, tags, event_bus }
    }

    pub async fn list(&self, filters: &AnnouncementFilters) -> Result<AnnouncementPage> {
        self.announcements.list(filters).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Announcement>> {
        self.announcements.find_by_id(id).await
    }

    pub async fn create(&self, mut announcement: Announcement) -> Result<Announcement> {
        self.check_category(&announcement).await?;
        announcement.tags = self.normalize_and_ensure_tags(&announcement.tags).await?;

        let created = self.announcements.create(announcement).await?;
        self.event_bus.publish(PortalEvent::AnnouncementCreated(created.clone())).await;
        Ok(created)
    }

    /// Full replace of the editable fields.
    pub async fn update(&self, id: Uuid, mut announcement: Announcement) -> Result<Announcement> {
        self.announcements
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))?;

        self.check_category(&announcement).await?;
        announcement.tags = self.normalize_and_ensure_tags(&announcement.tags).await?;

        let updated = self.announcements.update(id, announcement).await?;
        self.event_bus.publish(PortalEvent::AnnouncementUpdated(updated.clone())).await;
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let announcement = self
            .announcements
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))?;

        self.announcements.delete(id).await?;
        self.event_bus.publish(PortalEvent::AnnouncementDeleted(announcement)).await;
        Ok(())
    }

    async fn check_category(&self, announcement: &Announcement) -> Result<()> {
        if let Some(category) = &announcement.category {
            self.categories
                .find_by_slug(category)
                .await?
                .ok_or_else(|| AppError::BadRequest(format!("Unknown category: {}", category)))?;
        }
        Ok(())
    }

    /// Slugify the incoming tag list, dropping duplicates and empties, and
    /// create any tag that does not exist yet with the raw text as its title.
    async fn normalize_and_ensure_tags(&self, raw_tags: &[String]) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let mut slugs = Vec::new();

        for raw in raw_tags {
            let slug = slugify(raw);
            if slug.is_empty() || !seen.insert(slug.clone()) {
                continue;
            }
            self.tags
                .ensure(&Tag { slug: slug.clone(), title: raw.trim().to_string() })
                .await?;
            slugs.push(slug);
        }

        Ok(slugs)
    }
}
