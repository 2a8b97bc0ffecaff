use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::*;
use crate::error::Result;

pub mod announcement_repository;
pub mod category_repository;
pub mod feedback_repository;
pub mod tag_repository;

pub use announcement_repository::SqliteAnnouncementRepository;
pub use category_repository::SqliteCategoryRepository;
pub use feedback_repository::SqliteFeedbackRepository;
pub use tag_repository::SqliteTagRepository;

/// Outcome of a guarded taxonomy delete. The guard is a single conditional
/// statement, so "still referenced" and "no such row" have to be told apart
/// after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedDelete {
    Deleted,
    Referenced,
    Missing,
}

#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    async fn create(&self, announcement: Announcement) -> Result<Announcement>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Announcement>>;
    async fn list(&self, filters: &AnnouncementFilters) -> Result<AnnouncementPage>;
    async fn update(&self, id: Uuid, announcement: Announcement) -> Result<Announcement>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, category: Category) -> Result<Category>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>>;
    async fn list(&self) -> Result<Vec<Category>>;
    /// Delete only while no announcement references the slug.
    async fn delete_if_unreferenced(&self, slug: &str) -> Result<GuardedDelete>;
}

#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn create(&self, tag: Tag) -> Result<Tag>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>>;
    async fn list(&self) -> Result<Vec<Tag>>;
    /// Insert the tag when its slug is not present yet. Used when an
    /// announcement arrives carrying tags that were never created explicitly.
    async fn ensure(&self, tag: &Tag) -> Result<()>;
    async fn delete_if_unreferenced(&self, slug: &str) -> Result<GuardedDelete>;
}

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn create(&self, feedback: Feedback) -> Result<Feedback>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Feedback>>;
    async fn list(&self, filters: &FeedbackFilters) -> Result<FeedbackPage>;
}
