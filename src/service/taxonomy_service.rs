use std::sync::Arc;

use crate::{
    config::TaxonomyConfig,
    domain::{slugify, Category, Tag},
    error::{AppError, Result},
    repository::{CategoryRepository, GuardedDelete, TagRepository},
};

/// Categories and tags share their lifecycle rules: slug derived from the
/// title, slug uniqueness, and deletion blocked while referenced.
pub struct TaxonomyService {
    categories: Arc<dyn CategoryRepository>,
    tags: Arc<dyn TagRepository>,
    config: TaxonomyConfig,
}

impl TaxonomyService {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        tags: Arc<dyn TagRepository>,
        config: TaxonomyConfig,
    ) -> Self {
        Self { categories, tags, config }
    }

    fn validate_title(&self, title: &str) -> Result<String> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::BadRequest("Title must not be empty".to_string()));
        }
        if title.len() > self.config.max_title_length {
            return Err(AppError::BadRequest(format!(
                "Title exceeds maximum length of {} characters",
                self.config.max_title_length
            )));
        }
        Ok(title.to_string())
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.categories.list().await
    }

    pub async fn create_category(&self, title: &str) -> Result<Category> {
        let title = self.validate_title(title)?;
        let slug = slugify(&title);

        if self.categories.find_by_slug(&slug).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Category with slug '{}' already exists",
                slug
            )));
        }

        self.categories.create(Category { slug, title }).await
    }

    pub async fn delete_category(&self, slug: &str) -> Result<()> {
        match self.categories.delete_if_unreferenced(slug).await? {
            GuardedDelete::Deleted => Ok(()),
            GuardedDelete::Referenced => Err(AppError::Conflict(
                "Category is still referenced by announcements".to_string(),
            )),
            GuardedDelete::Missing => {
                Err(AppError::NotFound("Category not found".to_string()))
            }
        }
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        self.tags.list().await
    }

    pub async fn create_tag(&self, title: &str) -> Result<Tag> {
        let title = self.validate_title(title)?;
        let slug = slugify(&title);

        if self.tags.find_by_slug(&slug).await?.is_some() {
            return Err(AppError::Conflict(format!("Tag with slug '{}' already exists", slug)));
        }

        self.tags.create(Tag { slug, title }).await
    }

    pub async fn delete_tag(&self, slug: &str) -> Result<()> {
        match self.tags.delete_if_unreferenced(slug).await? {
            GuardedDelete::Deleted => Ok(()),
            GuardedDelete::Referenced => Err(AppError::Conflict(
                "Tag is still referenced by announcements".to_string(),
            )),
            GuardedDelete::Missing => Err(AppError::NotFound("Tag not found".to_string())),
        }
    }
}
