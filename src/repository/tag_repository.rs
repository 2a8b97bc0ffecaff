use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::{
    domain::Tag,
    error::{AppError, Result},
    repository::{GuardedDelete, TagRepository},
};

pub struct SqliteTagRepository {
    pool: SqlitePool,
}

impl SqliteTagRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepository for SqliteTagRepository {
    async fn create(&self, tag: Tag) -> Result<Tag> {
        sqlx::query("INSERT INTO tags (slug, title) VALUES (?, ?)")
            .bind(&tag.slug)
            .bind(&tag.title)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(tag)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>> {
        let row: Option<(String, String)> =
            sqlx::query_as("SELECT slug, title FROM tags WHERE slug = ?")
                .bind(slug)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.map(|(slug, title)| Tag { slug, title }))
    }

    async fn list(&self) -> Result<Vec<Tag>> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT slug, title FROM tags ORDER BY title ASC")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|(slug, title)| Tag { slug, title }).collect())
    }

    async fn ensure(&self, tag: &Tag) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO tags (slug, title) VALUES (?, ?)")
            .bind(&tag.slug)
            .bind(&tag.title)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete_if_unreferenced(&self, slug: &str) -> Result<GuardedDelete> {
        let result = sqlx::query(
            r#"
            DELETE FROM tags
            WHERE slug = ?
              AND NOT EXISTS (SELECT 1 FROM announcement_tags WHERE tag_slug = ?)
            "#,
        )
        .bind(slug)
        .bind(slug)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() > 0 {
            return Ok(GuardedDelete::Deleted);
        }
        if self.find_by_slug(slug).await?.is_some() {
            Ok(GuardedDelete::Referenced)
        } else {
            Ok(GuardedDelete::Missing)
        }
    }
}
