use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::{
    domain::Category,
    error::{AppError, Result},
    repository::{CategoryRepository, GuardedDelete},
};

pub struct SqliteCategoryRepository {
    pool: SqlitePool,
}

impl SqliteCategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for SqliteCategoryRepository {
    async fn create(&self, category: Category) -> Result<Category> {
        sqlx::query("INSERT INTO categories (slug, title) VALUES (?, ?)")
            .bind(&category.slug)
            .bind(&category.title)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(category)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let row: Option<(String, String)> =
            sqlx::query_as("SELECT slug, title FROM categories WHERE slug = ?")
                .bind(slug)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.map(|(slug, title)| Category { slug, title }))
    }

    async fn list(&self) -> Result<Vec<Category>> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT slug, title FROM categories ORDER BY title ASC")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|(slug, title)| Category { slug, title }).collect())
    }

    async fn delete_if_unreferenced(&self, slug: &str) -> Result<GuardedDelete> {
        // Single conditional statement so the check and the delete cannot
        // race against a concurrent announcement create.
        let result = sqlx::query(
            r#"
            DELETE FROM categories
            WHERE slug = ?
              AND NOT EXISTS (SELECT 1 FROM announcements WHERE category_slug = ?)
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
