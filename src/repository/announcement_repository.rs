use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Announcement, AnnouncementFilters, AnnouncementPage},
    error::{AppError, Result},
    repository::AnnouncementRepository,
};

#[derive(FromRow)]
struct AnnouncementRow {
    id: String,
    title: String,
    excerpt: String,
    body: String,
    publisher: String,
    category_slug: Option<String>,
    category_title: Option<String>,
    active: i32,
    start_at: Option<NaiveDateTime>,
    until_at: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

const SELECT_COLUMNS: &str = "a.id, a.title, a.excerpt, a.body, a.publisher, \
     a.category_slug, c.title AS category_title, a.active, \
     a.start_at, a.until_at, a.created_at, a.updated_at";

pub struct SqliteAnnouncementRepository {
    pool: SqlitePool,
}

impl SqliteAnnouncementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_announcement(row: AnnouncementRow, tags: Vec<String>) -> Result<Announcement> {
        Ok(Announcement {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            title: row.title,
            excerpt: row.excerpt,
            body: row.body,
            publisher: row.publisher,
            category: row.category_slug,
            category_title: row.category_title,
            tags,
            active: row.active != 0,
            start_at: row.start_at.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            until_at: row.until_at.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    /// Append the shared filter clauses to a query that already aliases the
    /// announcements table as `a`.
    fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filters: &AnnouncementFilters) {
        if let Some(category) = &filters.category {
            qb.push(" AND a.category_slug = ").push_bind(category.clone());
        }
        if let Some(active) = filters.active {
            qb.push(" AND a.active = ").push_bind(if active { 1i32 } else { 0i32 });
        }
        if !filters.tags.is_empty() {
            // ANY semantics: one matching tag is enough.
            qb.push(
                " AND EXISTS (SELECT 1 FROM announcement_tags at \
                 WHERE at.announcement_id = a.id AND at.tag_slug IN (",
            );
            let mut separated = qb.separated(", ");
            for tag in &filters.tags {
                separated.push_bind(tag.clone());
            }
            qb.push("))");
        }
    }

    /// Load tag slugs for a set of announcement ids in one query.
    async fn tags_for(&self, ids: &[String]) -> Result<HashMap<String, Vec<String>>> {
        let mut by_announcement: HashMap<String, Vec<String>> = HashMap::new();
        if ids.is_empty() {
            return Ok(by_announcement);
        }

        let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
            "SELECT announcement_id, tag_slug FROM announcement_tags WHERE announcement_id IN (",
        );
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(id.clone());
        }
        qb.push(") ORDER BY tag_slug ASC");

        let rows: Vec<(String, String)> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        for (announcement_id, tag_slug) in rows {
            by_announcement.entry(announcement_id).or_default().push(tag_slug);
        }
        Ok(by_announcement)
    }
}

#[async_trait]
impl AnnouncementRepository for SqliteAnnouncementRepository {
    async fn create(&self, announcement: Announcement) -> Result<Announcement> {
        let id_str = announcement.id.to_string();
        let active_int = if announcement.active { 1i32 } else { 0i32 };
        let now = Utc::now().naive_utc();

        let mut tx = self.pool.begin().await.map_err(|e| AppError::Database(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO announcements (
                id, title, excerpt, body, publisher, category_slug, active,
                start_at, until_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&announcement.title)
        .bind(&announcement.excerpt)
        .bind(&announcement.body)
        .bind(&announcement.publisher)
        .bind(&announcement.category)
        .bind(active_int)
        .bind(announcement.start_at.map(|dt| dt.naive_utc()))
        .bind(announcement.until_at.map(|dt| dt.naive_utc()))
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        for tag in &announcement.tags {
            sqlx::query("INSERT INTO announcement_tags (announcement_id, tag_slug) VALUES (?, ?)")
                .bind(&id_str)
                .bind(tag)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        tx.commit().await.map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(announcement.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created announcement".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Announcement>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, AnnouncementRow>(&format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM announcements a
            LEFT JOIN categories c ON c.slug = a.category_slug
            WHERE a.id = ?
            "#,
        ))
        .bind(&id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => {
                let mut tags = self.tags_for(std::slice::from_ref(&id_str)).await?;
                let tags = tags.remove(&id_str).unwrap_or_default();
                Ok(Some(Self::row_to_announcement(r, tags)?))
            }
            None => Ok(None),
        }
    }

    async fn list(&self, filters: &AnnouncementFilters) -> Result<AnnouncementPage> {
        // Total over all matching rows, deliberately ignoring max/offset so
        // paginated consumers still see the real total.
        let mut count_qb: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM announcements a WHERE 1=1");
        Self::push_filters(&mut count_qb, filters);
        let count: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(format!(
            "SELECT {SELECT_COLUMNS} \
             FROM announcements a \
             LEFT JOIN categories c ON c.slug = a.category_slug \
             WHERE 1=1",
        ));
        Self::push_filters(&mut qb, filters);
        qb.push(format!(
            " ORDER BY {} {}",
            filters.sort_by.column(),
            filters.order.keyword()
        ));
        if filters.max.is_some() || filters.offset.is_some() {
            // SQLite needs a LIMIT before OFFSET; -1 means unbounded.
            qb.push(" LIMIT ").push_bind(filters.max.unwrap_or(-1));
            qb.push(" OFFSET ").push_bind(filters.offset.unwrap_or(0));
        }

        let rows: Vec<AnnouncementRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let mut tags = self.tags_for(&ids).await?;

        let results = rows
            .into_iter()
            .map(|row| {
                let row_tags = tags.remove(&row.id).unwrap_or_default();
                Self::row_to_announcement(row, row_tags)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(AnnouncementPage { count, results })
    }

    async fn update(&self, id: Uuid, announcement: Announcement) -> Result<Announcement> {
        let id_str = id.to_string();
        let active_int = if announcement.active { 1i32 } else { 0i32 };
        let now = Utc::now().naive_utc();

        let mut tx = self.pool.begin().await.map_err(|e| AppError::Database(e.to_string()))?;

        sqlx::query(
            r#"
            UPDATE announcements
            SET title = ?, excerpt = ?, body = ?, publisher = ?,
                category_slug = ?, active = ?, start_at = ?, until_at = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&announcement.title)
        .bind(&announcement.excerpt)
        .bind(&announcement.body)
        .bind(&announcement.publisher)
        .bind(&announcement.category)
        .bind(active_int)
        .bind(announcement.start_at.map(|dt| dt.naive_utc()))
        .bind(announcement.until_at.map(|dt| dt.naive_utc()))
        .bind(now)
        .bind(&id_str)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        sqlx::query("DELETE FROM announcement_tags WHERE announcement_id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        for tag in &announcement.tags {
            sqlx::query("INSERT INTO announcement_tags (announcement_id, tag_slug) VALUES (?, ?)")
                .bind(&id_str)
                .bind(tag)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        tx.commit().await.map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated announcement".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        let mut tx = self.pool.begin().await.map_err(|e| AppError::Database(e.to_string()))?;

        sqlx::query("DELETE FROM announcement_tags WHERE announcement_id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        sqlx::query("DELETE FROM announcements WHERE id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tx.commit().await.map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
