use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Feedback, FeedbackFilters, FeedbackPage, FeedbackType},
    error::{AppError, Result},
    repository::FeedbackRepository,
};

#[derive(FromRow)]
struct FeedbackRow {
    id: String,
    summary: String,
    description: String,
    project_id: String,
    tag: String,
    feedback_type: String,
    ticket_url: Option<String>,
    created_by: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

const SELECT_COLUMNS: &str = "id, summary, description, project_id, tag, \
     feedback_type, ticket_url, created_by, created_at, updated_at";

pub struct SqliteFeedbackRepository {
    pool: SqlitePool,
}

impl SqliteFeedbackRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_feedback(row: FeedbackRow) -> Result<Feedback> {
        Ok(Feedback {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            summary: row.summary,
            description: row.description,
            project_id: row.project_id,
            tag: row.tag,
            feedback_type: FeedbackType::parse(&row.feedback_type).ok_or_else(|| {
                AppError::Database(format!("Invalid feedback type: {}", row.feedback_type))
            })?,
            ticket_url: row.ticket_url,
            created_by: row.created_by,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filters: &FeedbackFilters) {
        if let Some(search) = &filters.search {
            let pattern = format!("%{}%", search);
            qb.push(" AND (summary LIKE ").push_bind(pattern.clone());
            qb.push(" OR tag LIKE ").push_bind(pattern);
            qb.push(")");
        }
        if let Some(project_id) = &filters.project_id {
            qb.push(" AND project_id = ").push_bind(project_id.clone());
        }
    }
}

#[async_trait]
impl FeedbackRepository for SqliteFeedbackRepository {
    async fn create(&self, feedback: Feedback) -> Result<Feedback> {
        let id_str = feedback.id.to_string();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO feedback (
                id, summary, description, project_id, tag, feedback_type,
                ticket_url, created_by, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&feedback.summary)
        .bind(&feedback.description)
        .bind(&feedback.project_id)
        .bind(&feedback.tag)
        .bind(feedback.feedback_type.as_str())
        .bind(&feedback.ticket_url)
        .bind(&feedback.created_by)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(feedback.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created feedback".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Feedback>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, FeedbackRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM feedback WHERE id = ?"
        ))
        .bind(&id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_feedback(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self, filters: &FeedbackFilters) -> Result<FeedbackPage> {
        let mut count_qb: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM feedback WHERE 1=1");
        Self::push_filters(&mut count_qb, filters);
        let count: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut qb: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {SELECT_COLUMNS} FROM feedback WHERE 1=1"));
        Self::push_filters(&mut qb, filters);
        qb.push(" ORDER BY created_at DESC");
        if filters.limit.is_some() || filters.offset.is_some() {
            qb.push(" LIMIT ").push_bind(filters.limit.unwrap_or(-1));
            qb.push(" OFFSET ").push_bind(filters.offset.unwrap_or(0));
        }

        let rows: Vec<FeedbackRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let results = rows
            .into_iter()
            .map(Self::row_to_feedback)
            .collect::<Result<Vec<_>>>()?;

        Ok(FeedbackPage { count, results })
    }
}
