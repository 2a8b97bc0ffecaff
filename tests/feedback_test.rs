use std::sync::Arc;

use atrium::{
    domain::{Feedback, FeedbackFilters, FeedbackType},
    integrations::EventBus,
    repository::SqliteFeedbackRepository,
    service::FeedbackService,
};
use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

async fn setup() -> anyhow::Result<FeedbackService> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    // No ticketing integration configured
    Ok(FeedbackService::new(
        Arc::new(SqliteFeedbackRepository::new(pool)),
        None,
        Arc::new(EventBus::new()),
    ))
}

fn feedback(summary: &str, project: &str, feedback_type: FeedbackType) -> Feedback {
    Feedback {
        id: Uuid::new_v4(),
        summary: summary.to_string(),
        description: "details".to_string(),
        project_id: project.to_string(),
        tag: "ux".to_string(),
        feedback_type,
        ticket_url: None,
        created_by: "alice".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_feedback_create_and_get() -> anyhow::Result<()> {
    let service = setup().await?;

    let created = service
        .create(feedback("Search crashes on empty query", "catalog", FeedbackType::Bug))
        .await?;
    assert_eq!(created.feedback_type, FeedbackType::Bug);
    // Without a ticketing integration no ticket is opened
    assert!(created.ticket_url.is_none());

    let found = service.get(created.id).await?.expect("feedback should exist");
    assert_eq!(found.summary, "Search crashes on empty query");
    assert_eq!(found.created_by, "alice");

    Ok(())
}

#[tokio::test]
async fn test_feedback_search_and_pagination() -> anyhow::Result<()> {
    let service = setup().await?;

    service.create(feedback("Search crashes on empty query", "catalog", FeedbackType::Bug)).await?;
    service.create(feedback("Dark mode please", "catalog", FeedbackType::Feedback)).await?;
    service.create(feedback("Crash when saving", "scaffolder", FeedbackType::Bug)).await?;

    let by_search = service
        .list(&FeedbackFilters { search: Some("crash".to_string()), ..Default::default() })
        .await?;
    assert_eq!(by_search.count, 2);

    let by_project = service
        .list(&FeedbackFilters { project_id: Some("catalog".to_string()), ..Default::default() })
        .await?;
    assert_eq!(by_project.count, 2);

    // A page of one still reports the full matching total
    let page = service
        .list(&FeedbackFilters { limit: Some(1), ..Default::default() })
        .await?;
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.count, 3);

    Ok(())
}
