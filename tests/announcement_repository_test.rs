use std::sync::Arc;

use atrium::{
    domain::{Announcement, AnnouncementFilters, AnnouncementSort, Category, SortOrder},
    integrations::EventBus,
    repository::{
        AnnouncementRepository, CategoryRepository, SqliteAnnouncementRepository,
        SqliteCategoryRepository, SqliteTagRepository,
    },
    service::AnnouncementService,
};
use chrono::{Duration, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

async fn setup() -> anyhow::Result<(SqlitePool, AnnouncementService)> {
    // Single connection so every query sees the same in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let service = AnnouncementService::new(
        Arc::new(SqliteAnnouncementRepository::new(pool.clone())),
        Arc::new(SqliteCategoryRepository::new(pool.clone())),
        Arc::new(SqliteTagRepository::new(pool.clone())),
        Arc::new(EventBus::new()),
    );

    Ok((pool, service))
}

fn announcement(title: &str, category: Option<&str>, tags: &[&str]) -> Announcement {
    Announcement {
        id: Uuid::new_v4(),
        title: title.to_string(),
        excerpt: "excerpt".to_string(),
        body: "body".to_string(),
        publisher: "platform-team".to_string(),
        category: category.map(str::to_string),
        category_title: None,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        active: true,
        start_at: None,
        until_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_announcement_crud() -> anyhow::Result<()> {
    let (pool, service) = setup().await?;

    let category_repo = SqliteCategoryRepository::new(pool.clone());
    category_repo
        .create(Category { slug: "platform".to_string(), title: "Platform".to_string() })
        .await?;

    // Create: tags arrive as display text and come back slugified
    let created = service
        .create(announcement("Scheduled maintenance", Some("platform"), &["Dev Ops", "Rust", "rust"]))
        .await?;
    assert_eq!(created.title, "Scheduled maintenance");
    assert_eq!(created.publisher, "platform-team");
    assert_eq!(created.category.as_deref(), Some("platform"));
    assert_eq!(created.category_title.as_deref(), Some("Platform"));
    // Tags are normalized, deduplicated, and stored slug-sorted
    assert_eq!(created.tags, vec!["dev-ops", "rust"]);

    // Fetch by id returns the same record
    let found = service.get(created.id).await?.expect("announcement should exist");
    assert_eq!(found.title, created.title);
    assert_eq!(found.excerpt, created.excerpt);
    assert_eq!(found.body, created.body);
    assert_eq!(found.tags, created.tags);

    // Update is a full replace of the editable fields
    let mut replacement = announcement("Maintenance window moved", None, &["release"]);
    replacement.active = false;
    let updated = service.update(created.id, replacement).await?;
    assert_eq!(updated.title, "Maintenance window moved");
    assert!(updated.category.is_none());
    assert_eq!(updated.tags, vec!["release"]);
    assert!(!updated.active);

    // Delete
    service.delete(created.id).await?;
    assert!(service.get(created.id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_list_filters_by_category_and_tags() -> anyhow::Result<()> {
    let (pool, service) = setup().await?;

    let category_repo = SqliteCategoryRepository::new(pool.clone());
    for (slug, title) in [("platform", "Platform"), ("security", "Security")] {
        category_repo
            .create(Category { slug: slug.to_string(), title: title.to_string() })
            .await?;
    }

    service.create(announcement("A", Some("platform"), &["rust"])).await?;
    service.create(announcement("B", Some("security"), &["kubernetes"])).await?;
    service.create(announcement("C", None, &["rust", "kubernetes"])).await?;

    let by_category = service
        .list(&AnnouncementFilters { category: Some("platform".to_string()), ..Default::default() })
        .await?;
    assert_eq!(by_category.count, 1);
    assert_eq!(by_category.results[0].title, "A");

    // A single tag returns only announcements carrying it
    let by_tag = service
        .list(&AnnouncementFilters { tags: vec!["rust".to_string()], ..Default::default() })
        .await?;
    assert_eq!(by_tag.count, 2);
    assert!(by_tag.results.iter().all(|a| a.tags.contains(&"rust".to_string())));

    // Multiple tags match with ANY semantics
    let by_tags = service
        .list(&AnnouncementFilters {
            tags: vec!["rust".to_string(), "kubernetes".to_string()],
            ..Default::default()
        })
        .await?;
    assert_eq!(by_tags.count, 3);

    Ok(())
}

#[tokio::test]
async fn test_list_filters_by_active() -> anyhow::Result<()> {
    let (_pool, service) = setup().await?;

    service.create(announcement("Live", None, &[])).await?;
    let mut retired = announcement("Retired", None, &[]);
    retired.active = false;
    service.create(retired).await?;

    let active = service
        .list(&AnnouncementFilters { active: Some(true), ..Default::default() })
        .await?;
    assert_eq!(active.count, 1);
    assert_eq!(active.results[0].title, "Live");

    Ok(())
}

#[tokio::test]
async fn test_pagination_reports_true_total() -> anyhow::Result<()> {
    let (_pool, service) = setup().await?;

    for title in ["First", "Second", "Third"] {
        service.create(announcement(title, None, &[])).await?;
    }

    // A page of one still reports the full matching total
    let page = service
        .list(&AnnouncementFilters { max: Some(1), ..Default::default() })
        .await?;
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.count, 3);

    let offset_page = service
        .list(&AnnouncementFilters { max: Some(2), offset: Some(2), ..Default::default() })
        .await?;
    assert_eq!(offset_page.results.len(), 1);
    assert_eq!(offset_page.count, 3);

    Ok(())
}

#[tokio::test]
async fn test_sort_by_start_at() -> anyhow::Result<()> {
    let (_pool, service) = setup().await?;

    let mut early = announcement("Early", None, &[]);
    early.start_at = Some(Utc::now() - Duration::days(10));
    let mut late = announcement("Late", None, &[]);
    late.start_at = Some(Utc::now());
    service.create(late).await?;
    service.create(early).await?;

    let ascending = service
        .list(&AnnouncementFilters {
            sort_by: AnnouncementSort::StartAt,
            order: SortOrder::Asc,
            ..Default::default()
        })
        .await?;
    let titles: Vec<_> = ascending.results.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Early", "Late"]);

    Ok(())
}

#[tokio::test]
async fn test_update_of_missing_announcement_is_not_found() -> anyhow::Result<()> {
    let (_pool, service) = setup().await?;

    let result = service.update(Uuid::new_v4(), announcement("Ghost", None, &[])).await;
    assert!(matches!(result, Err(atrium::error::AppError::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_unknown_category_is_rejected() -> anyhow::Result<()> {
    let (_pool, service) = setup().await?;

    let result = service.create(announcement("X", Some("missing"), &[])).await;
    assert!(matches!(result, Err(atrium::error::AppError::BadRequest(_))));

    Ok(())
}
