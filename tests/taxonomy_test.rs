use std::sync::Arc;

use atrium::{
    config::TaxonomyConfig,
    domain::Announcement,
    error::AppError,
    integrations::EventBus,
    repository::{SqliteAnnouncementRepository, SqliteCategoryRepository, SqliteTagRepository},
    service::{AnnouncementService, TaxonomyService},
};
use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

async fn setup(
    config: TaxonomyConfig,
) -> anyhow::Result<(TaxonomyService, AnnouncementService)> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let category_repo = Arc::new(SqliteCategoryRepository::new(pool.clone()));
    let tag_repo = Arc::new(SqliteTagRepository::new(pool.clone()));

    let taxonomy = TaxonomyService::new(category_repo.clone(), tag_repo.clone(), config);
    let announcements = AnnouncementService::new(
        Arc::new(SqliteAnnouncementRepository::new(pool.clone())),
        category_repo,
        tag_repo,
        Arc::new(EventBus::new()),
    );

    Ok((taxonomy, announcements))
}

fn announcement(category: Option<&str>, tags: &[&str]) -> Announcement {
    Announcement {
        id: Uuid::new_v4(),
        title: "title".to_string(),
        excerpt: "excerpt".to_string(),
        body: "body".to_string(),
        publisher: "someone".to_string(),
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
async fn test_category_slug_and_ordering() -> anyhow::Result<()> {
    let (taxonomy, _) = setup(TaxonomyConfig::default()).await?;

    let created = taxonomy.create_category("Category 1").await?;
    assert_eq!(created.slug, "category-1");
    assert_eq!(created.title, "Category 1");

    taxonomy.create_category("Category 2").await?;

    let categories = taxonomy.list_categories().await?;
    let slugs: Vec<_> = categories.iter().map(|c| c.slug.as_str()).collect();
    assert_eq!(slugs, vec!["category-1", "category-2"]);

    Ok(())
}

#[tokio::test]
async fn test_duplicate_slug_conflicts() -> anyhow::Result<()> {
    let (taxonomy, _) = setup(TaxonomyConfig::default()).await?;

    taxonomy.create_category("Platform").await?;
    let duplicate = taxonomy.create_category("platform").await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    taxonomy.create_tag("Rust").await?;
    let duplicate_tag = taxonomy.create_tag("rust").await;
    assert!(matches!(duplicate_tag, Err(AppError::Conflict(_))));

    Ok(())
}

#[tokio::test]
async fn test_title_length_limit() -> anyhow::Result<()> {
    let (taxonomy, _) = setup(TaxonomyConfig { max_title_length: 10 }).await?;

    let result = taxonomy.create_tag("a tag title that is far too long").await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let empty = taxonomy.create_category("   ").await;
    assert!(matches!(empty, Err(AppError::BadRequest(_))));

    Ok(())
}

#[tokio::test]
async fn test_referenced_category_cannot_be_deleted() -> anyhow::Result<()> {
    let (taxonomy, announcements) = setup(TaxonomyConfig::default()).await?;

    taxonomy.create_category("Platform").await?;
    announcements.create(announcement(Some("platform"), &[])).await?;

    let blocked = taxonomy.delete_category("platform").await;
    assert!(matches!(blocked, Err(AppError::Conflict(_))));

    // Still listed after the failed delete
    assert_eq!(taxonomy.list_categories().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_unreferenced_category_delete_succeeds() -> anyhow::Result<()> {
    let (taxonomy, _) = setup(TaxonomyConfig::default()).await?;

    taxonomy.create_category("Platform").await?;
    taxonomy.delete_category("platform").await?;
    assert!(taxonomy.list_categories().await?.is_empty());

    let missing = taxonomy.delete_category("platform").await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_referenced_tag_cannot_be_deleted() -> anyhow::Result<()> {
    let (taxonomy, announcements) = setup(TaxonomyConfig::default()).await?;

    // The announcement creates the tag implicitly
    let created = announcements.create(announcement(None, &["rust"])).await?;

    let blocked = taxonomy.delete_tag("rust").await;
    assert!(matches!(blocked, Err(AppError::Conflict(_))));

    // Once the announcement is gone the tag can be removed
    announcements.delete(created.id).await?;
    taxonomy.delete_tag("rust").await?;
    assert!(taxonomy.list_tags().await?.is_empty());

    Ok(())
}
