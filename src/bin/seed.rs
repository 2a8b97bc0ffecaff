use std::sync::Arc;

use clap::Parser;
use fake::faker::company::en::CatchPhrase;
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::Fake;
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

use atrium::{
    config::TaxonomyConfig,
    domain::{Announcement, Feedback, FeedbackType},
    integrations::EventBus,
    repository::{
        AnnouncementRepository, CategoryRepository, FeedbackRepository,
        SqliteAnnouncementRepository, SqliteCategoryRepository, SqliteFeedbackRepository,
        SqliteTagRepository,
    },
    service::{AnnouncementService, TaxonomyService},
};
use chrono::{Duration, Utc};

/// Populate a local database with demo portal data.
#[derive(Parser)]
struct Args {
    /// Announcements to generate
    #[arg(long, default_value_t = 12)]
    announcements: usize,

    /// Feedback entries to generate
    #[arg(long, default_value_t = 6)]
    feedback: usize,

    /// Database URL; falls back to DATABASE_URL, then a local file
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let database_url = args
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite:atrium.db".to_string());

    println!("Seeding {}...", database_url);

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    println!("Running migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    let announcement_repo = Arc::new(SqliteAnnouncementRepository::new(db_pool.clone()));
    let category_repo = Arc::new(SqliteCategoryRepository::new(db_pool.clone()));
    let tag_repo = Arc::new(SqliteTagRepository::new(db_pool.clone()));
    let feedback_repo = Arc::new(SqliteFeedbackRepository::new(db_pool.clone()));

    let event_bus = Arc::new(EventBus::new());
    let taxonomy = TaxonomyService::new(
        category_repo.clone(),
        tag_repo.clone(),
        TaxonomyConfig::default(),
    );
    let announcements = AnnouncementService::new(
        announcement_repo.clone(),
        category_repo.clone(),
        tag_repo,
        event_bus,
    );

    println!("Creating categories...");
    let category_titles = ["Platform", "Infrastructure", "Security", "Tooling"];
    let mut category_slugs = Vec::new();
    for title in category_titles {
        match taxonomy.create_category(title).await {
            Ok(category) => category_slugs.push(category.slug),
            // Re-running against an existing database is fine
            Err(e) => println!("  Skipping category {title}: {e}"),
        }
    }

    println!("Creating {} announcements...", args.announcements);
    let tag_pool = ["rust", "kubernetes", "release", "deprecation", "maintenance"];
    for i in 0..args.announcements {
        let title: String = CatchPhrase().fake();
        let announcement = Announcement {
            id: Uuid::new_v4(),
            title,
            excerpt: Sentence(8..16).fake(),
            body: Paragraph(3..6).fake(),
            publisher: "platform-team".to_string(),
            category: category_slugs.get(i % category_titles.len()).cloned(),
            category_title: None,
            tags: vec![
                tag_pool[i % tag_pool.len()].to_string(),
                tag_pool[(i + 2) % tag_pool.len()].to_string(),
            ],
            active: i % 4 != 0,
            start_at: Some(Utc::now() - Duration::days(i as i64)),
            until_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        announcements.create(announcement).await?;
    }

    println!("Creating {} feedback entries...", args.feedback);
    for i in 0..args.feedback {
        let feedback = Feedback {
            id: Uuid::new_v4(),
            summary: Sentence(4..10).fake(),
            description: Paragraph(2..4).fake(),
            project_id: format!("project-{}", i % 3),
            tag: "ux".to_string(),
            feedback_type: if i % 2 == 0 { FeedbackType::Bug } else { FeedbackType::Feedback },
            ticket_url: None,
            created_by: "seed".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        feedback_repo.create(feedback).await?;
    }

    let total = announcement_repo.list(&Default::default()).await?.count;
    println!("Done. Database now holds {total} announcements.");

    Ok(())
}
