use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use atrium::{
    api,
    auth::StaticPermissionService,
    clients::{BitbucketClient, CopilotClient, FairwindsClient, JiraClient},
    config::Settings,
    integrations::{webhook::WebhookSink, EventBus},
    repository,
    service::ServiceContext,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "atrium=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });

    tracing::info!("Starting Atrium server on {}:{}", settings.server.host, settings.server.port);

    // Initialize database
    let db_pool = SqlitePoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url)
        .await?;

    // Run migrations
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    // Initialize repositories
    let announcement_repo = Arc::new(repository::SqliteAnnouncementRepository::new(db_pool.clone()));
    let category_repo = Arc::new(repository::SqliteCategoryRepository::new(db_pool.clone()));
    let tag_repo = Arc::new(repository::SqliteTagRepository::new(db_pool.clone()));
    let feedback_repo = Arc::new(repository::SqliteFeedbackRepository::new(db_pool.clone()));

    // Permission checks against the static token table
    let permissions = Arc::new(StaticPermissionService::new(&settings.auth));

    // Event fan-out: signal and notification channels are both webhook sinks
    let event_bus = Arc::new(EventBus::new());
    if let Some(signals) = WebhookSink::new("Signals", settings.integrations.signals.clone()) {
        event_bus.register(Arc::new(signals)).await;
    }
    if let Some(notifications) =
        WebhookSink::new("Notifications", settings.integrations.notifications.clone())
    {
        event_bus.register(Arc::new(notifications)).await;
    }

    // Check sink health
    let health_results = event_bus.health_check_all().await;
    for (name, result) in health_results {
        match result {
            Ok(_) => tracing::info!("Event sink {} is healthy", name),
            Err(e) => tracing::warn!("Event sink {} health check failed: {:?}", name, e),
        }
    }

    // Outbound API clients, each present only when configured
    let jira = JiraClient::new(settings.integrations.jira.clone()).map(Arc::new);
    let bitbucket = BitbucketClient::new(settings.integrations.bitbucket.clone()).map(Arc::new);
    let copilot = CopilotClient::new(settings.integrations.copilot.clone()).map(Arc::new);
    let fairwinds = FairwindsClient::new(settings.integrations.fairwinds.clone()).map(Arc::new);

    // Create service context
    let service_context = Arc::new(ServiceContext::new(
        announcement_repo,
        category_repo,
        tag_repo,
        feedback_repo,
        permissions,
        event_bus,
        jira,
        settings.taxonomy.clone(),
        db_pool.clone(),
    ));

    let app = api::create_app(
        service_context,
        bitbucket,
        copilot,
        fairwinds,
        Arc::new(settings.clone()),
    );

    let listener = tokio::net::TcpListener::bind(format!(
        "{}:{}",
        settings.server.host, settings.server.port
    ))
    .await?;

    tracing::info!(
        "Server listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app).await?;

    Ok(())
}
