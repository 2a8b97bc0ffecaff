use std::sync::Arc;

use atrium::{
    api,
    auth::StaticPermissionService,
    config::{AuthConfig, Settings, TokenGrant},
    integrations::EventBus,
    repository::{
        SqliteAnnouncementRepository, SqliteCategoryRepository, SqliteFeedbackRepository,
        SqliteTagRepository,
    },
    service::ServiceContext,
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::util::ServiceExt;
use uuid::Uuid;

const ADMIN_TOKEN: &str = "test-admin-token";
const REPORTER_TOKEN: &str = "test-reporter-token";

async fn test_app() -> anyhow::Result<Router> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let settings = Settings {
        auth: AuthConfig {
            tokens: vec![
                TokenGrant {
                    subject: "admin".to_string(),
                    token: ADMIN_TOKEN.to_string(),
                    permissions: vec!["*".to_string()],
                },
                TokenGrant {
                    subject: "reporter".to_string(),
                    token: REPORTER_TOKEN.to_string(),
                    permissions: vec!["feedback.create".to_string()],
                },
            ],
        },
        ..Settings::default()
    };

    let service_context = Arc::new(ServiceContext::new(
        Arc::new(SqliteAnnouncementRepository::new(pool.clone())),
        Arc::new(SqliteCategoryRepository::new(pool.clone())),
        Arc::new(SqliteTagRepository::new(pool.clone())),
        Arc::new(SqliteFeedbackRepository::new(pool.clone())),
        Arc::new(StaticPermissionService::new(&settings.auth)),
        Arc::new(EventBus::new()),
        None,
        settings.taxonomy.clone(),
        pool,
    ));

    Ok(api::create_app(service_context, None, None, None, Arc::new(settings)))
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> anyhow::Result<Value> {
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn test_health() -> anyhow::Result<()> {
    let app = test_app().await?;

    let response = app.oneshot(get_request("/health")).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await?["status"], "ok");

    Ok(())
}

#[tokio::test]
async fn test_category_scenario() -> anyhow::Result<()> {
    let app = test_app().await?;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/categories",
            Some(ADMIN_TOKEN),
            json!({"title": "Category 1"}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await?;
    assert_eq!(created["slug"], "category-1");
    assert_eq!(created["title"], "Category 1");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/categories",
            Some(ADMIN_TOKEN),
            json!({"title": "Category 2"}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.clone().oneshot(get_request("/api/categories")).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let listed = json_body(response).await?;
    let slugs: Vec<_> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["slug"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(slugs, vec!["category-1", "category-2"]);

    // Duplicate slug conflicts
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/categories",
            Some(ADMIN_TOKEN),
            json!({"title": "category 1"}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn test_unauthorized_writes_persist_nothing() -> anyhow::Result<()> {
    let app = test_app().await?;

    // No token: 401
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/announcements",
            None,
            json!({"title": "T", "excerpt": "E", "body": "B"}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Token without the permission: 403
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/announcements",
            Some(REPORTER_TOKEN),
            json!({"title": "T", "excerpt": "E", "body": "B"}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Nothing was persisted
    let response = app.oneshot(get_request("/api/announcements")).await?;
    let page = json_body(response).await?;
    assert_eq!(page["count"], 0);

    Ok(())
}

#[tokio::test]
async fn test_announcement_create_and_list() -> anyhow::Result<()> {
    let app = test_app().await?;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/announcements",
            Some(ADMIN_TOKEN),
            json!({
                "title": "Scheduled maintenance",
                "excerpt": "Downtime on Saturday",
                "body": "Full details here.",
                "tags": ["Dev Ops", "Maintenance"],
            }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await?;
    assert_eq!(created["publisher"], "admin");
    assert_eq!(created["tags"], json!(["dev-ops", "maintenance"]));
    let id = created["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(get_request("/api/announcements?tags=dev-ops"))
        .await?;
    let page = json_body(response).await?;
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["id"], id.as_str());

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/announcements/{id}")))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    // Deleting via the API works and 404s afterwards
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/announcements/{id}"))
                .header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get_request(&format!("/api/announcements/{id}")))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_update_of_missing_announcement_returns_404() -> anyhow::Result<()> {
    let app = test_app().await?;

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/announcements/{}", Uuid::new_v4()),
            Some(ADMIN_TOKEN),
            json!({"title": "T", "excerpt": "E", "body": "B"}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_invalid_sortby_is_rejected() -> anyhow::Result<()> {
    let app = test_app().await?;

    let response = app
        .oneshot(get_request("/api/announcements?sortby=publisher"))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_proxy_endpoints_unconfigured() -> anyhow::Result<()> {
    let app = test_app().await?;

    // No Bitbucket client configured
    let response = app
        .clone()
        .oneshot(get_request("/api/pull-requests?project=PRJ&repo=api"))
        .await?;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let response = app.oneshot(get_request("/api/copilot/metrics")).await?;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    Ok(())
}
