use axum::http::StatusCode;
use inkstudio::api::{self, AppState};
use inkstudio::bootstrap;
use inkstudio::config::{AdminCredentials, Config, MigrationPolicy};
use inkstudio::db::seed::{self, SeedData};
use inkstudio::db::ConnectionSettings;
use inkstudio::Repository;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

const ADMIN_EMAIL: &str = "owner@inkstudio.example";
const ADMIN_PASSWORD: &str = "Ink&Needle7";

fn config_for(temp_dir: &TempDir) -> Config {
    Config {
        port: 0,
        database: ConnectionSettings::Sqlite {
            path: temp_dir
                .path()
                .join("test.db")
                .to_string_lossy()
                .to_string(),
        },
        migration_policy: MigrationPolicy::Abort,
        admin: Some(AdminCredentials {
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
        }),
        email: None,
    }
}

async fn setup_test_app() -> (axum::Router, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);

    let pool = bootstrap::run(&config).await.expect("bootstrap failed");
    let repo = Arc::new(Repository::new(pool));
    let state = AppState::new(repo, config, None);

    (api::create_router(state), temp_dir)
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _temp) = setup_test_app().await;

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/health")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let body_str = String::from_utf8(body.to_vec()).unwrap();
    assert!(body_str.contains("ok"));
}

#[tokio::test]
async fn test_ready_endpoint_reports_provider() {
    let (app, _temp) = setup_test_app().await;

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/ready")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let body_str = String::from_utf8(body.to_vec()).unwrap();
    assert!(body_str.contains("ready"));
    assert!(body_str.contains("sqlite"));
}

#[tokio::test]
async fn test_restart_reuses_the_seeded_store() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);

    // First boot seeds everything.
    let pool = bootstrap::run(&config).await.expect("first boot failed");
    let repo = Repository::new(pool);
    let admin = repo
        .find_user_by_email(ADMIN_EMAIL)
        .await
        .unwrap()
        .expect("admin should be seeded");

    // A restart over the same file finds everything in place and changes
    // nothing.
    let pool = bootstrap::run(&config).await.expect("second boot failed");
    let repo = Repository::new(pool);

    assert_eq!(repo.list_style_names().await.unwrap().len(), 7);
    assert_eq!(repo.list_role_names().await.unwrap().len(), 2);
    let admin_again = repo
        .find_user_by_email(ADMIN_EMAIL)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(admin_again.id, admin.id);
    assert_eq!(admin_again.password_hash, admin.password_hash);
}

#[tokio::test]
async fn test_concurrent_seeding_creates_the_admin_once() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);

    // Two instances start against the same store. Both open their own
    // pool; the uniqueness constraints decide who wins each insert.
    let pool_a = config.database.connect().await.expect("connect a failed");
    let pool_b = config.database.connect().await.expect("connect b failed");

    inkstudio::db::migrations::apply_pending(
        &pool_a,
        config.database.provider(),
        MigrationPolicy::Abort,
    )
    .await
    .expect("migrations failed");

    let repo_a = Repository::new(pool_a);
    let repo_b = Repository::new(pool_b);
    let data = SeedData::standard(config.admin.clone());

    let (a, b) = tokio::join!(seed::run(&repo_a, &data), seed::run(&repo_b, &data));
    let a = a.expect("seeder a failed");
    let b = b.expect("seeder b failed");

    // Exactly one seeder created the account; the loser logged and moved
    // on.
    assert!(a.admin_created ^ b.admin_created);
    assert_eq!(repo_a.list_role_names().await.unwrap().len(), 2);
    assert_eq!(repo_a.list_style_names().await.unwrap().len(), 7);

    let admin = repo_a
        .find_user_by_email(ADMIN_EMAIL)
        .await
        .unwrap()
        .expect("admin missing");
    assert_eq!(repo_a.roles_of_user(admin.id).await.unwrap(), vec!["Admin"]);
}

#[tokio::test]
async fn test_bootstrap_without_admin_serves_public_routes() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = config_for(&temp_dir);
    config.admin = None;

    let pool = bootstrap::run(&config).await.expect("bootstrap failed");
    let repo = Arc::new(Repository::new(pool));
    let app = api::create_router(AppState::new(repo, config, None));

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/v1/styles")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
