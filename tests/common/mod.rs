// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use comment_threads::{
    repository::PgCommentStore, routes, service::CommentService, state::AppState,
    utils::retry::RetryStrategy,
};
use sqlx::{PgPool, postgres::PgPoolOptions};
use tokio::sync::{Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

/// Tests in one binary share a database; each holds this lock for its run.
static DB_LOCK: Mutex<()> = Mutex::const_new(());

pub struct TestDb {
    pub pool: PgPool,
    _lock: MutexGuard<'static, ()>,
}

/// Connects to `DATABASE_URL`, migrates and empties the comments table.
pub async fn test_db() -> TestDb {
    let lock = DB_LOCK.lock().await;
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing. Make sure DATABASE_URL is set.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    sqlx::query("TRUNCATE TABLE comments RESTART IDENTITY")
        .execute(&pool)
        .await
        .expect("Failed to truncate comments");

    TestDb { pool, _lock: lock }
}

pub fn store(db: &TestDb) -> PgCommentStore {
    PgCommentStore::new(
        db.pool.clone(),
        RetryStrategy::new(3, Duration::from_millis(100), 1.5),
    )
}

/// Spawns the app on a random port. Returns the base URL.
pub async fn spawn_app(db: &TestDb) -> String {
    let service = CommentService::new(Arc::new(store(db)));
    let app = routes::create_router(AppState::new(service, CancellationToken::new()));

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}
