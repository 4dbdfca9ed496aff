//! # Blog API サーバー
//!
//! ## 環境変数
//!
//! 設定項目は [`blog_api::config`] を参照。
//!
//! ## 起動方法
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/blog REDIS_URL=redis://localhost:6379 \
//!     cargo run -p blog-api
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use blog_api::{
    app_builder::{AppDependencies, build_app},
    config::ApiConfig,
    handler::{PostgresCheck, RedisCheck},
};
use blog_domain::clock::SystemClock;
use blog_infra::{
    Argon2PasswordChecker,
    RedisTokenStore,
    db,
    redis,
    repository::{PostgresArticleRepository, PostgresUserRepository},
};
use blog_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    init_tracing(&TracingConfig::from_env("blog-api"));

    let config = ApiConfig::from_env().context("設定の読み込みに失敗しました")?;
    tracing::info!("API サーバーを起動します: {}:{}", config.host, config.port);

    let pool = db::create_pool(&config.database_url)
        .await
        .context("データベース接続に失敗しました")?;
    tracing::info!("データベースに接続しました");

    if config.run_migrations {
        db::run_migrations(&pool)
            .await
            .context("マイグレーションの適用に失敗しました")?;
        tracing::info!("マイグレーションを適用しました");
    }

    let redis_conn = redis::create_connection_manager(&config.redis_url)
        .await
        .context("Redis 接続に失敗しました")?;
    tracing::info!("Redis に接続しました");

    let app = build_app(AppDependencies {
        user_repository:    Arc::new(PostgresUserRepository::new(pool.clone())),
        article_repository: Arc::new(PostgresArticleRepository::new(pool.clone())),
        token_store:        Arc::new(RedisTokenStore::new(redis_conn.clone(), config.token_ttl)),
        password_checker:   Arc::new(Argon2PasswordChecker::new()),
        clock:              Arc::new(SystemClock),
        readiness_checks:   vec![
            Arc::new(PostgresCheck::new(pool)),
            Arc::new(RedisCheck::new(redis_conn)),
        ],
    });

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("API サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
