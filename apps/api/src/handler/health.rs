//! # ヘルスチェックハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /health` - 稼働確認（依存サービスを確認しない）
//! - `GET /health/ready` - PostgreSQL と Redis への疎通確認
//!
//! ## レスポンス例
//!
//! ```json
//! {
//!   "status": "not_ready",
//!   "checks": { "database": "ok", "redis": "error" }
//! }
//! ```

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use blog_infra::InfraError;
use blog_shared::{CheckStatus, HealthResponse, ReadinessResponse};
use redis::aio::ConnectionManager;
use sqlx::PgPool;

/// 個別チェックのタイムアウト
const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// 依存サービスの疎通確認
#[async_trait]
pub trait ReadinessCheck: Send + Sync {
    /// レスポンスの `checks` に使うキー
    fn name(&self) -> &'static str;

    async fn check(&self) -> Result<(), InfraError>;
}

/// PostgreSQL の疎通確認
pub struct PostgresCheck {
    pool: PgPool,
}

impl PostgresCheck {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadinessCheck for PostgresCheck {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn check(&self) -> Result<(), InfraError> {
        blog_infra::db::ping(&self.pool).await
    }
}

/// Redis の疎通確認
pub struct RedisCheck {
    conn: ConnectionManager,
}

impl RedisCheck {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl ReadinessCheck for RedisCheck {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn check(&self) -> Result<(), InfraError> {
        blog_infra::redis::ping(&self.conn).await
    }
}

/// Readiness Check の共有状態
pub struct ReadinessState {
    pub checks: Vec<Arc<dyn ReadinessCheck>>,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}

/// GET /health/ready
///
/// 全チェックを並行に実行する。1 つでも失敗またはタイムアウトした場合は
/// 503 Service Unavailable を返す。
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
    let results = run_all_checks(&state.checks).await;
    let checks: BTreeMap<String, CheckStatus> = results.into_iter().collect();

    let response = ReadinessResponse::from_checks(checks);
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

async fn run_check(check: Arc<dyn ReadinessCheck>) -> (String, CheckStatus) {
    let name = check.name();
    let status = match tokio::time::timeout(CHECK_TIMEOUT, check.check()).await {
        Ok(Ok(())) => CheckStatus::Ok,
        Ok(Err(e)) => {
            tracing::warn!(check = name, error = %e, "Readiness チェックに失敗しました");
            CheckStatus::Error
        }
        Err(_) => {
            tracing::warn!(check = name, "Readiness チェックがタイムアウトしました");
            CheckStatus::Error
        }
    };
    (name.to_string(), status)
}

async fn run_all_checks(checks: &[Arc<dyn ReadinessCheck>]) -> Vec<(String, CheckStatus)> {
    let mut set = tokio::task::JoinSet::new();
    for check in checks {
        set.spawn(run_check(Arc::clone(check)));
    }

    let mut results = Vec::with_capacity(checks.len());
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(result) => results.push(result),
            Err(e) => tracing::error!(error = %e, "Readiness チェックのタスクが異常終了しました"),
        }
    }
    results
}
