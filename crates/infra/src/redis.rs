//! # Redis 接続管理
//!
//! 認証トークンの保存先となる Redis への接続を管理する。

use redis::{Client, aio::ConnectionManager};

use crate::error::InfraError;

/// Redis 接続マネージャを作成する
///
/// アプリケーション起動時に一度だけ呼び出し、作成したマネージャを
/// アプリケーション全体で共有する。
///
/// `ConnectionManager` は切断時に自動で再接続し、Clone して複数タスクで共有できる。
///
/// # 引数
///
/// * `redis_url` - Redis 接続 URL
///   - 形式: `redis://[[username:]password@]host[:port][/database]`
///   - TLS: `rediss://` スキームで TLS 接続
///
/// # 例
///
/// ```rust,ignore
/// use blog_infra::redis;
///
/// let conn = redis::create_connection_manager("redis://localhost").await?;
/// ```
pub async fn create_connection_manager(
    redis_url: &str,
) -> Result<ConnectionManager, redis::RedisError> {
    let client = Client::open(redis_url)?;
    ConnectionManager::new(client).await
}

/// Redis への疎通を確認する（`PING`）
#[tracing::instrument(skip_all, level = "debug")]
pub async fn ping(conn: &ConnectionManager) -> Result<(), InfraError> {
    let mut conn = conn.clone();
    let _: String = redis::cmd("PING").query_async(&mut conn).await?;
    Ok(())
}
