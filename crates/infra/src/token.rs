//! # 認証トークン管理
//!
//! Redis を使用した認証トークンの発行・検索・失効を提供する。
//!
//! ## キー設計
//!
//! ```text
//! auth_token:{token}
//! ```
//!
//! 値は [`TokenData`] の JSON。有効期限は Redis の TTL で管理し、
//! 期限切れのトークンは自動的に削除される。

use std::time::Duration;

use async_trait::async_trait;
use blog_domain::user::UserId;
use chrono::{DateTime, Utc};
use redis::{AsyncCommands, aio::ConnectionManager};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::InfraError;

/// トークンのデフォルト有効期限（14 日）
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(14 * 24 * 60 * 60);

/// トークンに紐づくデータ
///
/// Redis に JSON 形式で保存される。サインイン時に作成され、
/// サインアウトまたは TTL 経過で削除される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenData {
    user_id:   UserId,
    issued_at: DateTime<Utc>,
}

impl TokenData {
    pub fn new(user_id: UserId, issued_at: DateTime<Utc>) -> Self {
        Self { user_id, issued_at }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }
}

/// 認証トークンストアトレイト
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// トークンを発行し、トークン文字列を返す
    async fn issue(&self, data: &TokenData) -> Result<String, InfraError>;

    /// トークンに紐づくデータを取得する
    ///
    /// 存在しない、または期限切れの場合は `None` を返す。
    async fn find(&self, token: &str) -> Result<Option<TokenData>, InfraError>;

    /// トークンを失効させる
    ///
    /// 存在しないトークンを指定してもエラーにしない。
    async fn revoke(&self, token: &str) -> Result<(), InfraError>;
}

/// Redis を使用したトークンストア
pub struct RedisTokenStore {
    conn: ConnectionManager,
    ttl:  Duration,
}

impl RedisTokenStore {
    pub fn new(conn: ConnectionManager, ttl: Duration) -> Self {
        Self { conn, ttl }
    }

    fn token_key(token: &str) -> String {
        format!("auth_token:{token}")
    }
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    #[tracing::instrument(skip_all, level = "debug", fields(user_id = %data.user_id()))]
    async fn issue(&self, data: &TokenData) -> Result<String, InfraError> {
        // UUID v4 は暗号論的に安全な乱数から生成される
        let token = Uuid::new_v4().to_string();
        let key = Self::token_key(&token);
        let json = serde_json::to_string(data)?;

        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(&key, json, self.ttl.as_secs()).await?;

        Ok(token)
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find(&self, token: &str) -> Result<Option<TokenData>, InfraError> {
        let key = Self::token_key(token);
        let mut conn = self.conn.clone();

        let result: Option<String> = conn.get(&key).await?;

        match result {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn revoke(&self, token: &str) -> Result<(), InfraError> {
        let key = Self::token_key(token);
        let mut conn = self.conn.clone();
        let _: () = conn.del(&key).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_token_keyのフォーマット() {
        assert_eq!(RedisTokenStore::token_key("abc"), "auth_token:abc");
    }

    #[test]
    fn test_token_dataはjsonで往復できる() {
        let issued_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let data = TokenData::new(UserId::from_i64(3), issued_at);

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["user_id"], 3);

        let restored: TokenData = serde_json::from_value(json).unwrap();
        assert_eq!(restored, data);
    }

    #[test]
    fn test_デフォルト有効期限は14日() {
        assert_eq!(DEFAULT_TOKEN_TTL.as_secs(), 1_209_600);
    }
}
