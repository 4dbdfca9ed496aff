//! # API サーバー設定
//!
//! 環境変数から API サーバーの設定を読み込む。
//!
//! | 環境変数 | 必須 | デフォルト |
//! |---------|------|-----------|
//! | `API_HOST` | | `0.0.0.0` |
//! | `API_PORT` | | `3000` |
//! | `DATABASE_URL` | ✓ | |
//! | `REDIS_URL` | ✓ | |
//! | `AUTH_TOKEN_TTL_SECONDS` | | `1209600`（14 日） |
//! | `RUN_MIGRATIONS` | | `true` |
//!
//! ログ出力形式（`LOG_FORMAT`）は [`blog_shared::observability::LogFormat`] が読み取る。

use std::{env, time::Duration};

use blog_infra::token::DEFAULT_TOKEN_TTL;
use thiserror::Error;

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 必須の環境変数が未設定
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    /// 値の形式が不正
    #[error("{name} の値が不正です: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// API サーバーの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// バインドアドレス
    pub host:           String,
    /// ポート番号
    pub port:           u16,
    /// データベース接続 URL
    pub database_url:   String,
    /// Redis 接続 URL
    pub redis_url:      String,
    /// 認証トークンの有効期限
    pub token_ttl:      Duration,
    /// 起動時にマイグレーションを適用するか
    pub run_migrations: bool,
}

impl ApiConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意のキー参照関数から設定を読み込む
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing(name));

        let port = match lookup("API_PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid {
                    name: "API_PORT",
                    value,
                })?,
            None => 3000,
        };

        let token_ttl = match lookup("AUTH_TOKEN_TTL_SECONDS") {
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "AUTH_TOKEN_TTL_SECONDS",
                        value,
                    });
                }
            },
            None => DEFAULT_TOKEN_TTL,
        };

        let run_migrations = match lookup("RUN_MIGRATIONS").as_deref() {
            None | Some("true" | "1") => true,
            Some("false" | "0") => false,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name:  "RUN_MIGRATIONS",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            host: lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url: required("DATABASE_URL")?,
            redis_url: required("REDIS_URL")?,
            token_ttl,
            run_migrations,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost/blog"),
        ("REDIS_URL", "redis://localhost:6379"),
    ];

    #[test]
    fn test_必須項目のみでデフォルト値が使われる() {
        let config = ApiConfig::from_lookup(lookup_from(&REQUIRED)).unwrap();

        assert_eq!(
            config,
            ApiConfig {
                host:           "0.0.0.0".to_string(),
                port:           3000,
                database_url:   "postgres://localhost/blog".to_string(),
                redis_url:      "redis://localhost:6379".to_string(),
                token_ttl:      Duration::from_secs(1_209_600),
                run_migrations: true,
            }
        );
    }

    #[test]
    fn test_任意項目を上書きできる() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "8080"),
            ("AUTH_TOKEN_TTL_SECONDS", "60"),
            ("RUN_MIGRATIONS", "false"),
        ]);

        let config = ApiConfig::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.token_ttl, Duration::from_secs(60));
        assert!(!config.run_migrations);
    }

    #[test]
    fn test_database_url未設定はエラー() {
        let result = ApiConfig::from_lookup(lookup_from(&[("REDIS_URL", "redis://localhost")]));

        assert_eq!(result, Err(ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn test_不正なポート番号はエラー() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("API_PORT", "not-a-port"));

        let result = ApiConfig::from_lookup(lookup_from(&pairs));

        assert!(matches!(
            result,
            Err(ConfigError::Invalid { name: "API_PORT", .. })
        ));
    }

    #[test]
    fn test_有効期限0秒はエラー() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("AUTH_TOKEN_TTL_SECONDS", "0"));

        let result = ApiConfig::from_lookup(lookup_from(&pairs));

        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                name: "AUTH_TOKEN_TTL_SECONDS",
                ..
            })
        ));
    }
}
