//! # Blog インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **データベース接続**: PostgreSQL への接続プール管理とマイグレーション
//! - **キャッシュ接続**: Redis への接続管理
//! - **リポジトリ実装**: ユーザー・記事の永続化
//! - **認証基盤**: パスワードハッシュ（Argon2id）と認証トークンの保存
//!
//! ## 依存関係
//!
//! ```text
//! api → infra → domain
//! ```
//!
//! ドメイン層はインフラ層に依存しない。
//!
//! ## モジュール構成
//!
//! - [`db`] - PostgreSQL データベース接続管理
//! - [`redis`] - Redis 接続管理
//! - [`error`] - インフラ層エラー定義
//! - [`password`] - パスワードのハッシュ化と検証
//! - [`token`] - 認証トークンの発行・検索・失効
//! - [`repository`] - リポジトリ実装
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use blog_infra::{db, redis};
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = db::create_pool("postgres://localhost/blog").await?;
//!     db::run_migrations(&pool).await?;
//!
//!     let redis = redis::create_connection_manager("redis://localhost").await?;
//!
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod password;
pub mod redis;
pub mod repository;
pub mod token;

pub use error::InfraError;
pub use password::{Argon2PasswordChecker, PasswordChecker};
pub use token::{RedisTokenStore, TokenData, TokenStore};
